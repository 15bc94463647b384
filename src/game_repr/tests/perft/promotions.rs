use super::*;

// ==================== PROMOTION-HEAVY PERFT TESTS ====================

const MIRRORED: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const TALKCHESS: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

#[test]
fn test_perft_mirrored_depth_1() {
    assert_eq!(pos(MIRRORED).perft(1), 6);
}

#[test]
fn test_perft_mirrored_depth_2() {
    assert_eq!(pos(MIRRORED).perft(2), 264);
}

#[test]
fn test_perft_mirrored_depth_3() {
    assert_eq!(pos(MIRRORED).perft(3), 9467);
}

#[test]
fn test_perft_talkchess_depth_1() {
    assert_eq!(pos(TALKCHESS).perft(1), 44);
}

#[test]
fn test_perft_talkchess_depth_2() {
    assert_eq!(pos(TALKCHESS).perft(2), 1486);
}
