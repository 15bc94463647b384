use super::*;

// ==================== STARTING POSITION PERFT ====================

#[test]
fn test_perft_start_depth_1() {
    assert_eq!(Position::default().perft(1), 20);
}

#[test]
fn test_perft_start_depth_2() {
    assert_eq!(Position::default().perft(2), 400);
}

#[test]
fn test_perft_start_depth_3() {
    assert_eq!(Position::default().perft(3), 8902);
}

#[test]
#[ignore = "slow without optimizations"]
fn test_perft_start_depth_4() {
    assert_eq!(Position::default().perft(4), 197281);
}

#[test]
fn test_divide_sums_to_perft() {
    let pos = Position::default();
    let split = pos.divide(2);
    assert_eq!(split.len(), 20);
    assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 400);
}
