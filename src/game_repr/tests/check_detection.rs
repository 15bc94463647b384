use super::*;

// ==================== CHECK DETECTION TESTS ====================

#[test]
fn test_rook_check_line() {
    let pos = pos("4k3/8/8/8/8/8/8/4RK2 b - - 0 1");
    assert!(pos.in_check());
    let threats = pos.threats();
    assert_eq!(threats.len(), 1);
    assert_eq!(threats[0].attacker, sq("e1"));
    // Attacker plus e2..e7.
    assert_eq!(threats[0].line.len(), 7);
    assert!(threats[0].covers(sq("e4")));
    assert!(!threats[0].covers(sq("e8")));
}

#[test]
fn test_double_check_only_king_moves() {
    let pos = pos("4k3/8/r4N2/8/8/8/8/4RK2 b - - 0 1");
    assert_eq!(pos.threats().len(), 2);
    assert!(!pos.legal_moves().is_empty());
    assert!(pos.legal_moves().iter().all(|m| m.from == sq("e8")));
}

#[test]
fn test_check_can_be_blocked() {
    let pos = pos("4k3/8/8/8/8/8/r7/4RK2 b - - 0 1");
    assert_eq!(destinations(&pos, "a2"), vec!["e2"]);
}

#[test]
fn test_pinned_rook_slides_along_pin() {
    let pos = pos("4k3/4r3/8/8/8/8/8/4RK2 b - - 0 1");
    assert!(!pos.in_check());
    assert_eq!(destinations(&pos, "e7"), vec!["e1", "e2", "e3", "e4", "e5", "e6"]);
}

#[test]
fn test_pinned_knight_is_frozen() {
    let pos = pos("4k3/4n3/8/8/8/8/8/4RK2 b - - 0 1");
    assert!(destinations(&pos, "e7").is_empty());
}

#[test]
fn test_diagonal_pin() {
    let pos = pos("4k3/8/8/8/1b6/8/3P4/4K3 w - - 0 1");
    assert!(destinations(&pos, "d2").is_empty());
}

#[test]
fn test_pawn_checks_only_forward() {
    assert!(pos("8/8/4k3/3P4/8/8/8/4K3 b - - 0 1").in_check());
    assert!(!pos("8/8/3P4/4k3/8/8/8/4K3 b - - 0 1").in_check());
    assert!(pos("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1").in_check());
}

#[test]
fn test_threats_on_waiting_side() {
    let pos = Position::default();
    assert!(pos.threats_on(Team::White).is_empty());
    assert!(pos.threats_on(Team::Black).is_empty());
    assert_eq!(pos.moves_for(Team::Black).len(), 20);
}
