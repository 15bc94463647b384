//! Pawn structure terms, computed per side and signed for White.

use crate::game_repr::{Position, Team, Type};

const ISOLATED_PENALTY: f64 = -0.25;
const CONNECTED_BONUS: f64 = 0.1;
const PASSED_BONUS: f64 = 0.5;
const BACKWARD_PENALTY: f64 = -0.2;
const DOUBLED_PENALTY: f64 = -0.3;
const ADVANCE_PER_RANK: f64 = 0.05;
const NEAR_PROMOTION_BONUS: f64 = 1.0;
const MAJORITY_BONUS: f64 = 0.2;

/// Pawn ranks per file for one side, counted from that side's own back rank.
#[derive(Debug, Default)]
struct PawnFiles {
    ranks: [Vec<i8>; 8],
}

impl PawnFiles {
    fn collect(pos: &Position, team: Team) -> Self {
        let mut files = PawnFiles::default();
        for pawn in pos.pieces_of(team).filter(|p| p.is(Type::Pawn)) {
            files.ranks[pawn.square.file() as usize].push(relative_rank(team, pawn.square.rank()));
        }
        files
    }

    fn on(&self, file: i8) -> &[i8] {
        if (0..8).contains(&file) {
            &self.ranks[file as usize]
        } else {
            &[]
        }
    }

    fn count(&self, files: std::ops::Range<usize>) -> usize {
        self.ranks[files].iter().map(Vec::len).sum()
    }
}

/// Rank seen from `team`'s side: 0 is its back rank, 7 the promotion rank.
fn relative_rank(team: Team, rank: i8) -> i8 {
    match team {
        Team::Black => 7 - rank,
        _ => rank,
    }
}

/// Structure score of one side, unsigned (positive is good for `team`).
fn side_score(own: &PawnFiles, enemy: &PawnFiles) -> f64 {
    let mut score = 0.0;

    for file in 0..8i8 {
        let here = own.on(file);
        if here.len() > 1 {
            score += DOUBLED_PENALTY * (here.len() - 1) as f64;
        }

        for &rank in here {
            let neighbours: Vec<i8> = [file - 1, file + 1]
                .iter()
                .flat_map(|&f| own.on(f).iter().copied())
                .collect();

            if neighbours.is_empty() {
                score += ISOLATED_PENALTY;
            } else {
                score += CONNECTED_BONUS;
                // Every neighbouring pawn has already gone past this one.
                if neighbours.iter().all(|&n| n > rank) {
                    score += BACKWARD_PENALTY;
                }
            }

            // Enemy ranks are from the enemy's side; mirror them to compare.
            let blocked = (file - 1..=file + 1)
                .flat_map(|f| enemy.on(f).iter().copied())
                .any(|enemy_rank| 7 - enemy_rank > rank);
            if !blocked {
                score += PASSED_BONUS;
            }

            score += ADVANCE_PER_RANK * (rank - 1) as f64;
            if rank == 6 {
                score += NEAR_PROMOTION_BONUS;
            }
        }
    }

    for wing in [0..4, 4..8] {
        if own.count(wing.clone()) > enemy.count(wing) {
            score += MAJORITY_BONUS;
        }
    }
    score
}

/// Pawn structure score of `pos`, positive for White.
pub fn pawn_structure(pos: &Position) -> f64 {
    let white = PawnFiles::collect(pos, Team::White);
    let black = PawnFiles::collect(pos, Team::Black);
    side_score(&white, &black) - side_score(&black, &white)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(fen: &str) -> f64 {
        pawn_structure(&Position::from_fen(fen).unwrap())
    }

    #[test]
    fn test_start_position_is_symmetric() {
        assert!(score(crate::game_repr::START_FEN).abs() < 1e-9);
    }

    #[test]
    fn test_isolated_pawn_penalised() {
        // White a2 + c2 (both isolated) against black b7 + c7 (connected).
        let s = score("4k3/1pp5/8/8/8/8/P1P5/4K3 w - - 0 1");
        assert!(s < 0.0, "isolated pawns should score below connected ones: {s}");
    }

    #[test]
    fn test_passed_pawn_rewarded() {
        let passed = score("4k3/8/8/3P4/8/8/8/4K3 w - - 0 1");
        let blocked = score("4k3/2p5/8/3P4/8/8/8/4K3 w - - 0 1");
        assert!(passed > blocked + 0.3, "{passed} vs {blocked}");
    }

    #[test]
    fn test_near_promotion_bonus() {
        let seventh = score("7k/3P4/8/8/8/8/8/4K3 w - - 0 1");
        let sixth = score("7k/8/3P4/8/8/8/8/4K3 w - - 0 1");
        assert!(seventh - sixth > 1.0);
    }

    #[test]
    fn test_doubled_pawns_penalised() {
        let doubled = score("4k3/8/8/8/8/3P4/3P4/4K3 w - - 0 1");
        let split = score("4k3/8/8/8/8/4P3/3P4/4K3 w - - 0 1");
        assert!(doubled < split);
    }

    #[test]
    fn test_mirrored_structure_negates() {
        let white = score("4k3/8/8/8/3P4/8/PP6/4K3 w - - 0 1");
        let black = score("4k3/pp6/8/3p4/8/8/8/4K3 w - - 0 1");
        assert!((white + black).abs() < 1e-9);
    }
}
