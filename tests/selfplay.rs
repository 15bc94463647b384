//! Whole games driven through the orchestrator.
//!
//! These exercise the board, arbiter, players and engine together and check
//! the invariants every finished game must satisfy.

use chess_core::agent::player::{GameResult, Player};
use chess_core::agent::ScriptedPlayer;
use chess_core::arbiter::GameStatus;
use chess_core::board::Board;
use chess_core::config::{Difficulty, GameConfig};
use chess_core::events::GameEvent;
use chess_core::game_repr::{Position, Team};
use chess_core::orchestrator::{Orchestrator, StepOutcome};

/// Replays a finished game move by move and checks every move was legal.
fn replay_is_legal(board: &Board) -> bool {
    let mut position = board.start_position().clone();
    for &mv in board.history() {
        if !position.legal_moves().contains(&mv) {
            return false;
        }
        position = position.play(mv).unwrap();
    }
    position.short_key() == board.position().short_key()
}

#[test]
fn test_engine_selfplay_stays_legal() {
    let config = GameConfig::aivai(Difficulty::Easy, Difficulty::Easy).with_seed(11).with_max_plies(30);
    let mut game = Orchestrator::from_config(&config).unwrap();
    let result = game.run().unwrap();

    assert!(result.is_some());
    assert!(game.board().is_over());
    assert!(game.board().history().len() <= 30);
    assert!(replay_is_legal(game.board()));
}

#[test]
fn test_selfplay_is_reproducible_with_seed() {
    let play = || {
        let config = GameConfig::aivai(Difficulty::Easy, Difficulty::Easy).with_seed(5).with_max_plies(10);
        let mut game = Orchestrator::from_config(&config).unwrap();
        game.run().unwrap();
        game.board().history().to_vec()
    };
    assert_eq!(play(), play());
}

#[test]
fn test_engine_converts_mate_in_two() {
    let config = GameConfig::aivai(Difficulty::Hard, Difficulty::Easy)
        .with_fen("k7/8/1K6/8/8/8/8/1R6 w - - 0 1")
        .with_seed(1)
        .with_max_plies(10);
    let mut game = Orchestrator::from_config(&config).unwrap();
    assert_eq!(game.run().unwrap(), Some(GameResult::WhiteWins));
    assert_eq!(game.board().history().len(), 3);
}

#[test]
fn test_events_follow_a_scripted_game() {
    let white: Box<dyn Player> = Box::new(ScriptedPlayer::new("W".into(), "e2e4 d1h5 f1c4 h5f7").unwrap());
    let black: Box<dyn Player> = Box::new(ScriptedPlayer::new("B".into(), "e7e5 b8c6 g8f6").unwrap());
    let mut game = Orchestrator::new(Board::new(), white, black);

    let mut events = Vec::new();
    loop {
        let outcome = game.step().unwrap();
        events.extend(game.board_mut().drain_events());
        if let StepOutcome::Finished(result) = outcome {
            assert_eq!(result, GameResult::WhiteWins);
            break;
        }
    }

    let applied = events.iter().filter(|e| matches!(e, GameEvent::MoveApplied { .. })).count();
    assert_eq!(applied, 7);
    assert!(events.contains(&GameEvent::KingInCheck(Team::Black)));
    assert_eq!(events.last(), Some(&GameEvent::GameConcluded(GameStatus::WhiteWins)));
}

#[test]
fn test_engine_reply_is_legal_everywhere() {
    let fens = [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    ];
    for fen in fens {
        let position = Position::from_fen(fen).unwrap();
        let mut engine = chess_core::agent::EnginePlayer::with_difficulty(Difficulty::Easy, Some(2));
        let mv = engine.get_move(&position, None).unwrap();
        assert!(position.legal_moves().contains(&mv), "illegal reply {mv} in {fen}");
    }
}
