use crate::arbiter::{GameContext, GameStatus};
use crate::error::{ChessError, ChessResult};
use crate::events::{EventQueue, GameEvent};
use crate::game_repr::{BoardView, Move, MoveList, Piece, Position, Square, Team, Type};

/// Board component: the live game, as opposed to the throwaway positions of a search.
///
/// The Board owns the current [`Position`], every position the game went through, the
/// arbiter's [`GameContext`] (repetition counts) and the queue of outgoing
/// [`GameEvent`]s. It also keeps the selection state an interactive front end needs:
/// the selected square and the legal moves of the piece on it.
///
/// # Move flow
///
/// - [`submit_move`](Board::submit_move) validates a move against the legal list. A
///   pawn reaching its last rank does not move yet: the board emits
///   `PromotionRequired` and waits for [`resolve_promotion`](Board::resolve_promotion).
/// - [`play`](Board::play) applies a move with the promotion already chosen, which is
///   what engine-controlled sides use.
///
/// After each applied move the position is classified through the game context, and
/// `MoveApplied`, `KingInCheck` and `GameConcluded` are queued as they apply.
///
/// # Usage
///
/// ```
/// use chess_core::board::Board;
/// use chess_core::game_repr::Square;
///
/// let mut board = Board::new();
/// let e2: Square = "e2".parse().unwrap();
/// let e4: Square = "e4".parse().unwrap();
/// let mv = board.position().find_move(e2, e4).unwrap();
/// board.submit_move(mv).unwrap();
/// assert_eq!(board.history().len(), 1);
/// ```
#[derive(Debug)]
pub struct Board {
    /// Every position of the game, the current one last. Never empty.
    positions: Vec<Position>,

    /// Moves played, `moves[i]` leads from `positions[i]` to `positions[i + 1]`
    moves: Vec<Move>,

    context: GameContext,
    status: GameStatus,

    events: EventQueue,

    /// Pawn move waiting for its promotion piece
    pending_promotion: Option<Move>,

    /// Currently selected square, if any
    selected: Option<Square>,

    /// Cached legal moves for the piece on the selected square
    selection_moves: MoveList,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new board with the starting chess position.
    pub fn new() -> Self {
        Self::from_position(Position::default())
    }

    /// Create a board from position notation.
    ///
    /// # Errors
    ///
    /// `InvalidFen` if the notation does not describe a legal position.
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// Create a board whose game starts at `position`.
    pub fn from_position(position: Position) -> Self {
        let context = GameContext::new(&position);
        let status = position.status();
        Self {
            positions: vec![position],
            moves: Vec::new(),
            context,
            status,
            events: EventQueue::new(),
            pending_promotion: None,
            selected: None,
            selection_moves: MoveList::new(),
        }
    }

    // ===========================
    // Game State Access (Read-Only)
    // ===========================

    /// The current position.
    pub fn position(&self) -> &Position {
        &self.positions[self.positions.len() - 1]
    }

    pub fn start_position(&self) -> &Position {
        &self.positions[0]
    }

    /// Classification of the game so far, repetition included.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn to_move(&self) -> Team {
        self.position().to_move()
    }

    /// Moves played so far, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.moves
    }

    pub fn context(&self) -> &GameContext {
        &self.context
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.position().piece_at(square)
    }

    pub fn pending_promotion(&self) -> Option<Move> {
        self.pending_promotion
    }

    /// Check if a move is legal in the current position.
    pub fn is_legal_move(&self, mv: Move) -> bool {
        self.position().legal_moves().contains(&mv)
    }

    // ===========================
    // Moves
    // ===========================

    fn ensure_accepting(&self) -> ChessResult<()> {
        if self.status.is_terminal() {
            return Err(ChessError::GameOver(self.status));
        }
        if self.pending_promotion.is_some() {
            return Err(ChessError::PromotionPending);
        }
        Ok(())
    }

    /// Submit a move from a side that chooses its promotion piece interactively.
    ///
    /// # Returns
    ///
    /// The game status after the move. While a promotion is pending the move has not
    /// been applied and the status is unchanged.
    ///
    /// # Errors
    ///
    /// * `GameOver` - the game has already concluded
    /// * `PromotionPending` - an earlier promotion still needs its piece
    /// * `IllegalMove` - `mv` is not in the legal list
    pub fn submit_move(&mut self, mv: Move) -> ChessResult<GameStatus> {
        self.ensure_accepting()?;
        if !self.is_legal_move(mv) {
            return Err(ChessError::IllegalMove(mv.to_string()));
        }

        if self.position().is_promotion(&mv) {
            let pawn = *self
                .piece_at(mv.from)
                .unwrap_or_else(|| panic!("legal move {mv} starts on an empty square"));
            self.pending_promotion = Some(mv);
            self.events.push(GameEvent::PromotionRequired { pawn, mv, candidate: Type::Queen });
            return Ok(self.status);
        }

        self.apply(mv, Type::Queen)
    }

    /// Finish a pending promotion with `piece_type`.
    ///
    /// # Errors
    ///
    /// * `NoPendingPromotion` - nothing is waiting for a choice
    /// * `InvalidPromotion` - `piece_type` is a pawn or a king
    pub fn resolve_promotion(&mut self, piece_type: Type) -> ChessResult<GameStatus> {
        let mv = self.pending_promotion.ok_or(ChessError::NoPendingPromotion)?;
        if !piece_type.is_promotion_target() {
            return Err(ChessError::InvalidPromotion(piece_type));
        }
        self.pending_promotion = None;
        let status = self.apply(mv, piece_type)?;
        self.events.push(GameEvent::Promoted { square: mv.to, piece_type });
        Ok(status)
    }

    /// Apply a move whose promotion piece (if any) is already known.
    pub fn play(&mut self, mv: Move, promotion: Type) -> ChessResult<GameStatus> {
        self.ensure_accepting()?;
        let promotes = self.position().is_promotion(&mv);
        let status = self.apply(mv, promotion)?;
        if promotes {
            self.events.push(GameEvent::Promoted { square: mv.to, piece_type: promotion });
        }
        Ok(status)
    }

    fn apply(&mut self, mv: Move, promotion: Type) -> ChessResult<GameStatus> {
        let current = self.position();
        let team = current.to_move();
        let piece = *current
            .piece_at(mv.from)
            .ok_or_else(|| ChessError::IllegalMove(mv.to_string()))?;

        let next = current.play_promoting(mv, promotion)?;
        self.status = self.context.classify(&next);

        self.events.push(GameEvent::MoveApplied { team, piece, mv });
        if let Some(rook) = next.secondary_move() {
            self.events.push(GameEvent::RookRelocated { mv: rook });
        }
        if next.in_check() {
            self.events.push(GameEvent::KingInCheck(next.to_move()));
        }

        log::debug!("{team:?} plays {mv} -> {:?} ({})", self.status, next.short_key());
        self.positions.push(next);
        self.moves.push(mv);
        self.set_selected(None);

        if self.status.is_terminal() {
            self.events.push(GameEvent::GameConcluded(self.status));
        }
        Ok(self.status)
    }

    /// Ends the game from outside the rules, e.g. when a side runs out of time.
    pub fn conclude(&mut self, status: GameStatus) {
        if self.status.is_terminal() || !status.is_terminal() {
            return;
        }
        self.status = status;
        self.pending_promotion = None;
        self.events.push(GameEvent::GameConcluded(status));
    }

    /// Take back the last move. The repetition counts are rebuilt from the
    /// remaining history.
    pub fn undo(&mut self) -> Option<Move> {
        let mv = self.moves.pop()?;
        self.positions.pop();
        self.pending_promotion = None;

        let mut context = GameContext::new(&self.positions[0]);
        let mut status = self.positions[0].status();
        for position in &self.positions[1..] {
            status = context.classify(position);
        }
        self.context = context;
        self.status = status;
        self.set_selected(None);
        Some(mv)
    }

    // ===========================
    // Selection
    // ===========================

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Legal moves of the piece on the selected square. Empty if nothing is selected.
    pub fn legal_moves_for_selection(&self) -> &[Move] {
        &self.selection_moves
    }

    /// Set the selected square and refresh the cached moves for it.
    pub fn set_selected(&mut self, square: Option<Square>) {
        if self.selected == square {
            return;
        }
        self.selected = square;
        self.selection_moves = match square {
            Some(sq) => self.position().legal_moves_from(sq).copied().collect(),
            None => MoveList::new(),
        };
        self.events.push(GameEvent::SelectionChanged(square));
    }

    // ===========================
    // Events
    // ===========================

    /// Hands out the events queued since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_repr::MoveType;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn find(board: &Board, from: &str, to: &str) -> Move {
        board.position().find_move(sq(from), sq(to)).unwrap()
    }

    fn play_line(board: &mut Board, line: &[(&str, &str)]) {
        for (from, to) in line {
            let mv = find(board, from, to);
            board.submit_move(mv).unwrap();
        }
    }

    // ==== MOVES AND EVENTS ====

    #[test]
    fn test_move_applied_event() {
        let mut board = Board::new();
        let mv = find(&board, "e2", "e4");
        assert_eq!(board.submit_move(mv), Ok(GameStatus::InProgress));

        let events = board.drain_events();
        assert!(matches!(
            events.as_slice(),
            [GameEvent::MoveApplied { team: Team::White, piece, mv: applied }] if piece.is(Type::Pawn) && *applied == mv
        ));
        assert!(board.drain_events().is_empty());
        assert_eq!(board.to_move(), Team::Black);
    }

    #[test]
    fn test_illegal_move_rejected() {
        let mut board = Board::new();
        let bogus = Move::new(sq("e2"), sq("e5"), MoveType::Quiet);
        assert!(matches!(board.submit_move(bogus), Err(ChessError::IllegalMove(_))));
        assert!(board.history().is_empty());
    }

    #[test]
    fn test_check_and_mate_events() {
        // Fool's mate
        let mut board = Board::new();
        play_line(&mut board, &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")]);

        assert_eq!(board.status(), GameStatus::BlackWins);
        let events = board.drain_events();
        assert!(events.contains(&GameEvent::KingInCheck(Team::White)));
        assert_eq!(events.last(), Some(&GameEvent::GameConcluded(GameStatus::BlackWins)));

        let mv = board.position().legal_moves().first().copied();
        assert!(mv.is_none());
        let any = Move::new(sq("e1"), sq("f2"), MoveType::Quiet);
        assert_eq!(board.submit_move(any), Err(ChessError::GameOver(GameStatus::BlackWins)));
    }

    #[test]
    fn test_castling_reports_rook_relocation() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let castle = find(&board, "e1", "g1");
        assert_eq!(castle.move_type, MoveType::CastleKingside);
        board.submit_move(castle).unwrap();

        let events = board.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::RookRelocated { mv } if mv.from == sq("h1") && mv.to == sq("f1"))));
        assert!(board.piece_at(sq("f1")).is_some_and(|p| p.is(Type::Rook)));
    }

    // ==== PROMOTION ====

    #[test]
    fn test_promotion_waits_for_choice() {
        let mut board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let push = find(&board, "a7", "a8");

        assert_eq!(board.submit_move(push), Ok(GameStatus::InProgress));
        assert_eq!(board.pending_promotion(), Some(push));
        assert!(board.history().is_empty());
        assert!(matches!(
            board.drain_events().as_slice(),
            [GameEvent::PromotionRequired { candidate: Type::Queen, .. }]
        ));

        let king = find(&board, "e1", "e2");
        assert_eq!(board.submit_move(king), Err(ChessError::PromotionPending));
        assert_eq!(board.resolve_promotion(Type::King), Err(ChessError::InvalidPromotion(Type::King)));

        board.resolve_promotion(Type::Knight).unwrap();
        assert!(board.piece_at(sq("a8")).is_some_and(|p| p.is(Type::Knight)));
        assert_eq!(board.resolve_promotion(Type::Queen), Err(ChessError::NoPendingPromotion));
    }

    #[test]
    fn test_engine_promotion_is_immediate() {
        let mut board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let push = find(&board, "a7", "a8");
        board.play(push, Type::Queen).unwrap();
        assert!(board.piece_at(sq("a8")).is_some_and(|p| p.is(Type::Queen)));
        // The new queen checks along the back rank.
        assert!(board.drain_events().contains(&GameEvent::KingInCheck(Team::Black)));
    }

    // ==== REPETITION AND UNDO ====

    #[test]
    fn test_threefold_then_fivefold() {
        let mut board = Board::new();
        let shuffle = [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")];

        play_line(&mut board, &shuffle);
        assert_eq!(board.status(), GameStatus::InProgress);
        play_line(&mut board, &shuffle);
        assert_eq!(board.status(), GameStatus::ThreefoldRepetition);
        assert!(board.status().is_draw());
    }

    #[test]
    fn test_undo_restores_state() {
        let mut board = Board::new();
        play_line(&mut board, &[("e2", "e4"), ("e7", "e5")]);
        let before = board.position().to_fen();

        let knight = find(&board, "g1", "f3");
        board.submit_move(knight).unwrap();
        assert_eq!(board.undo(), Some(knight));
        assert_eq!(board.position().to_fen(), before);
        assert_eq!(board.history().len(), 2);
        assert_eq!(board.context().repetitions().count(board.position().short_key()), 1);
    }

    #[test]
    fn test_undo_reopens_drawn_game() {
        let mut board = Board::new();
        let shuffle = [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")];
        play_line(&mut board, &shuffle);
        play_line(&mut board, &shuffle);
        assert!(board.is_over());

        board.undo();
        assert_eq!(board.status(), GameStatus::InProgress);
        assert_eq!(board.context().repetitions().count(Position::default().short_key()), 2);
    }

    #[test]
    fn test_conclude_on_time() {
        let mut board = Board::new();
        board.conclude(GameStatus::BlackWins);
        assert!(board.is_over());
        assert_eq!(board.drain_events(), vec![GameEvent::GameConcluded(GameStatus::BlackWins)]);
        // Only the first conclusion counts
        board.conclude(GameStatus::WhiteWins);
        assert_eq!(board.status(), GameStatus::BlackWins);
    }

    // ==== SELECTION ====

    #[test]
    fn test_selection_caches_moves() {
        let mut board = Board::new();
        board.set_selected(Some(sq("g1")));
        assert_eq!(board.legal_moves_for_selection().len(), 2);
        assert_eq!(board.drain_events(), vec![GameEvent::SelectionChanged(Some(sq("g1")))]);

        let mv = find(&board, "g1", "f3");
        board.submit_move(mv).unwrap();
        assert_eq!(board.selected(), None);
        assert!(board.legal_moves_for_selection().is_empty());
    }
}
