//! Game and engine configuration.
//!
//! A [`GameConfig`] holds everything needed to start a game: who plays each
//! side, where the game starts, the clock, and the seed for engine tie-breaks.

use std::time::Duration;

use crate::error::ChessResult;
use crate::game_repr::{Position, Team, START_FEN};

/// Depth and time bounds of one engine search.
///
/// Nodes shallower than `min_depth` always expand. Between `min_depth` and
/// `max_depth` only nodes reached by a forcing move (capture or check) expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub min_depth: u32,
    pub max_depth: u32,
    /// Wall-clock budget per move; `None` searches to completion
    pub think_time: Option<Duration>,
}

impl SearchLimits {
    pub const fn new(min_depth: u32, max_depth: u32) -> Self {
        Self { min_depth, max_depth, think_time: None }
    }

    pub const fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = Some(think_time);
        self
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Difficulty::Medium.limits()
    }
}

/// Engine strength presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    /// One forced ply, forcing lines to three
    Easy,
    Medium,
    Hard,
    /// Same tree as Hard, bounded by a think time
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard, Difficulty::Expert];

    pub fn limits(&self) -> SearchLimits {
        match self {
            Difficulty::Easy => SearchLimits::new(1, 3),
            Difficulty::Medium => SearchLimits::new(2, 4),
            Difficulty::Hard => SearchLimits::new(3, 6),
            Difficulty::Expert => SearchLimits::new(3, 8).with_think_time(Duration::from_secs(5)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown difficulty {s:?} (easy, medium, hard, expert)"))
    }
}

/// Configuration for a single side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerConfig {
    /// Moves come from outside the core (UI, script, network)
    Human,
    Engine { difficulty: Difficulty },
}

impl PlayerConfig {
    pub fn is_engine(&self) -> bool {
        matches!(self, PlayerConfig::Engine { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    PvP,
    PvAI,
    AIvAI,
}

/// Complete game configuration.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub white: PlayerConfig,
    pub black: PlayerConfig,
    pub starting_fen: String,
    /// Per-side clock; `None` plays untimed
    pub time_control: Option<Duration>,
    /// Seed for engine tie-breaks; `None` draws one from entropy
    pub seed: Option<u64>,
    /// Stop the game (undecided) after this many plies
    pub max_plies: Option<u32>,
}

impl GameConfig {
    fn with_players(white: PlayerConfig, black: PlayerConfig) -> Self {
        Self {
            white,
            black,
            starting_fen: START_FEN.to_string(),
            time_control: None,
            seed: None,
            max_plies: None,
        }
    }

    pub fn pvp() -> Self {
        Self::with_players(PlayerConfig::Human, PlayerConfig::Human)
    }

    /// Human on `user_team`, engine on the other side.
    pub fn pvai(user_team: Team, difficulty: Difficulty) -> Self {
        let engine = PlayerConfig::Engine { difficulty };
        match user_team {
            Team::Black => Self::with_players(engine, PlayerConfig::Human),
            _ => Self::with_players(PlayerConfig::Human, engine),
        }
    }

    pub fn aivai(white: Difficulty, black: Difficulty) -> Self {
        Self::with_players(
            PlayerConfig::Engine { difficulty: white },
            PlayerConfig::Engine { difficulty: black },
        )
    }

    pub fn with_fen(mut self, fen: impl Into<String>) -> Self {
        self.starting_fen = fen.into();
        self
    }

    pub fn with_time_control(mut self, per_side: Duration) -> Self {
        self.time_control = Some(per_side);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_plies(mut self, plies: u32) -> Self {
        self.max_plies = Some(plies);
        self
    }

    pub fn mode(&self) -> GameMode {
        match (self.white.is_engine(), self.black.is_engine()) {
            (false, false) => GameMode::PvP,
            (true, true) => GameMode::AIvAI,
            _ => GameMode::PvAI,
        }
    }

    pub fn player(&self, team: Team) -> PlayerConfig {
        match team {
            Team::Black => self.black,
            _ => self.white,
        }
    }

    /// Human side of a PvAI game.
    pub fn human_team(&self) -> Option<Team> {
        match self.mode() {
            GameMode::PvAI if !self.white.is_engine() => Some(Team::White),
            GameMode::PvAI => Some(Team::Black),
            _ => None,
        }
    }

    /// Parses the starting position. Malformed notation aborts setup here.
    pub fn starting_position(&self) -> ChessResult<Position> {
        Position::from_fen(&self.starting_fen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pvp_config() {
        let config = GameConfig::pvp();
        assert_eq!(config.mode(), GameMode::PvP);
        assert_eq!(config.white, PlayerConfig::Human);
        assert_eq!(config.black, PlayerConfig::Human);
        assert_eq!(config.human_team(), None);
    }

    #[test]
    fn test_pvai_config_black() {
        let config = GameConfig::pvai(Team::Black, Difficulty::Hard);
        assert_eq!(config.mode(), GameMode::PvAI);
        assert_eq!(config.white, PlayerConfig::Engine { difficulty: Difficulty::Hard });
        assert_eq!(config.human_team(), Some(Team::Black));
    }

    #[test]
    fn test_aivai_config() {
        let config = GameConfig::aivai(Difficulty::Easy, Difficulty::Expert).with_seed(7).with_max_plies(40);
        assert_eq!(config.mode(), GameMode::AIvAI);
        assert_eq!(config.player(Team::Black), PlayerConfig::Engine { difficulty: Difficulty::Expert });
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_plies, Some(40));
    }

    #[test]
    fn test_difficulty_limits_grow() {
        let mut last = 0;
        for d in Difficulty::ALL {
            let limits = d.limits();
            assert!(limits.min_depth <= limits.max_depth);
            assert!(limits.max_depth >= last);
            last = limits.max_depth;
        }
        assert!(Difficulty::Expert.limits().think_time.is_some());
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_bad_starting_fen_aborts_setup() {
        let config = GameConfig::pvp().with_fen("not a position");
        assert!(config.starting_position().is_err());
    }
}
