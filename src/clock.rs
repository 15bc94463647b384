// Per-side game clock
//
// Each side has a bank of time that only runs on its own turn. The clock also
// hands out a thinking budget for engine moves: a fixed share of what is left,
// so the engine never plans to spend the whole bank on one move.

use std::time::{Duration, Instant};

use crate::game_repr::Team;

/// Moves the remaining bank is assumed to cover when sizing a budget
const MOVES_TO_GO: u32 = 30;
/// Kept back from every budget for move application and bookkeeping
const MOVE_OVERHEAD: Duration = Duration::from_millis(20);

#[derive(Debug, Clone)]
pub struct GameClock {
    remaining: [Duration; 2],
    /// Side whose time is running and since when
    running: Option<(Team, Instant)>,
}

impl GameClock {
    /// Both sides start with `per_side`.
    pub fn new(per_side: Duration) -> Self {
        Self { remaining: [per_side; 2], running: None }
    }

    /// Time left for `team`, counting the turn in progress.
    pub fn remaining(&self, team: Team) -> Duration {
        let bank = self.remaining[team.index()];
        match self.running {
            Some((running, since)) if running == team => bank.saturating_sub(since.elapsed()),
            _ => bank,
        }
    }

    /// Side whose time is currently running.
    pub fn running(&self) -> Option<Team> {
        self.running.map(|(team, _)| team)
    }

    /// Whether `team` has run out of time.
    pub fn is_flagged(&self, team: Team) -> bool {
        self.remaining(team).is_zero()
    }

    /// Starts `team`'s time. Any other running side is stopped first.
    pub fn start(&mut self, team: Team) {
        self.stop();
        self.running = Some((team, Instant::now()));
    }

    /// Stops the running side and books the time it used.
    pub fn stop(&mut self) -> Option<(Team, Duration)> {
        let (team, since) = self.running.take()?;
        let used = since.elapsed();
        let slot = &mut self.remaining[team.index()];
        *slot = slot.saturating_sub(used);
        Some((team, used))
    }

    /// Charges `used` to `team` directly, for callers that time moves themselves.
    pub fn charge(&mut self, team: Team, used: Duration) {
        let slot = &mut self.remaining[team.index()];
        *slot = slot.saturating_sub(used);
    }

    /// Thinking budget for `team`'s next move.
    pub fn move_budget(&self, team: Team) -> Duration {
        (self.remaining(team) / MOVES_TO_GO).saturating_sub(MOVE_OVERHEAD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_and_flag() {
        let mut clock = GameClock::new(Duration::from_secs(1));
        clock.charge(Team::White, Duration::from_millis(400));
        assert_eq!(clock.remaining(Team::White), Duration::from_millis(600));
        assert_eq!(clock.remaining(Team::Black), Duration::from_secs(1));

        clock.charge(Team::White, Duration::from_secs(5));
        assert!(clock.is_flagged(Team::White));
        assert!(!clock.is_flagged(Team::Black));
    }

    #[test]
    fn test_only_running_side_loses_time() {
        let mut clock = GameClock::new(Duration::from_secs(60));
        clock.start(Team::Black);
        std::thread::sleep(Duration::from_millis(5));
        let (team, used) = clock.stop().unwrap();
        assert_eq!(team, Team::Black);
        assert!(used >= Duration::from_millis(5));
        assert!(clock.remaining(Team::Black) < Duration::from_secs(60));
        assert_eq!(clock.remaining(Team::White), Duration::from_secs(60));
        assert!(clock.stop().is_none());
    }

    #[test]
    fn test_budget_is_a_share_of_the_bank() {
        let clock = GameClock::new(Duration::from_secs(300));
        assert_eq!(clock.move_budget(Team::White), Duration::from_secs(10) - MOVE_OVERHEAD);

        let mut low = GameClock::new(Duration::from_millis(10));
        low.charge(Team::Black, Duration::from_millis(10));
        assert_eq!(low.move_budget(Team::Black), Duration::ZERO);
    }
}
