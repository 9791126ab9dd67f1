use serde::{Deserialize, Serialize};

use crate::TableEventHandler;

/// A statistics event emitted when a hand is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stat {
    PlayerWin,
    PlayerLoss,
    Push,
    PlayerBust,
    PlayerBlackjack,
    DealerBlackjack,
}

/// Running counters over played hands.
///
/// A bust is also counted as a loss and a player blackjack as a win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStats {
    pub wins: u32,
    pub losses: u32,
    pub busts: u32,
    pub pushes: u32,
    pub player_blackjacks: u32,
    pub dealer_blackjacks: u32,
}

impl GameStats {
    pub fn new() -> GameStats {
        GameStats::default()
    }

    pub fn record(&mut self, stat: Stat) {
        match stat {
            Stat::PlayerWin => self.record_player_win(),
            Stat::PlayerLoss => self.record_player_loss(),
            Stat::Push => self.record_push(),
            Stat::PlayerBust => self.record_player_bust(),
            Stat::PlayerBlackjack => self.record_player_blackjack(),
            Stat::DealerBlackjack => self.record_dealer_blackjack(),
        }
    }

    pub fn record_player_win(&mut self) {
        self.wins += 1;
    }

    pub fn record_player_loss(&mut self) {
        self.losses += 1;
    }

    pub fn record_push(&mut self) {
        self.pushes += 1;
    }

    pub fn record_player_bust(&mut self) {
        self.busts += 1;
        self.losses += 1;
    }

    pub fn record_player_blackjack(&mut self) {
        self.player_blackjacks += 1;
        self.wins += 1;
    }

    /// Dealer blackjacks are informational; the loss is recorded separately.
    pub fn record_dealer_blackjack(&mut self) {
        self.dealer_blackjacks += 1;
    }

    pub fn total_games(&self) -> u32 {
        self.wins + self.losses + self.pushes
    }

    /// Percentage of settled hands won, 0 when nothing has been played.
    pub fn win_percentage(&self) -> f64 {
        match self.total_games() {
            0 => 0.0,
            total => self.wins as f64 / total as f64 * 100.0,
        }
    }

    pub fn reset(&mut self) {
        *self = GameStats::default();
    }
}

impl TableEventHandler for GameStats {
    fn on_stat(&mut self, stat: Stat) {
        self.record(stat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bust_counts_as_loss() {
        let mut stats = GameStats::new();
        stats.record(Stat::PlayerBust);
        assert_eq!(stats.busts, 1);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.total_games(), 1);
    }

    #[test]
    fn blackjack_counts_as_win() {
        let mut stats = GameStats::new();
        stats.record(Stat::PlayerBlackjack);
        stats.record(Stat::PlayerLoss);
        stats.record(Stat::DealerBlackjack);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.player_blackjacks, 1);
        assert_eq!(stats.dealer_blackjacks, 1);
        assert_eq!(stats.total_games(), 2);
        assert_eq!(stats.win_percentage(), 50.0);
    }

    #[test]
    fn empty_stats_have_zero_win_percentage() {
        let mut stats = GameStats::new();
        assert_eq!(stats.win_percentage(), 0.0);
        stats.record(Stat::Push);
        stats.reset();
        assert_eq!(stats, GameStats::default());
    }
}
