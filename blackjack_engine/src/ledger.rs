use serde::{Deserialize, Serialize};

pub const DEFAULT_STARTING_BALANCE: u32 = 2000;

/// The balance store a table settles against. The table never holds money.
pub trait Ledger {
    fn current_balance(&self) -> u32;

    /// Withdraws `amount`. Returns false and leaves the balance unchanged if
    /// the balance cannot cover it.
    fn debit(&mut self, amount: u32) -> bool;

    fn credit(&mut self, amount: u32);

    fn can_afford(&self, amount: u32) -> bool {
        self.current_balance() >= amount
    }
}

/// In-memory ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bankroll {
    balance: u32,
}

impl Default for Bankroll {
    fn default() -> Self {
        Bankroll::new(DEFAULT_STARTING_BALANCE)
    }
}

impl Bankroll {
    pub fn new(balance: u32) -> Bankroll {
        Bankroll { balance }
    }

    pub fn add_funds(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }
}

impl Ledger for Bankroll {
    fn current_balance(&self) -> u32 {
        self.balance
    }

    fn debit(&mut self, amount: u32) -> bool {
        match self.balance.checked_sub(amount) {
            Some(rest) => {
                self.balance = rest;
                true
            }
            None => false,
        }
    }

    fn credit(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }
}
