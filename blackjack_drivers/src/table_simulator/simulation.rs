use blackjack_engine::{
    Bankroll, Card, DecisionContext, GameStats, InsurancePolicy, Ledger, RoundPhase, Rule, Seat,
    Settlement, Stat, StrategyKind, Table, TableError, TableEventHandler,
};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub rounds: u64,
    pub bet: u32,
    pub seed: Option<u64>,
    pub strategy: StrategyKind,
    pub insurance: InsurancePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationReport {
    pub rounds_played: u64,
    pub starting_balance: u32,
    pub total_wagered: u64,
    pub total_credited: u64,
    pub splits: u32,
    pub burned_cards: u32,
}

/// Feeds table events into the statistics and the running report.
struct Handler<'a> {
    round: u64,
    stats: &'a mut GameStats,
    report: &'a mut SimulationReport,
}

impl TableEventHandler for Handler<'_> {
    fn on_card_dealt(&mut self, seat: Seat, card: Card) {
        debug!(round = self.round, ?seat, %card, "card dealt");
    }

    fn on_card_burned(&mut self, card: Card) {
        debug!(round = self.round, %card, "card burned");
        self.report.burned_cards += 1;
    }

    fn on_split(&mut self, hands: usize) {
        debug!(round = self.round, hands, "split");
        self.report.splits += 1;
    }

    fn on_stat(&mut self, stat: Stat) {
        self.stats.record(stat);
    }

    fn on_settled(&mut self, settlement: &Settlement) {
        self.report.total_wagered +=
            u64::from(settlement.total_bet()) + u64::from(settlement.insurance_bet);
        self.report.total_credited += u64::from(settlement.total_credit());
        debug!(round = self.round, message = %settlement.message(), "round over");
    }
}

/// Plays `settings.rounds` rounds with a fixed bet, stopping early when the
/// bankroll cannot cover the bet.
pub fn run_simulation(
    rule: &Rule,
    settings: &SimulationSettings,
    bankroll: &mut Bankroll,
    stats: &mut GameStats,
) -> Result<SimulationReport, TableError> {
    let mut table = match settings.seed {
        Some(seed) => Table::with_seed(rule, seed)?,
        None => Table::new(rule)?,
    };
    let mut strategy = settings.strategy.build();
    let mut report = SimulationReport {
        starting_balance: bankroll.current_balance(),
        ..SimulationReport::default()
    };

    for round in 1..=settings.rounds {
        if !bankroll.can_afford(settings.bet) {
            warn!(
                round,
                balance = bankroll.current_balance(),
                "bankroll cannot cover the bet, stopping"
            );
            break;
        }

        table.place_bet(settings.bet, bankroll)?;
        table.start_new_round()?;

        if table.phase() == RoundPhase::OfferingInsurance {
            let affordable = table.can_take_insurance(bankroll.current_balance());
            let wanted = match settings.insurance {
                InsurancePolicy::Always => true,
                InsurancePolicy::Never => false,
                InsurancePolicy::FollowStrategy => table
                    .player_hand()
                    .map_or(false, |hand| strategy.should_take_insurance(hand)),
            };
            table.respond_to_insurance(wanted && affordable, bankroll)?;
        }

        while let Some(context) = DecisionContext::from_table(&table, bankroll.current_balance()) {
            let decision = strategy.decide(&context);
            debug!(round, ?decision, hand = table.current_hand_number(), "decision");
            table.act(decision, bankroll)?;
        }

        if table.phase() == RoundPhase::DealerTurn {
            table.play_dealer_turn()?;
        }
        table.resolve_bet(bankroll)?;

        let mut handler = Handler {
            round,
            stats: &mut *stats,
            report: &mut report,
        };
        table.dispatch_events(&mut handler);
        table.reset();
        report.rounds_played = round;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(strategy: StrategyKind, insurance: InsurancePolicy) -> SimulationSettings {
        SimulationSettings {
            rounds: 20,
            bet: 10,
            seed: Some(2024),
            strategy,
            insurance,
        }
    }

    #[test]
    fn balance_matches_wagers_and_credits() {
        let rule = Rule::default();
        let mut bankroll = Bankroll::default();
        let mut stats = GameStats::new();
        let report = run_simulation(
            &rule,
            &settings(StrategyKind::Basic, InsurancePolicy::Always),
            &mut bankroll,
            &mut stats,
        )
        .unwrap();

        assert_eq!(report.rounds_played, 20);
        assert_eq!(
            i64::from(bankroll.current_balance()),
            i64::from(report.starting_balance) - report.total_wagered as i64
                + report.total_credited as i64
        );
        assert!(u64::from(stats.total_games()) >= report.rounds_played);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let rule = Rule::default();
        let run = || {
            let mut bankroll = Bankroll::default();
            let mut stats = GameStats::new();
            let report = run_simulation(
                &rule,
                &settings(StrategyKind::DealerMimic, InsurancePolicy::Never),
                &mut bankroll,
                &mut stats,
            )
            .unwrap();
            (bankroll.current_balance(), stats, report)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn stops_when_bankroll_runs_dry() {
        let rule = Rule::default();
        let mut bankroll = Bankroll::new(5);
        let mut stats = GameStats::new();
        let report = run_simulation(
            &rule,
            &settings(StrategyKind::Basic, InsurancePolicy::Never),
            &mut bankroll,
            &mut stats,
        )
        .unwrap();
        assert_eq!(report.rounds_played, 0);
        assert_eq!(bankroll.current_balance(), 5);
    }
}
