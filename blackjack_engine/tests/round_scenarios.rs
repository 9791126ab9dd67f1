use blackjack_engine::{
    Bankroll, Card, GameStats, HandOutcome, HandStatus, InsuranceResult, Ledger, RoundPhase,
    Rule, Table, TableError,
};

fn cards(notation: &[&str]) -> Vec<Card> {
    notation.iter().map(|s| s.parse().unwrap()).collect()
}

/// Cards are dealt player, dealer, player, dealer, then in order.
fn start_round(rule: &Rule, firsts: &[&str], bet: u32, bankroll: &mut Bankroll) -> Table {
    let mut table = Table::with_seed(rule, 11).unwrap();
    table.place_bet(bet, bankroll).unwrap();
    table.start_new_round_with_firsts(&cards(firsts)).unwrap();
    table
}

#[test]
fn natural_blackjack_pays_three_to_two() {
    let mut bankroll = Bankroll::default();
    let mut table = start_round(&Rule::default(), &["AS", "9C", "KH", "8D"], 100, &mut bankroll);

    assert_eq!(table.phase(), RoundPhase::GameOver);
    assert_eq!(table.result_message(), Some("Blackjack!"));
    assert_eq!(table.resolve_bet(&mut bankroll), Ok(250));
    assert_eq!(bankroll.current_balance(), 2000 - 100 + 250);
}

#[test]
fn equal_totals_push() {
    let mut bankroll = Bankroll::default();
    let mut table = start_round(&Rule::default(), &["10S", "10C", "9H", "9D"], 100, &mut bankroll);

    table.stand().unwrap();
    table.play_dealer_turn().unwrap();
    assert_eq!(table.result_message(), Some("Push!"));
    assert_eq!(table.resolve_bet(&mut bankroll), Ok(100));
    assert_eq!(bankroll.current_balance(), 2000);
}

#[test]
fn dealer_twenty_one_beats_seventeen() {
    let mut bankroll = Bankroll::default();
    let mut table = start_round(
        &Rule::default(),
        &["10S", "6C", "7H", "5D", "KD"],
        100,
        &mut bankroll,
    );

    table.stand().unwrap();
    assert!(table.draw_one_dealer_card().unwrap());
    assert_eq!(table.dealer_hand().value(), 21);
    assert_eq!(table.result_message(), Some("You lose."));
    assert_eq!(table.resolve_bet(&mut bankroll), Ok(0));
}

#[test]
fn dealer_draws_one_card_at_a_time() {
    let mut bankroll = Bankroll::default();
    let mut table = start_round(
        &Rule::default(),
        &["10S", "2C", "9H", "3D", "4C", "AH", "2S", "KD"],
        10,
        &mut bankroll,
    );

    table.stand().unwrap();
    let mut steps = 0;
    while !table.draw_one_dealer_card().unwrap() {
        steps += 1;
        assert_eq!(table.phase(), RoundPhase::DealerTurn);
    }
    // 2 3 4 then A makes soft 20.
    assert_eq!(steps, 1);
    assert_eq!(table.dealer_hand().len(), 4);
    assert_eq!(table.dealer_hand().value(), 20);
    assert_eq!(table.phase(), RoundPhase::GameOver);
    assert_eq!(table.result_message(), Some("You lose."));
}

#[test]
fn dealer_hits_soft_seventeen_and_stands_on_hard_seventeen() {
    let mut bankroll = Bankroll::default();
    let mut table = start_round(
        &Rule::default(),
        &["10S", "AC", "8H", "6D", "2C"],
        10,
        &mut bankroll,
    );
    assert_eq!(table.phase(), RoundPhase::OfferingInsurance);
    table.respond_to_insurance(false, &mut bankroll).unwrap();
    table.stand().unwrap();
    table.play_dealer_turn().unwrap();
    assert_eq!(table.dealer_hand().len(), 3);
    assert_eq!(table.dealer_hand().value(), 19);
    assert_eq!(table.result_message(), Some("You lose."));

    let mut table = start_round(
        &Rule::default(),
        &["10S", "10C", "8H", "7D", "2C"],
        10,
        &mut bankroll,
    );
    table.stand().unwrap();
    table.play_dealer_turn().unwrap();
    assert_eq!(table.dealer_hand().len(), 2);
    assert_eq!(table.result_message(), Some("You win!"));
}

#[test]
fn split_eights_each_win_against_dealer_bust() {
    let mut bankroll = Bankroll::default();
    let mut table = start_round(
        &Rule::default(),
        &["8S", "6C", "8H", "10D", "10C", "10H", "9S"],
        50,
        &mut bankroll,
    );

    assert!(table.can_split(bankroll.current_balance()));
    table.split(&mut bankroll).unwrap();
    assert_eq!(bankroll.current_balance(), 1900);
    assert_eq!(table.hand_count(), 2);
    assert_eq!(table.total_bet(), 100);
    assert_eq!(table.current_hand_number(), 1);

    table.stand().unwrap();
    assert_eq!(table.current_hand_number(), 2);
    table.stand().unwrap();
    assert_eq!(table.phase(), RoundPhase::DealerTurn);

    table.play_dealer_turn().unwrap();
    assert!(table.dealer_hand().is_bust());
    assert_eq!(
        table.result_message(),
        Some("Hand 1: You win!\nHand 2: You win!")
    );
    assert_eq!(table.resolve_bet(&mut bankroll), Ok(200));
    assert_eq!(bankroll.current_balance(), 2100);
}

#[test]
fn split_hands_settle_independently() {
    let mut bankroll = Bankroll::default();
    let mut stats = GameStats::new();
    let mut table = start_round(
        &Rule::default(),
        &["8S", "10C", "8H", "8D", "5C", "3H", "KS", "KD"],
        50,
        &mut bankroll,
    );

    table.split(&mut bankroll).unwrap();
    // Hand 1: 8 5 then K busts. Hand 2: 8 3 doubled with K for 21.
    table.hit().unwrap();
    assert_eq!(table.current_hand_number(), 2);
    assert!(table.can_double_down(bankroll.current_balance()));
    table.double_down(&mut bankroll).unwrap();
    assert_eq!(table.phase(), RoundPhase::DealerTurn);
    assert_eq!(table.total_bet(), 150);

    table.play_dealer_turn().unwrap();
    let settlement = table.settlement().unwrap().clone();
    assert_eq!(settlement.hands[0].outcome, HandOutcome::Bust);
    assert_eq!(settlement.hands[1].outcome, HandOutcome::Win);
    assert_eq!(settlement.hands[1].bet, 100);
    assert_eq!(settlement.hand_credits().collect::<Vec<_>>(), vec![0, 200]);
    assert_eq!(
        table.result_message(),
        Some("Hand 1: Bust! You lose!\nHand 2: You win!")
    );
    assert_eq!(table.resolve_bet(&mut bankroll), Ok(200));
    assert_eq!(bankroll.current_balance(), 2000 - 150 + 200);

    table.dispatch_events(&mut stats);
    assert_eq!(stats.busts, 1);
    assert_eq!(stats.wins, 1);
    assert_eq!(stats.losses, 1);
}

#[test]
fn split_aces_get_one_card_and_twenty_one_pays_even_money() {
    let mut bankroll = Bankroll::default();
    let mut table = start_round(
        &Rule::default(),
        &["AS", "9C", "AH", "8D", "KC", "5D"],
        20,
        &mut bankroll,
    );
    assert_eq!(table.phase(), RoundPhase::PlayerTurn);

    table.split(&mut bankroll).unwrap();
    let manager = table.split_manager().unwrap();
    assert!(manager
        .hands()
        .iter()
        .all(|hand| hand.is_split_ace_hand() && hand.status() == HandStatus::Complete));
    assert_eq!(table.phase(), RoundPhase::DealerTurn);
    assert!(matches!(table.hit(), Err(TableError::WrongPhase { .. })));

    table.play_dealer_turn().unwrap();
    let settlement = table.settlement().unwrap();
    assert_eq!(settlement.hands[0].outcome, HandOutcome::Win);
    assert_eq!(settlement.hands[0].payout, 40);
    assert_eq!(settlement.hands[1].outcome, HandOutcome::Loss);
    assert_eq!(table.resolve_bet(&mut bankroll), Ok(40));
}

#[test]
fn cannot_resplit_or_double_split_aces() {
    let rule = Rule {
        max_hands: 4,
        allow_resplit: true,
        ..Rule::default()
    };
    let mut bankroll = Bankroll::default();
    let mut table = start_round(&rule, &["AS", "9C", "AH", "8D", "AC", "5D"], 20, &mut bankroll);
    table.split(&mut bankroll).unwrap();
    assert_eq!(table.phase(), RoundPhase::DealerTurn);
    assert!(!table.can_split(bankroll.current_balance()));
    assert!(!table.can_double_down(bankroll.current_balance()));
}

#[test]
fn insurance_pays_when_dealer_has_blackjack() {
    let mut bankroll = Bankroll::default();
    let mut table = start_round(&Rule::default(), &["10S", "AC", "9H", "KD"], 100, &mut bankroll);

    assert!(table.can_take_insurance(bankroll.current_balance()));
    let result = table.respond_to_insurance(true, &mut bankroll).unwrap();
    assert_eq!(result, InsuranceResult::Won);
    assert_eq!(bankroll.current_balance(), 2000 - 100 - 50);
    assert_eq!(table.phase(), RoundPhase::GameOver);
    assert_eq!(table.result_message(), Some("You lose."));

    let settlement = table.settlement().unwrap();
    assert_eq!(settlement.main_payout(), 0);
    assert_eq!(settlement.insurance_payout(), 150);
    assert_eq!(table.resolve_bet(&mut bankroll), Ok(150));
    assert_eq!(bankroll.current_balance(), 2000);
}

#[test]
fn insurance_is_lost_and_play_continues() {
    let mut bankroll = Bankroll::default();
    let mut table = start_round(
        &Rule::default(),
        &["10S", "AC", "10H", "6D", "2C"],
        100,
        &mut bankroll,
    );
    table.respond_to_insurance(true, &mut bankroll).unwrap();
    assert_eq!(table.insurance_result(), InsuranceResult::Lost);
    assert_eq!(table.phase(), RoundPhase::PlayerTurn);

    table.stand().unwrap();
    table.play_dealer_turn().unwrap();
    // Dealer A 6 2 is soft 19 after hitting soft 17.
    assert_eq!(table.dealer_hand().value(), 19);
    assert_eq!(table.result_message(), Some("You win!"));
    assert_eq!(table.resolve_bet(&mut bankroll), Ok(200));
    assert_eq!(bankroll.current_balance(), 2000 - 150 + 200);
}

#[test]
fn both_blackjacks_push() {
    let mut bankroll = Bankroll::default();
    let mut stats = GameStats::new();
    let mut table = start_round(&Rule::default(), &["AS", "AC", "KH", "QD"], 100, &mut bankroll);
    table.respond_to_insurance(false, &mut bankroll).unwrap();

    assert_eq!(table.result_message(), Some("Push!"));
    assert_eq!(table.resolve_bet(&mut bankroll), Ok(100));
    table.dispatch_events(&mut stats);
    assert_eq!(stats.pushes, 1);
    assert_eq!(stats.dealer_blackjacks, 0);
}

#[test]
fn ten_up_dealer_blackjack_ends_round_without_insurance() {
    let mut bankroll = Bankroll::default();
    let mut table = start_round(&Rule::default(), &["9S", "KC", "9H", "AD"], 10, &mut bankroll);
    assert_eq!(table.phase(), RoundPhase::GameOver);
    assert_eq!(table.insurance_result(), InsuranceResult::NotOffered);
    assert_eq!(table.result_message(), Some("You lose."));
}

#[test]
fn double_down_doubles_the_bet() {
    let mut bankroll = Bankroll::default();
    let mut table = start_round(
        &Rule::default(),
        &["6S", "10C", "5H", "7D", "10S"],
        100,
        &mut bankroll,
    );
    table.double_down(&mut bankroll).unwrap();
    assert_eq!(table.current_bet(), 200);
    assert_eq!(table.phase(), RoundPhase::DealerTurn);
    table.play_dealer_turn().unwrap();
    assert_eq!(table.result_message(), Some("You win!"));
    assert_eq!(table.resolve_bet(&mut bankroll), Ok(400));
    assert_eq!(bankroll.current_balance(), 2200);
}

#[test]
fn rejected_actions_leave_the_table_unchanged() {
    let mut bankroll = Bankroll::new(150);
    let mut table = start_round(&Rule::default(), &["9S", "10C", "7H", "8D"], 100, &mut bankroll);

    let before = table.snapshot();
    assert!(matches!(
        table.split(&mut bankroll),
        Err(TableError::CannotSplit(_))
    ));
    assert!(matches!(
        table.double_down(&mut bankroll),
        Err(TableError::InsufficientFunds { .. })
    ));
    assert!(matches!(
        table.respond_to_insurance(true, &mut bankroll),
        Err(TableError::WrongPhase { .. })
    ));
    assert_eq!(table.snapshot(), before);
    assert_eq!(bankroll.current_balance(), 50);
}

#[test]
fn reset_after_any_round_is_clean() {
    let mut bankroll = Bankroll::default();
    let mut table = start_round(
        &Rule::default(),
        &["8S", "6C", "8H", "10D", "10C", "10H", "9S"],
        50,
        &mut bankroll,
    );
    table.split(&mut bankroll).unwrap();
    table.stand().unwrap();
    table.stand().unwrap();
    table.play_dealer_turn().unwrap();
    table.resolve_bet(&mut bankroll).unwrap();

    table.reset();
    let snapshot = table.snapshot();
    assert_eq!(snapshot.phase, RoundPhase::Betting);
    assert!(snapshot.player_hands.is_empty());
    assert!(snapshot.dealer_cards.is_empty());
    assert!(!snapshot.is_split);
    assert_eq!(snapshot.total_bet, 0);
    assert_eq!(snapshot.insurance_result, InsuranceResult::NotOffered);
    assert_eq!(snapshot.result_message, None);

    table.place_bet(20, &mut bankroll).unwrap();
    table.start_new_round().unwrap();
    assert_ne!(table.phase(), RoundPhase::Betting);
}
