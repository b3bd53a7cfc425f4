mod common;

use common::{p, store_with, table};
use jetons_engine::betting::BettingRound;
use jetons_engine::errors::GameError;
use jetons_engine::player::Player;
use jetons_engine::registry::PlayerRegistry;

#[test]
fn actions_before_start_report_no_hand() {
    let mut t = table(store_with(&[]), &[1, 2]);
    assert_eq!(t.bet(p(1), 10), Err(GameError::NoHandInProgress));
    assert_eq!(t.check(p(42)), Err(GameError::NoHandInProgress));
    assert_eq!(t.fold(p(2)), Err(GameError::NoHandInProgress));
}

#[test]
fn unknown_player_is_not_in_game() {
    let mut t = table(store_with(&[]), &[1, 2]);
    t.start_game().unwrap();
    assert_eq!(t.bet(p(42), 0), Err(GameError::NotInGame(p(42))));
}

#[test]
fn folded_player_is_reported_before_turn() {
    let mut t = table(store_with(&[]), &[1, 2, 3]);
    t.start_game().unwrap();
    t.fold(p(1)).unwrap();
    assert_eq!(t.check(p(1)), Err(GameError::AlreadyFolded(p(1))));
}

#[test]
fn fold_twice_never_mutates() {
    let mut t = table(store_with(&[]), &[1, 2, 3]);
    t.start_game().unwrap();
    t.fold(p(1)).unwrap();
    let turn = t.current_turn();
    for _ in 0..2 {
        assert_eq!(t.fold(p(1)), Err(GameError::AlreadyFolded(p(1))));
    }
    assert_eq!(t.current_turn(), turn);
    assert_eq!(t.current_player(), Some(p(2)));
}

#[test]
fn out_of_turn_action_is_rejected_before_amount() {
    let mut t = table(store_with(&[]), &[1, 2]);
    t.start_game().unwrap();
    assert_eq!(
        t.bet(p(2), 0),
        Err(GameError::NotYourTurn {
            expected: Some(p(1)),
            actual: p(2)
        })
    );
}

#[test]
fn zero_bet_is_invalid() {
    let mut t = table(store_with(&[]), &[1, 2]);
    t.start_game().unwrap();
    assert_eq!(t.bet(p(1), 0), Err(GameError::InvalidAmount(0)));
    assert_eq!(t.current_player(), Some(p(1)));
}

#[test]
fn bet_above_stack_is_rejected_without_side_effects() {
    let mut t = table(store_with(&[(1, 100.0)]), &[1, 2]);
    t.start_game().unwrap();
    // target is the 20 floor, so a raise of 90 needs 110
    assert_eq!(
        t.bet(p(1), 90),
        Err(GameError::InsufficientChips {
            needed: 110,
            available: 100
        })
    );
    assert_eq!(t.stack(p(1)), Some(100));
    assert_eq!(t.contribution(p(1)), 0);
    assert_eq!(t.current_player(), Some(p(1)));
}

#[test]
fn bet_exactly_the_stack_is_allowed() {
    let mut t = table(store_with(&[(1, 100.0)]), &[1, 2]);
    t.start_game().unwrap();
    assert_eq!(t.bet(p(1), 80), Ok(100));
    assert_eq!(t.stack(p(1)), Some(0));
    assert_eq!(t.target(), 100);
}

fn heads(stacks: &[(u64, u64)]) -> PlayerRegistry {
    let mut r = PlayerRegistry::new();
    for &(id, stack) in stacks {
        r.add_player(Player::human(p(id), format!("p{}", id)));
        r.credit(p(id), stack).unwrap();
    }
    r
}

#[test]
fn raise_reopens_action_for_earlier_bettor() {
    let mut r = heads(&[(1, 500), (2, 500), (3, 500)]);
    let mut round = BettingRound::new();
    round.open(&r, 0);
    round.advance_turn(&r);

    round.bet(&mut r, p(1), 10).unwrap();
    assert_eq!(round.target(), 10);
    assert_eq!(round.first_max_bet_player(), Some(p(1)));
    round.advance_turn(&r);

    round.bet(&mut r, p(2), 20).unwrap();
    assert_eq!(round.target(), 30);
    assert_eq!(round.first_max_bet_player(), Some(p(2)));
    round.advance_turn(&r);

    round.check(&mut r, p(3)).unwrap();
    round.advance_turn(&r);
    assert_eq!(round.current_player(), Some(p(1)));
    assert_eq!(round.to_call(p(1)), 20);

    round.check(&mut r, p(1)).unwrap();
    round.advance_turn(&r);
    assert!(round.is_closed());
}

#[test]
fn matched_round_closes() {
    let mut r = heads(&[(1, 500), (2, 500), (3, 500)]);
    let mut round = BettingRound::new();
    round.open(&r, 20);
    round.advance_turn(&r);
    for id in [1, 2, 3] {
        assert_eq!(round.current_player(), Some(p(id)));
        round.check(&mut r, p(id)).unwrap();
        round.advance_turn(&r);
    }
    assert_eq!(round.current_player(), None);
    assert!(round.is_closed());
}

#[test]
fn stacks_never_go_negative() {
    let mut r = heads(&[(1, 50), (2, 30)]);
    let mut round = BettingRound::new();
    round.open(&r, 20);
    round.advance_turn(&r);
    round.bet(&mut r, p(1), 30).unwrap();
    round.advance_turn(&r);
    assert_eq!(round.check(&mut r, p(2)).unwrap(), 30);
    assert_eq!(r.stack(p(1)), Some(0));
    assert_eq!(r.stack(p(2)), Some(0));
    round.advance_turn(&r);
    assert!(round.is_closed());
}

#[test]
fn bet_past_chip_range_is_insufficient_chips() {
    let mut t = table(store_with(&[]), &[1, 2]);
    t.start_game().unwrap();

    for amount in [u64::MAX, u64::MAX - 20] {
        assert_eq!(
            t.bet(p(1), amount),
            Err(GameError::InsufficientChips {
                needed: u64::MAX,
                available: 500
            })
        );
    }
    assert_eq!(t.stack(p(1)), Some(500));
    assert_eq!(t.contribution(p(1)), 0);
    assert_eq!(t.current_player(), Some(p(1)));

    assert_eq!(t.check(p(1)), Ok(20));
    assert_eq!(t.current_player(), Some(p(2)));
}
