mod common;

use common::{balance, p, store_with, table, ScriptedPolicy};
use jetons_engine::errors::GameError;
use jetons_engine::game::GameStatus;
use jetons_engine::player::Player;

#[test]
fn lobby_opens_from_off() {
    let mut t = table(store_with(&[]), &[]);
    assert_eq!(t.status(), GameStatus::Init);
    t.initialize().unwrap();
    assert_eq!(t.status(), GameStatus::Init);
}

#[test]
fn start_requires_an_open_lobby() {
    use jetons_engine::balance::InMemoryBalanceStore;
    use jetons_engine::engine::GameController;
    use jetons_engine::game::TableRules;
    use std::sync::Arc;

    let mut t = GameController::with_seed(
        TableRules::default(),
        Arc::new(InMemoryBalanceStore::new()),
        1,
    );
    t.add_player(Player::human(p(1), "a"));
    t.add_player(Player::human(p(2), "b"));
    assert!(matches!(t.start_game(), Err(GameError::CannotStart(_))));
    assert_eq!(t.status(), GameStatus::Off);
}

#[test]
fn start_with_too_few_players_changes_nothing() {
    let store = store_with(&[]);
    let mut t = table(store.clone(), &[1]);
    assert!(!t.can_start());
    assert!(matches!(t.start_game(), Err(GameError::CannotStart(_))));
    assert_eq!(t.status(), GameStatus::Init);
    assert_eq!(t.players().len(), 1);
    assert_eq!(t.hand_number(), 0);
}

#[test]
fn broke_players_do_not_count_towards_the_minimum() {
    let store = store_with(&[(1, 500.0), (2, 0.0)]);
    let mut t = table(store.clone(), &[1, 2]);
    assert!(t.can_start());
    assert!(matches!(t.start_game(), Err(GameError::CannotStart(_))));
    assert_eq!(t.status(), GameStatus::Init);
    assert_eq!(balance(&store, 1), 500.0);
}

#[test]
fn broke_player_sits_the_hand_out() {
    let store = store_with(&[(2, 0.4)]);
    let mut t = table(store.clone(), &[1, 2, 3]);
    t.start_game().unwrap();
    assert!(t.is_folded(p(2)));
    assert!(t.hole_cards(p(2)).unwrap().is_empty());
    t.check(p(1)).unwrap();
    assert_eq!(t.current_player(), Some(p(3)));
}

#[test]
fn buy_in_is_the_floor_of_the_balance() {
    let store = store_with(&[(1, 123.9)]);
    let mut t = table(store, &[1, 2]);
    t.start_game().unwrap();
    assert_eq!(t.stack(p(1)), Some(123));
}

#[test]
fn seating_is_frozen_while_running() {
    let mut t = table(store_with(&[]), &[1, 2]);
    t.start_game().unwrap();
    assert!(!t.add_player(Player::human(p(3), "late")));
    assert!(t.add_cpu_player(ScriptedPolicy::checking()).is_none());
    assert_eq!(t.players().len(), 2);
}

#[test]
fn table_seats_at_most_nine() {
    let ids: Vec<u64> = (1..=9).collect();
    let mut t = table(store_with(&[]), &ids);
    assert!(!t.add_player(Player::human(p(10), "tenth")));
    assert_eq!(t.players().len(), 9);
}

#[test]
fn joining_twice_is_a_no_op() {
    let mut t = table(store_with(&[]), &[1]);
    assert!(!t.add_player(Player::human(p(1), "again")));
    assert_eq!(t.seat(p(1)).unwrap().player.name(), "player1");
}

#[test]
fn cpu_ids_and_names_count_up() {
    let mut t = table(store_with(&[]), &[]);
    let a = t.add_cpu_player(ScriptedPolicy::checking()).unwrap();
    let b = t.add_cpu_player(ScriptedPolicy::checking()).unwrap();
    assert_eq!((a.0, b.0), (9000, 9001));
    assert_eq!(t.seat(b).unwrap().player.name(), "CPU_1");
    assert!(t.seat(a).unwrap().player.is_ai());
}

#[test]
fn leaving_the_lobby_frees_the_seat() {
    let mut t = table(store_with(&[]), &[1, 2]);
    assert_eq!(t.leave(p(1)), Ok(true));
    assert_eq!(t.leave(p(1)), Ok(false));
    assert_eq!(t.players().len(), 1);
}

#[test]
fn leaving_mid_hand_folds_and_keeps_the_seat_until_reset() {
    let mut t = table(store_with(&[]), &[1, 2, 3]);
    t.start_game().unwrap();
    assert_eq!(t.leave(p(2)), Ok(true));
    assert!(t.is_folded(p(2)));
    assert_eq!(t.current_player(), Some(p(1)));
    assert_eq!(t.players().len(), 3);

    t.check(p(1)).unwrap();
    assert_eq!(t.current_player(), Some(p(3)));
    t.check(p(3)).unwrap();
    t.fold(p(1)).unwrap();
    assert_eq!(t.status(), GameStatus::Ended);
    assert_eq!(t.winners(), &[p(3)]);

    t.reset_game().unwrap();
    assert_eq!(t.players().len(), 2);
    assert!(t.seat(p(2)).is_none());
}

#[test]
fn leaving_on_your_turn_passes_the_turn() {
    let mut t = table(store_with(&[]), &[1, 2, 3]);
    t.start_game().unwrap();
    t.leave(p(1)).unwrap();
    assert_eq!(t.current_player(), Some(p(2)));
}

#[test]
fn leaving_heads_up_hands_the_pot_over() {
    let store = store_with(&[]);
    let mut t = table(store.clone(), &[1, 2]);
    t.start_game().unwrap();
    t.check(p(1)).unwrap();
    t.leave(p(1)).unwrap();
    assert_eq!(t.status(), GameStatus::Ended);
    assert_eq!(t.winners(), &[p(2)]);
    assert_eq!(balance(&store, 1), 480.0);
    assert_eq!(balance(&store, 2), 520.0);
}

#[test]
fn stale_timeout_ticket_is_ignored() {
    let mut t = table(store_with(&[]), &[1, 2]);
    t.start_game().unwrap();
    let first = t.current_turn().unwrap();
    assert_eq!(first.player_id, p(1));
    t.check(p(1)).unwrap();

    assert_eq!(t.timeout_fold(first), Ok(false));
    assert!(!t.is_folded(p(1)));

    let live = t.current_turn().unwrap();
    assert_eq!(live.player_id, p(2));
    assert!(live.seq > first.seq);
    assert_eq!(t.timeout_fold(live), Ok(true));
    assert_eq!(t.status(), GameStatus::Ended);
    assert_eq!(t.winners(), &[p(1)]);
    assert_eq!(t.timeout_fold(live), Ok(false));
}

#[test]
fn abort_refunds_everything() {
    let store = store_with(&[]);
    let mut t = table(store.clone(), &[1, 2]);
    t.start_game().unwrap();
    t.check(p(1)).unwrap();
    t.check(p(2)).unwrap();
    t.bet(p(1), 50).unwrap();
    assert_eq!(balance(&store, 1), 480.0);

    t.abort_hand().unwrap();
    assert_eq!(t.status(), GameStatus::Off);
    assert_eq!(t.pot(), 0);
    assert_eq!(balance(&store, 1), 500.0);
    assert_eq!(balance(&store, 2), 500.0);
    assert_eq!(t.players().len(), 2);
}

#[test]
fn reset_is_refused_mid_hand() {
    let mut t = table(store_with(&[]), &[1, 2]);
    t.start_game().unwrap();
    assert_eq!(t.reset_game(), Err(GameError::HandInProgress));
    assert_eq!(t.initialize(), Err(GameError::HandInProgress));
}
