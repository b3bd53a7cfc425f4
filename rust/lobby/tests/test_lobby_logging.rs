use std::sync::Arc;

use jetons_engine::balance::InMemoryBalanceStore;
use jetons_engine::{PlayerAction, PlayerId};
use jetons_lobby::{init_test_logging, EventBus, SessionManager};
use tracing::Level;

#[test]
fn table_lifecycle_is_logged_with_the_room_id() {
    let logs = init_test_logging();

    let lobby = SessionManager::new(Arc::new(EventBus::new()), Arc::new(InMemoryBalanceStore::new()));
    lobby.join("room-42", PlayerId(1), "alice").unwrap();
    lobby.join("room-42", PlayerId(2), "bob").unwrap();
    lobby.start_hand("room-42").unwrap();
    lobby.act("room-42", PlayerId(1), PlayerAction::Fold).unwrap();

    let entries = logs.entries();
    let started = entries
        .iter()
        .find(|e| e.message.contains("hand started"))
        .expect("hand start logged");
    assert_eq!(started.level, Level::INFO);
    assert_eq!(started.field("session_id"), Some("room-42"));

    let finished = entries
        .iter()
        .find(|e| e.message.contains("hand finished"))
        .expect("hand end logged");
    assert_eq!(finished.field("hand_number"), Some("1"));
    assert!(entries.iter().any(|e| e.message.contains("opening table")));
}
