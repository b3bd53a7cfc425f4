use jetons_engine::player::PlayerAction;
use jetons_engine::strategy::{AiPolicy, TableView};

/// Checks or calls every time. Short stacks call all-in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveAI;

impl AiPolicy for PassiveAI {
    fn decide(&self, _view: &TableView<'_>) -> PlayerAction {
        PlayerAction::Check
    }

    fn name(&self) -> &str {
        "PassiveAI"
    }
}
