use jetons_engine::{RulesError, TableRules};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use std::time::Duration;
use thiserror::Error;

/// Settings applied to every table opened by a
/// [`SessionManager`](crate::session::SessionManager).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableSettings {
    pub rules: TableRules,
    /// Seconds a human has to act before being folded
    pub turn_timeout_secs: u64,
    /// Idle tables are closed after this many minutes
    pub session_ttl_minutes: u64,
    /// Policy given to CPU seats when none is named
    pub ai_strategy: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            rules: TableRules::default(),
            turn_timeout_secs: 20,
            session_ttl_minutes: 120,
            ai_strategy: "baseline".to_string(),
        }
    }
}

impl TableSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.rules.validate()?;

        if self.turn_timeout_secs == 0 {
            return Err(SettingsError::InvalidValue(
                "turn_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.session_ttl_minutes == 0 {
            return Err(SettingsError::InvalidValue(
                "session_ttl_minutes must be greater than 0".to_string(),
            ));
        }

        if !jetons_ai::AVAILABLE_AIS.contains(&self.ai_strategy.as_str()) {
            return Err(SettingsError::InvalidValue(format!(
                "unknown ai_strategy: {}",
                self.ai_strategy
            )));
        }

        Ok(())
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_minutes * 60)
    }
}

/// In-memory settings store with validation
#[derive(Debug)]
pub struct SettingsStore {
    settings: RwLock<TableSettings>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self {
            settings: RwLock::new(TableSettings::default()),
        }
    }

    pub fn with_settings(settings: TableSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings: RwLock::new(settings),
        })
    }

    pub fn get(&self) -> Result<TableSettings, SettingsError> {
        self.settings
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| SettingsError::StoragePoisoned)
    }

    /// Replaces the settings if they validate. Tables already open keep
    /// the rules they were opened with.
    pub fn update(&self, new_settings: TableSettings) -> Result<TableSettings, SettingsError> {
        new_settings.validate()?;

        let mut guard = self
            .settings
            .write()
            .map_err(|_| SettingsError::StoragePoisoned)?;
        *guard = new_settings.clone();
        Ok(new_settings)
    }

    /// Sets one field by name, as typed in a chat command.
    pub fn update_field(
        &self,
        field: &str,
        value: serde_json::Value,
    ) -> Result<TableSettings, SettingsError> {
        let mut current = self.get()?;
        let number = |name: &str| {
            value
                .as_u64()
                .ok_or_else(|| SettingsError::InvalidValue(format!("{} must be a number", name)))
        };

        match field {
            "floor_bet" => current.rules.floor_bet = number(field)?,
            "ai_stack" => current.rules.ai_stack = number(field)?,
            "min_players" => current.rules.min_players = number(field)? as usize,
            "max_players" => current.rules.max_players = number(field)? as usize,
            "turn_timeout_secs" => current.turn_timeout_secs = number(field)?,
            "session_ttl_minutes" => current.session_ttl_minutes = number(field)?,
            "ai_strategy" => {
                let strategy = value.as_str().ok_or_else(|| {
                    SettingsError::InvalidValue("ai_strategy must be a string".to_string())
                })?;
                current.ai_strategy = strategy.to_string();
            }
            _ => {
                return Err(SettingsError::InvalidValue(format!(
                    "unknown field: {}",
                    field
                )))
            }
        }

        self.update(current)
    }

    pub fn reset(&self) -> Result<TableSettings, SettingsError> {
        self.update(TableSettings::default())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
    #[error("Invalid table rules: {0}")]
    Rules(#[from] RulesError),
    #[error("Settings storage poisoned")]
    StoragePoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_settings_are_valid() {
        let settings = TableSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.turn_timeout(), Duration::from_secs(20));
        assert_eq!(settings.rules.floor_bet, 20);
    }

    #[test]
    fn rejects_zero_timeouts() {
        let settings = TableSettings {
            turn_timeout_secs: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = TableSettings {
            session_ttl_minutes: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_unknown_strategy() {
        let settings = TableSettings {
            ai_strategy: "shark".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_invalid_rules() {
        let mut settings = TableSettings::default();
        settings.rules.max_players = 12;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Rules(RulesError::TooManySeats { max: 9 }))
        ));
    }

    #[test]
    fn update_field_changes_one_value() {
        let store = SettingsStore::new();
        let updated = store.update_field("floor_bet", json!(50)).unwrap();
        assert_eq!(updated.rules.floor_bet, 50);
        assert_eq!(store.get().unwrap().rules.floor_bet, 50);

        let updated = store.update_field("ai_strategy", json!("passive")).unwrap();
        assert_eq!(updated.ai_strategy, "passive");
    }

    #[test]
    fn update_field_keeps_old_value_on_error() {
        let store = SettingsStore::new();
        assert!(store.update_field("turn_timeout_secs", json!(0)).is_err());
        assert!(store.update_field("turn_timeout_secs", json!("soon")).is_err());
        assert!(store.update_field("colour", json!(1)).is_err());
        assert_eq!(store.get().unwrap().turn_timeout_secs, 20);
    }

    #[test]
    fn reset_restores_defaults() {
        let store = SettingsStore::new();
        store.update_field("ai_stack", json!(1000)).unwrap();
        let reset = store.reset().unwrap();
        assert_eq!(reset, TableSettings::default());
    }

    #[test]
    fn settings_round_trip_through_json_with_defaults() {
        let settings: TableSettings =
            serde_json::from_value(json!({ "turn_timeout_secs": 30 })).unwrap();
        assert_eq!(settings.turn_timeout_secs, 30);
        assert_eq!(settings.ai_strategy, "baseline");
        assert_eq!(settings.rules, TableRules::default());
    }
}
