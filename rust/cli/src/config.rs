//! Layered configuration: defaults, then the TOML file named by
//! `JETONS_CONFIG`, then `JETONS_*` environment variables, then flags.

use jetons_engine::{Chips, RulesError, TableRules};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub floor_bet: Chips,
    pub ai_stack: Chips,
    pub turn_timeout_secs: u64,
    pub ai_strategy: String,
}

impl Default for Config {
    fn default() -> Self {
        let rules = TableRules::default();
        Self {
            seed: None,
            floor_bet: rules.floor_bet,
            ai_stack: rules.ai_stack,
            turn_timeout_secs: 20,
            ai_strategy: "baseline".into(),
        }
    }
}

impl Config {
    pub fn rules(&self) -> TableRules {
        TableRules {
            floor_bet: self.floor_bet,
            ai_stack: self.ai_stack,
            ..TableRules::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Cli,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub floor_bet: ValueSource,
    pub ai_stack: ValueSource,
    pub turn_timeout_secs: ValueSource,
    pub ai_strategy: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            floor_bet: ValueSource::Default,
            ai_stack: ValueSource::Default,
            turn_timeout_secs: ValueSource::Default,
            ai_strategy: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl ConfigResolved {
    /// Applies command-line flags on top of everything else.
    pub fn with_flags(mut self, seed: Option<u64>, ai: Option<String>) -> Result<Self, ConfigError> {
        if let Some(seed) = seed {
            self.config.seed = Some(seed);
            self.sources.seed = ValueSource::Cli;
        }
        if let Some(ai) = ai {
            self.config.ai_strategy = ai;
            self.sources.ai_strategy = ValueSource::Cli;
        }
        validate(&self.config)?;
        Ok(self)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Rules(RulesError),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<RulesError> for ConfigError {
    fn from(e: RulesError) -> Self {
        ConfigError::Rules(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Rules(e) => write!(f, "invalid table rules: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("JETONS_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.floor_bet {
            cfg.floor_bet = v;
            sources.floor_bet = ValueSource::File;
        }
        if let Some(v) = f.ai_stack {
            cfg.ai_stack = v;
            sources.ai_stack = ValueSource::File;
        }
        if let Some(v) = f.turn_timeout_secs {
            cfg.turn_timeout_secs = v;
            sources.turn_timeout_secs = ValueSource::File;
        }
        if let Some(v) = f.ai_strategy {
            cfg.ai_strategy = v;
            sources.ai_strategy = ValueSource::File;
        }
    }

    if let Some(seed) = env_number("JETONS_SEED")? {
        cfg.seed = Some(seed);
        sources.seed = ValueSource::Env;
    }
    if let Some(floor) = env_number("JETONS_FLOOR_BET")? {
        cfg.floor_bet = floor;
        sources.floor_bet = ValueSource::Env;
    }
    if let Some(stack) = env_number("JETONS_AI_STACK")? {
        cfg.ai_stack = stack;
        sources.ai_stack = ValueSource::Env;
    }
    if let Some(timeout) = env_number("JETONS_TURN_TIMEOUT")? {
        cfg.turn_timeout_secs = timeout;
        sources.turn_timeout_secs = ValueSource::Env;
    }
    if let Ok(ai) = std::env::var("JETONS_AI")
        && !ai.is_empty()
    {
        cfg.ai_strategy = ai;
        sources.ai_strategy = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_number(key: &str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", key, v))),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    floor_bet: Option<Chips>,
    #[serde(default)]
    ai_stack: Option<Chips>,
    #[serde(default)]
    turn_timeout_secs: Option<u64>,
    #[serde(default)]
    ai_strategy: Option<String>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    cfg.rules().validate()?;
    if cfg.turn_timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "turn_timeout_secs must be >0".into(),
        ));
    }
    if !jetons_ai::AVAILABLE_AIS.contains(&cfg.ai_strategy.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "unknown ai_strategy '{}' (expected one of: {})",
            cfg.ai_strategy,
            jetons_ai::AVAILABLE_AIS.join(", ")
        )));
    }
    Ok(())
}
