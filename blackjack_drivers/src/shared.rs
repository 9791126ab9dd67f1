use std::{fs, io, path::Path};

use blackjack_engine::{GameStats, InsurancePolicy, Rule, StrategyKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rule: ConfigRule,
    pub table_simulator: ConfigTableSimulator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigRule {
    pub max_hands: u8,
    pub allow_resplit: bool,
    pub double_after_split: bool,
    pub split_draw_retries: u8,
    pub min_bet: u32,
    pub max_bet: u32,
}

impl Default for ConfigRule {
    fn default() -> Self {
        let rule = Rule::default();
        ConfigRule {
            max_hands: rule.max_hands,
            allow_resplit: rule.allow_resplit,
            double_after_split: rule.double_after_split,
            split_draw_retries: rule.split_draw_retries,
            min_bet: rule.min_bet,
            max_bet: rule.max_bet,
        }
    }
}

impl TryInto<Rule> for ConfigRule {
    type Error = ConfigError;

    fn try_into(self) -> Result<Rule, Self::Error> {
        let rule = Rule {
            max_hands: self.max_hands,
            allow_resplit: self.allow_resplit,
            double_after_split: self.double_after_split,
            split_draw_retries: self.split_draw_retries,
            min_bet: self.min_bet,
            max_bet: self.max_bet,
        };
        rule.validate().map_err(|err| ConfigError::InvalidValue {
            field: "rule",
            message: err.to_string(),
        })?;

        Ok(rule)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigTableSimulator {
    pub rounds: u64,
    pub bet: u32,
    pub starting_balance: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    pub strategy: String,
    pub insurance: String,
    /// Where balance and statistics are kept between runs.
    #[serde(default)]
    pub stats_path: Option<String>,
}

impl ConfigTableSimulator {
    pub fn strategy_kind(&self) -> Result<StrategyKind, ConfigError> {
        self.strategy
            .parse()
            .map_err(|err: serde::de::value::Error| ConfigError::InvalidValue {
                field: "strategy",
                message: err.to_string(),
            })
    }

    pub fn insurance_policy(&self) -> Result<InsurancePolicy, ConfigError> {
        self.insurance
            .parse()
            .map_err(|err: serde::de::value::Error| ConfigError::InvalidValue {
                field: "insurance",
                message: err.to_string(),
            })
    }
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &str) -> Result<Config, ConfigError> {
    let file_content = fs::read_to_string(filename).map_err(|source| ConfigError::Io {
        path: filename.to_owned(),
        source,
    })?;
    serde_yaml::from_str(&file_content).map_err(|source| ConfigError::Yaml {
        path: filename.to_owned(),
        source,
    })
}

/// Balance and statistics kept across sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    pub balance: u32,
    #[serde(default)]
    pub stats: GameStats,
}

/// Loads the saved state, or starts fresh with `starting_balance` when the
/// file does not exist yet.
pub fn load_saved_state(path: &str, starting_balance: u32) -> Result<SavedState, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(SavedState {
            balance: starting_balance,
            stats: GameStats::default(),
        });
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_owned(),
        source,
    })
}

pub fn save_state(path: &str, state: &SavedState) -> Result<(), ConfigError> {
    let content = serde_yaml::to_string(state).map_err(|source| ConfigError::Yaml {
        path: path.to_owned(),
        source,
    })?;
    fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPICAL_CONFIG: &str = r#"
rule:
  max_hands: 2
  allow_resplit: false
  double_after_split: true
  split_draw_retries: 10
  min_bet: 2
  max_bet: 500
table_simulator:
  rounds: 1000
  bet: 10
  starting_balance: 2000
  seed: 42
  strategy: Basic
  insurance: Never
"#;

    #[test]
    fn can_convert_rule() {
        let config: Config = serde_yaml::from_str(TYPICAL_CONFIG).unwrap();
        let rule: Rule = config.rule.try_into().unwrap();
        assert_eq!(rule.max_bet, 500);
        assert_eq!(rule.split_draw_retries, 10);
        assert!(!rule.allow_resplit);

        let simulator = &config.table_simulator;
        assert_eq!(simulator.seed, Some(42));
        assert_eq!(simulator.stats_path, None);
        assert_eq!(simulator.strategy_kind().unwrap(), StrategyKind::Basic);
        assert_eq!(simulator.insurance_policy().unwrap(), InsurancePolicy::Never);
    }

    #[test]
    fn missing_rule_fields_use_defaults() {
        let config_rule: ConfigRule = serde_yaml::from_str("allow_resplit: true").unwrap();
        let rule: Rule = config_rule.try_into().unwrap();
        assert!(rule.allow_resplit);
        assert_eq!(rule.max_hands, Rule::default().max_hands);
    }

    #[test]
    fn should_return_error_when_converting_rule() {
        let config_rule = ConfigRule {
            min_bet: 3,
            ..ConfigRule::default()
        };
        let convert_result: Result<Rule, ConfigError> = config_rule.try_into();
        assert!(matches!(
            convert_result,
            Err(ConfigError::InvalidValue { field: "rule", .. })
        ));
    }

    #[test]
    fn should_return_error_for_unknown_strategy() {
        let mut config: Config = serde_yaml::from_str(TYPICAL_CONFIG).unwrap();
        config.table_simulator.strategy = String::from("Card counting");
        assert!(matches!(
            config.table_simulator.strategy_kind(),
            Err(ConfigError::InvalidValue {
                field: "strategy",
                ..
            })
        ));
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let result = parse_config_from_file("/nonexistent/blackjack.yml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn saved_state_starts_fresh_and_persists() {
        let path = std::env::temp_dir().join(format!("blackjack-state-{}.yml", std::process::id()));
        let path = path.to_str().unwrap().to_owned();
        let _ = fs::remove_file(&path);

        let mut state = load_saved_state(&path, 2000).unwrap();
        assert_eq!(state.balance, 2000);
        assert_eq!(state.stats, GameStats::default());

        state.balance = 1850;
        state.stats.record_player_bust();
        save_state(&path, &state).unwrap();
        assert_eq!(load_saved_state(&path, 2000).unwrap(), state);
        fs::remove_file(&path).unwrap();
    }
}
