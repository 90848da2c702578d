//! Session configuration models.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, time::Duration};
use thiserror::Error;

use crate::game::{
    constants::{
        MAX_SKIPS_PER_TEAM, MAX_TEAM_TIME_SECS, MIN_SKIPS_PER_TEAM, MIN_TEAM_TIME_SECS, PASS_DELAY,
    },
    entities::{GameMode, GameSettings, HotPotatoSettings, Player, PlayerId},
    state_machine::SessionSetup,
};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Card time must be at least a second
    #[error("Card time must be at least 1 second")]
    CardTime,

    /// Standard mode needs cards
    #[error("Card count must be at least 1")]
    CardCount,

    /// Team time outside the allowed range
    #[error("Team time must be between 60 and 600 seconds, got {0}")]
    TeamTime(u32),

    /// Skip budget outside the allowed range
    #[error("Max skips per team must be between 1 and 5, got {0}")]
    MaxSkips(u32),

    /// Environment variable that doesn't parse
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: String, value: String },

    /// Player roster JSON that doesn't parse
    #[error("Invalid player roster: {0}")]
    Roster(#[from] serde_json::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Game mode
    pub mode: GameMode,

    /// Penalties, card time and card count
    pub settings: GameSettings,

    /// Team clock and skip budget (Hot Potato only)
    pub hot_potato: HotPotatoSettings,

    /// Player the results belong to (Standard and Three Lives)
    pub player_id: Option<PlayerId>,

    /// Players to split into teams (Hot Potato only)
    pub players: Vec<Player>,

    /// Hold before the next Hot Potato turn
    pub pass_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Standard,
            settings: GameSettings::default(),
            hot_potato: HotPotatoSettings::default(),
            player_id: None,
            players: Vec::new(),
            pass_delay: PASS_DELAY,
        }
    }
}

impl SessionConfig {
    /// Load configuration from `HU_*` environment variables on top of the
    /// defaults.
    ///
    /// Recognised variables: `HU_MODE`, `HU_CARD_TIME_SECS`,
    /// `HU_CARD_COUNT`, `HU_TIME_UP_PENALTY`, `HU_GIVE_UP_PENALTY`,
    /// `HU_TEAM_TIME_SECS`, `HU_MAX_SKIPS`, `HU_PLAYER_ID` and `HU_PLAYERS`
    /// (a JSON object of player id to name).
    pub fn from_env() -> ConfigResult<Self> {
        let defaults = Self::default();
        let mut config = Self {
            mode: env_or("HU_MODE", defaults.mode)?,
            settings: GameSettings {
                time_up_penalty: env_or("HU_TIME_UP_PENALTY", defaults.settings.time_up_penalty)?,
                give_up_penalty: env_or("HU_GIVE_UP_PENALTY", defaults.settings.give_up_penalty)?,
                card_time_secs: env_or("HU_CARD_TIME_SECS", defaults.settings.card_time_secs)?,
                card_count: env_or("HU_CARD_COUNT", defaults.settings.card_count)?,
            },
            hot_potato: HotPotatoSettings {
                team_time_secs: env_or("HU_TEAM_TIME_SECS", defaults.hot_potato.team_time_secs)?,
                max_skips_per_team: env_or(
                    "HU_MAX_SKIPS",
                    defaults.hot_potato.max_skips_per_team,
                )?,
            },
            player_id: match std::env::var("HU_PLAYER_ID") {
                Ok(value) => Some(parse_env("HU_PLAYER_ID", &value)?),
                Err(_) => None,
            },
            players: Vec::new(),
            pass_delay: defaults.pass_delay,
        };

        if let Ok(json) = std::env::var("HU_PLAYERS") {
            config.players = parse_players(&json)?;
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.settings.card_time_secs == 0 {
            return Err(ConfigError::CardTime);
        }

        if self.mode == GameMode::Standard && self.settings.card_count == 0 {
            return Err(ConfigError::CardCount);
        }

        if self.mode == GameMode::HotPotato {
            let team_time = self.hot_potato.team_time_secs;
            if !(MIN_TEAM_TIME_SECS..=MAX_TEAM_TIME_SECS).contains(&team_time) {
                return Err(ConfigError::TeamTime(team_time));
            }

            let skips = self.hot_potato.max_skips_per_team;
            if !(MIN_SKIPS_PER_TEAM..=MAX_SKIPS_PER_TEAM).contains(&skips) {
                return Err(ConfigError::MaxSkips(skips));
            }
        }

        Ok(())
    }

    /// How the engine should build the session for this configuration
    pub fn setup(&self) -> SessionSetup {
        match self.mode {
            GameMode::Standard => SessionSetup::Standard {
                player_id: self.player_id,
            },
            GameMode::ThreeLives => SessionSetup::ThreeLives {
                player_id: self.player_id,
            },
            GameMode::HotPotato => SessionSetup::HotPotato {
                settings: self.hot_potato,
                players: self.players.clone(),
            },
        }
    }
}

/// Parse a roster given as a JSON object of player id to display name,
/// e.g. `{"1": "Ann", "2": "Bob"}`. Players come back ordered by id.
pub fn parse_players(json: &str) -> ConfigResult<Vec<Player>> {
    let by_id: BTreeMap<PlayerId, String> = serde_json::from_str(json)?;
    Ok(by_id
        .into_iter()
        .map(|(id, name)| Player::new(id, name))
        .collect())
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> ConfigResult<T> {
    match std::env::var(name) {
        Ok(value) => parse_env(name, &value),
        Err(_) => Ok(default),
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pass_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_validate_card_time() {
        let mut config = SessionConfig::default();
        config.settings.card_time_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::CardTime)));
    }

    #[test]
    fn test_validate_card_count_only_for_standard() {
        let mut config = SessionConfig::default();
        config.settings.card_count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::CardCount)));

        config.mode = GameMode::ThreeLives;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_hot_potato_ranges() {
        let mut config = SessionConfig {
            mode: GameMode::HotPotato,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_ok());

        config.hot_potato.team_time_secs = 30;
        assert!(matches!(config.validate(), Err(ConfigError::TeamTime(30))));

        config.hot_potato.team_time_secs = 600;
        config.hot_potato.max_skips_per_team = 6;
        assert!(matches!(config.validate(), Err(ConfigError::MaxSkips(6))));
    }

    #[test]
    fn test_parse_players() {
        let players = parse_players(r#"{"2": "Bob", "1": "Ann"}"#).unwrap();
        assert_eq!(players, vec![Player::new(1, "Ann"), Player::new(2, "Bob")]);

        assert!(parse_players("{}").unwrap().is_empty());
        assert!(matches!(
            parse_players("[\"Ann\"]"),
            Err(ConfigError::Roster(_))
        ));
    }

    #[test]
    fn test_setup_matches_mode() {
        let config = SessionConfig {
            mode: GameMode::HotPotato,
            players: vec![Player::new(1, "Ann")],
            ..SessionConfig::default()
        };
        match config.setup() {
            SessionSetup::HotPotato { settings, players } => {
                assert_eq!(settings, HotPotatoSettings::default());
                assert_eq!(players.len(), 1);
            }
            other => panic!("expected hot potato setup, got {other:?}"),
        }

        let config = SessionConfig {
            mode: GameMode::ThreeLives,
            player_id: Some(9),
            ..SessionConfig::default()
        };
        assert_eq!(
            config.setup(),
            SessionSetup::ThreeLives { player_id: Some(9) }
        );
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::TeamTime(30);
        assert!(err.to_string().contains("between 60 and 600"));
    }
}
