use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Which disabled fighters can dodge stray projectiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FighterDodgePolicy {
    #[default]
    All,
    None,
    OnlyPlayer,
}

/// Constants and switches that define game behavior, loaded from game data.
/// Every field has a default, so a rules document only needs to list the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gamerules {
    /// Whether every ship gets a free ramscoop's worth of fuel recovery.
    pub universal_ramscoop: bool,
    pub fighters_hit_when_disabled: FighterDodgePolicy,
    /// Steps between spawn rolls for unique person ships.
    pub person_spawn_period: u32,
    pub no_person_spawn_weight: u32,
    /// Cap on how long NPCs keep mining the same asteroid field, in steps.
    pub npc_max_mining_time: u32,
    pub universal_frugal_threshold: f64,
    pub depreciation_min: f64,
    pub depreciation_daily: f64,
    pub depreciation_grace_period: u32,
    pub depreciation_max_age: u32,
    pub system_departure_min: f64,
    pub system_arrival_min: f64,
    pub fleet_multiplier: f64,
}

impl Default for Gamerules {
    fn default() -> Self {
        Gamerules {
            universal_ramscoop: true,
            fighters_hit_when_disabled: FighterDodgePolicy::All,
            person_spawn_period: 36_000,
            no_person_spawn_weight: 1000,
            npc_max_mining_time: 3600,
            universal_frugal_threshold: 0.75,
            depreciation_min: 0.25,
            depreciation_daily: 0.997,
            depreciation_grace_period: 7,
            depreciation_max_age: 1000,
            system_departure_min: 0.0,
            system_arrival_min: 0.0,
            fleet_multiplier: 1.0,
        }
    }
}

impl Gamerules {
    pub fn from_json(text: &str) -> GamerulesResult<Self> {
        let rules: Gamerules = serde_json::from_str(text)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn load(path: &Path) -> GamerulesResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    fn validate(&self) -> GamerulesResult<()> {
        validate_fraction("universal_frugal_threshold", self.universal_frugal_threshold)?;
        validate_fraction("depreciation_min", self.depreciation_min)?;
        validate_fraction("depreciation_daily", self.depreciation_daily)?;
        validate_fraction("system_departure_min", self.system_departure_min)?;
        validate_fraction("system_arrival_min", self.system_arrival_min)?;
        if !self.fleet_multiplier.is_finite() || self.fleet_multiplier < 0.0 {
            return Err(GamerulesError::InvalidValue {
                field: "fleet_multiplier",
                value: self.fleet_multiplier,
            });
        }
        Ok(())
    }
}

fn validate_fraction(field: &'static str, value: f64) -> GamerulesResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(GamerulesError::InvalidValue { field, value });
    }
    Ok(())
}

#[derive(Debug)]
pub enum GamerulesError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidValue { field: &'static str, value: f64 },
}

pub type GamerulesResult<T> = Result<T, GamerulesError>;

impl fmt::Display for GamerulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamerulesError::Io(error) => {
                write!(f, "failed to read gamerules ({})", error)
            }
            GamerulesError::Parse(error) => {
                write!(f, "failed to parse gamerules ({})", error)
            }
            GamerulesError::InvalidValue { field, value } => {
                write!(f, "gamerules value out of range ({}: {})", field, value)
            }
        }
    }
}

impl std::error::Error for GamerulesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GamerulesError::Io(error) => Some(error),
            GamerulesError::Parse(error) => Some(error),
            GamerulesError::InvalidValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for GamerulesError {
    fn from(error: std::io::Error) -> Self {
        GamerulesError::Io(error)
    }
}

impl From<serde_json::Error> for GamerulesError {
    fn from(error: serde_json::Error) -> Self {
        GamerulesError::Parse(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let rules = Gamerules::from_json("{}").unwrap();
        assert_eq!(rules, Gamerules::default());
    }

    #[test]
    fn partial_document_overrides_listed_fields_only() {
        let rules = Gamerules::from_json(
            r#"{ "fleet_multiplier": 2.5, "fighters_hit_when_disabled": "only_player" }"#,
        )
        .unwrap();
        assert_eq!(rules.fleet_multiplier, 2.5);
        assert_eq!(
            rules.fighters_hit_when_disabled,
            FighterDodgePolicy::OnlyPlayer
        );
        assert_eq!(rules.person_spawn_period, 36_000);
        assert_eq!(rules.depreciation_daily, 0.997);
    }

    #[test]
    fn universal_ramscoop_defaults_on_and_can_be_disabled() {
        assert!(Gamerules::default().universal_ramscoop);
        let rules = Gamerules::from_json(r#"{ "universal_ramscoop": false }"#).unwrap();
        assert!(!rules.universal_ramscoop);
        assert_eq!(rules.fleet_multiplier, 1.0);
    }

    #[test]
    fn round_trip_preserves_values() {
        let mut rules = Gamerules::default();
        rules.depreciation_grace_period = 14;
        rules.system_arrival_min = 0.5;
        let text = serde_json::to_string(&rules).unwrap();
        assert_eq!(Gamerules::from_json(&text).unwrap(), rules);
    }

    #[test]
    fn unknown_policy_is_a_parse_error() {
        let result = Gamerules::from_json(r#"{ "fighters_hit_when_disabled": "sometimes" }"#);
        assert!(matches!(result, Err(GamerulesError::Parse(_))));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let result = Gamerules::from_json(r#"{ "fleet_multiplier": -1.0 }"#);
        assert!(matches!(
            result,
            Err(GamerulesError::InvalidValue {
                field: "fleet_multiplier",
                ..
            })
        ));

        let result = Gamerules::from_json(r#"{ "depreciation_daily": 1.5 }"#);
        assert!(matches!(result, Err(GamerulesError::InvalidValue { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = Gamerules::load(Path::new("/nonexistent/gamerules.json"));
        assert!(matches!(result, Err(GamerulesError::Io(_))));
    }
}
