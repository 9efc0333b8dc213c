//! Runtime configuration of the console game.
use crate::battle::state::{BattleRules, ReselectionPolicy};
use crate::rng::GameRng;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Directory holding the RON record files.
    pub data_dir: PathBuf,
    /// Directory save games are written to and listed from.
    pub save_dir: PathBuf,
    /// Fixed seed for reproducible sessions. Fresh entropy when absent.
    pub seed: Option<u64>,
    pub rules: BattleRules,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            save_dir: PathBuf::from("saves"),
            seed: None,
            rules: BattleRules::default(),
        }
    }
}

impl GameConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_DATA_DIR` - Record files directory (default: data)
    /// - `ARENA_SAVE_DIR` - Save game directory (default: saves)
    /// - `ARENA_SEED` - Random seed (default: OS entropy)
    /// - `ARENA_RESELECTION` - `any` or `another` alive creature needed to
    ///   offer a switch (default: another)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("ARENA_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("ARENA_SAVE_DIR") {
            config.save_dir = PathBuf::from(dir);
        }
        config.seed = parse_var(&lookup, "ARENA_SEED");
        let reselection: Option<ReselectionSetting> = parse_var(&lookup, "ARENA_RESELECTION");
        if let Some(ReselectionSetting(policy)) = reselection {
            config.rules.reselection = policy;
        }

        config
    }

    pub fn rng(&self) -> GameRng {
        match self.seed {
            Some(seed) => GameRng::from_seed(seed),
            None => GameRng::from_entropy(),
        }
    }
}

struct ReselectionSetting(ReselectionPolicy);

impl FromStr for ReselectionSetting {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(Self(ReselectionPolicy::AnyAlive)),
            "another" => Ok(Self(ReselectionPolicy::AnotherAlive)),
            _ => Err(()),
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
{
    let raw = lookup(key)?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!(key, value = %raw, "ignoring unparsable environment variable");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> GameConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GameConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_variables() {
        assert_eq!(config_with(&[]), GameConfig::default());
    }

    #[test]
    fn test_all_variables_are_read() {
        let config = config_with(&[
            ("ARENA_DATA_DIR", "/opt/arena/data"),
            ("ARENA_SAVE_DIR", "/tmp/saves"),
            ("ARENA_SEED", "1234"),
            ("ARENA_RESELECTION", "Any"),
        ]);

        assert_eq!(config.data_dir, PathBuf::from("/opt/arena/data"));
        assert_eq!(config.save_dir, PathBuf::from("/tmp/saves"));
        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.rules.reselection, ReselectionPolicy::AnyAlive);
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = config_with(&[("ARENA_SEED", "lots"), ("ARENA_RESELECTION", "some")]);

        assert_eq!(config.seed, None);
        assert_eq!(config.rules.reselection, ReselectionPolicy::AnotherAlive);
    }

    #[test]
    fn test_seeded_config_gives_reproducible_rng() {
        let config = config_with(&[("ARENA_SEED", "99")]);
        let mut a = config.rng();
        let mut b = config.rng();
        assert_eq!(a.next_unit("test"), b.next_unit("test"));
    }
}
