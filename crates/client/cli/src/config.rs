//! Process configuration read from the environment.
use std::env;
use std::path::PathBuf;

/// Configuration required to load content and run a session.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub session_id: Option<String>,
    pub max_carry_weight: Option<f32>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_dir: None,
            session_id: None,
            max_carry_weight: None,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARMORY_DATA_DIR` - Directory holding items.ron, sets.ron and config.toml (default: `data`)
    /// - `ARMORY_LOG_DIR` - Also write logs to `<dir>/<session>/armory.log` (default: stderr only)
    /// - `ARMORY_SESSION_ID` - Session name used for the log file (default: auto-generated)
    /// - `ARMORY_MAX_CARRY_WEIGHT` - Overrides the encumbrance limit from config.toml
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("ARMORY_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.log_dir = env::var("ARMORY_LOG_DIR").ok().map(PathBuf::from);
        config.session_id = env::var("ARMORY_SESSION_ID").ok();
        config.max_carry_weight = read_env::<f32>("ARMORY_MAX_CARRY_WEIGHT")
            .filter(|limit| limit.is_finite() && *limit >= 0.0);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
