use rentpoker_ai::AgentKind;
use rentpoker_engine::config::{
    TableConfig, DEFAULT_HANDS, DEFAULT_MAX_REBUYS, DEFAULT_PLAYERS, DEFAULT_SEED,
    DEFAULT_STARTING_STACK,
};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub players: usize,
    pub starting_stack: u32,
    pub max_rebuys: u32,
    pub hands: u64,
    pub seed: u64,
    pub agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Flag,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub players: ValueSource,
    pub starting_stack: ValueSource,
    pub max_rebuys: ValueSource,
    pub hands: ValueSource,
    pub seed: ValueSource,
    pub agent: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            players: ValueSource::Default,
            starting_stack: ValueSource::Default,
            max_rebuys: ValueSource::Default,
            hands: ValueSource::Default,
            seed: ValueSource::Default,
            agent: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            players: DEFAULT_PLAYERS,
            starting_stack: DEFAULT_STARTING_STACK,
            max_rebuys: DEFAULT_MAX_REBUYS,
            hands: DEFAULT_HANDS,
            seed: DEFAULT_SEED,
            agent: AgentKind::default().as_str().into(),
        }
    }
}

impl Config {
    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            players: self.players,
            starting_stack: self.starting_stack,
            max_rebuys: self.max_rebuys,
            hands: self.hands,
            seed: self.seed,
            ..TableConfig::default()
        }
    }

    pub fn agent_kind(&self) -> Result<AgentKind, ConfigError> {
        self.agent
            .parse()
            .map_err(|e: rentpoker_ai::UnknownAgent| ConfigError::Invalid(e.to_string()))
    }
}

/// Command-line values; each one set here wins over file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub players: Option<usize>,
    pub starting_stack: Option<u32>,
    pub max_rebuys: Option<u32>,
    pub hands: Option<u64>,
    pub seed: Option<u64>,
    pub agent: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
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
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    resolve(&Overrides::default())
}

/// Defaults, then the TOML file named by `RENTPOKER_CONFIG`, then
/// `RENTPOKER_*` variables, then command-line overrides.
pub fn resolve(overrides: &Overrides) -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("RENTPOKER_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.players {
            cfg.players = v;
            sources.players = ValueSource::File;
        }
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.max_rebuys {
            cfg.max_rebuys = v;
            sources.max_rebuys = ValueSource::File;
        }
        if let Some(v) = f.hands {
            cfg.hands = v;
            sources.hands = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = v;
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.agent {
            cfg.agent = v;
            sources.agent = ValueSource::File;
        }
    }

    if let Some(v) = env_value("RENTPOKER_PLAYERS", "players")? {
        cfg.players = v;
        sources.players = ValueSource::Env;
    }
    if let Some(v) = env_value("RENTPOKER_STACK", "stack")? {
        cfg.starting_stack = v;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(v) = env_value("RENTPOKER_REBUYS", "rebuys")? {
        cfg.max_rebuys = v;
        sources.max_rebuys = ValueSource::Env;
    }
    if let Some(v) = env_value("RENTPOKER_HANDS", "hands")? {
        cfg.hands = v;
        sources.hands = ValueSource::Env;
    }
    if let Some(v) = env_value("RENTPOKER_SEED", "seed")? {
        cfg.seed = v;
        sources.seed = ValueSource::Env;
    }
    if let Ok(agent) = std::env::var("RENTPOKER_AGENT")
        && !agent.is_empty()
    {
        cfg.agent = agent;
        sources.agent = ValueSource::Env;
    }

    if let Some(v) = overrides.players {
        cfg.players = v;
        sources.players = ValueSource::Flag;
    }
    if let Some(v) = overrides.starting_stack {
        cfg.starting_stack = v;
        sources.starting_stack = ValueSource::Flag;
    }
    if let Some(v) = overrides.max_rebuys {
        cfg.max_rebuys = v;
        sources.max_rebuys = ValueSource::Flag;
    }
    if let Some(v) = overrides.hands {
        cfg.hands = v;
        sources.hands = ValueSource::Flag;
    }
    if let Some(v) = overrides.seed {
        cfg.seed = v;
        sources.seed = ValueSource::Flag;
    }
    if let Some(v) = &overrides.agent {
        cfg.agent = v.clone();
        sources.agent = ValueSource::Flag;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_value<T: std::str::FromStr>(var: &str, what: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", what, v))),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    players: Option<usize>,
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    max_rebuys: Option<u32>,
    #[serde(default)]
    hands: Option<u64>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    agent: Option<String>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    cfg.table_config()
        .validate()
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    cfg.agent_kind()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_win_and_are_tracked() {
        let overrides = Overrides {
            players: Some(3),
            agent: Some("heuristic".into()),
            ..Overrides::default()
        };
        // Only reads RENTPOKER_* variables, which the unit tests never set.
        let resolved = resolve(&overrides).unwrap();
        assert_eq!(resolved.config.players, 3);
        assert_eq!(resolved.sources.players, ValueSource::Flag);
        assert_eq!(resolved.config.agent_kind().unwrap(), AgentKind::Heuristic);
    }

    #[test]
    fn out_of_range_seats_are_invalid() {
        let overrides = Overrides {
            players: Some(11),
            ..Overrides::default()
        };
        let err = resolve(&overrides).unwrap_err();
        assert!(err.to_string().contains("11"));
    }
}
