use std::collections::HashMap;
use tracing::Level;

/// Per-scope log levels, parsed from strings like `warn,grapple=debug,motion=trace`
#[derive(Debug, Clone)]
pub struct LogConfig {
    global_level: Level,
    scope_levels: HashMap<String, Level>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            global_level: Level::WARN,
            scope_levels: HashMap::new(),
        }
    }

    pub fn parse(config_str: &str) -> Self {
        let mut config = Self::new();
        config.apply_directives(config_str);
        config
    }

    pub fn from_env(env_var_name: &str) -> Self {
        std::env::var(env_var_name)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    fn apply_directives(&mut self, config_str: &str) {
        for directive in config_str.split(',').map(str::trim) {
            if directive.is_empty() {
                continue;
            }

            match directive.split_once('=') {
                Some((scope, level)) => {
                    if let Some(level) = parse_level(level) {
                        self.scope_levels.insert(scope.trim().to_string(), level);
                    }
                }
                None => {
                    if let Some(level) = parse_level(directive) {
                        self.global_level = level;
                    }
                }
            }
        }
    }

    pub fn level_for(&self, scope: &str) -> Level {
        *self.scope_levels.get(scope).unwrap_or(&self.global_level)
    }

    pub fn should_log(&self, scope: &str, level: Level) -> bool {
        level <= self.level_for(scope)
    }

    /// The most verbose level any scope asks for, used to open the subscriber filter
    pub fn max_level(&self) -> Level {
        self.scope_levels
            .values()
            .copied()
            .fold(self.global_level, |max, level| if level > max { level } else { max })
    }

    pub fn set_global_level(&mut self, level: Level) {
        self.global_level = level;
    }

    pub fn set_scope_level(&mut self, scope: impl Into<String>, level: Level) {
        self.scope_levels.insert(scope.into(), level);
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

/// Install the fmt subscriber (on stderr) and the scope config read from
/// `env_var_name`. `RUST_LOG` still wins for the subscriber filter when it is set.
/// Example: init_logging("GRAPPLE_LOG")
pub fn init_logging(env_var_name: &str) -> LogConfig {
    let config = LogConfig::from_env(env_var_name);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(config.max_level().as_str().to_lowercase())
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    super::set_log_config(config.clone());
    config
}
