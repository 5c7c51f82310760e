use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// How a module is probed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeKind {
    /// GET `target`, healthy on HTTP 200.
    Http { target: String },
    /// Run `target` with `args`, healthy on exit code 0.
    Process {
        target: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl ProbeKind {
    pub fn target(&self) -> &str {
        match self {
            ProbeKind::Http { target } | ProbeKind::Process { target, .. } => target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModuleConfig {
    pub name: String,
    #[serde(flatten)]
    pub probe: ProbeKind,
    /// Falls back to `probe_timeout` when absent.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ModuleConfig {
    pub fn http(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            probe: ProbeKind::Http {
                target: url.to_string(),
            },
            timeout_ms: None,
        }
    }

    pub fn process(name: &str, command: &str, args: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            probe: ProbeKind::Process {
                target: command.to_string(),
                args,
            },
            timeout_ms: None,
        }
    }

    pub fn timeout(&self, default: Duration) -> Duration {
        self.timeout_ms.map(Duration::from_millis).unwrap_or(default)
    }
}

#[derive(Debug, Clone)]
pub struct HealthCheckerConfig {
    pub port: u16,
    pub redis_url: String,
    pub store_key_prefix: String,
    pub health_check_interval: Duration,
    pub probe_timeout: Duration,
    pub shutdown_grace: Duration,
    pub report_on_query: bool,
    pub modules: Vec<ModuleConfig>,
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(var: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = env_or(var, default);
    value
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue { var, value })
}

impl HealthCheckerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let modules = match std::env::var("MODULES_CONFIG_FILE") {
            Ok(path) => load_modules_file(&path)?,
            Err(_) => default_modules_from_env()?,
        };

        let config = Self {
            port: parse_env("PORT", "8080")?,
            redis_url: env_or("REDIS_URL", "redis://localhost:6379"),
            store_key_prefix: env_or("STORE_KEY_PREFIX", ""),
            health_check_interval: Duration::from_secs(parse_env(
                "HEALTH_CHECK_INTERVAL_SECS",
                "30",
            )?),
            probe_timeout: Duration::from_millis(parse_env("PROBE_TIMEOUT_MILLIS", "5000")?),
            shutdown_grace: Duration::from_millis(parse_env("SHUTDOWN_GRACE_MILLIS", "5000")?),
            report_on_query: parse_env("REPORT_ON_QUERY", "true")?,
            modules,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("Server port must be greater than 0".into()));
        }

        if self.redis_url.is_empty() {
            return Err(ConfigError::Invalid("Redis URL cannot be empty".into()));
        }

        if self.health_check_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "Health check interval must be greater than 0".into(),
            ));
        }

        if self.probe_timeout.is_zero() {
            return Err(ConfigError::Invalid("Probe timeout must be greater than 0".into()));
        }

        if self.modules.is_empty() {
            return Err(ConfigError::Invalid("At least one module must be configured".into()));
        }

        for module in &self.modules {
            if module.probe.target().trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "Module '{}' has an empty probe target",
                    module.name
                )));
            }
        }

        Ok(())
    }

    pub fn log_configuration(&self) {
        info!(
            port = self.port,
            redis_url = %self.redis_url,
            store_key_prefix = %self.store_key_prefix,
            interval = ?self.health_check_interval,
            probe_timeout = ?self.probe_timeout,
            shutdown_grace = ?self.shutdown_grace,
            report_on_query = self.report_on_query,
            "Health checker configuration"
        );
        for module in &self.modules {
            info!(
                module = %module.name,
                probe = ?module.probe,
                timeout = ?module.timeout(self.probe_timeout),
                "Configured module"
            );
        }
    }
}

/// frontend, gateway and database, addressed relative to `MODULES_HOST`.
fn default_modules_from_env() -> Result<Vec<ModuleConfig>, ConfigError> {
    let host = env_or("MODULES_HOST", "localhost");
    let database_port: u16 = parse_env("DATABASE_PORT", "5432")?;

    Ok(vec![
        ModuleConfig::http(
            "frontend",
            &env_or("FRONTEND_HEALTH_URL", &format!("http://{host}:3000/health")),
        ),
        ModuleConfig::http(
            "gateway",
            &env_or("GATEWAY_HEALTH_URL", &format!("http://{host}:8000/health")),
        ),
        ModuleConfig::process(
            "database",
            &env_or("DATABASE_READY_COMMAND", "pg_isready"),
            vec![
                "-h".to_string(),
                host.clone(),
                "-p".to_string(),
                database_port.to_string(),
            ],
        ),
    ])
}

pub fn load_modules_file(path: &str) -> Result<Vec<ModuleConfig>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ModulesFile {
        path: path.to_string(),
        source,
    })?;
    parse_modules(&contents).map_err(|source| ConfigError::ModulesParse {
        path: path.to_string(),
        source,
    })
}

pub fn parse_modules(json: &str) -> Result<Vec<ModuleConfig>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> HealthCheckerConfig {
        HealthCheckerConfig {
            port: 8080,
            redis_url: "redis://localhost:6379".to_string(),
            store_key_prefix: String::new(),
            health_check_interval: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(5),
            shutdown_grace: Duration::from_secs(5),
            report_on_query: true,
            modules: vec![ModuleConfig::http("frontend", "http://localhost:3000/health")],
        }
    }

    #[test]
    fn test_parse_modules_file() {
        let json = r#"[
            {"name": "frontend", "kind": "http", "target": "http://web:3000/health", "timeout_ms": 1500},
            {"name": "database", "kind": "process", "target": "pg_isready", "args": ["-h", "db", "-p", "5432"]}
        ]"#;

        let modules = parse_modules(json).unwrap();

        assert_eq!(modules.len(), 2);
        assert_eq!(
            modules[0],
            ModuleConfig {
                name: "frontend".to_string(),
                probe: ProbeKind::Http {
                    target: "http://web:3000/health".to_string()
                },
                timeout_ms: Some(1500),
            }
        );
        assert_eq!(
            modules[1].probe,
            ProbeKind::Process {
                target: "pg_isready".to_string(),
                args: vec!["-h".into(), "db".into(), "-p".into(), "5432".into()],
            }
        );
        assert_eq!(modules[1].timeout(Duration::from_secs(5)), Duration::from_secs(5));
        assert_eq!(modules[0].timeout(Duration::from_secs(5)), Duration::from_millis(1500));
    }

    #[test]
    fn test_parse_modules_rejects_unknown_kind() {
        let json = r#"[{"name": "cache", "kind": "tcp", "target": "redis:6379"}]"#;
        assert!(parse_modules(json).is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = test_config();
        config.health_check_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_modules_and_targets() {
        let mut config = test_config();
        config.modules.clear();
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.modules = vec![ModuleConfig::process("database", " ", vec![])];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_modules_file() {
        let err = load_modules_file("/nonexistent/modules.json").unwrap_err();
        assert!(matches!(err, ConfigError::ModulesFile { .. }));
    }
}
