use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("{0}")]
    Invalid(String),

    #[error("failed to read modules file {path}: {source}")]
    ModulesFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse modules file {path}: {source}")]
    ModulesParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raised while building the module registry. Only ever fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("module '{0}' is already registered")]
    DuplicateModule(String),

    #[error("invalid module name {0:?}")]
    InvalidName(String),

    #[error("module '{0}' must have a non-zero probe timeout")]
    InvalidTimeout(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
