use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Unknown environment {0:?} (expected development, production or test)")]
    UnknownEnvironment(String),

    #[error("{key} must be {expected}, got {value:?}")]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}
