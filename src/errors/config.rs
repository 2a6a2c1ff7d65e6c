#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set in the environment or .env file")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}
