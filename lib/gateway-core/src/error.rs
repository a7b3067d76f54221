use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Route discovery failed: {0}")]
    Discovery(String),

    #[error("Invalid service configuration: {0}")]
    InvalidConfiguration(String),
}
