use thiserror::Error;

#[derive(Error, Debug)]
pub enum HivelyError {
    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
