use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("client error: {0}")]
    Client(#[from] api_client::ClientError),
    #[error("{0}")]
    Ledger(#[from] engine::LedgerError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown timezone: {0}")]
    Timezone(String),
    #[error("{0}")]
    Usage(String),
}
