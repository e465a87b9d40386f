use thiserror::Error;

#[derive(Error, Debug)]
pub enum TbotError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Thread not found: server {server_id}, thread {thread_id}")]
    ThreadNotFound { server_id: i64, thread_id: i64 },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, TbotError>;
