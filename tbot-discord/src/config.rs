//! Bot configuration: token, database, dashboard bind address, log path.
//! Loaded from environment variables; the CLI may override the token.

use anyhow::Result;
use std::env;

pub struct BotConfig {
    pub bot_token: String,
    pub database_url: String,
    pub dashboard_addr: String,
    pub log_file: Option<String>,
}

impl BotConfig {
    /// Loads from the environment: `DISCORD_BOT_TOKEN` required (unless
    /// `token_override` is given), `DATABASE_URL`, `DASHBOARD_ADDR`, and
    /// `LOG_FILE` optional with sensible defaults.
    pub fn load(token_override: Option<String>) -> Result<Self> {
        let bot_token = match token_override {
            Some(token) => token,
            None => env::var("DISCORD_BOT_TOKEN")
                .map_err(|_| anyhow::anyhow!("DISCORD_BOT_TOKEN not set"))?,
        };
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:tickets.db".to_string());
        let dashboard_addr =
            env::var("DASHBOARD_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let log_file = env::var("LOG_FILE").ok();

        Ok(Self {
            bot_token,
            database_url,
            dashboard_addr,
            log_file,
        })
    }

    /// Constructs with the given token; everything else defaulted.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            database_url: "sqlite:tickets.db".to_string(),
            dashboard_addr: "127.0.0.1:8080".to_string(),
            log_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_token() {
        let config = BotConfig::with_token("test_token".to_string());
        assert_eq!(config.bot_token, "test_token");
        assert_eq!(config.database_url, "sqlite:tickets.db");
        assert!(config.log_file.is_none());
    }
}
