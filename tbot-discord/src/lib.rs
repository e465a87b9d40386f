//! # tbot-discord
//!
//! Discord layer: serenity-backed [`tbot_core::ChatGateway`] implementation,
//! type adapters, embed rendering for thread notices, the event handler that
//! feeds the inbound sync, minimal config, and the client runner. Handles only
//! Discord connectivity; all ticket semantics live in the sync crate.

mod adapters;
mod config;
mod embeds;
mod gateway_adapter;
mod handler;
mod runner;

pub use adapters::{DiscordMessageWrapper, DiscordUserWrapper};
pub use config::BotConfig;
pub use gateway_adapter::DiscordGateway;
pub use handler::TicketEventHandler;
pub use runner::run_gateway;
