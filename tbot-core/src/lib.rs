//! # tbot-core
//!
//! Core types and traits for the ticket bot: the [`ChatGateway`] trait, chat-surface
//! message and user types, error types, and tracing initialization. Transport-agnostic;
//! used by storage, sync, and tbot-discord.

pub mod error;
pub mod gateway;
pub mod logger;
pub mod types;

pub use error::{Result, TbotError};
pub use gateway::{ChatGateway, ClosedBy, ThreadNotice, ThreadRef, ThreadState};
pub use logger::init_tracing;
pub use types::{
    Attachment, ChatUser, CloseTicketTrigger, IncomingChatMessage, OpenTicketTrigger,
    ToCoreMessage, ToCoreUser,
};
