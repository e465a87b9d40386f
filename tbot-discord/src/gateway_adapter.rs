//! Wraps serenity's Http client and implements [`tbot_core::ChatGateway`].
//! Production code talks to Discord through this; tests substitute a mock.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    AutoArchiveDuration, ChannelId, ChannelType, CreateActionRow, CreateThread, EditMessage,
    EditThread, GuildId, Http, MessageId, UserId,
};
use tbot_core::{ChatGateway, Result, TbotError, ThreadNotice, ThreadRef, ThreadState};

use crate::embeds;

/// Thin wrapper around serenity's Http that implements tbot-core's gateway trait.
pub struct DiscordGateway {
    http: Arc<Http>,
}

impl DiscordGateway {
    /// Creates a gateway over an existing Http client.
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Creates a gateway with its own Http client for the given bot token.
    pub fn from_token(token: &str) -> Self {
        Self {
            http: Arc::new(Http::new(token)),
        }
    }

    /// Returns the underlying Http client for direct API use when needed.
    pub fn http(&self) -> &Arc<Http> {
        &self.http
    }

    fn gateway_err(e: serenity::Error) -> TbotError {
        TbotError::Gateway(e.to_string())
    }
}

#[async_trait]
impl ChatGateway for DiscordGateway {
    async fn create_private_thread(
        &self,
        server_id: i64,
        channel_id: i64,
        name: &str,
    ) -> Result<ThreadRef> {
        let builder = CreateThread::new(name)
            .kind(ChannelType::PrivateThread)
            .auto_archive_duration(AutoArchiveDuration::OneHour);

        let thread = ChannelId::new(channel_id as u64)
            .create_thread(&self.http, builder)
            .await
            .map_err(Self::gateway_err)?;

        Ok(ThreadRef {
            server_id,
            thread_id: thread.id.get() as i64,
        })
    }

    async fn delete_thread(&self, thread: &ThreadRef) -> Result<()> {
        ChannelId::new(thread.thread_id as u64)
            .delete(&self.http)
            .await
            .map_err(Self::gateway_err)?;
        Ok(())
    }

    async fn add_thread_member(&self, thread: &ThreadRef, user_id: i64) -> Result<()> {
        ChannelId::new(thread.thread_id as u64)
            .add_thread_member(&self.http, UserId::new(user_id as u64))
            .await
            .map_err(Self::gateway_err)?;
        Ok(())
    }

    async fn fetch_thread(&self, server_id: i64, thread_id: i64) -> Result<ThreadState> {
        // Guild first, then the channel within it, mirroring the platform's
        // resolution order; either missing means the thread is unreachable.
        self.http
            .get_guild(GuildId::new(server_id as u64))
            .await
            .map_err(|_| TbotError::ThreadNotFound {
                server_id,
                thread_id,
            })?;

        let channel = self
            .http
            .get_channel(ChannelId::new(thread_id as u64))
            .await
            .map_err(|_| TbotError::ThreadNotFound {
                server_id,
                thread_id,
            })?;

        let Some(guild_channel) = channel.guild() else {
            return Err(TbotError::ThreadNotFound {
                server_id,
                thread_id,
            });
        };

        let locked = guild_channel
            .thread_metadata
            .map(|meta| meta.locked)
            .unwrap_or(false);

        Ok(ThreadState {
            thread: ThreadRef {
                server_id,
                thread_id,
            },
            locked,
        })
    }

    async fn send_notice(&self, thread: &ThreadRef, notice: &ThreadNotice) -> Result<()> {
        let message = embeds::notice_message(notice);
        ChannelId::new(thread.thread_id as u64)
            .send_message(&self.http, message)
            .await
            .map_err(Self::gateway_err)?;
        Ok(())
    }

    async fn set_locked(&self, thread: &ThreadRef, locked: bool, reason: &str) -> Result<()> {
        let builder = EditThread::new().locked(locked).audit_log_reason(reason);
        ChannelId::new(thread.thread_id as u64)
            .edit_thread(&self.http, builder)
            .await
            .map_err(Self::gateway_err)?;
        Ok(())
    }

    async fn disable_close_control(
        &self,
        thread: &ThreadRef,
        message_id: i64,
        ticket_id: &str,
    ) -> Result<()> {
        let mut message = self
            .http
            .get_message(
                ChannelId::new(thread.thread_id as u64),
                MessageId::new(message_id as u64),
            )
            .await
            .map_err(Self::gateway_err)?;

        let disabled_row = CreateActionRow::Buttons(vec![embeds::close_button(ticket_id, true)]);
        message
            .edit(&self.http, EditMessage::new().components(vec![disabled_row]))
            .await
            .map_err(Self::gateway_err)?;
        Ok(())
    }
}
