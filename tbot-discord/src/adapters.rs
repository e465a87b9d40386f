//! Adapters from Discord (serenity) types to tbot_core types.
//! Depends only on serenity and tbot_core type definitions.

use tbot_core::{Attachment, ChatUser, IncomingChatMessage, ToCoreMessage, ToCoreUser};

/// Wraps a serenity User for conversion to core [`ChatUser`].
pub struct DiscordUserWrapper<'a>(pub &'a serenity::all::User);

impl ToCoreUser for DiscordUserWrapper<'_> {
    fn to_core(&self) -> ChatUser {
        ChatUser {
            id: self.0.id.get() as i64,
            username: self.0.name.clone(),
            // face() falls back to the default avatar when none is set.
            avatar_url: self.0.face(),
        }
    }
}

/// Wraps a serenity Message for conversion to core [`IncomingChatMessage`].
pub struct DiscordMessageWrapper<'a>(pub &'a serenity::all::Message);

impl ToCoreMessage for DiscordMessageWrapper<'_> {
    fn to_core(&self) -> IncomingChatMessage {
        IncomingChatMessage {
            thread_id: self.0.channel_id.get() as i64,
            author: DiscordUserWrapper(&self.0.author).to_core(),
            from_bot: self.0.author.bot,
            content: self.0.content.clone(),
            attachments: self
                .0
                .attachments
                .iter()
                .map(|a| Attachment {
                    url: a.url.clone(),
                    name: a.filename.clone(),
                    content_type: a.content_type.clone(),
                })
                .collect(),
            stickers: self
                .0
                .sticker_items
                .iter()
                .filter_map(|s| s.image_url())
                .collect(),
        }
    }
}
