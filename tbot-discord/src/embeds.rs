//! Rendering of thread notices into Discord embeds and components.
//!
//! The sync core decides *what* to say; this module owns the colours, copy,
//! and button wiring. Custom ids: `open_ticket_button` on the panel,
//! `close_ticket_{ticket_id}` on welcome messages.

use serenity::all::{
    ButtonStyle, Colour, CreateActionRow, CreateButton, CreateEmbed, CreateEmbedAuthor,
    CreateEmbedFooter, CreateMessage, Timestamp,
};
use tbot_core::{ClosedBy, ThreadNotice};

pub const OPEN_TICKET_ID: &str = "open_ticket_button";
pub const CLOSE_TICKET_PREFIX: &str = "close_ticket_";

const PANEL_COLOUR: Colour = Colour(0x0099FF);
const WELCOME_COLOUR: Colour = Colour(0x57F287);
const STAFF_REPLY_COLOUR: Colour = Colour(0x5865F2);
const ASSIGNMENT_COLOUR: Colour = Colour(0xFEE75C);
const CLOSED_COLOUR: Colour = Colour(0xED4245);
const RESOLVED_COLOUR: Colour = Colour(0x57F287);
const REOPENED_COLOUR: Colour = Colour(0xE67E22);

/// The close control placed on welcome messages.
pub fn close_button(ticket_id: &str, disabled: bool) -> CreateButton {
    CreateButton::new(format!("{}{}", CLOSE_TICKET_PREFIX, ticket_id))
        .label("Close Ticket")
        .style(ButtonStyle::Danger)
        .emoji('🔒')
        .disabled(disabled)
}

/// The open-ticket panel posted by `/setup`.
pub fn ticket_panel(server_name: &str, server_icon: Option<String>) -> CreateMessage {
    let mut footer = CreateEmbedFooter::new(format!("{} Support", server_name));
    if let Some(icon) = server_icon {
        footer = footer.icon_url(icon);
    }

    let embed = CreateEmbed::new()
        .colour(PANEL_COLOUR)
        .title("Support Ticket")
        .description(
            "Click the button below to open a support ticket.\n\
             Please provide as much detail as possible so our staff can assist you effectively.",
        )
        .footer(footer);

    let open_button = CreateButton::new(OPEN_TICKET_ID)
        .label("Open Ticket")
        .style(ButtonStyle::Primary)
        .emoji('🎟');

    CreateMessage::new()
        .embed(embed)
        .components(vec![CreateActionRow::Buttons(vec![open_button])])
}

/// Maps a notice to the message to send into the thread.
pub fn notice_message(notice: &ThreadNotice) -> CreateMessage {
    match notice {
        ThreadNotice::Welcome {
            ticket_id,
            ticket_ref,
            opener_id,
        } => {
            let embed = CreateEmbed::new()
                .colour(WELCOME_COLOUR)
                .title(format!("Support Ticket #{}", ticket_ref))
                .description(format!(
                    "Hello <@{}>, thank you for reaching out to support.\n\n\
                     A staff member will be with you shortly. Please describe your issue in detail here.",
                    opener_id
                ));
            CreateMessage::new()
                .embed(embed)
                .components(vec![CreateActionRow::Buttons(vec![close_button(
                    ticket_id, false,
                )])])
        }
        ThreadNotice::StaffReply {
            author_username,
            author_avatar,
            content,
            ping_user_id,
            sent_at,
        } => {
            let mut author = CreateEmbedAuthor::new(format!("{} (Staff)", author_username));
            if let Some(avatar) = author_avatar {
                author = author.icon_url(avatar);
            }
            let embed = CreateEmbed::new()
                .colour(STAFF_REPLY_COLOUR)
                .author(author)
                .description(content)
                .timestamp(
                    Timestamp::from_unix_timestamp(sent_at.timestamp())
                        .unwrap_or_else(|_| Timestamp::now()),
                );

            let mut message = CreateMessage::new().embed(embed);
            if let Some(user_id) = ping_user_id {
                message = message.content(format!("<@{}>", user_id));
            }
            message
        }
        ThreadNotice::Assigned { staff_name } => simple_notice(
            ASSIGNMENT_COLOUR,
            "Ticket Assigned",
            format!("This ticket has been assigned to **{}**.", staff_name),
        ),
        ThreadNotice::Unassigned => simple_notice(
            ASSIGNMENT_COLOUR,
            "Ticket Assigned",
            "This ticket has been **unassigned** and is now available for all staff.".to_string(),
        ),
        ThreadNotice::Closed { by } => {
            let description = match by {
                ClosedBy::Opener { user_id } => format!(
                    "This ticket has been closed by <@{}>. The thread is now locked.",
                    user_id
                ),
                ClosedBy::Staff => {
                    "This ticket has been closed by a staff member. The thread is now locked."
                        .to_string()
                }
            };
            simple_notice(CLOSED_COLOUR, "Ticket Closed", description)
        }
        ThreadNotice::Resolved => simple_notice(
            RESOLVED_COLOUR,
            "Ticket Resolved",
            "This ticket has been marked as resolved by a staff member. If your issue is not \
             solved, you can continue to send messages here."
                .to_string(),
        ),
        ThreadNotice::Reopened => simple_notice(
            REOPENED_COLOUR,
            "Ticket Re-opened",
            "This ticket has been re-opened by a staff member.".to_string(),
        ),
    }
}

fn simple_notice(colour: Colour, title: &str, description: String) -> CreateMessage {
    let embed = CreateEmbed::new()
        .colour(colour)
        .title(title)
        .description(description)
        .timestamp(Timestamp::now());
    CreateMessage::new().embed(embed)
}
