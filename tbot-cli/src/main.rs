//! tbot CLI: run the Discord ticket bot with its dashboard API, or inspect
//! tickets from the store. Config comes from env (`.env` supported); the run
//! command can override the bot token.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;

use dashboard_api::AppState;
use storage::{TicketQuery, TicketStore};
use sync::{InboundSync, OutboundSync};
use tbot_core::ChatGateway;
use tbot_discord::{run_gateway, BotConfig, DiscordGateway, TicketEventHandler};

#[derive(Parser)]
#[command(name = "tbot")]
#[command(about = "Discord support-ticket bot: run, tickets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot, outbound sync, and dashboard API (config from env;
    /// token can override DISCORD_BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// List recent tickets from the store, newest first.
    Tickets {
        #[arg(short, long, default_value = "20")]
        limit: i64,
        #[arg(long)]
        server_id: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            run_bot(config).await
        }
        Commands::Tickets { limit, server_id } => handle_tickets(limit, server_id).await,
    }
}

/// Wires the store, both sync halves, the dashboard server, and the Discord
/// client together; blocks until the gateway connection ends.
async fn run_bot(config: BotConfig) -> Result<()> {
    tbot_core::init_tracing(config.log_file.as_deref())?;

    let store = TicketStore::open(&config.database_url).await?;
    let gateway: Arc<dyn ChatGateway> = Arc::new(DiscordGateway::from_token(&config.bot_token));

    let inbound = InboundSync::new(store.clone(), gateway.clone());
    let outbound = OutboundSync::new(store.clone(), gateway);
    let handler = TicketEventHandler::new(inbound, store.clone());

    let outbound_task = tokio::spawn(async move {
        if let Err(e) = outbound.run().await {
            error!(error = %e, "Outbound sync stopped");
        }
    });

    let dashboard_addr = config.dashboard_addr.clone();
    let dashboard_state = AppState::new(store);
    let dashboard_task = tokio::spawn(async move {
        if let Err(e) = dashboard_api::serve(&dashboard_addr, dashboard_state).await {
            error!(error = %e, "Dashboard API stopped");
        }
    });

    let result = run_gateway(&config.bot_token, handler).await;

    outbound_task.abort();
    dashboard_task.abort();
    result
}

/// Operator listing of recent tickets straight from the store.
async fn handle_tickets(limit: i64, server_id: Option<i64>) -> Result<()> {
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:tickets.db".to_string());
    let store = TicketStore::open(&database_url).await?;

    let tickets = store
        .tickets()
        .list(&TicketQuery {
            server_id,
            limit: Some(limit),
            ..TicketQuery::default()
        })
        .await?;

    if tickets.is_empty() {
        println!("No tickets found.");
        return Ok(());
    }

    for ticket in tickets {
        let assigned = ticket.assigned_to_name.as_deref().unwrap_or("-");
        println!(
            "{}  {:8}  {:6}  opener={:20}  assigned={:20}  created={}  {}",
            ticket.short_ref(),
            ticket.status.as_str(),
            ticket.priority.as_str(),
            ticket.opener_username,
            assigned,
            ticket.created_at.format("%Y-%m-%d %H:%M"),
            ticket.title,
        );
    }
    Ok(())
}
