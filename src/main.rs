use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use msgsync::config::{Config, ConfigStore};
use msgsync::logging::init_tracing;
use msgsync::model::MessageId;
use msgsync::session::InboxSession;
use msgsync::store::MessageStatus;
use msgsync::transport::HttpBackend;
use msgsync::views::newest_first;

#[derive(Parser, Debug)]
#[command(name = "msgsync", version, about = "Sync messages and their local status")]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load messages with their sender services and print the inbox views
    Fetch {
        /// Message ids to load
        #[arg(required = true)]
        ids: Vec<String>,
        /// Mark every loaded message as read
        #[arg(long)]
        open: bool,
    },
    /// Print the config file location
    ConfigPath,
}

#[derive(Serialize)]
struct MessageReport {
    id: String,
    state: &'static str,
    subject: Option<String>,
    sender: Option<String>,
    status: MessageStatus,
    error: Option<String>,
}

#[derive(Serialize)]
struct InboxReport {
    messages: Vec<MessageReport>,
    unread: Vec<String>,
    archived: Vec<String>,
    unread_and_unarchived: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let path = cli.config.clone().unwrap_or_else(Config::config_path);

    match cli.command {
        Command::ConfigPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::Fetch { ids, open } => {
            let store = ConfigStore::open(path).context("loading config")?;
            let config = store.get();
            let target = init_tracing(&config.logging.filter);
            tracing::debug!(?target, "Logging initialized");
            run_fetch(&config, ids, open).await
        }
    }
}

async fn run_fetch(config: &Config, ids: Vec<String>, open: bool) -> anyhow::Result<()> {
    let backend = HttpBackend::new(&config.backend)?;
    let session = InboxSession::start(backend.clone(), backend, &config.sync);
    let ids: Vec<MessageId> = ids.into_iter().map(MessageId::new).collect();

    for id in &ids {
        match session.load_message(id).await {
            Ok(_) if open => {
                session.open_message(id);
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(id = %id, error = %err, "Message not loaded"),
        }
    }

    let messages = session.messages().clone();
    let services = session.services().clone();
    let views = session.views().clone();
    session.shutdown().await;

    let ordered = views.ordered_ids(&ids, newest_first);
    let reports = ordered
        .iter()
        .map(|id| {
            let entry = messages.get(id);
            let message = entry.value();
            MessageReport {
                id: id.to_string(),
                state: entry.stage(),
                subject: message.map(|m| m.content.subject.clone()),
                sender: message.and_then(|m| {
                    services
                        .value(&m.sender_service_id)
                        .map(|service| service.service_name)
                }),
                status: views.status_of(id),
                error: entry.error().map(ToString::to_string),
            }
        })
        .collect();

    let to_strings =
        |ids: &[MessageId]| -> Vec<String> { ids.iter().map(ToString::to_string).collect() };
    let report = InboxReport {
        messages: reports,
        unread: to_strings(&views.unread_ids()[..]),
        archived: to_strings(&views.archived_ids()[..]),
        unread_and_unarchived: to_strings(&views.unread_and_unarchived_ids()[..]),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
