//! `deskplan-sync` -- pull or push a room's desk layout.
//!
//! ```text
//! deskplan-sync pull <room_id> [file]   # write the room's desks as JSON (stdout if no file)
//! deskplan-sync push <room_id> <file>   # load desks from JSON and bulk-save them
//! ```
//!
//! # Environment variables
//!
//! | Variable                        | Required | Default | Description                  |
//! |---------------------------------|----------|---------|------------------------------|
//! | `DESKPLAN_API_URL`              | yes      | --      | Base URL of the desk API     |
//! | `DESKPLAN_API_TOKEN`            | no       | --      | Bearer token for the API     |
//! | `DESKPLAN_REQUEST_TIMEOUT_SECS` | no       | `30`    | Per-request timeout          |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use deskplan_core::desk::Desk;
use deskplan_editor::DeskEditor;
use deskplan_events::NoticeBus;
use deskplan_gateway::{GatewayConfig, HttpGateway, PersistenceGateway};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: deskplan-sync <pull|push> <room_id> [file]";

enum Command {
    Pull { room_id: i64, out: Option<PathBuf> },
    Push { room_id: i64, file: PathBuf },
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let (verb, room_id) = match args {
        [verb, room_id, ..] => (verb.as_str(), room_id),
        _ => bail!(USAGE),
    };
    let room_id: i64 = room_id
        .parse()
        .with_context(|| format!("room_id must be an integer, got '{room_id}'"))?;

    match (verb, args.get(2)) {
        ("pull", out) => Ok(Command::Pull {
            room_id,
            out: out.map(PathBuf::from),
        }),
        ("push", Some(file)) => Ok(Command::Push {
            room_id,
            file: PathBuf::from(file),
        }),
        _ => bail!(USAGE),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deskplan_editor=info,deskplan_gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    let config = GatewayConfig::from_env()?;
    tracing::info!(base_url = %config.base_url, "Using desk API");
    let gateway: Arc<dyn PersistenceGateway> = Arc::new(HttpGateway::new(config)?);
    let notices = Arc::new(NoticeBus::default());

    match command {
        Command::Pull { room_id, out } => {
            let editor = DeskEditor::load(gateway, room_id, notices).await?;
            let json = serde_json::to_string_pretty(editor.desks())?;
            match out {
                Some(path) => {
                    tokio::fs::write(&path, json)
                        .await
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!(room_id, path = %path.display(), desks = editor.desks().len(), "Layout written");
                }
                None => println!("{json}"),
            }
        }
        Command::Push { room_id, file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let desks: Vec<Desk> =
                serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;

            let room = gateway.get_room(room_id).await?;
            let editor = DeskEditor::new(gateway, room, desks, Vec::new(), notices);
            let id = editor.save().await?;
            tracing::info!(room_id = id, desks = editor.desks().len(), "Layout pushed");
        }
    }

    Ok(())
}
