//! Wish Sync command line client

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use wish_sync::{
    ClientConfig, ReqwestTransport, Scope, StaticTokenProvider, WishId, WishPatch, WishSync,
};

const TOKEN_ENV: &str = "WISH_API_TOKEN";

#[derive(Parser, Debug)]
#[command(name = "wish-sync")]
#[command(about = "Manage an organization's ordered wish list")]
struct Cli {
    /// JSON config file
    #[arg(long, default_value = "wish_sync.json")]
    config: PathBuf,

    /// Organization to work in (defaults to the configured one, else all wishes)
    #[arg(long)]
    org: Option<String>,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show active wishes in order
    List {
        /// Show soft-deleted wishes instead
        #[arg(long)]
        trash: bool,
    },
    /// Add a wish at the end, or at --order
    Add {
        title: String,
        #[arg(long, default_value = "")]
        note: String,
        #[arg(long)]
        order: Option<i64>,
    },
    /// Change title and/or note
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Move a wish to the trash
    Remove { id: String },
    /// Bring a wish back from the trash
    Restore {
        id: String,
        #[arg(long)]
        order: Option<i64>,
    },
    /// Delete a wish permanently
    Purge { id: String },
    /// Set a wish's order number
    Move { id: String, order: i64 },
    /// Rewrite order numbers to 1..n
    Renumber,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = rolling_logger::init_logger(&cli.log_dir, "WishSync") {
        eprintln!("Logging disabled: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let config = ClientConfig::load(&cli.config)
        .map_err(|e| e.to_string())?
        .unwrap_or_default()
        .with_env_overrides();

    let scope = match cli.org.or_else(|| config.organization_id.clone()) {
        Some(org) => Scope::organization(org),
        None => Scope::All,
    };
    let transport = ReqwestTransport::new(config.timeout()).map_err(|e| e.to_string())?;
    let sync = WishSync::connect(
        &config,
        scope,
        Arc::new(transport),
        Arc::new(StaticTokenProvider::from_env(TOKEN_ENV)),
    );

    match cli.command {
        Command::List { trash } => {
            let wishes = if trash {
                sync.trash().await
            } else {
                sync.list().await
            }
            .map_err(|e| e.to_string())?;
            for wish in wishes {
                if wish.note.is_empty() {
                    println!("{:>4}  {}  {}", wish.order_no, wish.id, wish.title);
                } else {
                    println!(
                        "{:>4}  {}  {}  ({})",
                        wish.order_no, wish.id, wish.title, wish.note
                    );
                }
            }
        }
        Command::Add { title, note, order } => {
            let wish = sync
                .create(&title, &note, order)
                .await
                .map_err(|e| e.to_string())?;
            println!("Added {} at {}", wish.id, wish.order_no);
        }
        Command::Edit { id, title, note } => {
            let mut patch = WishPatch::default();
            patch.title = title;
            patch.note = note;
            let wish = sync
                .update(&WishId::from(id), patch)
                .await
                .map_err(|e| e.to_string())?;
            println!("Updated {}", wish.id);
        }
        Command::Remove { id } => {
            sync.soft_delete(&WishId::from(id))
                .await
                .map_err(|e| e.to_string())?;
        }
        Command::Restore { id, order } => {
            sync.restore(&WishId::from(id), order)
                .await
                .map_err(|e| e.to_string())?;
        }
        Command::Purge { id } => {
            sync.hard_delete(&WishId::from(id))
                .await
                .map_err(|e| e.to_string())?;
        }
        Command::Move { id, order } => {
            sync.reorder(&WishId::from(id), order)
                .await
                .map_err(|e| e.to_string())?;
        }
        Command::Renumber => {
            let changed = sync.renumber().await.map_err(|e| e.to_string())?;
            println!("Renumbered {} wishes", changed);
        }
    }
    Ok(())
}
