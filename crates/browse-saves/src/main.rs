use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use shared::{default_exports_dir, export_filename, export_saves, Config, SaveStore, SavedItem};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "browse-saves")]
#[command(about = "Browse, search and export saved links")]
struct Args {
    /// Path to the saves database
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List saves, newest first
    List {
        /// Only show saves whose caption, category or hashtags contain this term
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one save picked at random
    Random,
    /// Write every save to a JSON file
    Export {
        /// Output file (defaults to the exports directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,shared=info".into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let database_path = match args.db {
        Some(path) => path,
        None => Config::from_env()?.database_path,
    };

    let store = SaveStore::open(&database_path)?;

    match args.command {
        Command::List { search } => {
            let items = store.query(search.as_deref())?;
            if items.is_empty() {
                match search {
                    Some(term) => println!("No saves match \"{}\".", term),
                    None => println!("No saves yet. Use save-link to add one."),
                }
                return Ok(());
            }

            println!("📚 {} saves\n", items.len());
            for item in &items {
                print_item(item);
            }
        }
        Command::Random => match store.random()? {
            Some(item) => {
                println!("🎲 Random pick\n");
                print_item(&item);
            }
            None => println!("No saves yet. Use save-link to add one."),
        },
        Command::Export { output } => {
            let path = match output {
                Some(path) => path,
                None => default_exports_dir()?.join(export_filename()),
            };
            let items = store.query(None)?;
            let written = export_saves(&items, &path).context("Failed to export saves")?;
            println!("✓ Exported {} saves to: {}", items.len(), written.display());
        }
    }

    Ok(())
}

fn print_item(item: &SavedItem) {
    println!(
        "#{} [{}] {} ({})",
        item.id,
        item.category,
        item.summary,
        display_date(&item.created_at)
    );
    println!("    {} · {}", item.platform, item.url);
    if !item.hashtags.is_empty() {
        println!("    tags: {}", item.hashtags);
    }
    println!();
}

fn display_date(created_at: &str) -> String {
    NaiveDateTime::parse_from_str(created_at, "%Y-%m-%d %H:%M:%S%.f")
        .map(|dt| dt.format("%b %d, %Y %H:%M").to_string())
        .unwrap_or_else(|_| created_at.to_string())
}
