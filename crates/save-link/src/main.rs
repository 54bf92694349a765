use anyhow::{Context, Result};
use clap::Parser;
use shared::{
    find_first_url, Classifier, Config, IngestOutcome, LinkIngestor, ProcessedLink, ProviderKind,
    ReqwestClient, SaveStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "save-link")]
#[command(about = "Save a link, extract its caption and classify it")]
struct Args {
    /// Message or URL to save; the first http(s) link is used
    #[arg(required_unless_present = "check")]
    message: Vec<String>,

    /// Classification provider (openai, gemini, huggingface, fallback)
    #[arg(short, long)]
    provider: Option<ProviderKind>,

    /// Path to the saves database
    #[arg(long)]
    db: Option<PathBuf>,

    /// Extract and classify only; do not write to the database
    #[arg(long)]
    dry_run: bool,

    /// Send one sample classification to the configured provider and report the outcome
    #[arg(long, conflicts_with = "dry_run")]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,shared=info".into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;

    if let Some(provider) = args.provider {
        config.providers.provider = provider;
    }
    if let Some(db) = args.db {
        config.database_path = db;
    }

    debug!(
        provider = %config.providers.provider,
        db = %config.database_path.display(),
        "configuration loaded"
    );

    let message = args.message.join(" ");

    let http = Arc::new(
        ReqwestClient::new(config.providers.request_timeout)
            .context("Failed to build HTTP client")?,
    );
    let classifier = Classifier::from_config(&config.providers, http.clone());
    println!(
        "🤖 Classifier: {}",
        classifier.provider_name().unwrap_or("keyword fallback")
    );

    if args.check {
        return check_provider(&classifier).await;
    }

    let ingestor = LinkIngestor::new(http, classifier);

    if args.dry_run {
        let Some(url) = find_first_url(&message) else {
            println!("No link found in message.");
            return Ok(());
        };
        println!("\n🌐 Processing {} (dry run)...", url);
        let link = ingestor.process(url).await;
        print_link(&link);
        return Ok(());
    }

    let store = SaveStore::open(&config.database_path)?;

    println!("\n🌐 Processing link...");
    match ingestor.ingest(&message, &store).await? {
        IngestOutcome::NoLink => {
            println!("No link found in message.");
        }
        IngestOutcome::Classified { id, link } => {
            print_link(&link);
            println!("\n✓ Saved as #{} in {}", id, config.database_path.display());
        }
        IngestOutcome::SavedUnclassified { id, url, reason } => {
            println!("⚠ Could not process {}: {}", url, reason);
            println!("✓ Link saved as #{} without classification", id);
        }
    }

    Ok(())
}

fn print_link(link: &ProcessedLink) {
    println!("  URL:      {}", link.url);
    println!("  Platform: {}", link.content.platform);
    println!("  Category: {}", link.result.category);
    println!("  Summary:  {}", link.result.summary);
    if !link.content.hashtags.is_empty() {
        println!("  Hashtags: #{}", link.content.hashtags.join(" #"));
    }
}

async fn check_provider(classifier: &Classifier) -> Result<()> {
    let Some(name) = classifier.provider_name() else {
        println!("No remote provider configured; links are classified by keywords.");
        return Ok(());
    };

    println!("\n🔌 Checking {}...", name);
    match classifier.check_provider().await {
        Some(Ok(result)) => {
            println!("✓ {} answered", name);
            println!("  Category: {}", result.category);
            println!("  Summary:  {}", result.summary);
            Ok(())
        }
        Some(Err(e)) => {
            println!("✗ {} failed: {}", name, e);
            if e.is_rate_limit() {
                println!("  Rate limit or quota reached; try again later.");
            }
            anyhow::bail!("Provider check failed")
        }
        None => Ok(()),
    }
}
