//! Reputation Report - score and compare a set of Algorand accounts
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin reputation_report -- [OPTIONS] ADDRESS...
//! ```
//!
//! ## Options
//!
//! - `--format json|csv` - stdout report format (default: json)
//! - `--fixtures PATH` - score from a JSON fixture file instead of the indexer
//! - `--output PATH` - write the report to a file instead of stdout
//! - `--jsonl PATH` - append the comparison to a JSONL history file
//! - `--sqlite PATH` - upsert per-address scores into a SQLite database
//! - `--concurrency N` - addresses scored at once (default: 8)
//! - `--limit N` - transactions fetched per address (default: 1000)
//! - `--insights` - log aggregate insights after scoring
//!
//! ## Environment Variables
//!
//! - ALGOD_API_KEY - indexer API token (required unless --fixtures is given)
//! - ALGOREP_NETWORK - mainnet or testnet (default: testnet)
//! - ALGOREP_<WEIGHT> - overrides for individual scoring weights
//! - RUST_LOG - Logging level (optional, default: info)

use algorep::batch::{insights, BatchOptions, BatchScorer};
use algorep::client::{AccountDataSource, ClientConfig, IndexerClient, MemorySource};
use algorep::config::ReputationConfig;
use algorep::export::{export_comparison, BackendType, ExportFormat, ReportWriter};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
struct ReportArgs {
    addresses: Vec<String>,
    format: ExportFormat,
    fixtures: Option<PathBuf>,
    output: Option<PathBuf>,
    jsonl: Option<PathBuf>,
    sqlite: Option<PathBuf>,
    options: BatchOptions,
    show_insights: bool,
}

fn parse_args(args: &[String]) -> Result<ReportArgs, Box<dyn std::error::Error>> {
    let mut parsed = ReportArgs {
        addresses: Vec::new(),
        format: ExportFormat::Json,
        fixtures: None,
        output: None,
        jsonl: None,
        sqlite: None,
        options: BatchOptions::default(),
        show_insights: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("Missing value for {}", arg))
        };

        match arg.as_str() {
            "--format" => parsed.format = ExportFormat::from_str(&value()?)?,
            "--fixtures" => parsed.fixtures = Some(value()?.into()),
            "--output" => parsed.output = Some(value()?.into()),
            "--jsonl" => parsed.jsonl = Some(value()?.into()),
            "--sqlite" => parsed.sqlite = Some(value()?.into()),
            "--concurrency" => parsed.options.max_concurrency = value()?.parse()?,
            "--limit" => parsed.options.transaction_limit = value()?.parse()?,
            "--insights" => parsed.show_insights = true,
            flag if flag.starts_with("--") => return Err(format!("Unknown option: {}", flag).into()),
            address => parsed.addresses.push(address.to_string()),
        }
    }

    if parsed.addresses.is_empty() {
        return Err("No addresses given".into());
    }

    Ok(parsed)
}

async fn run<D: AccountDataSource + 'static>(
    source: Arc<D>,
    config: ReputationConfig,
    args: ReportArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let scorer = BatchScorer::new(source, Arc::new(config)).with_options(args.options.clone());
    let comparison = scorer.compare_accounts(&args.addresses).await;

    if args.show_insights {
        let insights = insights(&comparison.detailed_results);
        log::info!(
            "📈 {} of {} accounts high-reputation ({:.1}%), most common type: {}",
            insights.high_score_accounts,
            insights.total_accounts_analyzed,
            insights.high_score_percentage,
            insights.most_common_txn_type.as_deref().unwrap_or("-")
        );
    }

    let rendered = export_comparison(&comparison, args.format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            log::info!("📝 Wrote {} report to {}", args.format.as_str(), path.display());
        }
        None => println!("{}", rendered),
    }

    let backends = [
        (BackendType::Jsonl, args.jsonl.as_ref()),
        (BackendType::Sqlite, args.sqlite.as_ref()),
    ];
    for (backend, path) in backends {
        let Some(path) = path else { continue };
        let mut writer = ReportWriter::new(backend, path)?;
        writer.write_report(&comparison).await?;
        writer.flush().await?;
        log::info!("✅ Report persisted via {} to {}", writer.backend_type(), path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args = parse_args(&args)?;
    let config = ReputationConfig::from_env()?;

    log::info!("🚀 Starting reputation report");
    log::info!("   ├─ Addresses: {}", args.addresses.len());
    log::info!("   ├─ Concurrency: {}", args.options.max_concurrency);
    log::info!("   └─ Transaction limit: {}", args.options.transaction_limit);

    match args.fixtures.clone() {
        Some(path) => {
            let source = MemorySource::from_json_file(&path)?;
            log::info!("📂 Using {} fixtures from {}", source.len(), path.display());
            run(Arc::new(source), config, args).await
        }
        None => {
            let client = IndexerClient::new(ClientConfig::from_env()?)?;
            log::info!("🌐 Using {} indexer", client.network().as_str());
            run(Arc::new(client), config, args).await
        }
    }
}
