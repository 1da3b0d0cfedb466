use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

use sp_core::Result;
use sp_scrapers::Pipeline;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Store backend: memory, supabase, or sqlite
    #[arg(long, default_value = "supabase")]
    store: String,

    /// Report model: gemini or dummy
    #[arg(long, default_value = "gemini")]
    model: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Ingest every source into the store
    Run,
    /// Ingest a single source (e.g. techcrunch)
    Fetch { source: String },
    /// List the registered sources
    Sources,
    /// Snapshot stored articles as a new export batch
    Export,
    /// Run the full automation: delete, ingest, export, report
    Report,
    /// Delete all stored articles and exports
    Delete,
    /// List generated reports
    Reports,
    /// Serve the HTTP control surface
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let store = sp_storage::create_store(&cli.store).await?;
    info!("💾 store initialized (using {})", cli.store);

    let model = sp_report::create_model(&cli.model)?;
    info!("🧠 report model initialized (using {})", model.name());

    let pipeline = Pipeline::with_http_renderer(store.clone(), model)?;

    match cli.command {
        Commands::Run => {
            let summary = pipeline.run_all().await;
            print_summary(&summary);
        }
        Commands::Fetch { source } => {
            let stats = pipeline.run_source(&source).await?;
            println!(
                "{}: fetched {}, parsed {}, saved {}, skipped {}",
                stats.source, stats.fetched, stats.parsed, stats.saved, stats.skipped
            );
        }
        Commands::Sources => {
            for source in pipeline.sources() {
                println!("{source}");
            }
        }
        Commands::Export => {
            let count = pipeline.export_latest().await?;
            println!("exported {count} articles");
        }
        Commands::Report => {
            let (summary, report) = pipeline.run_full_report().await?;
            print_summary(&summary);
            println!("report generated: {}", report.name);
        }
        Commands::Delete => {
            store.delete_all().await?;
            println!("all articles deleted");
        }
        Commands::Reports => {
            for report in store.list_reports().await? {
                let created = report
                    .created_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_default();
                println!("{created}  {}", report.name);
            }
        }
        Commands::Serve { port } => {
            let port = port
                .or_else(|| {
                    std::env::var("PORT")
                        .ok()
                        .and_then(|value| value.parse().ok())
                })
                .unwrap_or(3000);
            sp_web::serve(sp_web::AppState::new(pipeline), port).await?;
        }
    }

    Ok(())
}

fn print_summary(summary: &sp_core::RunSummary) {
    println!("\nsummary:");
    for stats in &summary.sources {
        if stats.failed {
            println!("  {:<16} FAILED", stats.source);
        } else {
            println!(
                "  {:<16} fetched {:>3}  parsed {:>3}  saved {:>3}  skipped {:>3}",
                stats.source, stats.fetched, stats.parsed, stats.saved, stats.skipped
            );
        }
    }
    println!("total saved: {}", summary.total_saved());
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}
