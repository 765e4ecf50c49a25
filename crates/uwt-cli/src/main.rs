use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod collect;
mod predict;

#[derive(Debug, Parser)]
#[command(name = "uwt-cli")]
#[command(about = "USCIS processing-time snapshot collector and wait-window resolver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Archive today's processing-time snapshots for the configured forms
    Collect {
        /// Restrict collection to a single form code from the catalog
        #[arg(long)]
        form: Option<String>,

        /// Continue past per-office failures and report a summary at the end
        #[arg(long)]
        keep_going: bool,

        /// Append normalized wait-time records to this file as JSON Lines
        #[arg(long)]
        records: Option<PathBuf>,

        /// Print what would be collected without any network calls
        #[arg(long)]
        dry_run: bool,
    },
    /// Project completion windows for the applications in a JSON file
    Predict {
        /// Path to the applications JSON file
        applications: PathBuf,
    },
    /// Print the configured form catalog
    Forms {
        /// Fetch and print the upstream form listing instead
        #[arg(long)]
        remote: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = uwt_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Collect {
            form,
            keep_going,
            records,
            dry_run,
        } => {
            collect::run_collect(
                &config,
                form.as_deref(),
                keep_going,
                records.as_deref(),
                dry_run,
            )
            .await
        }
        Commands::Predict { applications } => predict::run_predict(&config, &applications).await,
        Commands::Forms { remote } => run_forms(&config, remote).await,
    }
}

/// Print the configured catalog, or with `--remote` the raw upstream form
/// listing (the configured list stays authoritative for collection runs).
async fn run_forms(config: &uwt_core::AppConfig, remote: bool) -> anyhow::Result<()> {
    if remote {
        let client = uwt_egov::EgovClient::new(
            &config.base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        let payload = client.get_forms().await?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let catalog = uwt_core::FormCatalog::load_or_builtin(&config.forms_path)?;
    for form in &catalog.forms {
        println!("{form}");
    }
    Ok(())
}
