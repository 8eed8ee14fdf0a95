mod jobs;

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "startify")]
#[command(about = "Turn a startup idea into brand assets, research, and a pitch deck")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Submit an idea, wait for the job to finish, and print its results
    Run {
        /// Who is submitting the idea (email or user id)
        #[arg(long)]
        requester: String,
        /// Free-form idea text
        idea: String,
        /// Status polling interval in milliseconds
        #[arg(long, default_value_t = 500)]
        poll_ms: u64,
    },
    /// Print the status and progress of a job
    Status {
        job_id: String,
    },
    /// Print the results of a completed job as JSON
    Results {
        job_id: String,
    },
    /// Structure an idea and print it without running the pipeline
    Structure {
        idea: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = startify_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Run {
            requester,
            idea,
            poll_ms,
        }) => jobs::run_idea(&config, &requester, &idea, Duration::from_millis(poll_ms)).await?,
        Some(Commands::Status { job_id }) => jobs::run_status(&config, &job_id).await?,
        Some(Commands::Results { job_id }) => jobs::run_results(&config, &job_id).await?,
        Some(Commands::Structure { idea }) => jobs::run_structure(&config, &idea).await?,
        None => println!("startify: pass --help to list commands"),
    }

    Ok(())
}
