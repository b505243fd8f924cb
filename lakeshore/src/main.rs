use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::serve::ServeArgs;

mod error;
mod serve;

#[derive(Parser)]
#[command(name = "lakeshore")]
#[command(about = "Turn bucket notifications into Parquet files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the notification endpoint
    Serve {
        #[clap(flatten)]
        inner: ServeArgs,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    lakeshore_observability::init_observability();

    let ct = CancellationToken::new();

    let ct_clone = ct.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        ct_clone.cancel();
    });

    let result = match cli.command {
        Commands::Serve { inner } => inner.run(ct).await,
    };

    if let Err(err) = result {
        tracing::error!(error = %snafu::Report::from_error(&err), "lakeshore failed");
        std::process::exit(err.kind().exit_code());
    }
}
