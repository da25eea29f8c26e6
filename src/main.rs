//! Startup Profit - Main Entry Point
//!
//! Serves the prediction API by default; `train`, `predict` and `info` run
//! offline against the model artifact.

use clap::Parser;
use startup_profit::cli::{cmd_info, cmd_predict, cmd_serve, cmd_train, Cli, Commands};
use startup_profit::schema::PredictRequest;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "startup_profit=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Train { data, model_out, meta_out, trees }) => {
            cmd_train(data, model_out, meta_out, trees)?;
        }
        Some(Commands::Predict { rd_spend, administration, marketing_spend, state, model }) => {
            let request = PredictRequest::new(rd_spend, administration, marketing_spend, state);
            cmd_predict(request, model)?;
        }
        Some(Commands::Info { meta }) => {
            cmd_info(meta)?;
        }
        Some(Commands::Serve { host, port }) => {
            cmd_serve(host, port).await?;
        }
        None => {
            cmd_serve(None, None).await?;
        }
    }

    Ok(())
}
