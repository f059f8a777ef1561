use clap::Parser;
use postcode_boundary::app::{cancel_on_ctrl_c, print_outcome, run_resolution};
use postcode_boundary::utils::{logger, validation::Validate};
use postcode_boundary::{CancellationToken, CliConfig};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting postcode-boundary");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    match run_resolution(&config, &config.postcode, &cancel).await {
        Ok(outcome) => print_outcome(&outcome),
        Err(e) => {
            tracing::error!(
                "❌ Resolution failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}
