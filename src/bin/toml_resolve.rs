use anyhow::Context;
use clap::Parser;
use postcode_boundary::app::{cancel_on_ctrl_c, print_outcome, run_batch};
use postcode_boundary::core::hierarchy;
use postcode_boundary::utils::{logger, validation::Validate};
use postcode_boundary::{
    BoundaryResolver, CancellationToken, NominatimClient, ResolverSettings, TomlConfig,
};

#[derive(Parser)]
#[command(name = "toml-resolve")]
#[command(about = "Resolve UK postcodes to boundaries using a TOML configuration")]
struct Args {
    /// Postcodes to resolve, one after another
    #[arg(required = true)]
    postcodes: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, default_value = "postcode-boundary.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the output directory from config
    #[arg(long)]
    output_path: Option<String>,

    /// Override the pause between fragment queries
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Show the fragment hierarchy without querying
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    if config.json_logs() {
        logger::init_json_logger(if args.verbose { "debug" } else { config.log_level() });
    } else {
        logger::init_cli_logger(args.verbose || config.log_level() == "debug");
    }

    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // command line overrides
    if let Some(path) = args.output_path {
        tracing::info!("🔧 Output path overridden to: {}", path);
        config.output = Some(postcode_boundary::config::toml_config::OutputConfig { path });
    }
    if let Some(delay_ms) = args.delay_ms {
        tracing::info!("🔧 Query delay overridden to: {}ms", delay_ms);
        config.pacing = Some(postcode_boundary::config::toml_config::PacingConfig {
            delay_ms: Some(delay_ms),
        });
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no search requests will be sent");
        let resolver = BoundaryResolver::new(
            NominatimClient::from_config(&config),
            ResolverSettings::from_config(&config),
        );
        for postcode in &args.postcodes {
            println!("{}:", postcode);
            for fragment in hierarchy::generate(postcode) {
                println!("  {}", resolver.query_for(&fragment));
            }
        }
        return Ok(());
    }

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let failures = run_batch(&config, &args.postcodes, &cancel, |postcode, outcome| match outcome {
        Ok(outcome) => print_outcome(outcome),
        Err(e) => {
            tracing::error!(
                "❌ {}: {} (Category: {:?}, Severity: {:?})",
                postcode,
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}: {}", postcode, e.user_friendly_message());
        }
    })
    .await;

    if failures > 0 {
        anyhow::bail!("{} of {} postcode(s) could not be resolved", failures, args.postcodes.len());
    }
    Ok(())
}
