use clap::Parser;
use sdp_draw::config::cli::prompt_stdin;
use sdp_draw::config::toml_config::{DrawConfig, LogFormat};
use sdp_draw::utils::error::{DrawError, ErrorSeverity};
use sdp_draw::utils::{logger, validation::Validate};
use sdp_draw::{CliConfig, DrawPipeline, DrawRunner, DrawSettings, LocalStorage};

fn exit_code(e: &DrawError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: DrawError) -> ! {
    tracing::error!(
        "❌ Draw failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let file_config = match cli.config.as_deref().map(DrawConfig::from_file).transpose() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    match file_config.as_ref().map(DrawConfig::log_format) {
        Some(LogFormat::Json) => logger::init_json_logger(cli.verbose),
        _ => logger::init_cli_logger(cli.verbose),
    }

    tracing::info!("Starting sdp-draw");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Some(config) = &file_config {
        if let Err(e) = config.validate() {
            fail(e);
        }
    }

    let settings = match DrawSettings::from_sources(&cli, file_config.as_ref(), prompt_stdin) {
        Ok(settings) => settings,
        Err(e) => fail(e),
    };

    if let Err(e) = settings.validate() {
        fail(e);
    }

    let donator_file = settings.donator_file.clone();
    let junior_file = settings.junior_file.clone();
    let dry_run = settings.dry_run;

    let storage = LocalStorage::new(".".to_string());
    let pipeline = DrawPipeline::new(storage, settings);
    let runner = DrawRunner::with_dry_run(pipeline, dry_run);

    match runner.run().await {
        Ok(summary) => {
            tracing::info!(
                "✅ {} matched, {} without a match, {} unknown bull names (seed {})",
                summary.outcome.matched,
                summary.outcome.unmatched,
                summary.warnings,
                summary.outcome.seed
            );
            match summary.output_path {
                Some(path) => println!(
                    "draw complete, see {} and {} in {} for results",
                    donator_file, junior_file, path
                ),
                None => println!("dry run complete, no result files written"),
            }
        }
        Err(e) => fail(e),
    }

    Ok(())
}
