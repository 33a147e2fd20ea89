use clap::Parser;
use secret_santa::config::LogFormat;
use secret_santa::utils::error::{ErrorSeverity, Result};
use secret_santa::utils::{logger, validation::Validate};
use secret_santa::{
    AssignmentEngine, CliConfig, ConsoleSender, Credentials, FamilyData, MessageSender, Notifier,
    NotificationStatus, RunSummary, SantaConfig, SantaEngine, TextMagicClient,
};
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("🎅 Starting secret-santa");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let exit_code = match run(&cli).await {
        Ok(summary) => report(&summary, &cli),
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            if e.severity() >= ErrorSeverity::High {
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            }

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            e.exit_code()
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: &CliConfig) -> Result<RunSummary> {
    let mut config = SantaConfig::load_or_default(&cli.config)?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    tracing::info!("📁 Loading families from: {}", cli.families);
    let data = FamilyData::from_file(&cli.families)?;
    for person in data.missing_contacts() {
        tracing::warn!("⚠️ No phone number for {}, they will not be notified", person);
    }

    let assigner = match config.assignment.seed {
        Some(seed) => AssignmentEngine::seeded(seed),
        None => AssignmentEngine::from_entropy(),
    }
    .with_strategy(config.assignment.strategy)
    .with_max_attempts(config.assignment.max_attempts);

    let (sender, delay): (Box<dyn MessageSender>, Duration) = if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no messages will be sent");
        (Box::new(ConsoleSender::new()), Duration::ZERO)
    } else {
        let credentials = Credentials::from_file(&cli.credentials)?;
        credentials.validate()?;
        tracing::info!("🔑 Credentials loaded for {}", credentials.username());

        let client =
            TextMagicClient::new(credentials, &config.provider.base_url, config.timeout())?;
        (Box::new(client), config.delay())
    };

    let notifier = Notifier::new(sender)
        .with_template(config.template())
        .with_delay(delay);
    let mut engine = SantaEngine::new(assigner, notifier);

    engine.run(&data.families, &data.phonenumbers).await
}

fn report(summary: &RunSummary, cli: &CliConfig) -> i32 {
    if cli.dry_run {
        println!("🎁 Results:");
        for result in summary.revealed(&cli.reveal) {
            println!("  {} is secret santa for {}", result.giver, result.recipient);
        }
        println!("{}", summary.headline(true));
    } else if summary.all_sent() {
        println!("{}", summary.headline(false));
    }

    if !summary.all_sent() {
        eprintln!(
            "⚠️ {} of {} notifications failed:",
            summary.failed(),
            summary.results.len()
        );
        for result in summary.failures() {
            if let NotificationStatus::Failed(reason) = &result.status {
                eprintln!("  ❌ {}: {}", result.giver, reason);
            }
        }
    }

    summary.exit_code(cli.strict_delivery)
}
