//! CLI entrypoint for captionkit
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use captionkit_application::{
    AnalyzeInput, AnalyzeResourceUseCase, EncoderCache, FetchCreditsUseCase, NoResultLogger,
    PollJobsUseCase, ResultLogger, SubmitJobUseCase, TokioPacer,
};
use captionkit_domain::{AnalysisRequest, Feature, FeatureSet, Role};
use captionkit_infrastructure::{
    ConfigLoader, FileConfig, FsResourceSource, HttpAnalysisService, JsonlResultLogger,
};
use captionkit_presentation::{
    Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress, user_message,
};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow!("failed to load configuration: {}", e))?;
    config.validate().context("invalid configuration")?;

    info!("Starting captionkit against {}", config.service.endpoint);

    // === Dependency Injection ===
    let client_config = config.client_config();
    let service = Arc::new(HttpAnalysisService::new(
        config.service.endpoint.clone(),
        config.timeout(),
    )?);

    if cli.credits {
        let credits = FetchCreditsUseCase::new(Arc::clone(&service), client_config)
            .execute()
            .await
            .map_err(|e| anyhow!(user_message(&e)))?;
        println!(
            "{}",
            ConsoleFormatter::format_credits(credits, cli.output == OutputFormat::Json)
        );
        return Ok(());
    }

    let source = Arc::new(FsResourceSource);
    let encoder = Arc::new(EncoderCache::new(Arc::clone(&source)));
    let submitter = SubmitJobUseCase::new(
        Arc::clone(&service),
        source,
        encoder,
        client_config.clone(),
    );
    let poller = PollJobsUseCase::new(
        Arc::clone(&service),
        Arc::new(TokioPacer),
        client_config,
        config.poll_params(),
    );
    let use_case = AnalyzeResourceUseCase::new(submitter, poller, result_logger(&cli, &config));

    let max_length = cli.max_length.unwrap_or(config.analysis.max_length);
    let mut failed = 0;

    for (index, file) in cli.files.iter().enumerate() {
        let mut input = AnalyzeInput::new(build_requests(&cli, &config, file)?);
        if let Some(max_rounds) = cli.max_rounds {
            input = input.with_max_rounds(max_rounds);
        }

        let batch = if cli.quiet {
            use_case.execute(input).await
        } else if std::io::stderr().is_terminal() {
            let progress = ProgressReporter::new(file.display().to_string());
            let batch = use_case.execute_with_progress(input, &progress).await;
            progress.finish();
            batch
        } else {
            use_case.execute_with_progress(input, &SimpleProgress).await
        };

        let output = match cli.output {
            OutputFormat::Text => ConsoleFormatter::format(file, &batch, max_length),
            OutputFormat::Json => ConsoleFormatter::format_json(file, &batch, max_length),
        };
        println!("{}", output);

        failed += batch.outcomes.len() - batch.success_count();

        if batch.credits_exhausted() {
            let remaining = cli.files.len() - index - 1;
            warn!("Account is out of credits, skipping {} remaining file(s)", remaining);
            bail!("stopped: the account is out of credits");
        }
    }

    if failed > 0 {
        bail!("{} job(s) failed", failed);
    }
    Ok(())
}

/// One request per role, or a single request when a custom prompt is given
fn build_requests(
    cli: &Cli,
    config: &FileConfig,
    file: &Path,
) -> Result<Vec<(String, AnalysisRequest)>> {
    let features = cli
        .feature
        .iter()
        .map(|name| name.parse::<Feature>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow!("{}", e))?;
    let features = FeatureSet::new(features);
    let language = cli
        .language
        .clone()
        .unwrap_or_else(|| config.analysis.language.clone());

    let request = |role: Role| {
        AnalysisRequest::new(file, role)
            .with_language(language.clone())
            .with_backend(cli.backend.clone())
            .with_features(features.clone())
    };

    if let Some(prompt) = cli.prompt.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(vec![(
            "prompt".to_string(),
            request(Role::default()).with_custom_prompt(prompt),
        )]);
    }

    let roles: Vec<Role> = if cli.role.is_empty() {
        config.analysis.roles.clone()
    } else {
        cli.role
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect()
    };
    if roles.is_empty() {
        bail!("no roles requested; pass --role or set [analysis] roles");
    }

    Ok(roles
        .into_iter()
        .map(|role| (role.as_str().to_string(), request(role)))
        .collect())
}

fn result_logger(cli: &Cli, config: &FileConfig) -> Arc<dyn ResultLogger> {
    let path = cli.results_log.as_ref().or(config.log.results_path.as_ref());
    match path.and_then(JsonlResultLogger::open) {
        Some(logger) => {
            info!("Logging job results to {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoResultLogger),
    }
}
