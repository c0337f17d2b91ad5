//! Simple Gemini - command-line host for the image generation node.

mod cli;

use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use simple_gemini::config::{self, Config};
use simple_gemini::context::ServiceContext;
use simple_gemini::output::{load_image_batch, resolve_output_path, save_tensor};
use simple_gemini::params::validate_format;
use simple_gemini::{node, GenerationRequest, NodeError};

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "simple_gemini=debug" } else { "simple_gemini=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<(), NodeError> {
    if cli.describe {
        let json = serde_json::to_string_pretty(&node::descriptor())
            .map_err(|e| NodeError::Configuration(format!("Failed to serialize descriptor: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    // Load config
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path)?;

    let prompt = cli.resolve_prompt()?;

    let format = cli.format.clone().unwrap_or_else(|| config.defaults.format.clone());
    validate_format(&format)?;

    let mut request = GenerationRequest::new(
        cli.api_key.clone().or_else(|| config.keys.gemini.clone()).unwrap_or_default(),
        cli.model.clone().unwrap_or_else(|| config.defaults.model.clone()),
        prompt.clone(),
    )
    .with_proxy_url(cli.proxy_url.clone().unwrap_or_else(|| config.defaults.proxy_url.clone()))
    .with_aspect_ratio(cli.aspect_ratio.clone().unwrap_or_else(|| config.defaults.aspect_ratio.clone()))
    .with_count(cli.count.unwrap_or(config.defaults.count));

    if let Some(images) = load_image_batch(&cli.images)? {
        request = request.with_images(images);
    }

    // Create context based on mode (live / recording / replaying)
    let replay_path = std::env::var("SIMPLE_GEMINI_REPLAY").ok();
    let is_recording = std::env::var("SIMPLE_GEMINI_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        tracing::debug!(cassette = %cassette_path, "Replaying");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        tracing::debug!("Recording mode enabled");
        let (ctx, session) = ServiceContext::recording(&config);
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config), None)
    };

    let outcome = ctx.adapter().generate(&request).await;
    drop(ctx);

    // Finish recording even when generation failed
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    let (image, text) = outcome?.into_tuple();

    let output_path = resolve_output_path(cli.output.as_deref(), &prompt, &format);
    save_tensor(&image, &format, &output_path)?;
    eprintln!("Saved: {}", output_path.display());

    if !text.is_empty() {
        println!("{text}");
    }

    Ok(())
}
