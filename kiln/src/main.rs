#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::io::Write;

use args::Args;
use clap::Parser;
use futures_util::StreamExt;
use kiln_config::Config;
use kiln_llm::{LanguageModel, OllamaLanguageModel, Prompt, Response};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };
    args.apply(&mut config.ollama);
    config.validate()?;

    // Initialize telemetry
    kiln_telemetry::init(&config.telemetry)?;

    tracing::info!(url = %config.ollama.url, model = %config.ollama.model, stream = args.stream, "starting kiln");

    let prompt = if args.json {
        Prompt::Json(serde_json::from_str(&args.prompt).map_err(|e| anyhow::anyhow!("prompt is not valid JSON: {e}"))?)
    } else {
        Prompt::Text(args.prompt.clone())
    };

    let model = OllamaLanguageModel::new(&config.ollama);

    // Stop waiting on the model when interrupted
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            shutdown_clone.cancel();
        }
    });

    let finished = if args.stream {
        stream(&model, prompt, args.system.as_deref(), &shutdown).await?
    } else {
        tokio::select! {
            () = shutdown.cancelled() => None,
            response = model.generate_text(prompt, args.system.as_deref()) => {
                let response = response?;
                println!("{}", response.text());
                Some(response)
            }
        }
    };

    if let Some(usage) = finished.as_ref().and_then(Response::usage) {
        eprintln!(
            "tokens: {} in, {} out, {} total",
            usage.input_tokens(),
            usage.output_tokens(),
            usage.total_tokens()
        );
    }

    Ok(())
}

/// Print each newly generated fragment, returning the terminal response
///
/// Returns `None` if interrupted; dropping the stream closes the connection.
async fn stream(
    model: &OllamaLanguageModel,
    prompt: Prompt,
    system: Option<&str>,
    shutdown: &CancellationToken,
) -> anyhow::Result<Option<Response>> {
    let mut responses = model.stream_text(prompt, system);
    let mut stdout = std::io::stdout().lock();
    let mut printed = 0;

    loop {
        let response = tokio::select! {
            () = shutdown.cancelled() => {
                writeln!(stdout)?;
                return Ok(None);
            }
            next = responses.next() => match next {
                Some(response) => response?,
                None => return Ok(None),
            },
        };

        let text = response.text();
        write!(stdout, "{}", text.get(printed..).unwrap_or_default())?;
        stdout.flush()?;
        printed = text.len();

        if response.is_finished() {
            writeln!(stdout)?;
            return Ok(Some(response));
        }
    }
}
