//! `run` command
//!
//! Plays one game over stdin/stdout. Closing stdin or pressing Ctrl+C ends
//! the game early; a second Ctrl+C exits immediately.

use std::sync::Arc;
use crate::cli::args::RunArgs;
use crate::config;
use crate::engine::{ChannelNotifier, EngineOptions, GameEngine};
use crate::error::{ExitCode, KillwordError};
use crate::observability::{EventEmitter, init_metrics};
use crate::transport::{self, Roster, StdioConfig};

/// Play a game.
///
/// # Errors
///
/// Returns a config error if the game file is unusable, an I/O error if
/// the event file cannot be created or the metrics listener cannot bind,
/// and an engine error if the game cannot start.
pub async fn run(args: &RunArgs) -> Result<(), KillwordError> {
    if let Some(port) = args.metrics_port {
        init_metrics(Some(port))?;
        tracing::info!(port, "Prometheus metrics endpoint started");
    }

    tracing::info!(config = %args.config.display(), "loading configuration");
    let cfg = config::load(&args.config)?;
    let game = cfg.build_game()?;
    let roster = Arc::new(Roster::from_game(&game));

    let events = args
        .events
        .as_deref()
        .map(EventEmitter::from_file)
        .transpose()?;

    let (notifier, notices) = ChannelNotifier::new();
    let engine = Arc::new(GameEngine::new(EngineOptions {
        lang: cfg.lang(),
        notifier: Arc::new(notifier),
        delay: cfg.attack_delay.provider()?,
        events,
    }));

    let output = tokio::spawn(transport::write_notices(notices, tokio::io::stdout()));

    let input = {
        let engine = Arc::clone(&engine);
        let roster = Arc::clone(&roster);
        tokio::spawn(async move {
            let config = StdioConfig::from_env();
            if let Err(e) =
                transport::feed_utterances(tokio::io::stdin(), config, &engine, &roster).await
            {
                tracing::warn!(error = %e, "failed reading stdin");
            }
            // Input ran dry; stop the game as soon as there is one to stop.
            engine.wait_started().await;
            engine.quit();
        })
    };

    let interrupt = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            eprintln!("\nEnding the game... (press Ctrl+C again to force)");
            engine.quit();
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(ExitCode::INTERRUPTED);
            }
        })
    };

    let result = engine.run(game).await;

    input.abort();
    interrupt.abort();
    let _ = input.await;
    let _ = interrupt.await;
    // The notifier lives in the engine; dropping the last handle closes
    // the notice channel so the writer drains and exits.
    drop(engine);
    match output.await {
        Ok(Err(e)) => tracing::warn!(error = %e, "failed writing stdout"),
        Err(e) => tracing::warn!(error = %e, "output task failed"),
        Ok(Ok(())) => {}
    }

    let report = result?;
    tracing::info!(survivors = ?report.survivors, quit = report.quit, "game over");
    Ok(())
}
