use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use cadence::EngineConfig;

use crate::cli::BuildCommand;
use crate::context;
use crate::output::{self, OutputFormat};

/// Execute a build command.
pub async fn run(cmd: BuildCommand, config: EngineConfig, format: OutputFormat) -> Result<()> {
    let engine = context::open_for_build(config)?;

    let mut builder = engine.builder().on_progress(|message| tracing::info!("{message}"));
    for path in &cmd.files {
        let source = engine
            .json_lines_source(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        builder = builder.source(source);
    }
    for phrase in cmd.phrases {
        builder = builder.phrase(phrase);
    }
    if cmd.sort {
        builder = builder.sort_entries(true);
    }

    // Ctrl-C stops the build between stages; the persisted snapshot is left alone.
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::SeqCst);
        }
    });
    let builder = builder.should_stop(move || interrupted.load(Ordering::SeqCst));

    let result = engine.rebuild(builder).await;
    watcher.abort();
    let snapshot = result.context("Failed to build snapshot")?;

    engine.persist().context("Failed to persist snapshot")?;
    output::print_stats(&snapshot.stats(), format)
}
