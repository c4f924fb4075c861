use anyhow::Result;
use cadence::EngineConfig;

use crate::context;
use crate::output::{self, OutputFormat};

/// Execute a stats command.
pub fn run(config: EngineConfig, format: OutputFormat) -> Result<()> {
    let engine = context::open_existing(config)?;
    output::print_stats(&engine.stats(), format)
}
