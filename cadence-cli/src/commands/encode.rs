use anyhow::{Context, Result};
use cadence::EngineConfig;
use cadence::phoneme::{UnknownSymbolPolicy, encode_with};

use crate::cli::EncodeCommand;
use crate::output::{self, OutputFormat};

/// Execute an encode command. Does not touch storage.
pub fn run(cmd: EncodeCommand, config: EngineConfig, format: OutputFormat) -> Result<()> {
    let policy = if cmd.strict {
        UnknownSymbolPolicy::Reject
    } else {
        config.unknown_symbols
    };
    let key = encode_with(&cmd.ipa, policy).context("Failed to encode IPA")?;
    output::print_key(&cmd.ipa, &key, format)
}
