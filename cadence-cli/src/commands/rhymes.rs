use anyhow::{Context, Result};
use cadence::{EngineConfig, PartOfSpeech, Register, RhymeQuery, RhymeType};

use crate::cli::RhymesCommand;
use crate::context;
use crate::output::{self, OutputFormat};

/// Execute a rhymes command.
pub fn run(cmd: RhymesCommand, config: EngineConfig, format: OutputFormat) -> Result<()> {
    let engine = context::open_existing(config)?;

    let rhyme_type: RhymeType = cmd.rhyme_type.parse().context("Invalid --type")?;
    let parts_of_speech = cmd
        .parts_of_speech
        .iter()
        .map(|pos| pos.parse::<PartOfSpeech>())
        .collect::<cadence::Result<Vec<_>>>()
        .context("Invalid --pos")?;
    let registers = cmd
        .registers
        .iter()
        .map(|register| register.parse::<Register>())
        .collect::<cadence::Result<Vec<_>>>()
        .context("Invalid --register")?;

    let query = RhymeQuery::builder()
        .rhyme_type(rhyme_type)
        .syllables(cmd.syllables)
        .parts_of_speech(parts_of_speech)
        .registers(registers)
        .exclude_query(cmd.exclude_self)
        .build();

    let rhymes = engine.get_rhymes(&cmd.token, &query);
    output::print_rhymes(&cmd.token, &rhymes, &query, format)
}
