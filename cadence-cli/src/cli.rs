use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// Cadence - phonetic rhyme engine CLI
#[derive(Parser)]
#[command(name = "cadence", version, about)]
pub struct Cli {
    /// Path to the data directory.
    #[arg(long, env = "CADENCE_DATA_DIR", default_value = "./cadence_data")]
    pub data_dir: PathBuf,

    /// Engine configuration TOML. Defaults to `cadence.toml` in the data directory when present.
    #[arg(long, env = "CADENCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a snapshot from JSON Lines lexicon files and persist it.
    Build(BuildCommand),
    /// Find rhymes for a word or phrase.
    Rhymes(RhymesCommand),
    /// Encode IPA text and show the resulting phoneme codes.
    Encode(EncodeCommand),
    /// Show statistics for the persisted snapshot.
    Stats,
}

#[derive(Parser)]
pub struct BuildCommand {
    /// JSON Lines files, one entry per line.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Phrases to synthesize from single-word entries and store.
    #[arg(long = "phrase")]
    pub phrases: Vec<String>,

    /// Sort entries lexicographically before indexing.
    #[arg(long)]
    pub sort: bool,
}

#[derive(Parser)]
pub struct RhymesCommand {
    /// Word or phrase to rhyme.
    pub token: String,

    /// Rhyme type: `perfect` or `vowel-only`.
    #[arg(long = "type", default_value = "perfect")]
    pub rhyme_type: String,

    /// Only keep senses with this many syllables (0 = any).
    #[arg(long, default_value_t = 0)]
    pub syllables: usize,

    /// Only keep senses with one of these parts of speech.
    #[arg(long = "pos")]
    pub parts_of_speech: Vec<String>,

    /// Only keep senses matching one of these rarities or register tags.
    #[arg(long = "register")]
    pub registers: Vec<String>,

    /// Leave the queried token out of the results.
    #[arg(long)]
    pub exclude_self: bool,
}

#[derive(Parser)]
pub struct EncodeCommand {
    /// IPA transcription, e.g. "ˈkætəlɔɡ".
    pub ipa: String,

    /// Fail on symbols missing from the table instead of skipping them.
    #[arg(long)]
    pub strict: bool,
}
