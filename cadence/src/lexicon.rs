//! Lexicon entries, senses, tags and the store that addresses them.
//!
//! # Module Structure
//!
//! - `tag`: closed enumerations for rarity, part of speech and register
//! - `entry`: [`Entry`] and [`Sense`]
//! - `store`: [`LexiconStore`] with stable global sense addressing

pub mod entry;
pub mod store;
pub mod tag;

pub use entry::{Entry, Sense};
pub use store::{LexiconStore, SenseAddress};
pub use tag::{PartOfSpeech, Rarity, Register, RegisterTag};
