//! Phoneme codec: IPA text to compact byte keys and back.
//!
//! # Module Structure
//!
//! - `symbol`: the fixed symbol table and code classification
//! - `codec`: normalization, greedy tokenization and decoding
//! - `key`: [`PhonemeKey`] and its sub-key operations

pub mod codec;
pub mod key;
pub mod symbol;

pub use codec::{UnknownSymbolPolicy, decode, encode, encode_with, normalize_ipa};
pub use key::PhonemeKey;
pub use symbol::{PhonemeClass, SPACE, SYMBOL_TABLE_VERSION, classify};
