//! IPA text to pronunciation key conversion.
//!
//! Encoding normalizes the input, then tokenizes it greedily against the
//! symbol table: at each position the longest matching symbol (three, two,
//! then one character) wins. Characters that match nothing are skipped, or
//! rejected when the caller asks for strict tokenization.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};

use crate::error::{CadenceError, Result};
use crate::phoneme::key::PhonemeKey;
use crate::phoneme::symbol::{self, MAX_SYMBOL_CHARS};

/// What to do with a character sequence that has no table entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownSymbolPolicy {
    /// Drop the character, log a warning, keep going.
    #[default]
    Skip,
    /// Fail the whole pronunciation.
    Reject,
}

/// Normalize raw IPA text before tokenization.
///
/// Applies NFC, drops transcription delimiters and tie bars, folds a few
/// common ASCII and ligature spellings onto their table symbols, and
/// collapses whitespace runs into single spaces.
pub fn normalize_ipa(text: &str) -> String {
    normalize_chars(text).into_iter().map(|(ch, _)| ch).collect()
}

/// Normalized characters paired with the index of the input character each
/// one came from.
///
/// NFC runs per cluster (a base character and the combining marks after it),
/// so every output character can be traced back to its cluster's base.
fn normalize_chars(text: &str) -> Vec<(char, usize)> {
    let mut clusters: Vec<(usize, String)> = Vec::new();
    for (index, ch) in text.chars().enumerate() {
        match clusters.last_mut() {
            Some((_, cluster)) if is_combining_mark(ch) => cluster.push(ch),
            _ => clusters.push((index, ch.to_string())),
        }
    }

    let mut out = Vec::with_capacity(text.len());
    let mut pending_space = false;

    for (origin, cluster) in clusters {
        for ch in cluster.nfc() {
            match ch {
                '/' | '[' | ']' | '(' | ')' | '\u{0361}' | '\u{035C}' => continue,
                c if c.is_whitespace() => {
                    pending_space = !out.is_empty();
                    continue;
                }
                _ => {}
            }

            if pending_space {
                out.push((' ', origin));
                pending_space = false;
            }

            match ch {
                'g' => out.push(('ɡ', origin)),
                '\'' => out.push(('ˈ', origin)),
                'ʧ' => out.extend([('t', origin), ('ʃ', origin)]),
                'ʤ' => out.extend([('d', origin), ('ʒ', origin)]),
                'ʦ' => out.extend([('t', origin), ('s', origin)]),
                'ʣ' => out.extend([('d', origin), ('z', origin)]),
                c => out.push((c, origin)),
            }
        }
    }

    out
}

/// Encode IPA text into a pronunciation key, skipping unknown symbols.
///
/// Never fails; empty input gives an empty key.
pub fn encode(text: &str) -> PhonemeKey {
    let mut bytes = Vec::with_capacity(text.len());
    tokenize(text, &mut bytes, |unknown, position| {
        log::warn!("skipping unknown IPA symbol {unknown:?} at {position} in {text:?}");
        Ok(())
    })
    .map(|_| PhonemeKey::from(bytes))
    .unwrap_or_default()
}

/// Encode IPA text with an explicit unknown-symbol policy.
pub fn encode_with(text: &str, policy: UnknownSymbolPolicy) -> Result<PhonemeKey> {
    match policy {
        UnknownSymbolPolicy::Skip => Ok(encode(text)),
        UnknownSymbolPolicy::Reject => {
            let mut bytes = Vec::with_capacity(text.len());
            tokenize(text, &mut bytes, |unknown, position| {
                Err(CadenceError::UnknownSymbol {
                    symbol: unknown.to_string(),
                    position,
                })
            })?;
            Ok(PhonemeKey::from(bytes))
        }
    }
}

/// Greedy tokenization over the normalized text.
///
/// A character with no table entry is replaced by its canonical
/// decomposition when it has one, so a precomposed vowel such as `ã` keeps
/// its base and only the mark is reported. Positions passed to `on_unknown`
/// index the caller's input in characters; a mark reports its base.
fn tokenize<F>(text: &str, out: &mut Vec<u8>, mut on_unknown: F) -> Result<()>
where
    F: FnMut(char, usize) -> Result<()>,
{
    let mut chars = normalize_chars(text);
    let mut candidate = String::with_capacity(MAX_SYMBOL_CHARS * 4);
    let mut pos = 0;

    while pos < chars.len() {
        let longest = MAX_SYMBOL_CHARS.min(chars.len() - pos);
        let mut matched = None;

        for len in (1..=longest).rev() {
            candidate.clear();
            candidate.extend(chars[pos..pos + len].iter().map(|&(ch, _)| ch));
            if let Some(code) = symbol::code_of(&candidate) {
                matched = Some((code, len));
                break;
            }
        }

        if let Some((code, len)) = matched {
            out.push(code);
            pos += len;
            continue;
        }

        let (ch, origin) = chars[pos];
        let mut parts = Vec::new();
        decompose_canonical(ch, |part| parts.push((part, origin)));
        if parts.len() > 1 || parts.first().is_some_and(|&(part, _)| part != ch) {
            chars.splice(pos..pos + 1, parts);
            continue;
        }

        on_unknown(ch, origin)?;
        pos += 1;
    }

    Ok(())
}

/// Decode a key back into IPA text. Unassigned codes are dropped.
pub fn decode(key: &[u8]) -> String {
    key.iter().filter_map(|&code| symbol::text_of(code)).collect()
}
