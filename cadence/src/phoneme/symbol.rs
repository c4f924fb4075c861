//! The IPA symbol table.
//!
//! Each entry maps a short IPA string (one to three characters) to a single
//! byte. The byte ranges are disjoint per class:
//!
//! ```text
//! 0x00        unassigned
//! 0x01..=0x0F boundary / suprasegmental (stress, syllable break, space, length)
//! 0x10..=0x7F vowels (monophthongs, long vowels, diphthongs, triphthongs, syllabic consonants)
//! 0x80..=0xFE consonants (singles, affricates, clusters)
//! 0xFF        unassigned
//! ```
//!
//! Codes are persisted inside pronunciation keys, so a code never changes
//! meaning within a `SYMBOL_TABLE_VERSION`. New symbols go into free codes.

use ahash::AHashMap;
use lazy_static::lazy_static;

/// Version of the code assignment below. Bump when any existing code changes.
pub const SYMBOL_TABLE_VERSION: u16 = 1;

/// Longest symbol text, in characters.
pub const MAX_SYMBOL_CHARS: usize = 3;

pub const PRIMARY_STRESS: u8 = 0x01;
pub const SECONDARY_STRESS: u8 = 0x02;
pub const SYLLABLE_BREAK: u8 = 0x03;
/// Separates the words of a phrase key.
pub const SPACE: u8 = 0x04;

pub const BOUNDARY_RANGE: std::ops::RangeInclusive<u8> = 0x01..=0x0F;
pub const VOWEL_RANGE: std::ops::RangeInclusive<u8> = 0x10..=0x7F;
pub const CONSONANT_RANGE: std::ops::RangeInclusive<u8> = 0x80..=0xFE;

/// The class of a phoneme code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhonemeClass {
    Vowel,
    Consonant,
    /// Suprasegmentals, the word separator, and every unassigned code.
    Boundary,
}

/// One row of the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub text: &'static str,
    pub code: u8,
}

const fn sym(text: &'static str, code: u8) -> Symbol {
    Symbol { text, code }
}

pub static BOUNDARY_SYMBOLS: &[Symbol] = &[
    sym("ˈ", PRIMARY_STRESS),
    sym("ˌ", SECONDARY_STRESS),
    sym(".", SYLLABLE_BREAK),
    sym(" ", SPACE),
    sym("ː", 0x05),
    sym("ˑ", 0x06),
    sym("‿", 0x07),
];

pub static VOWEL_SYMBOLS: &[Symbol] = &[
    // monophthongs
    sym("i", 0x10),
    sym("y", 0x11),
    sym("ɨ", 0x12),
    sym("ʉ", 0x13),
    sym("ɯ", 0x14),
    sym("u", 0x15),
    sym("ɪ", 0x16),
    sym("ʏ", 0x17),
    sym("ʊ", 0x18),
    sym("e", 0x19),
    sym("ø", 0x1A),
    sym("ɘ", 0x1B),
    sym("ɵ", 0x1C),
    sym("ɤ", 0x1D),
    sym("o", 0x1E),
    sym("ə", 0x1F),
    sym("ɛ", 0x20),
    sym("œ", 0x21),
    sym("ɜ", 0x22),
    sym("ɞ", 0x23),
    sym("ʌ", 0x24),
    sym("ɔ", 0x25),
    sym("æ", 0x26),
    sym("ɐ", 0x27),
    sym("a", 0x28),
    sym("ɶ", 0x29),
    sym("ɑ", 0x2A),
    sym("ɒ", 0x2B),
    sym("ɚ", 0x2C),
    sym("ɝ", 0x2D),
    // long vowels
    sym("iː", 0x30),
    sym("yː", 0x31),
    sym("uː", 0x32),
    sym("eː", 0x33),
    sym("øː", 0x34),
    sym("oː", 0x35),
    sym("ɛː", 0x36),
    sym("ɜː", 0x37),
    sym("ɔː", 0x38),
    sym("æː", 0x39),
    sym("aː", 0x3A),
    sym("ɑː", 0x3B),
    sym("ɒː", 0x3C),
    sym("əː", 0x3D),
    sym("ɝː", 0x3E),
    // diphthongs
    sym("eɪ", 0x48),
    sym("aɪ", 0x49),
    sym("ɔɪ", 0x4A),
    sym("aʊ", 0x4B),
    sym("əʊ", 0x4C),
    sym("oʊ", 0x4D),
    sym("ɪə", 0x4E),
    sym("eə", 0x4F),
    sym("ʊə", 0x50),
    sym("ɛə", 0x51),
    sym("ɔə", 0x52),
    sym("ɑɪ", 0x53),
    sym("ɑʊ", 0x54),
    sym("ɛɪ", 0x55),
    sym("œɪ", 0x56),
    sym("ʌɪ", 0x57),
    sym("ɐʊ", 0x58),
    // triphthongs
    sym("aɪə", 0x60),
    sym("aʊə", 0x61),
    sym("eɪə", 0x62),
    sym("ɔɪə", 0x63),
    sym("əʊə", 0x64),
    // syllabic consonants act as syllable nuclei
    sym("n̩", 0x70),
    sym("l̩", 0x71),
    sym("m̩", 0x72),
    sym("r̩", 0x73),
    sym("ɹ̩", 0x74),
];

pub static CONSONANT_SYMBOLS: &[Symbol] = &[
    // plosives
    sym("p", 0x80),
    sym("b", 0x81),
    sym("t", 0x82),
    sym("d", 0x83),
    sym("ʈ", 0x84),
    sym("ɖ", 0x85),
    sym("c", 0x86),
    sym("ɟ", 0x87),
    sym("k", 0x88),
    sym("ɡ", 0x89),
    sym("q", 0x8A),
    sym("ɢ", 0x8B),
    sym("ʔ", 0x8C),
    // nasals
    sym("m", 0x8D),
    sym("ɱ", 0x8E),
    sym("n", 0x8F),
    sym("ɳ", 0x90),
    sym("ɲ", 0x91),
    sym("ŋ", 0x92),
    sym("ɴ", 0x93),
    // trills, taps
    sym("ʙ", 0x94),
    sym("r", 0x95),
    sym("ʀ", 0x96),
    sym("ⱱ", 0x97),
    sym("ɾ", 0x98),
    sym("ɽ", 0x99),
    // fricatives
    sym("ɸ", 0x9A),
    sym("β", 0x9B),
    sym("f", 0x9C),
    sym("v", 0x9D),
    sym("θ", 0x9E),
    sym("ð", 0x9F),
    sym("s", 0xA0),
    sym("z", 0xA1),
    sym("ʃ", 0xA2),
    sym("ʒ", 0xA3),
    sym("ʂ", 0xA4),
    sym("ʐ", 0xA5),
    sym("ç", 0xA6),
    sym("ʝ", 0xA7),
    sym("x", 0xA8),
    sym("ɣ", 0xA9),
    sym("χ", 0xAA),
    sym("ʁ", 0xAB),
    sym("ħ", 0xAC),
    sym("ʕ", 0xAD),
    sym("h", 0xAE),
    sym("ɦ", 0xAF),
    sym("ɬ", 0xB0),
    sym("ɮ", 0xB1),
    sym("ɕ", 0xB2),
    sym("ʑ", 0xB3),
    // approximants
    sym("ʋ", 0xB4),
    sym("ɹ", 0xB5),
    sym("ɻ", 0xB6),
    sym("j", 0xB7),
    sym("ɰ", 0xB8),
    sym("l", 0xB9),
    sym("ɭ", 0xBA),
    sym("ʎ", 0xBB),
    sym("ʟ", 0xBC),
    sym("w", 0xBD),
    sym("ʍ", 0xBE),
    sym("ɥ", 0xBF),
    sym("ɫ", 0xC0),
    // implosives
    sym("ɓ", 0xC1),
    sym("ɗ", 0xC2),
    sym("ʄ", 0xC3),
    sym("ɠ", 0xC4),
    sym("ʛ", 0xC5),
    // clicks
    sym("ʘ", 0xC6),
    sym("ǀ", 0xC7),
    sym("ǃ", 0xC8),
    sym("ǂ", 0xC9),
    sym("ǁ", 0xCA),
    // affricates
    sym("tʃ", 0xD0),
    sym("dʒ", 0xD1),
    sym("ts", 0xD2),
    sym("dz", 0xD3),
    sym("tɕ", 0xD4),
    sym("dʑ", 0xD5),
    sym("pf", 0xD6),
    sym("tɬ", 0xD7),
    // aspirated and labialized clusters
    sym("pʰ", 0xE0),
    sym("tʰ", 0xE1),
    sym("kʰ", 0xE2),
    sym("kʷ", 0xE3),
    sym("ɡʷ", 0xE4),
    sym("tʃʰ", 0xE5),
];

lazy_static! {
    static ref TEXT_TO_CODE: AHashMap<&'static str, u8> = all_symbols()
        .map(|symbol| (symbol.text, symbol.code))
        .collect();
    static ref CODE_TO_TEXT: [Option<&'static str>; 256] = {
        let mut table = [None; 256];
        for symbol in all_symbols() {
            table[symbol.code as usize] = Some(symbol.text);
        }
        table
    };
    static ref CODE_CLASS: [PhonemeClass; 256] = {
        let mut table = [PhonemeClass::Boundary; 256];
        for symbol in all_symbols() {
            table[symbol.code as usize] = range_class(symbol.code);
        }
        table
    };
}

fn range_class(code: u8) -> PhonemeClass {
    if VOWEL_RANGE.contains(&code) {
        PhonemeClass::Vowel
    } else if CONSONANT_RANGE.contains(&code) {
        PhonemeClass::Consonant
    } else {
        PhonemeClass::Boundary
    }
}

/// Iterate every row of the table.
pub fn all_symbols() -> impl Iterator<Item = &'static Symbol> {
    BOUNDARY_SYMBOLS
        .iter()
        .chain(VOWEL_SYMBOLS)
        .chain(CONSONANT_SYMBOLS)
}

/// Look up the code for an exact symbol text.
#[inline]
pub fn code_of(text: &str) -> Option<u8> {
    TEXT_TO_CODE.get(text).copied()
}

/// Look up the symbol text for a code. Unassigned codes return `None`.
#[inline]
pub fn text_of(code: u8) -> Option<&'static str> {
    CODE_TO_TEXT[code as usize]
}

/// Classify a code. Total over all byte values.
#[inline]
pub fn classify(code: u8) -> PhonemeClass {
    CODE_CLASS[code as usize]
}

#[inline]
pub fn is_vowel(code: u8) -> bool {
    classify(code) == PhonemeClass::Vowel
}

#[inline]
pub fn is_consonant(code: u8) -> bool {
    classify(code) == PhonemeClass::Consonant
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashSet;

    #[test]
    fn test_codes_and_texts_are_unique() {
        let mut codes = AHashSet::new();
        let mut texts = AHashSet::new();
        for symbol in all_symbols() {
            assert!(codes.insert(symbol.code), "duplicate code {:#04x}", symbol.code);
            assert!(texts.insert(symbol.text), "duplicate text {:?}", symbol.text);
        }
    }

    #[test]
    fn test_codes_sit_in_their_class_range() {
        for symbol in BOUNDARY_SYMBOLS {
            assert!(BOUNDARY_RANGE.contains(&symbol.code), "{:?}", symbol);
            assert_eq!(classify(symbol.code), PhonemeClass::Boundary);
        }
        for symbol in VOWEL_SYMBOLS {
            assert_eq!(classify(symbol.code), PhonemeClass::Vowel, "{:?}", symbol);
        }
        for symbol in CONSONANT_SYMBOLS {
            assert_eq!(classify(symbol.code), PhonemeClass::Consonant, "{:?}", symbol);
        }
    }

    #[test]
    fn test_symbol_lengths() {
        for symbol in all_symbols() {
            let chars = symbol.text.chars().count();
            assert!((1..=MAX_SYMBOL_CHARS).contains(&chars), "{:?}", symbol);
        }
    }

    #[test]
    fn test_classify_is_total() {
        for code in 0..=255u8 {
            let class = classify(code);
            if text_of(code).is_none() {
                assert_eq!(class, PhonemeClass::Boundary);
            }
        }
        assert_eq!(classify(0x00), PhonemeClass::Boundary);
        assert_eq!(classify(0xFF), PhonemeClass::Boundary);
        // inside the vowel range but unassigned
        assert_eq!(classify(0x2F), PhonemeClass::Boundary);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(code_of("æ"), Some(0x26));
        assert_eq!(code_of("tʃ"), Some(0xD0));
        assert_eq!(code_of("g"), None);
        assert_eq!(text_of(SPACE), Some(" "));
        assert_eq!(text_of(0x00), None);
    }
}
