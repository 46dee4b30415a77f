//! Korean particle selection for names interpolated into messages.

const HANGUL_FIRST: u32 = 0xAC00;
const HANGUL_LAST: u32 = 0xD7A3;
const FINAL_CONSONANTS: u32 = 28;

/// True when the last character is a precomposed Hangul syllable with a batchim.
fn ends_with_batchim(word: &str) -> bool {
    word.chars().next_back().is_some_and(|last| {
        let code = u32::from(last);
        (HANGUL_FIRST..=HANGUL_LAST).contains(&code) && (code - HANGUL_FIRST) % FINAL_CONSONANTS > 0
    })
}

/// Object particle: `을` after a batchim, `를` otherwise (including non-Hangul).
#[must_use]
pub fn object_particle(word: &str) -> &'static str {
    if ends_with_batchim(word) { "을" } else { "를" }
}

/// Comitative particle: `과` after a batchim, `와` otherwise (including non-Hangul).
#[must_use]
pub fn comitative_particle(word: &str) -> &'static str {
    if ends_with_batchim(word) { "과" } else { "와" }
}
