//! Phrase-table extractors that turn a transmission into `ParsedIntent`s.
//!
//! Every extractor scans the same token view (`scan_tokens`), so trigger
//! positions from different extractors are comparable and the merged list can
//! be ordered by where each instruction was spoken.

pub mod altitude;
pub mod clearance;
pub mod frequency;
pub mod runway;
pub mod taxi;

use aviation_helper_rs::clearance::intent::ParsedIntent;

use crate::vocabulary::scan_tokens;

/// An intent and the token index of the phrase that triggered it.
pub type Positioned = (usize, ParsedIntent);

/// Whether `phrase` starts at `tokens[idx]`.
pub(crate) fn phrase_at(tokens: &[String], idx: usize, phrase: &[&str]) -> bool {
    tokens.len() >= idx + phrase.len()
        && tokens[idx..idx + phrase.len()]
            .iter()
            .zip(phrase)
            .all(|(t, p)| t == p)
}

pub(crate) fn contains_phrase(tokens: &[String], phrase: &[&str]) -> bool {
    (0..tokens.len()).any(|idx| phrase_at(tokens, idx, phrase))
}

pub fn extract_positioned(text: &str) -> Vec<Positioned> {
    let tokens = scan_tokens(text);
    let mut intents = Vec::new();
    intents.extend(runway::extract_runway_operations(&tokens));
    intents.extend(taxi::extract_taxi(&tokens));
    intents.extend(altitude::extract_altitudes(&tokens));
    intents.extend(frequency::extract_frequencies(&tokens));
    intents.extend(clearance::extract_clearance(&tokens));
    // stable, so extractor order breaks position ties
    intents.sort_by_key(|(position, _)| *position);
    intents
}

/// All intents in `text`, ordered by where their trigger phrase starts.
pub fn extract_intents(text: &str) -> Vec<ParsedIntent> {
    extract_positioned(text)
        .into_iter()
        .map(|(_, intent)| intent)
        .collect()
}
