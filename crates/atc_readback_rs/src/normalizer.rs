//! Tokenizer and folding passes.
//!
//! Every token keeps the byte span it came from in the original transcript.
//! A folded token spans the union of its sources so uncertain regions can be
//! highlighted in what the pilot actually heard.

use serde::{Deserialize, Serialize};

use crate::vocabulary::{
    clean_word, digit_value, is_decimal_word, is_numeric, phonetic_letter, side_letter,
};

/// `[start, end)` byte offsets into the original transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn union(&self, other: &Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Token {
    pub text: String,
    pub span: Span,
}

impl Token {
    fn folded(text: String, sources: &[Token]) -> Self {
        let span = sources
            .iter()
            .map(|t| t.span)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        Self { text, span }
    }
}

impl Default for Span {
    fn default() -> Self {
        Span::new(0, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Normalized {
    pub normalized_text: String,
    /// Raw uppercased tokens, one per transcript word.
    pub tokens: Vec<Token>,
    pub folded: Vec<Token>,
}

/// Splits on whitespace, strips surrounding punctuation and uppercases.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word_start = None;
    for (idx, c) in text.char_indices().chain(std::iter::once((text.len(), ' '))) {
        match (c.is_whitespace(), word_start) {
            (false, None) => word_start = Some(idx),
            (true, Some(start)) => {
                let word = &text[start..idx];
                let cleaned = clean_word(word);
                if !cleaned.is_empty() {
                    let lead = word.len() - word.trim_start_matches(|c: char| !c.is_alphanumeric()).len();
                    tokens.push(Token {
                        text: cleaned.to_uppercase(),
                        span: Span::new(start + lead, start + lead + cleaned.len()),
                    });
                }
                word_start = None;
            }
            _ => {}
        }
    }
    tokens
}

pub fn normalize(text: &str) -> Normalized {
    let tokens = tokenize(text);
    let folded = fold_phonetics(fold_numbers(fold_runways(tokens.clone())));
    let normalized_text = folded
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    log::debug!("Normalized {text:?} to {normalized_text:?}");
    Normalized {
        normalized_text,
        tokens,
        folded,
    }
}

fn is_runway_keyword(word: &str) -> bool {
    matches!(word, "RUNWAY" | "RUNWAYS" | "RWY")
}

/// `RUNWAY TWO SEVEN LEFT` -> `RUNWAY 27L`. The keyword stays its own token.
fn fold_runways(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let keyword = &tokens[i];
        out.push(keyword.clone());
        i += 1;
        if !is_runway_keyword(&keyword.text) {
            continue;
        }

        let start = i;
        let mut digits = String::new();
        while let Some(tok) = tokens.get(i) {
            let next = match digit_value(&tok.text) {
                Some(d) => d.to_string(),
                None if is_numeric(&tok.text) => tok.text.clone(),
                None => break,
            };
            if digits.len() + next.len() > 2 {
                break;
            }
            digits.push_str(&next);
            i += 1;
        }
        if digits.is_empty() {
            continue;
        }
        if let Some(side) = tokens.get(i).and_then(|t| side_letter(&t.text)) {
            digits.push(side);
            i += 1;
        }
        out.push(Token::folded(digits, &tokens[start..i]));
    }
    out
}

/// `ONE TWO EIGHT POINT SEVEN` -> `128.7`.
fn fold_numbers(tokens: Vec<Token>) -> Vec<Token> {
    let unit = |t: &Token| digit_value(&t.text);
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let start = i;
        let mut number = String::new();
        match unit(&tokens[i]) {
            Some(d) => {
                number.push(d);
                i += 1;
                while let Some(d) = tokens.get(i).and_then(unit) {
                    number.push(d);
                    i += 1;
                }
            }
            // a written number only folds when a spoken fraction follows
            None if is_numeric(&tokens[i].text) => {
                number.push_str(&tokens[i].text);
                i += 1;
            }
            None => {
                out.push(tokens[i].clone());
                i += 1;
                continue;
            }
        }

        let has_fraction = tokens.get(i).is_some_and(|t| is_decimal_word(&t.text))
            && tokens.get(i + 1).and_then(unit).is_some();
        if has_fraction {
            number.push('.');
            i += 1;
            while let Some(d) = tokens.get(i).and_then(unit) {
                number.push(d);
                i += 1;
            }
        }

        if i - start == 1 && number == tokens[start].text {
            out.push(tokens[start].clone());
        } else {
            out.push(Token::folded(number, &tokens[start..i]));
        }
    }
    out
}

/// `GOLF ECHO PAPA` -> `GEP`, `BRAVO` -> `B`.
fn fold_phonetics(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let start = i;
        let mut letters = String::new();
        while let Some(letter) = tokens.get(i).and_then(|t| phonetic_letter(&t.text)) {
            letters.push(letter);
            i += 1;
        }
        if letters.is_empty() {
            out.push(tokens[i].clone());
            i += 1;
        } else {
            out.push(Token::folded(letters, &tokens[start..i]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folded_text(text: &str) -> Vec<String> {
        normalize(text).folded.into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_tokenize_spans() {
        let text = "Cleared, runway 27L.";
        let tokens = tokenize(text);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "CLEARED");
        assert_eq!(&text[tokens[0].span.start..tokens[0].span.end], "Cleared");
        assert_eq!(&text[tokens[2].span.start..tokens[2].span.end], "27L");
    }

    #[test]
    fn test_fold_runway() {
        assert_eq!(folded_text("runway two seven left"), vec!["RUNWAY", "27L"]);
        assert_eq!(folded_text("rwy 9 center"), vec!["RWY", "9C"]);
        assert_eq!(
            folded_text("runway niner niner hold"),
            vec!["RUNWAY", "99", "HOLD"]
        );
    }

    #[test]
    fn test_runway_fold_stops_after_two_digits() {
        assert_eq!(
            folded_text("runway one six one two"),
            vec!["RUNWAY", "16", "12"]
        );
    }

    #[test]
    fn test_fold_numbers() {
        assert_eq!(
            folded_text("contact one two eight point seven"),
            vec!["CONTACT", "128.7"]
        );
        assert_eq!(folded_text("121 decimal niner"), vec!["121.9"]);
        assert_eq!(folded_text("5000 10 minutes"), vec!["5000", "10", "MINUTES"]);
        assert_eq!(folded_text("one point"), vec!["1", "POINT"]);
    }

    #[test]
    fn test_fold_phonetics() {
        assert_eq!(folded_text("golf echo papa"), vec!["GEP"]);
        assert_eq!(folded_text("via bravo"), vec!["VIA", "B"]);
    }

    #[test]
    fn test_folded_span_covers_sources() {
        let text = "hold at golf echo papa";
        let normalized = normalize(text);
        let gep = &normalized.folded[2];
        assert_eq!(&text[gep.span.start..gep.span.end], "golf echo papa");
        assert_eq!(normalized.normalized_text, "HOLD AT GEP");
        assert!(normalized.folded.len() <= normalized.tokens.len());
    }

    #[test]
    fn test_empty_transcript() {
        let normalized = normalize("");
        assert!(normalized.folded.is_empty());
        assert_eq!(normalized.normalized_text, "");
    }
}
