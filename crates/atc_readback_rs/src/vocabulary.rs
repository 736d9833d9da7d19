//! Word tables shared by the normalizer, the repair passes and the
//! extractors.

use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
};

static DIGIT_WORDS: LazyLock<HashMap<&'static str, char>> = LazyLock::new(|| {
    HashMap::from([
        ("ZERO", '0'),
        ("ONE", '1'),
        ("TWO", '2'),
        ("THREE", '3'),
        ("FOUR", '4'),
        ("FIVE", '5'),
        ("SIX", '6'),
        ("SEVEN", '7'),
        ("EIGHT", '8'),
        ("NINE", '9'),
        // Aviation specific number pronunciations
        ("NINER", '9'),
        ("TREE", '3'),
        ("FIFE", '5'),
    ])
});

static PHONETIC_ALPHABET: LazyLock<HashMap<&'static str, char>> = LazyLock::new(|| {
    HashMap::from([
        ("ALPHA", 'A'),
        ("ALFA", 'A'),
        ("BRAVO", 'B'),
        ("CHARLIE", 'C'),
        ("DELTA", 'D'),
        ("ECHO", 'E'),
        ("FOXTROT", 'F'),
        ("GOLF", 'G'),
        ("HOTEL", 'H'),
        ("INDIA", 'I'),
        ("JULIET", 'J'),
        ("JULIETT", 'J'),
        ("KILO", 'K'),
        ("LIMA", 'L'),
        ("MIKE", 'M'),
        ("NOVEMBER", 'N'),
        ("OSCAR", 'O'),
        ("PAPA", 'P'),
        ("QUEBEC", 'Q'),
        ("ROMEO", 'R'),
        ("SIERRA", 'S'),
        ("TANGO", 'T'),
        ("UNIFORM", 'U'),
        ("VICTOR", 'V'),
        ("WHISKEY", 'W'),
        ("WHISKY", 'W'),
        ("XRAY", 'X'),
        ("X-RAY", 'X'),
        ("YANKEE", 'Y'),
        ("ZULU", 'Z'),
    ])
});

/// Words of fixed ATC phraseology that are never reference identifiers.
static PHRASEOLOGY: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "ABOVE", "AFTER", "AH", "AIRPORT", "ALTIMETER", "AND", "APPROACH", "ARE", "AS", "AT",
        "ATIS", "BELOW", "CENTER", "CENTRE", "CHANGE", "CLEAR", "CLEARANCE", "CLEARED", "CLIMB",
        "CONTACT", "CONTINUE", "CROSS", "CTAF", "DECIMAL", "DEGREES", "DELIVERY", "DEPARTURE",
        "DESCEND", "DIRECT", "EXPECT", "FEET", "FILED", "FLIGHT", "FLY", "FOR", "FREQUENCY",
        "FROM", "GOOD", "GROUND", "HEADING", "HOLD", "HUNDRED", "IN", "INFORMATION", "IS",
        "KNOTS", "LAND", "LEFT", "LEVEL", "LINE", "LINEUP", "MAINTAIN", "MINUTES", "MONITOR",
        "NOW", "OF", "OFF", "ON", "ONLY", "OR", "OUT", "OVER", "POINT", "PROCEED", "PUBLISHED",
        "RADAR", "RAMP", "READBACK", "REPORT", "RIGHT", "ROGER", "ROOM", "RUNWAY", "RUNWAYS",
        "RWY", "SAY", "SHORT", "SPEED", "SQUAWK", "SWITCH", "TAKE", "TAKEOFF", "TAXI", "THE",
        "THEN", "THOUSAND", "TO", "TOWER", "TRAFFIC", "TRY", "TURN", "UH", "UM", "UNICOM",
        "UNTIL", "UP", "VEE", "VIA", "WAIT", "WIND", "WILCO", "WITH", "YOU", "YOUR",
    ])
});

/// The digit a spoken or written single digit stands for.
pub fn digit_value(word: &str) -> Option<char> {
    match word.as_bytes() {
        [b] if b.is_ascii_digit() => Some(*b as char),
        _ => DIGIT_WORDS.get(word).copied(),
    }
}

pub fn is_digit_word(word: &str) -> bool {
    DIGIT_WORDS.contains_key(word)
}

pub fn phonetic_letter(word: &str) -> Option<char> {
    PHONETIC_ALPHABET.get(word).copied()
}

/// A single letter, written or spoken phonetically.
pub fn taxiway_letter(word: &str) -> Option<char> {
    match word.as_bytes() {
        [b] if b.is_ascii_uppercase() => Some(*b as char),
        _ => phonetic_letter(word),
    }
}

/// Phraseology, digit words and phonetic words.
pub fn is_vocabulary(word: &str) -> bool {
    PHRASEOLOGY.contains(word) || is_digit_word(word) || PHONETIC_ALPHABET.contains_key(word)
}

pub fn is_decimal_word(word: &str) -> bool {
    matches!(word, "POINT" | "DECIMAL")
}

pub fn is_numeric(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit())
}

/// Digits with at most one inner decimal point, e.g. `128.7`.
pub fn is_decimal_number(word: &str) -> bool {
    match word.split_once('.') {
        Some((int, frac)) => is_numeric(int) && is_numeric(frac),
        None => is_numeric(word),
    }
}

/// A folded designator token such as `27`, `6L` or `09C`.
pub fn is_designator_token(word: &str) -> bool {
    let digits = word.bytes().take_while(u8::is_ascii_digit).count();
    let rest = &word[digits..];
    (1..=2).contains(&digits) && matches!(rest, "" | "L" | "R" | "C")
}

pub fn side_letter(word: &str) -> Option<char> {
    match word {
        "LEFT" | "L" => Some('L'),
        "RIGHT" | "R" => Some('R'),
        "CENTER" | "CENTRE" | "C" => Some('C'),
        _ => None,
    }
}

/// Strips surrounding punctuation, keeping inner characters such as the
/// decimal point of `128.7` or the hyphen of `X-RAY`.
pub fn clean_word(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Uppercased words of `text` with spoken digits mapped to digits.
///
/// This is the token view the extractors scan; it does not merge anything,
/// so it reads raw and normalized text alike.
pub fn scan_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| match w {
            "&" => "AND".to_owned(),
            _ => clean_word(w).to_uppercase(),
        })
        .filter(|w| !w.is_empty())
        .map(|w| match DIGIT_WORDS.get(w.as_str()) {
            Some(d) => d.to_string(),
            None => w,
        })
        .collect()
}

/// Reads a number starting at `start`: a decimal token, or a run of digit
/// tokens optionally joined by `POINT`/`DECIMAL`. Returns the number text
/// and how many tokens it used.
pub fn read_number(tokens: &[String], start: usize) -> Option<(String, usize)> {
    let first = tokens.get(start)?;
    if first.contains('.') {
        return is_decimal_number(first).then(|| (first.clone(), 1));
    }
    if !is_numeric(first) {
        return None;
    }
    let mut number = first.clone();
    let mut idx = start + 1;
    // spelled digits arrive one per token
    if first.len() == 1 {
        while let Some(tok) = tokens.get(idx) {
            if tok.len() == 1 && is_numeric(tok) {
                number.push_str(tok);
                idx += 1;
            } else {
                break;
            }
        }
    }
    let decimal = match (tokens.get(idx), tokens.get(idx + 1)) {
        (Some(point), Some(frac)) => is_decimal_word(point) && is_numeric(frac),
        _ => false,
    };
    if decimal {
        let frac = &tokens[idx + 1];
        number.push('.');
        number.push_str(frac);
        idx += 2;
        while let Some(tok) = tokens.get(idx) {
            if tok.len() == 1 && is_numeric(tok) {
                number.push_str(tok);
                idx += 1;
            } else {
                break;
            }
        }
    }
    Some((number, idx - start))
}
