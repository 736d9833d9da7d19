//! Fuzzy resolution of misheard identifiers against nearby reference data.

use aviation_helper_rs::{
    geo::GeoPoint,
    reference::{EntityType, ReferenceStore},
};
use serde::{Deserialize, Serialize};

use crate::{
    config::SnapperConfig,
    normalizer::{Span, Token},
    vocabulary::{is_designator_token, is_vocabulary},
};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapEvent {
    pub original: String,
    pub replacement: String,
    pub entity_type: EntityType,
    pub confidence: f32,
    pub span: Span,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapOutcome {
    pub events: Vec<SnapEvent>,
    /// Candidate tokens that matched nothing while identifiers were in range.
    pub uncertain: Vec<Span>,
}

pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Edit-distance similarity with a prefix bonus. Only identical strings
/// score 1.0.
pub fn similarity(a: &str, b: &str, prefix_bonus: f32) -> f32 {
    if a == b {
        return 1.0;
    }
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    let base = 1.0 - levenshtein(a, b) as f32 / max_len as f32;
    let bonus = if a.starts_with(b) || b.starts_with(a) {
        prefix_bonus
    } else {
        0.0
    };
    (base + bonus).clamp(0.0, 0.99)
}

struct Candidate<'a> {
    ident: &'a str,
    entity_type: EntityType,
    weight: f32,
}

/// Linear decay from 1.0 at the listener to `floor` at the radius.
fn distance_weight(distance_nm: f64, radius_nm: f64, floor: f32) -> f32 {
    if radius_nm <= 0.0 {
        return 1.0;
    }
    let fraction = (distance_nm / radius_nm).clamp(0.0, 1.0) as f32;
    1.0 - (1.0 - floor) * fraction
}

/// Identifiers in range, in enumeration order: airports (identifier then
/// ICAO), fixes, navaids.
fn candidates<'a>(
    store: &'a ReferenceStore,
    position: &GeoPoint,
    config: &SnapperConfig,
) -> Vec<Candidate<'a>> {
    let floor = config.distance_weight_floor;
    let mut out = Vec::new();
    for n in store.airports_within(position, config.airport_radius_nm) {
        let weight = distance_weight(n.distance_nm, config.airport_radius_nm, floor);
        out.push(Candidate {
            ident: &n.item.identifier,
            entity_type: EntityType::Airport,
            weight,
        });
        if let Some(icao) = &n.item.icao_identifier {
            out.push(Candidate {
                ident: icao,
                entity_type: EntityType::Airport,
                weight,
            });
        }
    }
    for n in store.fixes_within(position, config.fix_radius_nm) {
        out.push(Candidate {
            ident: &n.item.identifier,
            entity_type: EntityType::Fix,
            weight: distance_weight(n.distance_nm, config.fix_radius_nm, floor),
        });
    }
    for n in store.navaids_within(position, config.navaid_radius_nm) {
        out.push(Candidate {
            ident: &n.item.identifier,
            entity_type: EntityType::Navaid,
            weight: distance_weight(n.distance_nm, config.navaid_radius_nm, floor),
        });
    }
    out
}

fn is_snap_candidate(token: &str, config: &SnapperConfig) -> bool {
    let len = token.chars().count();
    (config.min_token_len..=config.max_token_len).contains(&len)
        && token.chars().all(|c| c.is_ascii_alphanumeric())
        && token.chars().any(|c| c.is_ascii_alphabetic())
        && !is_vocabulary(token)
        && !is_designator_token(token)
}

pub fn snap(
    folded: &[Token],
    store: &ReferenceStore,
    position: &GeoPoint,
    config: &SnapperConfig,
) -> SnapOutcome {
    let mut outcome = SnapOutcome::default();
    let tokens: Vec<&Token> = folded
        .iter()
        .filter(|t| is_snap_candidate(&t.text, config))
        .collect();
    if tokens.is_empty() {
        return outcome;
    }
    let candidates = candidates(store, position, config);
    if candidates.is_empty() {
        return outcome;
    }

    for token in tokens {
        let mut best: Option<(&Candidate, f32)> = None;
        for candidate in &candidates {
            let score = similarity(&token.text, candidate.ident, config.prefix_bonus) * candidate.weight;
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }
        match best {
            Some((candidate, score)) if score >= config.min_confidence => {
                log::debug!(
                    "Snapped {} to {} {} ({score:.2})",
                    token.text,
                    candidate.entity_type,
                    candidate.ident
                );
                outcome.events.push(SnapEvent {
                    original: token.text.clone(),
                    replacement: candidate.ident.to_owned(),
                    entity_type: candidate.entity_type,
                    confidence: score,
                    span: token.span,
                });
            }
            _ => outcome.uncertain.push(token.span),
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use aviation_helper_rs::reference::{
        ReferenceTables,
        records::{Airport, Fix},
    };

    use super::*;
    use crate::normalizer::normalize;

    fn fix(ident: &str, lat: f64, lon: f64) -> Fix {
        Fix {
            identifier: ident.to_owned(),
            latitude: lat,
            longitude: lon,
        }
    }

    fn store() -> ReferenceStore {
        ReferenceStore::from_tables(ReferenceTables {
            airports: vec![Airport {
                identifier: "SEA".to_owned(),
                icao_identifier: Some("KSEA".to_owned()),
                name: "SEATTLE-TACOMA INTL".to_owned(),
                city: None,
                state: None,
                latitude: 47.449,
                longitude: -122.309,
                elevation_ft: None,
                runways: Vec::new(),
                frequencies: BTreeMap::new(),
            }],
            fixes: vec![fix("GEPPS", 47.5, -122.3), fix("ALPSE", 47.6, -122.2)],
            ..Default::default()
        })
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("GEP", "GEPPS"), 2);
        assert_eq!(levenshtein("KSEA", "KSEA"), 0);
        assert_eq!(levenshtein("", "ABC"), 3);
        assert_eq!(levenshtein("ALPSE", "ALPES"), 2);
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("KSEA", "KSEA", 0.1), 1.0);
        let sim = similarity("GEPP", "GEPPS", 0.1);
        assert!((sim - 0.9).abs() < 1e-6, "got {sim}");
        assert!(similarity("KSEA", "KSEAX", 0.5) <= 0.99);
        assert!(similarity("ABC", "XYZ", 0.1) < 0.01);
    }

    #[test]
    fn test_distance_weight() {
        assert_eq!(distance_weight(0.0, 80.0, 0.5), 1.0);
        assert_eq!(distance_weight(80.0, 80.0, 0.5), 0.5);
        assert_eq!(distance_weight(40.0, 80.0, 0.5), 0.75);
    }

    #[test]
    fn test_snap_close_fix() {
        let store = store();
        let normalized = normalize("direct geppz then");
        let outcome = snap(
            &normalized.folded,
            &store,
            &GeoPoint::new(47.5, -122.3),
            &SnapperConfig::default(),
        );
        assert_eq!(outcome.events.len(), 1);
        let event = &outcome.events[0];
        assert_eq!(event.original, "GEPPZ");
        assert_eq!(event.replacement, "GEPPS");
        assert_eq!(event.entity_type, EntityType::Fix);
        assert!(event.confidence >= 0.6 && event.confidence <= 1.0);
        assert!(outcome.uncertain.is_empty());
    }

    #[test]
    fn test_snap_airport_icao() {
        let store = store();
        let normalized = normalize("cleared to ksea");
        let outcome = snap(
            &normalized.folded,
            &store,
            &GeoPoint::new(47.449, -122.309),
            &SnapperConfig::default(),
        );
        assert_eq!(outcome.events[0].replacement, "KSEA");
        assert_eq!(outcome.events[0].confidence, 1.0);
    }

    #[test]
    fn test_unmatched_token_is_uncertain() {
        let store = store();
        let text = "direct zzqx";
        let normalized = normalize(text);
        let outcome = snap(
            &normalized.folded,
            &store,
            &GeoPoint::new(47.5, -122.3),
            &SnapperConfig::default(),
        );
        assert!(outcome.events.is_empty());
        assert_eq!(outcome.uncertain.len(), 1);
        let span = outcome.uncertain[0];
        assert_eq!(&text[span.start..span.end], "zzqx");
    }

    #[test]
    fn test_no_candidates_without_store() {
        let normalized = normalize("direct geppz");
        let outcome = snap(
            &normalized.folded,
            &ReferenceStore::empty(),
            &GeoPoint::new(47.5, -122.3),
            &SnapperConfig::default(),
        );
        assert_eq!(outcome, SnapOutcome::default());
    }

    #[test]
    fn test_vocabulary_and_designators_are_not_candidates() {
        let config = SnapperConfig::default();
        assert!(!is_snap_candidate("TAXI", &config));
        assert!(!is_snap_candidate("27L", &config));
        assert!(!is_snap_candidate("128.7", &config));
        assert!(!is_snap_candidate("B", &config));
        assert!(is_snap_candidate("GEP", &config));
    }
}
