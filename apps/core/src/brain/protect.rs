//! Segment Protector - masks literals that must survive translation.
//!
//! Product codes, e-mail addresses, URLs, HTML markup and street addresses
//! are replaced with positional placeholder tokens before text is handed to
//! the external translator, and restored afterwards. Masking rules run in
//! priority order: fixed literal phrases first, generic patterns second, so
//! a product code is never double-masked by the generic scan.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::lexicon::FilterLexicon;

/// Generic segments, leftmost-first: HTML tags, URLs, e-mail addresses,
/// German-style street addresses ("Musterstraße 12, 8400 Winterthur").
static SEGMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"<[^>]+>|https?://\S+|\b[\w.-]+@[\w.-]+\.\w{2,}\b|\b[A-ZÄÖÜ][a-zäöüß]+\s\d{1,3},\s\d{4,5}\s[A-ZÄÖÜa-zäöüß\s]+,?\s?[A-ZÄÖÜa-zäöüß]*\b",
    )
    .expect("invalid segment pattern")
});

/// Ordered token -> original-segment mapping for one protect/restore cycle.
/// Tokens are transient and must never appear in a reply.
#[derive(Debug, Default, Clone)]
pub struct SegmentMap {
    entries: Vec<(String, String)>,
}

impl SegmentMap {
    fn insert(&mut self, token: String, original: String) {
        self.entries.push((token, original));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
        self.entries.iter()
    }
}

/// Masks and restores protected segments around external translation calls.
pub struct SegmentProtector {
    /// Case-insensitive literal rules, longest literal first.
    literal_rules: Vec<Regex>,
}

impl SegmentProtector {
    pub fn new(lexicon: Arc<FilterLexicon>) -> Self {
        let literal_rules = lexicon
            .protected_terms()
            .iter()
            .map(|term| {
                Regex::new(&format!("(?i){}", regex::escape(term)))
                    .expect("invalid protected-term pattern")
            })
            .collect();

        Self { literal_rules }
    }

    /// Replace every protected segment with a unique positional token.
    /// Literal product codes become `__TERM_<i>__`, generic pattern matches
    /// become `__SEG_<i>__`; the original spelling is recorded verbatim.
    pub fn protect(&self, text: &str) -> (String, SegmentMap) {
        let mut map = SegmentMap::default();
        let mut masked = text.to_string();

        let mut term_index = 0usize;
        for rule in &self.literal_rules {
            masked = rule
                .replace_all(&masked, |caps: &regex::Captures| {
                    let token = format!("__TERM_{}__", term_index);
                    term_index += 1;
                    map.insert(token.clone(), caps[0].to_string());
                    token
                })
                .into_owned();
        }

        let mut seg_index = 0usize;
        masked = SEGMENT_PATTERN
            .replace_all(&masked, |caps: &regex::Captures| {
                let token = format!("__SEG_{}__", seg_index);
                seg_index += 1;
                map.insert(token.clone(), caps[0].to_string());
                token
            })
            .into_owned();

        (masked, map)
    }

    /// Replace every token with its original segment. All tokens in the map
    /// are restored, regardless of what the translator did to the text
    /// around them.
    pub fn restore(&self, text: &str, map: &SegmentMap) -> String {
        let mut restored = text.to_string();
        for (token, original) in map.iter() {
            restored = restored.replace(token, original);
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protector() -> SegmentProtector {
        SegmentProtector::new(Arc::new(FilterLexicon::new()))
    }

    #[test]
    fn test_round_trip_identity() {
        let p = protector();

        let texts = [
            "Der CPM-200 druckt bis 100 mm.",
            "Schreiben Sie an info@example.ch oder besuchen Sie https://example.ch/shop",
            "Unser Büro: Musterstraße 12, 8400 Winterthur, Schweiz",
            "Mehr dazu <a href='mailto:info@example.ch'>hier</a>.",
            "Kein geschütztes Segment weit und breit.",
            "",
        ];

        for text in texts {
            let (masked, map) = p.protect(text);
            assert_eq!(p.restore(&masked, &map), text, "round trip for {:?}", text);
        }
    }

    #[test]
    fn test_product_codes_are_masked_case_insensitively() {
        let p = protector();

        let (masked, map) = p.protect("Was kostet der cpm-200 im Vergleich zum CPM 100?");

        assert!(!masked.to_lowercase().contains("cpm"));
        assert_eq!(map.len(), 2);
        assert!(masked.contains("__TERM_0__"));
        assert!(masked.contains("__TERM_1__"));
    }

    #[test]
    fn test_email_is_masked() {
        let p = protector();

        let (masked, map) = p.protect("Bitte an support@labels.example.com schreiben.");

        assert!(!masked.contains('@'));
        assert_eq!(map.len(), 1);
        assert!(masked.contains("__SEG_0__"));
    }

    #[test]
    fn test_html_tags_mask_before_their_content() {
        let p = protector();

        let (masked, _map) =
            p.protect("Siehe <a href='mailto:info@example.ch'>Kontakt</a> für Details.");

        // The full tags are consumed as tags; the visible text stays
        assert!(masked.contains("Kontakt"));
        assert!(!masked.contains("href"));
        assert!(!masked.contains('@'));
    }

    #[test]
    fn test_literal_rules_take_priority_over_generic_patterns() {
        let p = protector();

        let (masked, map) = p.protect("CPM 200 steht in der Musterstraße 12, 8400 Winterthur");

        // The product code is a __TERM_ token, not swallowed by the address
        let tokens: Vec<&str> = map.iter().map(|(t, _)| t.as_str()).collect();
        assert!(tokens.contains(&"__TERM_0__"));
        assert!(tokens.iter().any(|t| t.starts_with("__SEG_")));
        assert!(masked.contains("__TERM_0__"));
    }

    #[test]
    fn test_restore_survives_surrounding_edits() {
        let p = protector();

        let (masked, map) = p.protect("Der CPM-200 ist verfügbar.");
        // Simulates a translator rewriting everything around the token
        let translated = masked.replace("Der", "The").replace("ist verfügbar", "is available");

        let restored = p.restore(&translated, &map);
        assert_eq!(restored, "The CPM-200 is available.");
    }

    #[test]
    fn test_plain_text_yields_empty_map() {
        let p = protector();

        let (masked, map) = p.protect("Ganz normale Frage ohne Codes");

        assert!(map.is_empty());
        assert_eq!(masked, "Ganz normale Frage ohne Codes");
    }
}
