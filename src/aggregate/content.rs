use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::stats::{FrequencyCounter, FrequencyTable};
use crate::types::Dataset;

/// Common Portuguese words excluded from the word ranking
pub const STOP_WORDS: &[&str] = &[
    "que", "com", "para", "uma", "mais", "como", "sobre", "seus", "este", "esta", "ser", "seja",
    "são", "mas", "muito", "nosso", "nossa", "pelos", "pelas", "essa", "esse", "isso", "aquele",
    "aquela", "entre", "através", "quando",
];

// Whole words of four or more lower-case letters, accented Portuguese letters included
static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-záéíóúâêîôûãõç]{4,}\b").unwrap());

pub fn is_stop_word(token: &str) -> bool {
    let lower = token.to_lowercase();
    STOP_WORDS.contains(&lower.as_str())
}

/// Lower-case `text` and return its qualifying words in order of appearance
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_PATTERN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Word counts over every non-null suggestion body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordFrequencies {
    pub texts: u64,
    /// Qualifying tokens counted, after stop-word removal
    pub tokens: u64,
    /// Ties keep the order of first appearance in the token stream
    pub words: FrequencyTable,
}

pub fn aggregate_words(dataset: &Dataset) -> WordFrequencies {
    let mut counter = FrequencyCounter::new();
    let mut texts = 0;

    for text in dataset.records().iter().filter_map(|r| r.text.as_deref()) {
        texts += 1;
        for token in tokenize(text) {
            if !is_stop_word(&token) {
                counter.add(&token);
            }
        }
    }

    WordFrequencies {
        texts,
        tokens: counter.total(),
        words: counter.ranked(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Column, ColumnSource, Field, Record};
    use std::collections::BTreeMap;

    fn dataset(texts: &[Option<&str>]) -> Dataset {
        let columns = Field::ALL
            .into_iter()
            .map(|f| Column {
                name: f.column_name().to_string(),
                source: ColumnSource::Field(f),
            })
            .collect();
        let records = texts
            .iter()
            .map(|t| Record {
                text: t.map(str::to_string),
                ..Record::default()
            })
            .collect();
        Dataset::new("t.csv".to_string(), columns, records, BTreeMap::new())
    }

    #[test]
    fn test_tokenize_lowercases_and_keeps_accents() {
        assert_eq!(
            tokenize("A Reforma Agrária é URGENTE, já!"),
            vec!["reforma", "agrária", "urgente"]
        );
        assert_eq!(tokenize("Educação e saúde"), vec!["educação", "saúde"]);
    }

    #[test]
    fn test_tokenize_skips_short_and_mixed_words() {
        assert!(tokenize("o povo tem voz").contains(&"povo".to_string()));
        assert!(!tokenize("o povo tem voz").contains(&"tem".to_string()));
        assert!(tokenize("artigo5 lei_nova").is_empty());
    }

    #[test]
    fn test_stop_words_are_case_insensitive() {
        assert!(is_stop_word("PARA"));
        assert!(is_stop_word("Através"));
        assert!(!is_stop_word("direito"));
    }

    #[test]
    fn test_word_counts_with_first_seen_ties() {
        let data = dataset(&[Some("o povo tem direito"), Some("direito e povo"), None]);
        let result = aggregate_words(&data);

        assert_eq!(result.texts, 2);
        assert_eq!(result.words.labels(), vec!["povo", "direito"]);
        assert_eq!(result.words.counts(), vec![2, 2]);
        assert_eq!(result.tokens, 4);
    }

    #[test]
    fn test_stop_words_never_counted() {
        let data = dataset(&[Some("Para que serve isso? Para mais saúde, quando possível.")]);
        let result = aggregate_words(&data);

        assert!(result.words.entries().iter().all(|e| !is_stop_word(&e.label)));
        assert!(result.words.entries().iter().all(|e| e.label.chars().count() >= 4));
        assert_eq!(result.words.labels(), vec!["serve", "saúde", "possível"]);
    }

    #[test]
    fn test_no_text() {
        let result = aggregate_words(&dataset(&[None]));
        assert_eq!(result.texts, 0);
        assert!(result.words.is_empty());
    }
}
