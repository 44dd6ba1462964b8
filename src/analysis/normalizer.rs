//! Text normalization for downstream matching

use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Stateless normalizer; regexes and the stop-word set are compiled once.
pub struct TextNormalizer {
    stop_words: HashSet<String>,
    whitespace_regex: Regex,
    bullet_regex: Regex,
}

/// Views of one document produced by a single normalization pass.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    pub original: String,
    /// Lowercased, artifact-stripped, whitespace-collapsed text.
    pub cleaned: String,
    /// All lowercase word tokens, in order. Used for fuzzy match windows.
    pub tokens: Vec<String>,
    /// Tokens with stop words removed. Used for term-frequency vectors.
    pub content_tokens: Vec<String>,
    pub sentences: Vec<String>,
    pub word_count: usize,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");
        let bullet_regex =
            Regex::new(r"[•▪◦●‣·*]+").expect("Invalid bullet regex");

        Self {
            stop_words: Self::create_stop_words(),
            whitespace_regex,
            bullet_regex,
        }
    }

    /// Normalize raw document text. Empty input yields empty views, not an
    /// error; rejecting empty documents is the engine's responsibility.
    pub fn normalize(&self, text: &str) -> NormalizedText {
        let original = text.to_string();

        // Sentences are segmented before lowercasing; capitalization helps
        // the segmenter.
        let sentences: Vec<String> = text
            .unicode_sentences()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let cleaned = self.clean(text);

        let tokens: Vec<String> = cleaned
            .unicode_words()
            .map(|w| w.to_string())
            .collect();

        let content_tokens: Vec<String> = tokens
            .iter()
            .filter(|t| t.len() > 1 || t.chars().all(|c| c.is_numeric()))
            .filter(|t| !self.stop_words.contains(t.as_str()))
            .cloned()
            .collect();

        let word_count = tokens.len();

        NormalizedText {
            original,
            cleaned,
            tokens,
            content_tokens,
            sentences,
            word_count,
        }
    }

    fn clean(&self, text: &str) -> String {
        let unquoted = Self::normalize_unicode(text);
        let without_bullets = self.bullet_regex.replace_all(&unquoted, " ");
        self.whitespace_regex
            .replace_all(&without_bullets, " ")
            .trim()
            .to_lowercase()
    }

    /// Map common formatting artifacts to their plain ASCII forms.
    fn normalize_unicode(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2013}' | '\u{2014}' => '-',
                '\u{2026}' => '.',
                '\u{00A0}' => ' ',
                _ => c,
            })
            .collect()
    }

    fn create_stop_words() -> HashSet<String> {
        let stop_words = [
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from",
            "has", "he", "in", "is", "it", "its", "of", "on", "or", "that",
            "the", "to", "was", "were", "will", "with", "this", "they", "but",
            "have", "had", "what", "when", "where", "who", "which", "why",
            "how", "all", "each", "every", "both", "few", "more", "most",
            "other", "some", "such", "no", "nor", "not", "only", "own",
            "same", "so", "than", "too", "very", "can", "just", "should",
            "now", "also", "been", "being", "do", "does", "did", "doing",
            "would", "could", "might", "must", "shall", "about", "above",
            "after", "again", "against", "am", "any", "before", "below",
            "between", "into", "through", "during", "out", "over", "under",
            "up", "down", "then", "once", "here", "there", "if", "else",
            "while", "because", "until", "we", "you", "your", "our", "their",
            "him", "her", "them", "me", "my", "i", "us", "these", "those",
            "his", "she", "it's", "i'm",
        ];

        stop_words.iter().map(|&s| s.to_string()).collect()
    }
}
