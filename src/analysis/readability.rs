//! Structure and readability metrics

use crate::analysis::normalizer::NormalizedText;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const FLAG_NO_SECTIONS: &str = "no_sections_detected";
pub const FLAG_DENSE_TEXT: &str = "overly_dense_text";
pub const FLAG_SHORT_DOCUMENT: &str = "very_short_document";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityMetrics {
    /// 0-100, higher reads easier.
    pub score: f32,
    pub flags: BTreeSet<String>,
}

/// Scores text structure with Flesch reading ease plus penalties for
/// missing section headers and run-on sentences.
pub struct ReadabilityAnalyzer {
    section_keywords: Vec<&'static str>,
    dense_sentence_words: usize,
    short_document_words: usize,
}

const NO_SECTIONS_PENALTY: f32 = 15.0;
const DENSE_TEXT_PENALTY: f32 = 10.0;

impl Default for ReadabilityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadabilityAnalyzer {
    pub fn new() -> Self {
        Self {
            section_keywords: vec![
                "skills",
                "experience",
                "education",
                "summary",
                "profile",
                "objective",
                "projects",
                "certifications",
                "employment",
                "qualifications",
            ],
            dense_sentence_words: 40,
            short_document_words: 50,
        }
    }

    pub fn analyze(&self, text: &NormalizedText) -> ReadabilityMetrics {
        let mut flags = BTreeSet::new();

        if text.word_count == 0 {
            flags.insert(FLAG_SHORT_DOCUMENT.to_string());
            flags.insert(FLAG_NO_SECTIONS.to_string());
            return ReadabilityMetrics { score: 0.0, flags };
        }

        let mut score = self.flesch_reading_ease(text);

        if !self.has_section_headers(&text.original) {
            flags.insert(FLAG_NO_SECTIONS.to_string());
            score -= NO_SECTIONS_PENALTY;
        }

        let sentences = text.sentences.len().max(1);
        if text.word_count / sentences > self.dense_sentence_words {
            flags.insert(FLAG_DENSE_TEXT.to_string());
            score -= DENSE_TEXT_PENALTY;
        }

        if text.word_count < self.short_document_words {
            flags.insert(FLAG_SHORT_DOCUMENT.to_string());
        }

        ReadabilityMetrics {
            score: score.clamp(0.0, 100.0),
            flags,
        }
    }

    /// 206.835 - 1.015 (words/sentences) - 84.6 (syllables/words), clamped
    /// to the 0-100 band.
    fn flesch_reading_ease(&self, text: &NormalizedText) -> f32 {
        let words = text.word_count as f32;
        let sentences = text.sentences.len().max(1) as f32;
        let syllables: usize = text.tokens.iter().map(|t| count_syllables(t)).sum();

        let score = 206.835 - 1.015 * (words / sentences) - 84.6 * (syllables as f32 / words);
        score.clamp(0.0, 100.0)
    }

    /// A resume with recognizable section headers reads far better in a
    /// ten-second triage; look for header-like lines.
    fn has_section_headers(&self, original: &str) -> bool {
        original.lines().any(|line| {
            let trimmed = line.trim().trim_end_matches(':').to_lowercase();
            !trimmed.is_empty()
                && trimmed.split_whitespace().count() <= 4
                && self
                    .section_keywords
                    .iter()
                    .any(|keyword| trimmed.contains(keyword))
        })
    }
}

/// Heuristic vowel-group syllable counter; every word counts at least one.
fn count_syllables(word: &str) -> usize {
    let lower = word.to_lowercase();
    let mut count = 0;
    let mut previous_was_vowel = false;

    for c in lower.chars() {
        let is_vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if is_vowel && !previous_was_vowel {
            count += 1;
        }
        previous_was_vowel = is_vowel;
    }

    // Trailing silent e.
    if count > 1 && lower.ends_with('e') && !lower.ends_with("le") {
        count -= 1;
    }

    count.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::normalizer::TextNormalizer;

    fn analyze(text: &str) -> ReadabilityMetrics {
        let normalizer = TextNormalizer::new();
        ReadabilityAnalyzer::new().analyze(&normalizer.normalize(text))
    }

    #[test]
    fn test_score_stays_in_range() {
        let long =
            "Responsible for interdepartmental organizational restructuring documentation. "
                .repeat(40);
        for text in [
            "Short.",
            "The cat sat on the mat. The dog ran fast.",
            long.as_str(),
        ] {
            let metrics = analyze(text);
            assert!((0.0..=100.0).contains(&metrics.score), "score {}", metrics.score);
        }
    }

    #[test]
    fn test_sectioned_resume_has_no_section_flag() {
        let metrics = analyze(
            "Summary:\nAnalyst with five years in retail.\n\nSkills:\nPython, SQL\n\nEducation:\nB.Sc Statistics",
        );
        assert!(!metrics.flags.contains(FLAG_NO_SECTIONS));
    }

    #[test]
    fn test_missing_sections_flagged_and_penalized() {
        let plain = "I did many different jobs over the years and learned a lot of things. \
                     I am good at computers and talking to people. I want a new job now."
            .to_string();
        let metrics = analyze(&plain);
        assert!(metrics.flags.contains(FLAG_NO_SECTIONS));
    }

    #[test]
    fn test_dense_text_flagged() {
        // One run-on sentence, far past the dense-text threshold.
        let dense = format!("Did {} repeatedly without pause or punctuation", "many tasks ".repeat(45));
        let metrics = analyze(&dense);
        assert!(metrics.flags.contains(FLAG_DENSE_TEXT));
    }

    #[test]
    fn test_short_document_flagged() {
        let metrics = analyze("Skills: Python");
        assert!(metrics.flags.contains(FLAG_SHORT_DOCUMENT));
    }

    #[test]
    fn test_empty_text_scores_zero_without_error() {
        let metrics = analyze("");
        assert_eq!(metrics.score, 0.0);
        assert!(metrics.flags.contains(FLAG_SHORT_DOCUMENT));
    }

    #[test]
    fn test_syllable_counter_heuristics() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("analysis"), 4);
        assert_eq!(count_syllables("python"), 2);
        assert_eq!(count_syllables("x"), 1);
    }
}
