//! Taxonomy-driven skill extraction with exact and fuzzy matching

use crate::analysis::normalizer::NormalizedText;
use crate::analysis::taxonomy::SkillTaxonomy;
use crate::config::ExtractionConfig;
use crate::error::{Result, ScreenerError};
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One skill found in a document. A skill listed under several taxonomy
/// domains produces one entry per domain; they represent different
/// contextual relevance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSkill {
    pub canonical_name: String,
    pub domain: String,
    pub subcategory: String,
    /// 1.0 for exact matches, the similarity score for fuzzy matches.
    pub match_strength: f32,
    /// The span of normalized text the skill was matched against.
    pub matched_text: String,
}

#[derive(Debug, Clone)]
struct SkillLeaf {
    domain: String,
    subcategory: String,
    name: String,
}

/// Scans normalized text against the taxonomy. The Aho-Corasick automaton
/// over the distinct canonical names is built once per engine.
pub struct SkillExtractor {
    matcher: AhoCorasick,
    patterns: Vec<String>,
    leaves: Vec<SkillLeaf>,
    fuzzy_threshold: f64,
    window_slack: usize,
    fuzzy_min_len: usize,
}

impl SkillExtractor {
    pub fn new(taxonomy: &SkillTaxonomy, config: &ExtractionConfig) -> Result<Self> {
        let patterns: Vec<String> = taxonomy
            .distinct_skills()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        // Overlapping search requires the standard match kind; it is what
        // lets "java" and "javascript" be judged independently.
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&patterns)
            .map_err(|e| {
                ScreenerError::Configuration(format!("Failed to build skill matcher: {}", e))
            })?;

        let leaves = taxonomy
            .iter_skills()
            .map(|s| SkillLeaf {
                domain: s.domain.to_string(),
                subcategory: s.subcategory.to_string(),
                name: s.name.to_string(),
            })
            .collect();

        Ok(Self {
            matcher,
            patterns,
            leaves,
            fuzzy_threshold: config.fuzzy_threshold,
            window_slack: config.window_slack,
            fuzzy_min_len: config.fuzzy_min_len,
        })
    }

    /// Extract all taxonomy skills found in the text, grouped by domain in
    /// taxonomy declaration order, strongest match first within a domain.
    pub fn extract(&self, text: &NormalizedText) -> Vec<ExtractedSkill> {
        if text.cleaned.is_empty() {
            return Vec::new();
        }

        let exact = self.find_exact(&text.cleaned);

        // One fuzzy verdict per canonical name, shared across domains.
        let mut fuzzy_cache: HashMap<&str, Option<(f64, String)>> = HashMap::new();

        let mut skills = Vec::new();
        let mut domain_start = 0;
        let mut current_domain: Option<&str> = None;

        for leaf in &self.leaves {
            if current_domain != Some(leaf.domain.as_str()) {
                Self::sort_by_strength(&mut skills[domain_start..]);
                domain_start = skills.len();
                current_domain = Some(leaf.domain.as_str());
            }

            if exact.contains(leaf.name.as_str()) {
                skills.push(ExtractedSkill {
                    canonical_name: leaf.name.clone(),
                    domain: leaf.domain.clone(),
                    subcategory: leaf.subcategory.clone(),
                    match_strength: 1.0,
                    matched_text: leaf.name.clone(),
                });
                continue;
            }

            let verdict = fuzzy_cache
                .entry(leaf.name.as_str())
                .or_insert_with(|| self.best_fuzzy_window(&text.tokens, &leaf.name));
            if let Some((similarity, window)) = verdict {
                skills.push(ExtractedSkill {
                    canonical_name: leaf.name.clone(),
                    domain: leaf.domain.clone(),
                    subcategory: leaf.subcategory.clone(),
                    match_strength: *similarity as f32,
                    matched_text: window.clone(),
                });
            }
        }
        Self::sort_by_strength(&mut skills[domain_start..]);

        skills
    }

    /// Word-boundary-aware exact matching over all (possibly overlapping)
    /// automaton hits. Returns the set of canonical names found.
    fn find_exact(&self, cleaned: &str) -> HashSet<&str> {
        let mut found = HashSet::new();

        for mat in self.matcher.find_overlapping_iter(cleaned) {
            if !Self::on_word_boundary(cleaned, mat.start(), mat.end()) {
                continue;
            }
            found.insert(self.patterns[mat.pattern().as_usize()].as_str());
        }

        found
    }

    /// A hit counts only when it is not embedded in a longer alphanumeric
    /// run, so "java" inside "javascript" is rejected while a standalone
    /// "javascript" hit still matches its own pattern.
    fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
        let before_ok = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    }

    /// Best sliding-window similarity between the skill and the token
    /// stream. Windows span the skill's token count plus/minus the
    /// configured slack.
    fn best_fuzzy_window(&self, tokens: &[String], skill: &str) -> Option<(f64, String)> {
        if skill.len() < self.fuzzy_min_len || tokens.is_empty() {
            return None;
        }

        let skill_tokens = skill.split_whitespace().count().max(1);
        let min_window = skill_tokens.saturating_sub(self.window_slack).max(1);
        let max_window = (skill_tokens + self.window_slack).min(tokens.len());

        let mut best: Option<(f64, String)> = None;
        for size in min_window..=max_window {
            for window in tokens.windows(size) {
                let candidate = window.join(" ");
                let similarity = strsim::normalized_levenshtein(&candidate, skill);
                if similarity >= self.fuzzy_threshold
                    && best.as_ref().map_or(true, |(s, _)| similarity > *s)
                {
                    best = Some((similarity, candidate));
                }
            }
        }
        best
    }

    fn sort_by_strength(skills: &mut [ExtractedSkill]) {
        skills.sort_by(|a, b| {
            b.match_strength
                .partial_cmp(&a.match_strength)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    pub fn skill_count(&self) -> usize {
        self.leaves.len()
    }
}
