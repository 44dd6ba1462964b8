//! Job-description fit: lexical similarity plus priority-skill coverage

use crate::analysis::normalizer::NormalizedText;
use crate::analysis::skills::ExtractedSkill;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Produced only when a job description was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFitResult {
    /// Cosine similarity of the TF-IDF vectors, 0.0-1.0.
    pub similarity: f32,
    /// Priority skills the resume lacks, in priority order.
    pub missing_skills: Vec<String>,
    /// Priority skills the resume covers, in priority order.
    pub matched_priority_skills: Vec<String>,
}

pub struct JobFitMatcher;

impl JobFitMatcher {
    /// Compare a resume against a job description. Priority skills are the
    /// taxonomy skills found in the job text; a resume covers one when the
    /// canonical name was extracted under any domain.
    pub fn match_fit(
        resume: &NormalizedText,
        job: &NormalizedText,
        resume_skills: &[ExtractedSkill],
        job_skills: &[ExtractedSkill],
    ) -> JobFitResult {
        let similarity = tfidf_cosine(&resume.content_tokens, &job.content_tokens);

        let mut seen = HashSet::new();
        let priority: Vec<&str> = job_skills
            .iter()
            .map(|s| s.canonical_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect();

        let covered: HashSet<&str> = resume_skills
            .iter()
            .map(|s| s.canonical_name.as_str())
            .collect();

        let mut missing_skills = Vec::new();
        let mut matched_priority_skills = Vec::new();
        for name in priority {
            if covered.contains(name) {
                matched_priority_skills.push(name.to_string());
            } else {
                missing_skills.push(name.to_string());
            }
        }

        JobFitResult {
            similarity,
            missing_skills,
            matched_priority_skills,
        }
    }
}

/// Cosine similarity between TF-IDF vectors built over the two-document
/// corpus. BTreeMap keeps term iteration (and float summation) order
/// deterministic so identical inputs reproduce identical scores.
fn tfidf_cosine(resume_tokens: &[String], job_tokens: &[String]) -> f32 {
    if resume_tokens.is_empty() || job_tokens.is_empty() {
        return 0.0;
    }

    let resume_counts = term_counts(resume_tokens);
    let job_counts = term_counts(job_tokens);

    let vocabulary: BTreeMap<&str, f64> = resume_counts
        .keys()
        .chain(job_counts.keys())
        .map(|term| {
            let document_frequency = [&resume_counts, &job_counts]
                .iter()
                .filter(|counts| counts.contains_key(term))
                .count() as f64;
            // Smoothed IDF over the two-document corpus.
            let idf = ((2.0 + 1.0) / (document_frequency + 1.0)).ln() + 1.0;
            (*term, idf)
        })
        .collect();

    let mut dot = 0.0;
    let mut resume_norm = 0.0;
    let mut job_norm = 0.0;
    for (term, idf) in &vocabulary {
        let resume_weight =
            *resume_counts.get(term).unwrap_or(&0) as f64 / resume_tokens.len() as f64 * idf;
        let job_weight = *job_counts.get(term).unwrap_or(&0) as f64 / job_tokens.len() as f64 * idf;
        dot += resume_weight * job_weight;
        resume_norm += resume_weight * resume_weight;
        job_norm += job_weight * job_weight;
    }

    if resume_norm == 0.0 || job_norm == 0.0 {
        return 0.0;
    }
    ((dot / (resume_norm.sqrt() * job_norm.sqrt())) as f32).clamp(0.0, 1.0)
}

fn term_counts(tokens: &[String]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::normalizer::TextNormalizer;
    use crate::analysis::skills::SkillExtractor;
    use crate::analysis::taxonomy::SkillTaxonomy;
    use crate::config::ExtractionConfig;

    fn fit(resume: &str, job: &str) -> JobFitResult {
        let normalizer = TextNormalizer::new();
        let taxonomy = SkillTaxonomy::from_json_str(
            r#"{
                "analytics": {
                    "tools": ["python", "r", "power bi", "tableau", "sql"]
                },
                "backend": {
                    "languages": ["python"]
                }
            }"#,
        )
        .unwrap();
        let extractor = SkillExtractor::new(&taxonomy, &ExtractionConfig {
            fuzzy_threshold: 0.80,
            window_slack: 1,
            fuzzy_min_len: 4,
        })
        .unwrap();

        let resume_text = normalizer.normalize(resume);
        let job_text = normalizer.normalize(job);
        let resume_skills = extractor.extract(&resume_text);
        let job_skills = extractor.extract(&job_text);
        JobFitMatcher::match_fit(&resume_text, &job_text, &resume_skills, &job_skills)
    }

    #[test]
    fn test_identical_texts_have_full_similarity() {
        let text = "Data analyst experienced with Python and SQL reporting.";
        let result = fit(text, text);
        assert!((result.similarity - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_disjoint_vocabulary_is_zero_not_error() {
        let result = fit("gardening woodworking pottery", "quantum chromodynamics research");
        assert_eq!(result.similarity, 0.0);
    }

    #[test]
    fn test_missing_and_matched_priority_skills() {
        let result = fit(
            "5 years as a Data Analyst using Python, SQL, and Tableau.",
            "Looking for a Data Analyst with Python, R, and Power BI experience.",
        );
        assert!(result.matched_priority_skills.contains(&"python".to_string()));
        assert!(result.missing_skills.contains(&"r".to_string()));
        assert!(result.missing_skills.contains(&"power bi".to_string()));
        assert!(!result.missing_skills.contains(&"python".to_string()));
    }

    #[test]
    fn test_priority_skills_keep_job_order_without_duplicates() {
        let result = fit(
            "Plain prose with no tools named.",
            "Need Tableau, then Python, then Tableau again, plus SQL.",
        );
        // Extraction order: taxonomy declaration order, deduplicated.
        assert_eq!(result.missing_skills, vec!["python", "tableau", "sql"]);
        assert!(result.matched_priority_skills.is_empty());
    }

    #[test]
    fn test_any_domain_counts_as_covered() {
        // "python" exists under two domains; either extraction covers the
        // job's python requirement.
        let result = fit("Python developer.", "Python shop.");
        assert_eq!(result.missing_skills, Vec::<String>::new());
        assert_eq!(result.matched_priority_skills, vec!["python"]);
    }

    #[test]
    fn test_similarity_reflects_overlap_ordering() {
        let close = fit(
            "python data analysis reporting dashboards",
            "python data reporting dashboards role",
        );
        let far = fit(
            "python data analysis reporting dashboards",
            "forklift certification warehouse logistics",
        );
        assert!(close.similarity > far.similarity);
    }
}
