//! Screening engine: orchestrates one analysis pass and batch runs

use crate::analysis::fields::{FieldExtractor, StructuredFields};
use crate::analysis::job_fit::{JobFitMatcher, JobFitResult};
use crate::analysis::normalizer::TextNormalizer;
use crate::analysis::readability::{ReadabilityAnalyzer, ReadabilityMetrics};
use crate::analysis::scoring::{ScoreBreakdown, ScoringEngine};
use crate::analysis::skills::{ExtractedSkill, SkillExtractor};
use crate::analysis::taxonomy::SkillTaxonomy;
use crate::config::Config;
use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything one analysis produced: the final breakdown plus the
/// intermediate artifacts, all serializable for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub breakdown: ScoreBreakdown,
    pub skills: Vec<ExtractedSkill>,
    pub structured: StructuredFields,
    pub readability: ReadabilityMetrics,
    pub job_fit: Option<JobFitResult>,
    pub processing_time_ms: u64,
}

/// Long-lived analysis service. The taxonomy, automaton, and regexes are
/// built once; every analysis afterwards only reads them, so a shared
/// reference can serve concurrent requests.
pub struct ScreeningEngine {
    taxonomy: SkillTaxonomy,
    normalizer: TextNormalizer,
    skill_extractor: SkillExtractor,
    field_extractor: FieldExtractor,
    readability_analyzer: ReadabilityAnalyzer,
    scoring_engine: ScoringEngine,
    max_text_chars: usize,
}

impl ScreeningEngine {
    pub fn new(taxonomy: SkillTaxonomy, config: &Config) -> Result<Self> {
        config.validate()?;
        let skill_extractor = SkillExtractor::new(&taxonomy, &config.extraction)?;
        let scoring_engine = ScoringEngine::new(config.scoring.clone())?;

        Ok(Self {
            taxonomy,
            normalizer: TextNormalizer::new(),
            skill_extractor,
            field_extractor: FieldExtractor::new(),
            readability_analyzer: ReadabilityAnalyzer::new(),
            scoring_engine,
            max_text_chars: config.limits.max_text_chars,
        })
    }

    /// Analyze one resume, optionally against a job description. Fails only
    /// on rejected input; a valid resume always yields a complete artifact.
    pub fn analyze(&self, resume_text: &str, job_description: Option<&str>) -> Result<Analysis> {
        let start = Instant::now();

        self.check_input(resume_text, "resume")?;
        let job = job_description
            .map(str::trim)
            .filter(|text| !text.is_empty());
        if let Some(job_text) = job {
            self.check_length(job_text, "job description")?;
        }

        let resume = self.normalizer.normalize(resume_text);
        let skills = self.skill_extractor.extract(&resume);
        let structured = self.field_extractor.extract(resume_text);
        let readability = self.readability_analyzer.analyze(&resume);

        let job_fit = job.map(|job_text| {
            let normalized_job = self.normalizer.normalize(job_text);
            let job_skills = self.skill_extractor.extract(&normalized_job);
            JobFitMatcher::match_fit(&resume, &normalized_job, &skills, &job_skills)
        });

        let breakdown =
            self.scoring_engine
                .score(&skills, &structured, &readability, job_fit.as_ref());

        log::debug!(
            "analysis complete: overall {} ({} skills, job fit {})",
            breakdown.overall,
            skills.len(),
            if job_fit.is_some() { "yes" } else { "no" }
        );

        Ok(Analysis {
            breakdown,
            skills,
            structured,
            readability,
            job_fit,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Analyze a batch of resumes on a worker pool. Results come back in
    /// input order regardless of completion order; one rejected resume does
    /// not abort its siblings.
    pub fn analyze_batch(
        &self,
        resumes: &[String],
        job_description: Option<&str>,
    ) -> Vec<Result<Analysis>> {
        if resumes.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<Option<Result<Analysis>>> = Vec::with_capacity(resumes.len());
        results.resize_with(resumes.len(), || None);

        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(resumes.len());
        let chunk_size = (resumes.len() + workers - 1) / workers;

        std::thread::scope(|scope| {
            for (resume_chunk, result_chunk) in
                resumes.chunks(chunk_size).zip(results.chunks_mut(chunk_size))
            {
                scope.spawn(move || {
                    for (resume, slot) in resume_chunk.iter().zip(result_chunk.iter_mut()) {
                        *slot = Some(self.analyze(resume, job_description));
                    }
                });
            }
        });

        results
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(ScreenerError::Processing(
                        "analysis worker produced no result".to_string(),
                    ))
                })
            })
            .collect()
    }

    fn check_input(&self, text: &str, label: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(ScreenerError::InvalidInput(format!(
                "{} text is empty",
                label
            )));
        }
        self.check_length(text, label)
    }

    fn check_length(&self, text: &str, label: &str) -> Result<()> {
        let length = text.chars().count();
        if length > self.max_text_chars {
            return Err(ScreenerError::InvalidInput(format!(
                "{} text is too long: {} characters exceeds the {} limit",
                label, length, self.max_text_chars
            )));
        }
        Ok(())
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_engine() -> ScreeningEngine {
        let taxonomy = SkillTaxonomy::from_json_str(
            r#"{
                "analytics": {
                    "tools": ["python", "sql", "tableau", "r", "power bi", "excel"]
                }
            }"#,
        )
        .unwrap();
        ScreeningEngine::new(taxonomy, &Config::default()).unwrap()
    }

    const SAMPLE_RESUME: &str = "5 years of experience as a Data Analyst with Python, SQL, \
                                 and Tableau. Bachelor's degree, CGPA 3.6.";

    #[test]
    fn test_empty_resume_rejected_before_analysis() {
        let engine = fixture_engine();
        for text in ["", "   ", "\n\t"] {
            assert!(matches!(
                engine.analyze(text, None),
                Err(ScreenerError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_oversized_resume_rejected() {
        let taxonomy = SkillTaxonomy::from_json_str(r#"{"a": {"b": ["python"]}}"#).unwrap();
        let mut config = Config::default();
        config.limits.max_text_chars = 100;
        let engine = ScreeningEngine::new(taxonomy, &config).unwrap();

        let result = engine.analyze(&"x ".repeat(200), None);
        assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
    }

    #[test]
    fn test_scenario_without_job_description() {
        let engine = fixture_engine();
        let analysis = engine.analyze(SAMPLE_RESUME, None).unwrap();

        assert_eq!(analysis.structured.years_experience, Some(5));
        assert_eq!(
            analysis.structured.education_level,
            Some(crate::analysis::fields::EducationLevel::Bachelor)
        );
        for name in ["python", "sql", "tableau"] {
            let skill = analysis
                .skills
                .iter()
                .find(|s| s.canonical_name == name)
                .unwrap_or_else(|| panic!("'{}' missing", name));
            assert_eq!(skill.match_strength, 1.0);
        }
        assert!(analysis.job_fit.is_none());
        assert!(analysis.breakdown.job_fit.is_none());
        assert!(!analysis.breakdown.weights_used.contains_key("job_fit"));
    }

    #[test]
    fn test_scenario_with_job_description() {
        let engine = fixture_engine();
        let analysis = engine
            .analyze(
                SAMPLE_RESUME,
                Some("Looking for a Data Analyst with Python, R, and Power BI experience"),
            )
            .unwrap();

        let fit = analysis.job_fit.expect("job fit missing");
        assert!(fit.missing_skills.contains(&"r".to_string()));
        assert!(fit.missing_skills.contains(&"power bi".to_string()));
        assert!(fit.matched_priority_skills.contains(&"python".to_string()));
        assert!(analysis.breakdown.weights_used.contains_key("job_fit"));
    }

    #[test]
    fn test_blank_job_description_treated_as_absent() {
        let engine = fixture_engine();
        let analysis = engine.analyze(SAMPLE_RESUME, Some("   ")).unwrap();
        assert!(analysis.job_fit.is_none());
    }

    #[test]
    fn test_idempotent_breakdown() {
        let engine = fixture_engine();
        let job = Some("Data Analyst role needing Python and Excel.");
        let first = engine.analyze(SAMPLE_RESUME, job).unwrap();
        let second = engine.analyze(SAMPLE_RESUME, job).unwrap();

        let first_json = serde_json::to_string(&first.breakdown).unwrap();
        let second_json = serde_json::to_string(&second.breakdown).unwrap();
        assert_eq!(first_json, second_json);
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let engine = fixture_engine();
        let resumes: Vec<String> = vec![
            "Python developer, 2 years of experience.".to_string(),
            "Tableau and Excel analyst, 8 years of experience, MBA.".to_string(),
            "SQL administrator, 4 years of experience.".to_string(),
        ];

        let batch = engine.analyze_batch(&resumes, None);
        assert_eq!(batch.len(), resumes.len());

        for (resume, result) in resumes.iter().zip(&batch) {
            let expected = engine.analyze(resume, None).unwrap();
            let actual = result.as_ref().unwrap();
            assert_eq!(actual.breakdown, expected.breakdown);
        }
    }

    #[test]
    fn test_batch_isolates_invalid_entries() {
        let engine = fixture_engine();
        let resumes: Vec<String> = vec![
            "Python developer with 3 years of experience.".to_string(),
            "".to_string(),
            "Excel analyst.".to_string(),
        ];

        let batch = engine.analyze_batch(&resumes, None);
        assert!(batch[0].is_ok());
        assert!(matches!(batch[1], Err(ScreenerError::InvalidInput(_))));
        assert!(batch[2].is_ok());
    }

    #[test]
    fn test_overall_in_range_for_arbitrary_inputs() {
        let engine = fixture_engine();
        for text in [
            "x",
            "1234567890",
            "Python Python Python Python",
            "PhD, 60 years of experience, GPA 4.0/4, Python SQL Tableau R Excel Power BI",
        ] {
            let analysis = engine.analyze(text, None).unwrap();
            assert!(analysis.breakdown.overall <= 100);
        }
    }
}
