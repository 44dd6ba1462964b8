//! Weighted scoring model producing the final breakdown

use crate::analysis::fields::{EducationLevel, StructuredFields};
use crate::analysis::job_fit::JobFitResult;
use crate::analysis::readability::ReadabilityMetrics;
use crate::analysis::skills::ExtractedSkill;
use crate::config::{ScoringConfig, WeightProfile};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The terminal scoring artifact. Fully derived; maps are ordered so that
/// identical inputs serialize byte-identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub overall: u8,
    pub skills: f32,
    pub experience: f32,
    pub education: f32,
    pub job_fit: Option<f32>,
    pub readability: f32,
    /// Weight fraction per scored category.
    pub weights_used: BTreeMap<String, f32>,
    /// Concrete facts driving each sub-score.
    pub category_explanations: BTreeMap<String, Vec<String>>,
}

/// Combines sub-scores under a job-aware or renormalized default profile.
/// Never fails on well-formed input: absent fields earn zero credit on
/// their axis instead of raising.
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.weights.validate()?;
        Ok(Self { config })
    }

    pub fn score(
        &self,
        skills: &[ExtractedSkill],
        structured: &StructuredFields,
        readability: &ReadabilityMetrics,
        job_fit: Option<&JobFitResult>,
    ) -> ScoreBreakdown {
        let weights = self.select_weights(job_fit.is_some());

        let (skills_score, skills_notes) = self.score_skills(skills);
        let (experience_score, experience_notes) = self.score_experience(structured);
        let (education_score, education_notes) = self.score_education(structured);
        let (readability_score, readability_notes) = Self::score_readability(readability);
        let job_fit_scored = job_fit.map(|fit| self.score_job_fit(fit));

        let mut overall = skills_score * weights.skills
            + experience_score * weights.experience
            + education_score * weights.education
            + readability_score * weights.readability;
        if let Some((job_fit_score, _)) = &job_fit_scored {
            overall += job_fit_score * weights.job_fit;
        }
        let overall = overall.round().clamp(0.0, 100.0) as u8;

        let mut weights_used = BTreeMap::new();
        weights_used.insert("skills".to_string(), weights.skills);
        weights_used.insert("experience".to_string(), weights.experience);
        weights_used.insert("education".to_string(), weights.education);
        weights_used.insert("readability".to_string(), weights.readability);
        if job_fit_scored.is_some() {
            weights_used.insert("job_fit".to_string(), weights.job_fit);
        }

        let mut category_explanations = BTreeMap::new();
        category_explanations.insert("skills".to_string(), skills_notes);
        category_explanations.insert("experience".to_string(), experience_notes);
        category_explanations.insert("education".to_string(), education_notes);
        category_explanations.insert("readability".to_string(), readability_notes);
        let job_fit_score = job_fit_scored.map(|(score, notes)| {
            category_explanations.insert("job_fit".to_string(), notes);
            score
        });

        ScoreBreakdown {
            overall,
            skills: skills_score,
            experience: experience_score,
            education: education_score,
            job_fit: job_fit_score,
            readability: readability_score,
            weights_used,
            category_explanations,
        }
    }

    fn select_weights(&self, job_aware: bool) -> WeightProfile {
        if job_aware {
            self.config.weights.clone()
        } else {
            self.config.weights.without_job_fit()
        }
    }

    /// Saturates toward 100 as the matched count approaches the target;
    /// average match strength scales the credit.
    fn score_skills(&self, skills: &[ExtractedSkill]) -> (f32, Vec<String>) {
        let target = self.config.skill_target;
        let count = skills.len();

        if count == 0 {
            return (
                0.0,
                vec![format!("matched 0 of {} target skills", target)],
            );
        }

        let average_strength: f32 =
            skills.iter().map(|s| s.match_strength).sum::<f32>() / count as f32;
        let coverage = (count.min(target)) as f32 / target as f32;
        let score = (100.0 * coverage * average_strength).clamp(0.0, 100.0);

        let notes = vec![
            format!("matched {} of {} target skills", count.min(target), target),
            format!("average match strength {:.2}", average_strength),
        ];
        (score, notes)
    }

    /// Linear up to the configured ceiling. Absent years score zero:
    /// unverifiable experience cannot be credited.
    fn score_experience(&self, structured: &StructuredFields) -> (f32, Vec<String>) {
        match structured.years_experience {
            Some(years) => {
                let ceiling = self.config.experience_ceiling;
                let score = (years as f32).min(ceiling) / ceiling * 100.0;
                let mut notes = vec![format!("{} years of experience detected", years)];
                if !structured.job_titles.is_empty() {
                    let titles: Vec<&str> =
                        structured.job_titles.iter().map(|t| t.as_str()).collect();
                    notes.push(format!("job titles: {}", titles.join(", ")));
                }
                (score, notes)
            }
            None => (
                0.0,
                vec!["no verifiable years of experience found".to_string()],
            ),
        }
    }

    fn score_education(&self, structured: &StructuredFields) -> (f32, Vec<String>) {
        let Some(level) = structured.education_level else {
            return (0.0, vec!["no education credentials detected".to_string()]);
        };

        let base: f32 = match level {
            EducationLevel::Doctorate => 100.0,
            EducationLevel::Master => 85.0,
            EducationLevel::Bachelor => 70.0,
            EducationLevel::Associate => 50.0,
            EducationLevel::HighSchool => 30.0,
        };
        let mut notes = vec![format!("highest qualification: {}", level.label())];

        let score = match structured.cgpa {
            Some(cgpa) => {
                let fraction = cgpa.value / cgpa.scale.max_value();
                let adjustment = (fraction - 0.5) * 2.0 * self.config.cgpa_swing;
                notes.push(format!(
                    "cgpa {} adjusts the sub-score by {:+.1} points",
                    cgpa.value, adjustment
                ));
                base + adjustment
            }
            None => base,
        };

        (score.clamp(0.0, 100.0), notes)
    }

    /// Similarity blended with priority-skill coverage; pure similarity
    /// when the job description names no taxonomy skills.
    fn score_job_fit(&self, fit: &JobFitResult) -> (f32, Vec<String>) {
        let base = fit.similarity * 100.0;
        let matched = fit.matched_priority_skills.len();
        let total = matched + fit.missing_skills.len();

        let mut notes = vec![format!("text similarity {:.2}", fit.similarity)];
        let score = if total == 0 {
            notes.push("no taxonomy skills named in the job description".to_string());
            base
        } else {
            let coverage = matched as f32 / total as f32;
            notes.push(format!("matched {} of {} priority skills", matched, total));
            let boost = self.config.priority_boost;
            (1.0 - boost) * base + boost * coverage * 100.0
        };

        (score.round().clamp(0.0, 100.0), notes)
    }

    fn score_readability(readability: &ReadabilityMetrics) -> (f32, Vec<String>) {
        let mut notes = vec![format!("readability score {:.0}", readability.score)];
        if !readability.flags.is_empty() {
            let flags: Vec<&str> = readability.flags.iter().map(|f| f.as_str()).collect();
            notes.push(format!("structure flags: {}", flags.join(", ")));
        }
        (readability.score.clamp(0.0, 100.0), notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fields::{Cgpa, EducationLevel, GpaScale};
    use std::collections::BTreeSet;

    fn engine() -> ScoringEngine {
        ScoringEngine::new(crate::config::Config::default().scoring).unwrap()
    }

    fn skill(name: &str, strength: f32) -> ExtractedSkill {
        ExtractedSkill {
            canonical_name: name.to_string(),
            domain: "fixture".to_string(),
            subcategory: "fixture".to_string(),
            match_strength: strength,
            matched_text: name.to_string(),
        }
    }

    fn empty_fields() -> StructuredFields {
        StructuredFields {
            years_experience: None,
            job_titles: BTreeSet::new(),
            education_level: None,
            cgpa: None,
        }
    }

    fn plain_readability(score: f32) -> ReadabilityMetrics {
        ReadabilityMetrics {
            score,
            flags: BTreeSet::new(),
        }
    }

    #[test]
    fn test_zero_skills_scores_zero_with_explanation() {
        let breakdown = engine().score(&[], &empty_fields(), &plain_readability(50.0), None);
        assert_eq!(breakdown.skills, 0.0);
        assert!(breakdown.category_explanations["skills"][0].contains("0 of 15"));
    }

    #[test]
    fn test_skills_saturate_at_target() {
        let skills: Vec<ExtractedSkill> =
            (0..30).map(|i| skill(&format!("s{}", i), 1.0)).collect();
        let breakdown = engine().score(&skills, &empty_fields(), &plain_readability(50.0), None);
        assert_eq!(breakdown.skills, 100.0);
    }

    #[test]
    fn test_skill_strength_scales_credit() {
        let strong = engine().score(
            &[skill("python", 1.0)],
            &empty_fields(),
            &plain_readability(50.0),
            None,
        );
        let weak = engine().score(
            &[skill("python", 0.8)],
            &empty_fields(),
            &plain_readability(50.0),
            None,
        );
        assert!(strong.skills > weak.skills);
    }

    #[test]
    fn test_experience_linear_and_saturating() {
        let mut fields = empty_fields();
        fields.years_experience = Some(5);
        let breakdown = engine().score(&[], &fields, &plain_readability(50.0), None);
        assert_eq!(breakdown.experience, 50.0);
        assert!(breakdown.category_explanations["experience"][0].contains("5 years"));

        fields.years_experience = Some(25);
        let capped = engine().score(&[], &fields, &plain_readability(50.0), None);
        assert_eq!(capped.experience, 100.0);
    }

    #[test]
    fn test_absent_experience_is_penalized_not_neutral() {
        let breakdown = engine().score(&[], &empty_fields(), &plain_readability(50.0), None);
        assert_eq!(breakdown.experience, 0.0);
    }

    #[test]
    fn test_education_point_scale() {
        let cases = [
            (EducationLevel::Doctorate, 100.0),
            (EducationLevel::Master, 85.0),
            (EducationLevel::Bachelor, 70.0),
            (EducationLevel::Associate, 50.0),
            (EducationLevel::HighSchool, 30.0),
        ];
        for (level, expected) in cases {
            let mut fields = empty_fields();
            fields.education_level = Some(level);
            let breakdown = engine().score(&[], &fields, &plain_readability(50.0), None);
            assert_eq!(breakdown.education, expected);
        }
    }

    #[test]
    fn test_cgpa_adjustment_is_bounded() {
        let mut fields = empty_fields();
        fields.education_level = Some(EducationLevel::Bachelor);
        fields.cgpa = Some(Cgpa {
            value: 4.0,
            scale: GpaScale::FourPoint,
        });
        let top = engine().score(&[], &fields, &plain_readability(50.0), None);
        assert_eq!(top.education, 80.0);

        fields.cgpa = Some(Cgpa {
            value: 0.0,
            scale: GpaScale::FourPoint,
        });
        let bottom = engine().score(&[], &fields, &plain_readability(50.0), None);
        assert_eq!(bottom.education, 60.0);
    }

    #[test]
    fn test_weight_profiles_sum_to_one_in_both_modes() {
        let fit = JobFitResult {
            similarity: 0.5,
            missing_skills: vec![],
            matched_priority_skills: vec![],
        };
        let with_job = engine().score(&[], &empty_fields(), &plain_readability(50.0), Some(&fit));
        let without_job = engine().score(&[], &empty_fields(), &plain_readability(50.0), None);

        for breakdown in [&with_job, &without_job] {
            let sum: f32 = breakdown.weights_used.values().sum();
            assert!((sum - 1.0).abs() < 1e-5, "weights sum {}", sum);
        }
        assert!(with_job.weights_used.contains_key("job_fit"));
        assert!(!without_job.weights_used.contains_key("job_fit"));
    }

    #[test]
    fn test_job_fit_blends_similarity_and_coverage() {
        let fit = JobFitResult {
            similarity: 0.40,
            missing_skills: vec!["r".to_string()],
            matched_priority_skills: vec!["python".to_string()],
        };
        let breakdown = engine().score(&[], &empty_fields(), &plain_readability(50.0), Some(&fit));
        // 0.7 * 40 + 0.3 * 50 = 43
        assert_eq!(breakdown.job_fit, Some(43.0));
        assert!(breakdown.category_explanations["job_fit"]
            .iter()
            .any(|n| n.contains("1 of 2 priority skills")));
    }

    #[test]
    fn test_job_fit_without_priority_skills_is_pure_similarity() {
        let fit = JobFitResult {
            similarity: 0.25,
            missing_skills: vec![],
            matched_priority_skills: vec![],
        };
        let breakdown = engine().score(&[], &empty_fields(), &plain_readability(50.0), Some(&fit));
        assert_eq!(breakdown.job_fit, Some(25.0));
    }

    #[test]
    fn test_overall_bounded_for_degenerate_inputs() {
        let extremes = [
            engine().score(&[], &empty_fields(), &plain_readability(0.0), None),
            engine().score(
                &(0..100).map(|i| skill(&format!("s{}", i), 1.0)).collect::<Vec<_>>(),
                &{
                    let mut f = empty_fields();
                    f.years_experience = Some(60);
                    f.education_level = Some(EducationLevel::Doctorate);
                    f.cgpa = Some(Cgpa {
                        value: 4.0,
                        scale: GpaScale::FourPoint,
                    });
                    f
                },
                &plain_readability(100.0),
                Some(&JobFitResult {
                    similarity: 1.0,
                    missing_skills: vec![],
                    matched_priority_skills: vec!["python".to_string()],
                }),
            ),
        ];
        for breakdown in &extremes {
            assert!(breakdown.overall <= 100);
        }
        assert_eq!(extremes[0].overall, 0);
        assert_eq!(extremes[1].overall, 100);
    }

    #[test]
    fn test_job_fit_absent_means_absent_not_zero() {
        let breakdown = engine().score(&[], &empty_fields(), &plain_readability(50.0), None);
        assert_eq!(breakdown.job_fit, None);
        assert!(!breakdown.category_explanations.contains_key("job_fit"));
    }
}
