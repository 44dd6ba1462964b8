//! Configuration management for the resume screener

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub taxonomy: TaxonomyConfig,
    pub extraction: ExtractionConfig,
    pub scoring: ScoringConfig,
    pub limits: LimitsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Path to a taxonomy JSON file; `None` uses the embedded taxonomy.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Minimum normalized similarity for a fuzzy skill match.
    pub fuzzy_threshold: f64,
    /// Fuzzy windows span the skill's token count plus/minus this many tokens.
    pub window_slack: usize,
    /// Skills shorter than this many characters are matched exactly only.
    pub fuzzy_min_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Job-aware weight profile; renormalized when no job description is given.
    pub weights: WeightProfile,
    /// Matched-skill count at which the skills sub-score saturates.
    pub skill_target: usize,
    /// Years of experience mapping to a full experience sub-score.
    pub experience_ceiling: f32,
    /// Maximum CGPA adjustment to the education sub-score, in points.
    pub cgpa_swing: f32,
    /// Share of the job-fit sub-score driven by priority-skill coverage.
    pub priority_boost: f32,
}

/// Scoring weights for the five categories. Must sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile {
    pub skills: f32,
    pub experience: f32,
    pub education: f32,
    pub job_fit: f32,
    pub readability: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Resume text longer than this is rejected before analysis.
    pub max_text_chars: usize,
    /// Input files larger than this are rejected before extraction.
    pub max_file_bytes: u64,
    /// Maximum number of resumes accepted per batch run.
    pub max_batch_files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Csv,
}

impl WeightProfile {
    const SUM_TOLERANCE: f32 = 1e-4;

    /// Weights used when a job description is present.
    pub fn job_aware_default() -> Self {
        Self {
            skills: 0.30,
            experience: 0.15,
            education: 0.10,
            job_fit: 0.35,
            readability: 0.10,
        }
    }

    /// Redistribute the job-fit weight proportionally across the remaining
    /// four categories, preserving their relative ratios.
    pub fn without_job_fit(&self) -> Self {
        let remaining = 1.0 - self.job_fit;
        Self {
            skills: self.skills / remaining,
            experience: self.experience / remaining,
            education: self.education / remaining,
            job_fit: 0.0,
            readability: self.readability / remaining,
        }
    }

    pub fn sum(&self) -> f32 {
        self.skills + self.experience + self.education + self.job_fit + self.readability
    }

    pub fn validate(&self) -> Result<()> {
        let parts = [
            ("skills", self.skills),
            ("experience", self.experience),
            ("education", self.education),
            ("job_fit", self.job_fit),
            ("readability", self.readability),
        ];
        for (name, value) in parts {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScreenerError::Configuration(format!(
                    "weight '{}' must be in [0, 1], got {}",
                    name, value
                )));
            }
        }
        if (self.sum() - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(ScreenerError::Configuration(format!(
                "weight profile must sum to 1.0, got {}",
                self.sum()
            )));
        }
        if self.job_fit >= 1.0 {
            return Err(ScreenerError::Configuration(
                "job_fit weight must leave room for the remaining categories".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            taxonomy: TaxonomyConfig { path: None },
            extraction: ExtractionConfig {
                fuzzy_threshold: 0.80,
                window_slack: 1,
                fuzzy_min_len: 4,
            },
            scoring: ScoringConfig {
                weights: WeightProfile::job_aware_default(),
                skill_target: 15,
                experience_ceiling: 10.0,
                cgpa_swing: 10.0,
                priority_boost: 0.3,
            },
            limits: LimitsConfig {
                max_text_chars: 1_048_576,
                max_file_bytes: 10 * 1024 * 1024,
                max_batch_files: 5,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| {
                ScreenerError::Configuration(format!("Failed to parse config: {}", e))
            })?
        } else {
            let config = Self::default();
            config.save()?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ScreenerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }

    /// Reject configurations the engine cannot serve requests with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.extraction.fuzzy_threshold) {
            return Err(ScreenerError::Configuration(format!(
                "fuzzy_threshold must be in [0, 1], got {}",
                self.extraction.fuzzy_threshold
            )));
        }
        self.scoring.weights.validate()?;
        if self.scoring.skill_target == 0 {
            return Err(ScreenerError::Configuration(
                "skill_target must be at least 1".to_string(),
            ));
        }
        if self.scoring.experience_ceiling <= 0.0 {
            return Err(ScreenerError::Configuration(
                "experience_ceiling must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.scoring.priority_boost) {
            return Err(ScreenerError::Configuration(format!(
                "priority_boost must be in [0, 1], got {}",
                self.scoring.priority_boost
            )));
        }
        if self.limits.max_batch_files == 0 {
            return Err(ScreenerError::Configuration(
                "max_batch_files must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_job_aware_weights_sum_to_one() {
        let weights = WeightProfile::job_aware_default();
        assert!((weights.sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_renormalized_weights_sum_to_one() {
        let weights = WeightProfile::job_aware_default().without_job_fit();
        assert_eq!(weights.job_fit, 0.0);
        assert!((weights.sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_renormalization_preserves_ratios() {
        let base = WeightProfile::job_aware_default();
        let adjusted = base.without_job_fit();
        let base_ratio = base.skills / base.experience;
        let adjusted_ratio = adjusted.skills / adjusted.experience;
        assert!((base_ratio - adjusted_ratio).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_weight_profile_rejected() {
        let mut config = Config::default();
        config.scoring.weights.skills = 0.9;
        assert!(matches!(
            config.validate(),
            Err(ScreenerError::Configuration(_))
        ));
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let mut config = Config::default();
        config.extraction.fuzzy_threshold = 1.5;
        assert!(config.validate().is_err());
    }
}
