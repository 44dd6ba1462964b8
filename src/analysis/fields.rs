//! Heuristic extraction of structured resume fields

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fields pulled from free text. Absence is `None` or an empty set, never a
/// sentinel zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredFields {
    pub years_experience: Option<u32>,
    pub job_titles: BTreeSet<String>,
    pub education_level: Option<EducationLevel>,
    pub cgpa: Option<Cgpa>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "high school",
            EducationLevel::Associate => "associate",
            EducationLevel::Bachelor => "bachelor",
            EducationLevel::Master => "master",
            EducationLevel::Doctorate => "doctorate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cgpa {
    pub value: f32,
    pub scale: GpaScale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpaScale {
    FourPoint,
    TenPoint,
    Percent,
}

impl GpaScale {
    pub fn max_value(&self) -> f32 {
        match self {
            GpaScale::FourPoint => 4.0,
            GpaScale::TenPoint => 10.0,
            GpaScale::Percent => 100.0,
        }
    }
}

/// Pattern-based extractor; all regexes are compiled once.
pub struct FieldExtractor {
    year_patterns: Vec<Regex>,
    range_pattern: Regex,
    title_pattern: Regex,
    degree_patterns: Vec<(EducationLevel, Regex)>,
    gpa_scaled_pattern: Regex,
    gpa_patterns: Vec<Regex>,
}

/// Years of experience beyond this are treated as extraction noise.
const MAX_PLAUSIBLE_YEARS: u32 = 60;

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor {
    pub fn new() -> Self {
        let year_patterns = vec![
            Regex::new(r"(?i)\b(\d{1,3})\s*\+?\s*(?:years?|yrs?)\s*(?:of\s+)?(?:\w+\s+){0,2}?(?:experience|exp)\b")
                .expect("Invalid experience regex"),
            Regex::new(r"(?i)\b(?:over|more\s+than|at\s+least|minimum(?:\s+of)?)\s+(\d{1,3})\s*(?:years?|yrs?)\b")
                .expect("Invalid qualified-years regex"),
            Regex::new(r"(?i)\b(?:experience|worked|employed)\b[^.\n]{0,40}?\b(\d{1,3})\s*\+?\s*(?:years?|yrs?)\b")
                .expect("Invalid keyword-years regex"),
        ];
        let range_pattern = Regex::new(r"(?i)\b(\d{1,3})\s*-\s*(\d{1,3})\s*(?:years?|yrs?)\b")
            .expect("Invalid year-range regex");

        // A title is the keyword plus up to two adjacent capitalized tokens,
        // all title-cased so prose mentions ("the manager said") stay out.
        let title_pattern = Regex::new(
            r"\b((?:[A-Z][A-Za-z+#/-]*\s+){0,2}(?:Engineer|Developer|Analyst|Manager|Consultant|Specialist|Architect|Designer|Scientist|Administrator|Director|Coordinator|Technician|Officer|Lead|Intern))\b",
        )
        .expect("Invalid job-title regex");

        let degree_patterns = vec![
            (
                EducationLevel::Doctorate,
                Regex::new(r"(?i)\b(?:ph\.?\s?d|doctorate|doctoral|d\.?phil)\b")
                    .expect("Invalid doctorate regex"),
            ),
            (
                EducationLevel::Master,
                Regex::new(r"(?i)\b(?:master(?:'s|s)?|m\.?\s?sc|m\.?\s?tech|m\.?\s?eng|mba|m\.?\s?com)\b")
                    .expect("Invalid master regex"),
            ),
            (
                EducationLevel::Bachelor,
                Regex::new(r"(?i)\b(?:bachelor(?:'s|s)?|b\.?\s?sc|b\.?\s?tech|b\.?\s?eng|bba|b\.?\s?com|undergraduate\s+degree)\b")
                    .expect("Invalid bachelor regex"),
            ),
            (
                EducationLevel::Associate,
                Regex::new(r"(?i)\bassociate(?:'s|s)?\s+(?:degree|of)\b")
                    .expect("Invalid associate regex"),
            ),
            (
                EducationLevel::HighSchool,
                Regex::new(r"(?i)\b(?:high\s+school|secondary\s+school|ged)\b")
                    .expect("Invalid high-school regex"),
            ),
        ];

        // "CGPA 3.6/4.0" carries its own scale; bare "CGPA 3.6" infers it
        // from magnitude.
        let gpa_scaled_pattern = Regex::new(
            r"(?i)\bc?gpa\b\s*(?:[:=]|of)?\s*(\d{1,3}(?:\.\d{1,2})?)\s*/\s*(\d{1,3}(?:\.\d)?)",
        )
        .expect("Invalid scaled GPA regex");
        let gpa_patterns = vec![
            Regex::new(r"(?i)\bc?gpa\b\s*(?:[:=]|of)?\s*(\d{1,3}(?:\.\d{1,2})?)")
                .expect("Invalid GPA regex"),
            Regex::new(r"(?i)(\d{1,3}(?:\.\d{1,2})?)\s*c?gpa\b").expect("Invalid reversed GPA regex"),
        ];

        Self {
            year_patterns,
            range_pattern,
            title_pattern,
            degree_patterns,
            gpa_scaled_pattern,
            gpa_patterns,
        }
    }

    /// Extract all structured fields in one pass over the raw text. Runs on
    /// the unnormalized document because job titles rely on capitalization.
    pub fn extract(&self, raw_text: &str) -> StructuredFields {
        StructuredFields {
            years_experience: self.extract_years(raw_text),
            job_titles: self.extract_job_titles(raw_text),
            education_level: self.extract_education(raw_text),
            cgpa: self.extract_cgpa(raw_text),
        }
    }

    /// Maximum plausible year count found near an experience keyword. The
    /// resume states cumulative experience somewhere; under-counting is
    /// worse than slight over-counting.
    fn extract_years(&self, text: &str) -> Option<u32> {
        let mut candidates: Vec<u32> = Vec::new();

        for pattern in &self.year_patterns {
            for caps in pattern.captures_iter(text) {
                if let Some(years) = caps.get(1).and_then(|m| m.as_str().parse().ok()) {
                    candidates.push(years);
                }
            }
        }
        for caps in self.range_pattern.captures_iter(text) {
            for group in [1, 2] {
                if let Some(years) = caps.get(group).and_then(|m| m.as_str().parse().ok()) {
                    candidates.push(years);
                }
            }
        }

        candidates
            .into_iter()
            .filter(|y| *y <= MAX_PLAUSIBLE_YEARS)
            .max()
    }

    fn extract_job_titles(&self, text: &str) -> BTreeSet<String> {
        self.title_pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| {
                m.as_str()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase()
            })
            .collect()
    }

    fn extract_education(&self, text: &str) -> Option<EducationLevel> {
        self.degree_patterns
            .iter()
            .filter(|(_, pattern)| pattern.is_match(text))
            .map(|(level, _)| *level)
            .max()
    }

    fn extract_cgpa(&self, text: &str) -> Option<Cgpa> {
        // An explicit denominator names the scale directly.
        for caps in self.gpa_scaled_pattern.captures_iter(text) {
            let value: Option<f32> = caps.get(1).and_then(|m| m.as_str().parse().ok());
            let denominator: Option<f32> = caps.get(2).and_then(|m| m.as_str().parse().ok());
            let (Some(value), Some(denominator)) = (value, denominator) else {
                continue;
            };
            let scale = if (denominator - 4.0).abs() < 0.11 {
                GpaScale::FourPoint
            } else if (denominator - 10.0).abs() < 0.11 {
                GpaScale::TenPoint
            } else if (denominator - 100.0).abs() < 0.11 {
                GpaScale::Percent
            } else {
                continue;
            };
            if value >= 0.0 && value <= scale.max_value() {
                return Some(Cgpa { value, scale });
            }
        }

        for pattern in &self.gpa_patterns {
            for caps in pattern.captures_iter(text) {
                let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<f32>().ok()) else {
                    continue;
                };
                if let Some(scale) = Self::infer_scale(value) {
                    return Some(Cgpa { value, scale });
                }
            }
        }
        None
    }

    /// First plausible scale by magnitude; implausible values are extraction
    /// noise and dropped.
    fn infer_scale(value: f32) -> Option<GpaScale> {
        if value < 0.0 {
            None
        } else if value <= 4.0 {
            Some(GpaScale::FourPoint)
        } else if value <= 10.0 {
            Some(GpaScale::TenPoint)
        } else if value <= 100.0 {
            Some(GpaScale::Percent)
        } else {
            None
        }
    }
}
