//! Report formatters: console, JSON, Markdown, and batch CSV

use crate::analysis::engine::Analysis;
use crate::config::OutputFormat;
use crate::error::{Result, ScreenerError};
use colored::Colorize;

/// One batch result, labeled with the name of its source document.
pub struct BatchEntry {
    pub name: String,
    pub result: Result<Analysis>,
}

/// Formats a single analysis for the selected output format.
pub trait OutputFormatter {
    fn format_analysis(&self, analysis: &Analysis) -> Result<String>;
}

pub struct ConsoleFormatter {
    pub use_colors: bool,
    pub detailed: bool,
}

pub struct JsonFormatter {
    pub pretty: bool,
}

pub struct MarkdownFormatter;

/// Coordinates the per-format formatters.
pub struct ReportGenerator {
    use_colors: bool,
    detailed: bool,
}

impl ReportGenerator {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            use_colors,
            detailed,
        }
    }

    pub fn format(&self, analysis: &Analysis, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => ConsoleFormatter {
                use_colors: self.use_colors,
                detailed: self.detailed,
            }
            .format_analysis(analysis),
            OutputFormat::Json => JsonFormatter { pretty: true }.format_analysis(analysis),
            OutputFormat::Markdown => MarkdownFormatter.format_analysis(analysis),
            OutputFormat::Csv => Err(ScreenerError::OutputFormatting(
                "CSV output is only available for batch runs".to_string(),
            )),
        }
    }

    /// Batch summary: ranking table on the console, rows for CSV, array for
    /// JSON. Failed entries keep their position with an error marker.
    pub fn format_batch(&self, entries: &[BatchEntry], format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Csv => Ok(Self::batch_csv(entries)),
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = entries
                    .iter()
                    .map(|entry| match &entry.result {
                        Ok(analysis) => serde_json::json!({
                            "name": entry.name,
                            "analysis": analysis,
                        }),
                        Err(e) => serde_json::json!({
                            "name": entry.name,
                            "error": e.to_string(),
                        }),
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Console => Ok(self.batch_table(entries)),
            OutputFormat::Markdown => Err(ScreenerError::OutputFormatting(
                "Markdown output is only available for single-resume runs".to_string(),
            )),
        }
    }

    fn batch_csv(entries: &[BatchEntry]) -> String {
        let mut out = String::from(
            "name,overall,skills,experience,education,job_fit,readability,error\n",
        );
        for entry in entries {
            match &entry.result {
                Ok(analysis) => {
                    let b = &analysis.breakdown;
                    out.push_str(&format!(
                        "{},{},{:.1},{:.1},{:.1},{},{:.1},\n",
                        csv_field(&entry.name),
                        b.overall,
                        b.skills,
                        b.experience,
                        b.education,
                        b.job_fit.map_or(String::new(), |v| format!("{:.1}", v)),
                        b.readability,
                    ));
                }
                Err(e) => {
                    out.push_str(&format!(
                        "{},,,,,,,{}\n",
                        csv_field(&entry.name),
                        csv_field(&e.to_string())
                    ));
                }
            }
        }
        out
    }

    fn batch_table(&self, entries: &[BatchEntry]) -> String {
        let mut ranked: Vec<&BatchEntry> = entries.iter().collect();
        ranked.sort_by(|a, b| {
            let score = |e: &BatchEntry| e.result.as_ref().map(|a| a.breakdown.overall).unwrap_or(0);
            score(b).cmp(&score(a))
        });

        let mut out = String::new();
        out.push_str(&format!(
            "{:<4} {:<30} {:>7} {:>7}\n",
            "Rank", "Resume", "Score", "Skills"
        ));
        for (rank, entry) in ranked.iter().enumerate() {
            match &entry.result {
                Ok(analysis) => {
                    let score = analysis.breakdown.overall;
                    let score_text = if self.use_colors {
                        colorize_score(score, &format!("{:>7}", score))
                    } else {
                        format!("{:>7}", score)
                    };
                    out.push_str(&format!(
                        "{:<4} {:<30} {} {:>7}\n",
                        rank + 1,
                        truncate(&entry.name, 30),
                        score_text,
                        analysis.skills.len()
                    ));
                }
                Err(e) => {
                    out.push_str(&format!(
                        "{:<4} {:<30} {:>7} {}\n",
                        "-",
                        truncate(&entry.name, 30),
                        "error",
                        e
                    ));
                }
            }
        }
        out
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_analysis(&self, analysis: &Analysis) -> Result<String> {
        let b = &analysis.breakdown;
        let mut out = String::new();

        let headline = format!("Overall score: {}/100  ({})", b.overall, score_label(b.overall));
        if self.use_colors {
            out.push_str(&colorize_score(b.overall, &headline));
        } else {
            out.push_str(&headline);
        }
        out.push('\n');

        out.push_str("\nSub-scores\n");
        for (category, score) in [
            ("skills", Some(b.skills)),
            ("experience", Some(b.experience)),
            ("education", Some(b.education)),
            ("job_fit", b.job_fit),
            ("readability", Some(b.readability)),
        ] {
            if let Some(score) = score {
                let weight = b.weights_used.get(category).copied().unwrap_or(0.0);
                out.push_str(&format!(
                    "  {:<12} {:>5.1}  (weight {:.0}%)\n",
                    category,
                    score,
                    weight * 100.0
                ));
            }
        }

        out.push_str("\nWhy\n");
        for (category, notes) in &b.category_explanations {
            for note in notes {
                out.push_str(&format!("  [{}] {}\n", category, note));
            }
        }

        if let Some(fit) = &analysis.job_fit {
            if !fit.missing_skills.is_empty() {
                out.push_str(&format!(
                    "\nMissing priority skills: {}\n",
                    fit.missing_skills.join(", ")
                ));
            }
            if !fit.matched_priority_skills.is_empty() {
                out.push_str(&format!(
                    "Matched priority skills: {}\n",
                    fit.matched_priority_skills.join(", ")
                ));
            }
        }

        if self.detailed {
            out.push_str("\nExtracted skills\n");
            let mut current_domain = "";
            for skill in &analysis.skills {
                if skill.domain != current_domain {
                    out.push_str(&format!("  {}:\n", skill.domain));
                    current_domain = &skill.domain;
                }
                out.push_str(&format!(
                    "    {} ({:.2}, \"{}\")\n",
                    skill.canonical_name, skill.match_strength, skill.matched_text
                ));
            }

            out.push_str("\nStructured fields\n");
            out.push_str(&format!(
                "  years_experience: {}\n",
                analysis
                    .structured
                    .years_experience
                    .map_or("not found".to_string(), |y| y.to_string())
            ));
            out.push_str(&format!(
                "  education_level: {}\n",
                analysis
                    .structured
                    .education_level
                    .map_or("not found", |l| l.label())
            ));
            if !analysis.structured.job_titles.is_empty() {
                let titles: Vec<&str> = analysis
                    .structured
                    .job_titles
                    .iter()
                    .map(|t| t.as_str())
                    .collect();
                out.push_str(&format!("  job_titles: {}\n", titles.join(", ")));
            }
            if let Some(cgpa) = analysis.structured.cgpa {
                out.push_str(&format!(
                    "  cgpa: {} (of {})\n",
                    cgpa.value,
                    cgpa.scale.max_value()
                ));
            }

            out.push_str(&format!(
                "\nProcessed in {} ms\n",
                analysis.processing_time_ms
            ));
        }

        Ok(out)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_analysis(&self, analysis: &Analysis) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(analysis)?
        } else {
            serde_json::to_string(analysis)?
        };
        Ok(json)
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_analysis(&self, analysis: &Analysis) -> Result<String> {
        let b = &analysis.breakdown;
        let mut out = String::new();

        out.push_str("# Resume screening report\n\n");
        out.push_str(&format!(
            "Generated: {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M")
        ));
        out.push_str(&format!(
            "## Overall score: {}/100 ({})\n\n",
            b.overall,
            score_label(b.overall)
        ));

        out.push_str("| Category | Score | Weight |\n|---|---|---|\n");
        for (category, score) in [
            ("skills", Some(b.skills)),
            ("experience", Some(b.experience)),
            ("education", Some(b.education)),
            ("job_fit", b.job_fit),
            ("readability", Some(b.readability)),
        ] {
            if let Some(score) = score {
                let weight = b.weights_used.get(category).copied().unwrap_or(0.0);
                out.push_str(&format!(
                    "| {} | {:.1} | {:.0}% |\n",
                    category,
                    score,
                    weight * 100.0
                ));
            }
        }

        out.push_str("\n## Rationale\n\n");
        for (category, notes) in &b.category_explanations {
            out.push_str(&format!("- **{}**\n", category));
            for note in notes {
                out.push_str(&format!("  - {}\n", note));
            }
        }

        if let Some(fit) = &analysis.job_fit {
            out.push_str("\n## Job fit\n\n");
            out.push_str(&format!("- Similarity: {:.2}\n", fit.similarity));
            if !fit.matched_priority_skills.is_empty() {
                out.push_str(&format!(
                    "- Matched priority skills: {}\n",
                    fit.matched_priority_skills.join(", ")
                ));
            }
            if !fit.missing_skills.is_empty() {
                out.push_str(&format!(
                    "- Missing priority skills: {}\n",
                    fit.missing_skills.join(", ")
                ));
            }
        }

        Ok(out)
    }
}

fn score_label(score: u8) -> &'static str {
    match score {
        85..=100 => "excellent",
        70..=84 => "good",
        50..=69 => "average",
        _ => "needs improvement",
    }
}

fn colorize_score(score: u8, text: &str) -> String {
    let colored = match score {
        85..=100 => text.green(),
        70..=84 => text.cyan(),
        50..=69 => text.yellow(),
        _ => text.red(),
    };
    colored.to_string()
}

fn truncate(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::engine::ScreeningEngine;
    use crate::analysis::taxonomy::SkillTaxonomy;
    use crate::config::Config;

    fn sample_analysis() -> Analysis {
        let taxonomy = SkillTaxonomy::from_json_str(
            r#"{"analytics": {"tools": ["python", "sql", "tableau"]}}"#,
        )
        .unwrap();
        let engine = ScreeningEngine::new(taxonomy, &Config::default()).unwrap();
        engine
            .analyze(
                "Data Analyst, 5 years of experience with Python and SQL. Bachelor's degree.",
                Some("Analyst role using Python and Tableau."),
            )
            .unwrap()
    }

    #[test]
    fn test_console_output_mentions_scores_and_rationale() {
        let analysis = sample_analysis();
        let out = ConsoleFormatter {
            use_colors: false,
            detailed: true,
        }
        .format_analysis(&analysis)
        .unwrap();

        assert!(out.contains("Overall score:"));
        assert!(out.contains("skills"));
        assert!(out.contains("years_experience: 5"));
        assert!(out.contains("Missing priority skills: tableau"));
    }

    #[test]
    fn test_json_output_round_trips() {
        let analysis = sample_analysis();
        let out = JsonFormatter { pretty: false }.format_analysis(&analysis).unwrap();
        let parsed: Analysis = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.breakdown, analysis.breakdown);
    }

    #[test]
    fn test_markdown_output_has_table() {
        let analysis = sample_analysis();
        let out = MarkdownFormatter.format_analysis(&analysis).unwrap();
        assert!(out.contains("| Category | Score | Weight |"));
        assert!(out.contains("job_fit"));
    }

    #[test]
    fn test_batch_csv_keeps_error_rows_in_place() {
        let analysis = sample_analysis();
        let entries = vec![
            BatchEntry {
                name: "good.txt".to_string(),
                result: Ok(analysis),
            },
            BatchEntry {
                name: "empty.txt".to_string(),
                result: Err(ScreenerError::InvalidInput("resume text is empty".to_string())),
            },
        ];
        let csv = ReportGenerator::new(false, false)
            .format_batch(&entries, &OutputFormat::Csv)
            .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("good.txt,"));
        assert!(lines[2].starts_with("empty.txt,"));
        assert!(lines[2].contains("resume text is empty"));
    }

    #[test]
    fn test_csv_field_escaping() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
