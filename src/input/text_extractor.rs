//! Text extraction from supported file formats

use crate::error::{Result, ScreenerError};
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(ScreenerError::Io)?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            ScreenerError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(text)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await.map_err(ScreenerError::Io)?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown = fs::read_to_string(path).await.map_err(ScreenerError::Io)?;
        Ok(Self::to_plain_text(&markdown))
    }
}

impl MarkdownExtractor {
    /// Walk the markdown event stream and keep only the prose; formatting
    /// markers never reach the analysis layer.
    fn to_plain_text(markdown: &str) -> String {
        let mut out = String::new();

        for event in Parser::new(markdown) {
            match event {
                Event::Text(text) | Event::Code(text) => out.push_str(&text),
                Event::SoftBreak | Event::HardBreak => out.push(' '),
                Event::End(Tag::Paragraph)
                | Event::End(Tag::Heading(..))
                | Event::End(Tag::Item)
                | Event::End(Tag::CodeBlock(_))
                | Event::End(Tag::Table(_)) => out.push('\n'),
                _ => {}
            }
        }

        let lines: Vec<&str> = out
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_formatting_is_stripped() {
        let markdown = "# Jane Rivera\n\n**Data Analyst**\n\n- Python\n- SQL\n";
        let text = MarkdownExtractor::to_plain_text(markdown);

        assert!(text.contains("Jane Rivera"));
        assert!(text.contains("Data Analyst"));
        assert!(text.contains("Python"));
        assert!(!text.contains('#'));
        assert!(!text.contains("**"));
        assert!(!text.contains('-'));
    }

    #[test]
    fn test_markdown_list_items_keep_their_own_lines() {
        let text = MarkdownExtractor::to_plain_text("- Python\n- SQL\n- Tableau\n");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Python", "SQL", "Tableau"]);
    }
}
