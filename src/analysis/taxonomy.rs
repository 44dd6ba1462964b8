//! Skill taxonomy: an immutable domain -> subcategory -> skills mapping
//!
//! The taxonomy is constructed explicitly and injected into the extractors,
//! so tests can supply a minimal fixture instead of the embedded database.

use crate::error::{Result, ScreenerError};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_TAXONOMY: &str = include_str!("../../data/skills.json");

/// Read-only skill database, loaded once per process. Declaration order of
/// domains and skills is preserved and drives extractor output ordering.
#[derive(Debug, Clone, Serialize)]
pub struct SkillTaxonomy {
    domains: Vec<SkillDomain>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillDomain {
    pub name: String,
    pub subcategories: Vec<SkillGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillGroup {
    pub name: String,
    pub skills: Vec<String>,
}

/// A single taxonomy leaf in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct SkillRef<'a> {
    pub domain: &'a str,
    pub subcategory: &'a str,
    pub name: &'a str,
}

impl SkillTaxonomy {
    /// Parse the taxonomy embedded in the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_TAXONOMY)
    }

    /// Load a taxonomy from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScreenerError::Configuration(format!(
                "Failed to read taxonomy '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Parse and validate taxonomy JSON: an object of domains, each an object
    /// of subcategories, each a non-empty-string array. Skill names are
    /// lowercased to their canonical form; a name may appear under several
    /// domains but at most once within one domain.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| ScreenerError::Configuration(format!("Invalid taxonomy JSON: {}", e)))?;

        let root = value.as_object().ok_or_else(|| {
            ScreenerError::Configuration("taxonomy root must be a JSON object of domains".into())
        })?;

        let mut domains = Vec::with_capacity(root.len());
        for (domain_name, subcategories_value) in root {
            let groups = subcategories_value.as_object().ok_or_else(|| {
                ScreenerError::Configuration(format!(
                    "domain '{}' must be an object of subcategories",
                    domain_name
                ))
            })?;

            let mut seen_in_domain = HashSet::new();
            let mut subcategories = Vec::with_capacity(groups.len());
            for (group_name, skills_value) in groups {
                let entries = skills_value.as_array().ok_or_else(|| {
                    ScreenerError::Configuration(format!(
                        "subcategory '{}.{}' must be an array of skill names",
                        domain_name, group_name
                    ))
                })?;

                let mut skills = Vec::with_capacity(entries.len());
                for entry in entries {
                    let raw = entry.as_str().ok_or_else(|| {
                        ScreenerError::Configuration(format!(
                            "subcategory '{}.{}' contains a non-string entry",
                            domain_name, group_name
                        ))
                    })?;
                    let canonical = raw.trim().to_lowercase();
                    if canonical.is_empty() {
                        return Err(ScreenerError::Configuration(format!(
                            "subcategory '{}.{}' contains an empty skill name",
                            domain_name, group_name
                        )));
                    }
                    if !seen_in_domain.insert(canonical.clone()) {
                        return Err(ScreenerError::Configuration(format!(
                            "skill '{}' appears more than once in domain '{}'",
                            canonical, domain_name
                        )));
                    }
                    skills.push(canonical);
                }
                subcategories.push(SkillGroup {
                    name: group_name.clone(),
                    skills,
                });
            }
            domains.push(SkillDomain {
                name: domain_name.clone(),
                subcategories,
            });
        }

        Ok(Self { domains })
    }

    pub fn domains(&self) -> &[SkillDomain] {
        &self.domains
    }

    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    /// Total number of taxonomy leaves (per-domain entries).
    pub fn skill_count(&self) -> usize {
        self.domains
            .iter()
            .flat_map(|d| d.subcategories.iter())
            .map(|g| g.skills.len())
            .sum()
    }

    /// All leaves in declaration order.
    pub fn iter_skills(&self) -> impl Iterator<Item = SkillRef<'_>> {
        self.domains.iter().flat_map(|domain| {
            domain.subcategories.iter().flat_map(move |group| {
                group.skills.iter().map(move |name| SkillRef {
                    domain: &domain.name,
                    subcategory: &group.name,
                    name,
                })
            })
        })
    }

    /// Distinct canonical names in first-occurrence order.
    pub fn distinct_skills(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.iter_skills()
            .filter(|s| seen.insert(s.name))
            .map(|s| s.name)
            .collect()
    }
}
