use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Portfolio facts handed to generation providers as their only source of truth.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioProfile {
    pub name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    pub availability: String,
    pub summary: String,
    pub experience: Vec<Position>,
    pub skills: Vec<SkillCategory>,
    pub projects: Vec<Project>,
    pub certifications: Vec<String>,
    pub education: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub company: String,
    pub role: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
}

impl PortfolioProfile {
    /// Reads a profile from a JSON file. Missing fields fall back to empty values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read portfolio profile at {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Portfolio profile at {} is not valid JSON", path.display()))
    }

    /// Profile used when no `PORTFOLIO_PROFILE_PATH` is configured.
    pub fn builtin() -> Self {
        Self {
            name: "Veera Venkata Sai Mane".to_string(),
            title: "Full Stack Developer & Consultant".to_string(),
            location: "Hyderabad, Telangana".to_string(),
            email: "venkatsaimane@gmail.com".to_string(),
            availability: "Open to opportunities".to_string(),
            summary: "Full stack developer with 4+ years building enterprise applications \
                across e-commerce, logistics and cloud infrastructure."
                .to_string(),
            experience: vec![
                Position {
                    company: "Deloitte USI".to_string(),
                    role: "Consultant".to_string(),
                    start: "2025-03".to_string(),
                    end: "Present".to_string(),
                },
                Position {
                    company: "Nisum Technologies".to_string(),
                    role: "Software Engineer".to_string(),
                    start: "2024-06".to_string(),
                    end: "2025-03".to_string(),
                },
                Position {
                    company: "Infosys".to_string(),
                    role: "System Engineer".to_string(),
                    start: "2022-01".to_string(),
                    end: "2024-06".to_string(),
                },
            ],
            skills: vec![
                SkillCategory {
                    name: "Backend".to_string(),
                    skills: vec!["Java".into(), "Spring Boot".into(), "Kafka".into()],
                },
                SkillCategory {
                    name: "Frontend".to_string(),
                    skills: vec!["React".into(), "Angular".into(), "TypeScript".into()],
                },
                SkillCategory {
                    name: "Cloud & DevOps".to_string(),
                    skills: vec!["AWS".into(), "Azure".into(), "Docker".into(), "Kubernetes".into()],
                },
            ],
            projects: vec![
                Project {
                    title: "VibeCart".to_string(),
                    description: "E-commerce platform serving 10K+ users".to_string(),
                    technologies: vec!["React".into(), "Node.js".into(), "MongoDB".into()],
                },
                Project {
                    title: "Infosys Polycloud".to_string(),
                    description: "Multi-cloud management platform".to_string(),
                    technologies: vec!["Java".into(), "Spring Boot".into(), "AWS".into()],
                },
            ],
            certifications: vec![
                "AWS Certified Cloud Practitioner".to_string(),
                "Microsoft Azure Fundamentals".to_string(),
            ],
            education: vec!["B.Tech in Mechanical Engineering".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file_fills_missing_fields_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "Ada", "certifications": ["CKA"]}}"#).unwrap();

        let profile = PortfolioProfile::from_file(file.path()).unwrap();
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.certifications, vec!["CKA".to_string()]);
        assert!(profile.experience.is_empty());
    }

    #[test]
    fn test_from_file_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(PortfolioProfile::from_file(file.path()).is_err());
    }

    #[test]
    fn test_builtin_profile_has_contact_details() {
        let profile = PortfolioProfile::builtin();
        assert!(!profile.name.is_empty());
        assert!(profile.email.contains('@'));
    }
}
