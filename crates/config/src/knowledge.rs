//! Knowledge Base
//!
//! Static facts about the business used to fill reply templates and the
//! external model's system prompt. Built once at startup and shared
//! read-only for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{ConfigError, Settings};

/// Brand identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandInfo {
    pub name: String,
    pub tagline: String,
    pub mission: String,
    #[serde(default)]
    pub values: Vec<String>,
    pub positioning: String,
}

/// Managed farmland concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub managed_farmland: String,
    pub ownership_model: String,
    #[serde(default)]
    pub benefits: Vec<String>,
}

/// Plantation offering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plantation {
    /// Lookup key (e.g. "mango")
    pub key: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    pub description: String,
}

/// Farmland project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Lookup key (e.g. "korlaparti")
    pub key: String,
    /// Full display name
    pub name: String,
    /// Name used in running text (e.g. "Korlaparti")
    pub short_name: String,
    pub location: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub status: String,
}

/// On-site amenities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenities {
    #[serde(default)]
    pub infrastructure: Vec<String>,
    #[serde(default)]
    pub lifestyle: Vec<String>,
    pub maintenance: String,
}

/// Investment facts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub returns: String,
    pub timeline: String,
    pub legal: String,
    pub payment: String,
}

/// Business knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub brand_info: BrandInfo,
    pub concept: Concept,
    /// Plantations in presentation order
    pub plantations: Vec<Plantation>,
    /// Projects in presentation order
    pub projects: Vec<Project>,
    pub amenities: Amenities,
    pub investment: Investment,
}

impl KnowledgeBase {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let kb: KnowledgeBase =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        kb.validate()?;
        Ok(kb)
    }

    /// Knowledge base selected by settings, built-in when no path is configured
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        match settings.knowledge_base_path.as_deref() {
            Some(path) => {
                let kb = Self::load(path)?;
                tracing::info!(
                    path = %path,
                    projects = kb.projects.len(),
                    plantations = kb.plantations.len(),
                    "Loaded knowledge base"
                );
                Ok(kb)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.brand_info.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "brand_info.name".to_string(),
                message: "Brand name must not be empty".to_string(),
            });
        }

        if self.projects.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "projects".to_string(),
                message: "At least one project is required".to_string(),
            });
        }

        Ok(())
    }

    pub fn project_short_names(&self) -> Vec<&str> {
        self.projects.iter().map(|p| p.short_name.as_str()).collect()
    }

    pub fn plantation_names(&self) -> Vec<&str> {
        self.plantations.iter().map(|p| p.name.as_str()).collect()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self {
            brand_info: BrandInfo {
                name: "Neralu Farms / Neralu Managed Farms".to_string(),
                tagline: "Nature-based luxury managed farmland".to_string(),
                mission: "To provide sustainable managed farmland ownership with long-term returns and lifestyle benefits".to_string(),
                values: strings(&[
                    "Sustainability",
                    "Transparency",
                    "Trust",
                    "Nature-focused living",
                    "Long-term value creation",
                ]),
                positioning: "Premium managed farmland investment combining lifestyle, returns, and environmental consciousness".to_string(),
            },
            concept: Concept {
                managed_farmland: "Neralu offers fully managed farmland where you own the land while we handle plantation, maintenance, and management. It's a hassle-free investment in nature.".to_string(),
                ownership_model: "You own the farmland with clear legal titles. Neralu manages the plantation, irrigation, maintenance, and harvesting.".to_string(),
                benefits: strings(&[
                    "Passive income through plantation yields",
                    "Land appreciation over time",
                    "Weekend getaway and lifestyle amenity",
                    "Tax benefits on agricultural land",
                    "Sustainable and eco-friendly investment",
                    "Professional farm management included",
                ]),
            },
            plantations: vec![
                Plantation {
                    key: "mango".to_string(),
                    name: "Mango".to_string(),
                    emoji: "🥭".to_string(),
                    description: "Premium mango varieties with excellent yield potential and market demand".to_string(),
                },
                Plantation {
                    key: "coconut".to_string(),
                    name: "Coconut".to_string(),
                    emoji: "🥥".to_string(),
                    description: "High-yielding coconut plantations with consistent returns".to_string(),
                },
                Plantation {
                    key: "timber".to_string(),
                    name: "Timber".to_string(),
                    emoji: "🌲".to_string(),
                    description: "Long-term timber plantations including teak and other hardwoods".to_string(),
                },
                Plantation {
                    key: "sandalwood".to_string(),
                    name: "Sandalwood".to_string(),
                    emoji: "🪵".to_string(),
                    description: "Premium sandalwood plantation with exceptional long-term value".to_string(),
                },
            ],
            projects: vec![
                Project {
                    key: "korlaparti".to_string(),
                    name: "Korlaparti Project".to_string(),
                    short_name: "Korlaparti".to_string(),
                    location: "Korlaparti area with excellent connectivity".to_string(),
                    features: strings(&[
                        "Well-planned layouts",
                        "Water infrastructure",
                        "Road connectivity",
                        "Community spaces",
                    ]),
                    status: "Available for booking".to_string(),
                },
                Project {
                    key: "sandal_valley".to_string(),
                    name: "Sandal Valley Project".to_string(),
                    short_name: "Sandal Valley".to_string(),
                    location: "Premium location for sandalwood plantation".to_string(),
                    features: strings(&[
                        "Sandalwood focus",
                        "Premium amenities",
                        "Gated community",
                        "Luxury farmhouse plots",
                    ]),
                    status: "Available for booking".to_string(),
                },
            ],
            amenities: Amenities {
                infrastructure: strings(&[
                    "Paved internal roads",
                    "Drip irrigation system",
                    "Bore wells and water storage",
                    "Electricity connection",
                    "Security and fencing",
                ]),
                lifestyle: strings(&[
                    "Clubhouse",
                    "Children's play area",
                    "Walking trails",
                    "Organic farming zones",
                    "Event spaces",
                ]),
                maintenance: "Professional farm management team handles all plantation care, irrigation, fertilization, and harvesting".to_string(),
            },
            investment: Investment {
                returns: "Combination of land appreciation and plantation yields over time".to_string(),
                timeline: "Medium to long-term investment (5-15 years) with progressive returns".to_string(),
                legal: "Clear legal titles, RERA compliance where applicable, and transparent documentation".to_string(),
                payment: "Flexible payment plans available. Contact team for current pricing and offers".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_knowledge_base() {
        let kb = KnowledgeBase::default();
        assert!(kb.validate().is_ok());
        assert_eq!(kb.project_short_names(), vec!["Korlaparti", "Sandal Valley"]);
        assert_eq!(
            kb.plantation_names(),
            vec!["Mango", "Coconut", "Timber", "Sandalwood"]
        );
        assert_eq!(kb.concept.benefits.len(), 6);
    }

    #[test]
    fn test_load_from_yaml() {
        let mut kb = KnowledgeBase::default();
        kb.projects.truncate(1);
        let yaml = serde_yaml::to_string(&kb).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let loaded = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(loaded, kb);
        assert_eq!(loaded.projects.len(), 1);
    }

    #[test]
    fn test_load_rejects_empty_projects() {
        let mut kb = KnowledgeBase::default();
        kb.projects.clear();
        let yaml = serde_yaml::to_string(&kb).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        assert!(matches!(
            KnowledgeBase::load(file.path()),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            KnowledgeBase::load("/nonexistent/knowledge.yaml"),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_from_settings_defaults_to_builtin() {
        let settings = Settings::default();
        let kb = KnowledgeBase::from_settings(&settings).unwrap();
        assert_eq!(kb, KnowledgeBase::default());
    }
}
