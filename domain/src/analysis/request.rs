//! Analysis request value objects

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// What kind of text the service should generate (Value Object)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    #[default]
    AltText,
    Caption,
    Description,
    Title,
    /// Any role name the service accepts that is not listed above
    Custom(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::AltText => "alt_text",
            Role::Caption => "caption",
            Role::Description => "description",
            Role::Title => "title",
            Role::Custom(s) => s,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "alt_text" | "alt-text" | "alt" => Role::AltText,
            "caption" => Role::Caption,
            "description" => Role::Description,
            "title" => Role::Title,
            other => Role::Custom(other.to_string()),
        })
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        // Infallible
        Ok(s.parse().unwrap_or_default())
    }
}

/// Analysis capability requested from the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Describe,
    Tags,
    Ocr,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Describe => "describe",
            Feature::Tags => "tags",
            Feature::Ocr => "ocr",
        }
    }
}

impl std::str::FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "describe" => Ok(Feature::Describe),
            "tags" => Ok(Feature::Tags),
            "ocr" => Ok(Feature::Ocr),
            other => Err(format!("unknown feature '{other}'")),
        }
    }
}

/// Set of features sent with one request; defaults to `{describe}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet(BTreeSet<Feature>);

impl FeatureSet {
    pub fn new(features: impl IntoIterator<Item = Feature>) -> Self {
        let set: BTreeSet<Feature> = features.into_iter().collect();
        if set.is_empty() {
            Self::default()
        } else {
            Self(set)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.0.iter().copied()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|f| f.as_str()).collect()
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self(BTreeSet::from([Feature::Describe]))
    }
}

/// The instruction actually sent for a request: a role, or a custom prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction<'a> {
    Role(&'a Role),
    Prompt(&'a str),
}

/// One "analyze this resource" request built by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    resource: PathBuf,
    role: Role,
    custom_prompt: Option<String>,
    language: String,
    backend: Option<String>,
    features: FeatureSet,
}

impl AnalysisRequest {
    pub fn new(resource: impl Into<PathBuf>, role: Role) -> Self {
        Self {
            resource: resource.into(),
            role,
            custom_prompt: None,
            language: "en".to_string(),
            backend: None,
            features: FeatureSet::default(),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_custom_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.custom_prompt = Some(prompt.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_backend(mut self, backend: Option<String>) -> Self {
        self.backend = backend.filter(|b| !b.trim().is_empty());
        self
    }

    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = features;
        self
    }

    // ==================== Accessors ====================

    pub fn resource(&self) -> &Path {
        &self.resource
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn backend(&self) -> Option<&str> {
        self.backend.as_deref()
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// The active instruction: a non-empty custom prompt wins over the role.
    pub fn instruction(&self) -> Instruction<'_> {
        match self.custom_prompt.as_deref().map(str::trim) {
            Some(prompt) if !prompt.is_empty() => Instruction::Prompt(prompt),
            _ => Instruction::Role(&self.role),
        }
    }
}
