use serde::{Deserialize, Serialize};

/// Sentinel industry used when extraction finds nothing.
pub const DEFAULT_INDUSTRY: &str = "general";

/// Sentinel audience used when extraction finds nothing.
pub const DEFAULT_AUDIENCE: &str = "general public";

/// A named span recognized in the raw idea text. Offsets are character
/// offsets, end-exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// Normalized form of a free-text idea.
///
/// `industry` and `target_audience` are never empty; use [`StructuredIdea::new`]
/// to get the sentinel substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredIdea {
    pub industry: String,
    pub target_audience: String,
    pub features: Vec<String>,
    pub entities: Vec<Entity>,
    pub raw: String,
}

impl StructuredIdea {
    /// Build a structured idea, replacing blank industry/audience with the
    /// sentinel defaults.
    #[must_use]
    pub fn new(
        industry: impl Into<String>,
        target_audience: impl Into<String>,
        features: Vec<String>,
        entities: Vec<Entity>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            industry: non_blank_or(industry.into(), DEFAULT_INDUSTRY),
            target_audience: non_blank_or(target_audience.into(), DEFAULT_AUDIENCE),
            features,
            entities,
            raw: raw.into(),
        }
    }

    /// The all-default structure for `raw`.
    #[must_use]
    pub fn fallback(raw: impl Into<String>) -> Self {
        Self::new(DEFAULT_INDUSTRY, DEFAULT_AUDIENCE, Vec::new(), Vec::new(), raw)
    }

    /// Features joined for prose, or `"innovative features"` when there are none.
    #[must_use]
    pub fn feature_phrase(&self) -> String {
        if self.features.is_empty() {
            "innovative features".to_string()
        } else {
            self.features.join(", ")
        }
    }
}

fn non_blank_or(value: String, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}
