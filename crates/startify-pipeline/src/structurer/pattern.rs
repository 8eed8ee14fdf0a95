use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use startify_core::{Entity, StructuredIdea, DEFAULT_AUDIENCE, DEFAULT_INDUSTRY};

use super::IdeaStructurer;

/// Ordered; first match wins. The first pattern tolerates one gerund between
/// the domain word and the product keyword ("fitness tracking app").
static INDUSTRY_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(\w+)\s+(?:\w+ing\s+)?(?:app|platform|service|system|tool|software)\b")
            .expect("valid industry regex"),
        Regex::new(r"\b(?:app|platform|service)\s+for\s+(\w+)").expect("valid industry regex"),
    ]
});

static AUDIENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfor\s+([\w\s]+?)(?:\s+with|\s+and|\s+including|$)")
        .expect("valid audience regex")
});

static FEATURE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"\bwith\s+([\w\s]+?)(?:\s+and|\s+including|$)").expect("valid feature regex"),
        Regex::new(r"\bincluding\s+([\w\s]+?)(?:\s+and|\s+with|$)").expect("valid feature regex"),
        Regex::new(r"\band\s+([\w\s]+?)(?:\s+with|\s+including|$)").expect("valid feature regex"),
    ]
});

const SKIP_WORDS: [&str; 14] = [
    "app", "platform", "service", "system", "tool", "software", "a", "an", "the", "for", "with",
    "and", "smart", "ai",
];

/// Regex-driven strategy. Dependency-free and deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternStructurer;

#[async_trait]
impl IdeaStructurer for PatternStructurer {
    async fn structure(&self, raw: &str) -> StructuredIdea {
        let idea = structure_with_patterns(raw);
        tracing::debug!(
            strategy = "pattern",
            industry = %idea.industry,
            audience = %idea.target_audience,
            features = idea.features.len(),
            "idea structured"
        );
        idea
    }

    fn strategy(&self) -> &'static str {
        "pattern"
    }
}

/// Synchronous core of [`PatternStructurer`].
#[must_use]
pub fn structure_with_patterns(raw: &str) -> StructuredIdea {
    let lower = raw.to_lowercase();
    StructuredIdea::new(
        extract_industry(&lower),
        extract_audience(&lower),
        extract_features(&lower),
        extract_entities(raw),
        raw,
    )
}

fn extract_industry(lower: &str) -> String {
    for pattern in INDUSTRY_PATTERNS.iter() {
        if let Some(word) = pattern.captures(lower).and_then(|c| c.get(1)) {
            return word.as_str().to_string();
        }
    }

    lower
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(char::is_ascii_lowercase)
                .collect::<String>()
        })
        .find(|word| word.len() > 3 && !SKIP_WORDS.contains(&word.as_str()))
        .unwrap_or_else(|| DEFAULT_INDUSTRY.to_string())
}

fn extract_audience(lower: &str) -> String {
    AUDIENCE_PATTERN
        .captures(lower)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_AUDIENCE.to_string())
}

fn extract_features(lower: &str) -> Vec<String> {
    let mut features: Vec<String> = Vec::new();
    for pattern in FEATURE_PATTERNS.iter() {
        for caps in pattern.captures_iter(lower) {
            let Some(m) = caps.get(1) else { continue };
            let feature = m.as_str().trim();
            if feature.chars().count() > 2 && !features.iter().any(|f| f == feature) {
                features.push(feature.to_string());
            }
        }
    }
    features
}

/// Capitalized whitespace-delimited tokens. Offsets come from the first
/// occurrence of the token in `raw`, so a repeated token reports the position
/// of its first appearance.
fn extract_entities(raw: &str) -> Vec<Entity> {
    raw.split_whitespace()
        .filter(|word| word.chars().next().is_some_and(char::is_uppercase) && word.chars().count() > 1)
        .filter_map(|word| {
            let byte_start = raw.find(word)?;
            let start = raw[..byte_start].chars().count();
            Some(Entity {
                text: word.to_string(),
                label: "ENTITY".to_string(),
                start,
                end: start + word.chars().count(),
            })
        })
        .collect()
}
