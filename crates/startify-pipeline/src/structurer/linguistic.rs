use std::sync::Arc;

use async_trait::async_trait;
use startify_core::{Entity, StructuredIdea, DEFAULT_AUDIENCE, DEFAULT_INDUSTRY};

use super::annotator::{AnnotatedDoc, Annotator, Token};
use super::pattern::structure_with_patterns;
use super::{IdeaStructurer, PRODUCT_KEYWORDS};

const FEATURE_INDICATORS: [&str; 5] = ["with", "including", "featuring", "offers", "provides"];
const CHUNK_MODIFIERS: [&str; 5] = ["compound", "amod", "det", "nummod", "poss"];
const FEATURE_MODIFIERS: [&str; 2] = ["compound", "amod"];

/// Dependency-parse strategy backed by an [`Annotator`].
///
/// A failed annotation call is served by the pattern strategy for that one
/// call; the strategy itself stays selected.
pub struct LinguisticStructurer {
    annotator: Arc<dyn Annotator>,
}

impl LinguisticStructurer {
    #[must_use]
    pub fn new(annotator: Arc<dyn Annotator>) -> Self {
        Self { annotator }
    }
}

#[async_trait]
impl IdeaStructurer for LinguisticStructurer {
    async fn structure(&self, raw: &str) -> StructuredIdea {
        match self.annotator.annotate(raw).await {
            Ok(doc) => {
                let idea = structure_annotated(&doc);
                tracing::debug!(
                    strategy = "linguistic",
                    industry = %idea.industry,
                    audience = %idea.target_audience,
                    features = idea.features.len(),
                    "idea structured"
                );
                idea
            }
            Err(e) => {
                tracing::warn!(error = %e, "annotation failed; structuring with patterns");
                structure_with_patterns(raw)
            }
        }
    }

    fn strategy(&self) -> &'static str {
        "linguistic"
    }
}

/// Extract a [`StructuredIdea`] from an already-annotated document.
#[must_use]
pub fn structure_annotated(doc: &AnnotatedDoc) -> StructuredIdea {
    let entities = doc
        .ents
        .iter()
        .map(|span| Entity {
            text: doc.slice(span.start, span.end).to_string(),
            label: span.label.clone(),
            start: span.start,
            end: span.end,
        })
        .collect();

    StructuredIdea::new(
        industry(doc),
        audience(doc),
        features(doc),
        entities,
        doc.text.clone(),
    )
}

fn lower(doc: &AnnotatedDoc, token: &Token) -> String {
    doc.token_text(token).to_lowercase()
}

fn is_product_keyword(doc: &AnnotatedDoc, token: &Token) -> bool {
    PRODUCT_KEYWORDS.contains(&lower(doc, token).as_str())
}

fn is_nominal(token: &Token) -> bool {
    matches!(token.pos.as_str(), "NOUN" | "PROPN")
}

/// First noun that governs a product keyword or sits directly before one.
fn industry(doc: &AnnotatedDoc) -> String {
    for token in &doc.tokens {
        if token.pos != "NOUN" || is_product_keyword(doc, token) {
            continue;
        }
        let governs_keyword = doc.children(token.id).any(|c| is_product_keyword(doc, c));
        let precedes_keyword = doc
            .tokens
            .get(token.id + 1)
            .is_some_and(|next| is_product_keyword(doc, next));
        if governs_keyword || precedes_keyword {
            return lower(doc, token);
        }
    }
    DEFAULT_INDUSTRY.to_string()
}

fn audience(doc: &AnnotatedDoc) -> String {
    for token in &doc.tokens {
        if lower(doc, token) != "for" || token.pos != "ADP" {
            continue;
        }
        let words: Vec<&str> = doc
            .children(token.head)
            .filter(|c| c.id > token.id && matches!(c.pos.as_str(), "NOUN" | "ADJ" | "PROPN"))
            .map(|c| doc.token_text(c))
            .collect();
        if !words.is_empty() {
            return words.join(" ");
        }
    }

    // Best effort: the first noun chunk that starts after the first "for ".
    let lowered = doc.text.to_lowercase();
    let Some(for_byte) = lowered.find("for ") else {
        return DEFAULT_AUDIENCE.to_string();
    };
    let for_char = lowered[..for_byte].chars().count();
    noun_chunks(doc)
        .into_iter()
        .find_map(|(start, end)| {
            let first = doc.tokens.get(start)?;
            let last = doc.tokens.get(end)?;
            (first.start > for_char).then(|| doc.slice(first.start, last.end).to_string())
        })
        .unwrap_or_else(|| DEFAULT_AUDIENCE.to_string())
}

/// Base noun phrases as inclusive token ranges, in document order: a nominal
/// head plus its contiguous left modifiers. Nouns that are themselves
/// compound modifiers are folded into their head's chunk.
fn noun_chunks(doc: &AnnotatedDoc) -> Vec<(usize, usize)> {
    let mut chunks: Vec<(usize, usize)> = Vec::new();
    for head in &doc.tokens {
        if !matches!(head.pos.as_str(), "NOUN" | "PROPN" | "PRON") || head.dep == "compound" {
            continue;
        }
        let mut start = head.id;
        while start > 0 {
            let Some(left) = doc.tokens.get(start - 1) else {
                break;
            };
            let attached_inside = left.head > left.id && left.head <= head.id;
            if attached_inside && CHUNK_MODIFIERS.contains(&left.dep.as_str()) {
                start -= 1;
            } else {
                break;
            }
        }
        if chunks.last().is_none_or(|&(_, prev_end)| start > prev_end) {
            chunks.push((start, head.id));
        }
    }
    chunks
}

/// Nominal objects of feature indicators, each prefixed by its compound and
/// adjectival modifiers. Coordinated nouns (`conj`) are followed so that
/// "delivery and digital payments" yields both items.
fn features(doc: &AnnotatedDoc) -> Vec<String> {
    let mut features: Vec<String> = Vec::new();
    let mut push = |feature: String| {
        if !feature.is_empty() && !features.contains(&feature) {
            features.push(feature);
        }
    };

    for indicator in &doc.tokens {
        if !FEATURE_INDICATORS.contains(&lower(doc, indicator).as_str()) {
            continue;
        }
        for object in doc.children(indicator.id).filter(|c| is_nominal(c)) {
            let mut pending = vec![object.id];
            let mut visited = Vec::new();
            while let Some(idx) = pending.pop() {
                if visited.contains(&idx) {
                    continue;
                }
                visited.push(idx);
                push(feature_phrase(doc, idx));
                let mut conjuncts: Vec<usize> = doc
                    .children(idx)
                    .filter(|c| c.dep == "conj" && is_nominal(c))
                    .map(|c| c.id)
                    .collect();
                conjuncts.reverse();
                pending.extend(conjuncts);
            }
        }
    }
    features
}

fn feature_phrase(doc: &AnnotatedDoc, idx: usize) -> String {
    let mut words: Vec<&str> = doc
        .children(idx)
        .filter(|c| c.id < idx && FEATURE_MODIFIERS.contains(&c.dep.as_str()))
        .map(|c| doc.token_text(c))
        .collect();
    if let Some(token) = doc.tokens.get(idx) {
        words.push(doc.token_text(token));
    }
    words.join(" ")
}

#[cfg(test)]
#[path = "linguistic_test.rs"]
mod tests;
