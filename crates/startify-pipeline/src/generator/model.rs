//! Model-backed copy. Each kind is all-or-nothing: output that does not
//! reach the required count is discarded in favour of the templates.

use std::borrow::Cow;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use startify_core::StructuredIdea;

use super::fallback::{self, AD_COUNT, NAME_COUNT, SLOGAN_COUNT};
use super::scoring::{rank_names, rank_texts};
use super::CopyWriter;
use crate::llm::{CompletionOptions, TextGenerator};

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:\d+\.|[-•*])\s*(.+?)\s*$").expect("valid list item regex")
});

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+\.|[-•*])").expect("valid list marker regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

const MIN_SLOGAN_WORDS: usize = 3;
const MAX_SLOGAN_WORDS: usize = 8;
const MAX_AD_WORDS: usize = 30;
const AD_SEQUENCES: u32 = 5;

fn name_prompt(idea: &StructuredIdea) -> String {
    format!(
        "Generate creative brand names for a {} business targeting {}.\nBrand names:\n1.",
        idea.industry, idea.target_audience
    )
}

fn slogan_prompt(idea: &StructuredIdea) -> String {
    format!(
        "Create catchy slogans for a {} app for {}.\nSlogans:\n1.",
        idea.industry, idea.target_audience
    )
}

fn ad_prompt(idea: &StructuredIdea) -> String {
    format!(
        "Write a short social media ad for a {} app targeting {} with features: {}.\nAd:",
        idea.industry,
        idea.target_audience,
        idea.feature_phrase()
    )
}

/// Pull bulleted or numbered items out of generated text.
///
/// Prompts end with `1.`, so a reply whose first line carries no marker is
/// treated as the continuation of that first item. Quotes are stripped,
/// whitespace collapsed, and items outside 4..=49 characters dropped.
pub(crate) fn extract_list_items(text: &str) -> Vec<String> {
    let text = text.trim_start();
    let text: Cow<'_, str> = if LIST_MARKER.is_match(text) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("1. {text}"))
    };

    LIST_ITEM
        .captures_iter(&text)
        .filter_map(|caps| {
            let raw = caps.get(1)?.as_str().replace(['"', '\''], "");
            let item = WHITESPACE.replace_all(raw.trim(), " ").into_owned();
            (4..50).contains(&item.chars().count()).then_some(item)
        })
        .collect()
}

/// First sentence of `text`, terminated with a period.
fn first_sentence(text: &str) -> Option<String> {
    let sentence = text.trim().split('.').next()?.trim();
    if sentence.is_empty() {
        return None;
    }
    Some(format!("{sentence}."))
}

pub struct ModelCopyWriter {
    model: Arc<dyn TextGenerator>,
}

impl ModelCopyWriter {
    #[must_use]
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self { model }
    }

    async fn sequences(
        &self,
        kind: &'static str,
        prompt: &str,
        options: CompletionOptions,
    ) -> Vec<String> {
        match self.model.complete(prompt, options).await {
            Ok(texts) => texts,
            Err(e) => {
                tracing::warn!(stage = "generate", kind, error = %e, "model call failed; using templates");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl CopyWriter for ModelCopyWriter {
    async fn brand_names(&self, idea: &StructuredIdea) -> Vec<String> {
        let options = CompletionOptions::new(100).sequences(3).temperature(0.9);
        let texts = self.sequences("brand_names", &name_prompt(idea), options).await;
        let candidates = texts.iter().flat_map(|t| extract_list_items(t)).collect();

        let mut ranked = rank_names(candidates, &idea.industry);
        if ranked.len() < NAME_COUNT {
            tracing::debug!(stage = "generate", usable = ranked.len(), "too few model brand names");
            return fallback::brand_names(idea);
        }
        ranked.truncate(NAME_COUNT);
        ranked
    }

    async fn slogans(&self, idea: &StructuredIdea) -> Vec<String> {
        let options = CompletionOptions::new(80).sequences(2).temperature(0.8);
        let texts = self.sequences("slogans", &slogan_prompt(idea), options).await;
        let candidates = texts.iter().flat_map(|t| extract_list_items(t)).collect();

        let mut ranked = rank_texts(candidates, MIN_SLOGAN_WORDS, MAX_SLOGAN_WORDS);
        if ranked.len() < SLOGAN_COUNT {
            tracing::debug!(stage = "generate", usable = ranked.len(), "too few model slogans");
            return fallback::slogans(idea);
        }
        ranked.truncate(SLOGAN_COUNT);
        ranked
    }

    async fn ad_copies(&self, idea: &StructuredIdea) -> Vec<String> {
        let options = CompletionOptions::new(100)
            .sequences(AD_SEQUENCES)
            .temperature(0.7);
        let texts = self.sequences("ad_copies", &ad_prompt(idea), options).await;

        let mut ads: Vec<String> = Vec::new();
        for ad in texts.iter().filter_map(|t| first_sentence(t)) {
            if ad.split_whitespace().count() <= MAX_AD_WORDS && !ads.contains(&ad) {
                ads.push(ad);
            }
        }
        if ads.is_empty() {
            return fallback::ad_copies(idea);
        }
        ads.truncate(AD_COUNT);
        ads
    }

    fn strategy(&self) -> &'static str {
        "model"
    }
}
