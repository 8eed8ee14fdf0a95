use startify_core::StructuredIdea;

use super::scrape::{truncate_chars, ScrapedPage};
use crate::llm::{CompletionOptions, TextGenerator};

pub const NO_SOURCES: &str = "No content available for summarization.";
pub const NO_TEXT: &str = "No text content found.";

const PROMPT_TEXT_CHARS: usize = 1600;
const FALLBACK_CHARS: usize = 200;
const SUMMARY_MAX_TOKENS: u32 = 600;

/// Summarize scraped text with the model when one is configured; otherwise,
/// or when the call fails, the first 200 characters of the text.
pub async fn summarize(
    pages: &[ScrapedPage],
    idea: &StructuredIdea,
    generator: Option<&dyn TextGenerator>,
) -> String {
    if pages.is_empty() {
        return NO_SOURCES.to_string();
    }

    let combined = pages
        .iter()
        .filter(|p| !p.text.is_empty())
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if combined.is_empty() {
        return NO_TEXT.to_string();
    }
    let combined = truncate_chars(&combined, PROMPT_TEXT_CHARS);

    let fallback = || format!("{}...", truncate_chars(&combined, FALLBACK_CHARS));

    let Some(generator) = generator else {
        return fallback();
    };

    let prompt = summary_prompt(idea, &combined);
    match generator
        .complete(&prompt, CompletionOptions::new(SUMMARY_MAX_TOKENS))
        .await
    {
        Ok(mut outputs) if !outputs.is_empty() && !outputs[0].trim().is_empty() => {
            outputs.swap_remove(0).trim().to_string()
        }
        Ok(_) => {
            tracing::warn!(stage = "research", "summary model returned empty text; using excerpt");
            fallback()
        }
        Err(e) => {
            tracing::warn!(stage = "research", error = %e, "summary generation failed; using excerpt");
            fallback()
        }
    }
}

fn summary_prompt(idea: &StructuredIdea, research_text: &str) -> String {
    format!(
        "You are a startup market research expert. Based on the following web research \
         about a {industry} product for {audience}, write a concise 3-5 paragraph summary.\n\n\
         The summary should clearly cover:\n\
         1) Overall market context and size\n\
         2) Key trends and opportunities\n\
         3) Main risks or challenges\n\n\
         Use clear, digestible language suitable for a startup founder.\n\n\
         --- RESEARCH TEXT ---\n\
         {research_text}",
        industry = idea.industry,
        audience = idea.target_audience,
    )
}
