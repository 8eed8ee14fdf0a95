//! Packaging of a finished job into files under `<output_root>/<job_id>/`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use startify_core::{GeneratedContent, ResearchResult, StructuredIdea};
use uuid::Uuid;

use crate::error::PipelineError;

const TOP_INVESTORS: usize = 3;

#[async_trait]
pub trait Assembler: Send + Sync {
    /// Persist the package and return the path of its primary artifact.
    async fn assemble(
        &self,
        job_id: Uuid,
        idea: &StructuredIdea,
        research: &ResearchResult,
        content: &GeneratedContent,
    ) -> Result<String, PipelineError>;
}

/// Writes `assets.json`, `research.json`, and `pitch_deck.md`.
pub struct PackageAssembler {
    output_root: PathBuf,
}

impl PackageAssembler {
    #[must_use]
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }
}

#[async_trait]
impl Assembler for PackageAssembler {
    async fn assemble(
        &self,
        job_id: Uuid,
        idea: &StructuredIdea,
        research: &ResearchResult,
        content: &GeneratedContent,
    ) -> Result<String, PipelineError> {
        let dir = self.output_root.join(job_id.to_string());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| io_error(&dir, source))?;

        write_json(&dir.join("assets.json"), content).await?;
        write_json(&dir.join("research.json"), research).await?;

        let deck_path = dir.join("pitch_deck.md");
        let deck = render_pitch_deck(idea, research, content);
        tokio::fs::write(&deck_path, deck)
            .await
            .map_err(|source| io_error(&deck_path, source))?;

        tracing::info!(stage = "assemble", job_id = %job_id, path = %deck_path.display(), "package written");
        Ok(deck_path.to_string_lossy().into_owned())
    }
}

async fn write_json<T: Serialize + Sync>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let body = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, body)
        .await
        .map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> PipelineError {
    PipelineError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// `value_proposition` → `Value Proposition`.
fn section_title(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Markdown pitch deck: one `##` section per pitch key, then market
/// insights and the best-matched investors.
#[must_use]
pub fn render_pitch_deck(
    idea: &StructuredIdea,
    research: &ResearchResult,
    content: &GeneratedContent,
) -> String {
    let title = content
        .brand_names
        .first()
        .map_or(idea.industry.as_str(), String::as_str);
    let mut deck = format!("# {title}\n\n");
    if let Some(slogan) = content.slogans.first() {
        let _ = writeln!(deck, "_{slogan}_\n");
    }

    for (key, text) in content.pitch_sections.entries() {
        let _ = writeln!(deck, "## {}\n\n{text}\n", section_title(key));
    }

    let insights = &research.market_insights;
    let _ = writeln!(
        deck,
        "## Market Insights\n\n\
         - Market size: {}\n\
         - Growth: {}\n\
         - Competition: {}\n\
         - Timeline: {}\n\
         - Funding: {}\n",
        insights.market_size,
        insights.growth,
        insights.competition,
        insights.timeline,
        insights.funding
    );

    if !research.investors.is_empty() {
        deck.push_str("## Investors\n\n");
        for investor in research.investors.iter().take(TOP_INVESTORS) {
            let _ = writeln!(
                deck,
                "- {} ({}), {} stage, match {}: {}",
                investor.name,
                investor.firm,
                investor.stage,
                investor.match_score,
                investor.rationale
            );
        }
    }
    deck
}
