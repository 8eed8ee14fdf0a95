use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInsights {
    pub market_size: String,
    pub growth: String,
    pub competition: String,
    pub timeline: String,
    pub funding: String,
}

/// One investor from the pool, scored against an idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorMatch {
    pub name: String,
    pub firm: String,
    /// Focus areas, comma-joined.
    pub focus: String,
    pub stage: String,
    pub match_score: u8,
    pub rationale: String,
    pub description: String,
    pub portfolio: Vec<String>,
}

/// Output of the research stage. This is the value stored in the cache, so
/// field order and map ordering are stable across serializations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub competitors: Vec<Competitor>,
    pub trends: BTreeMap<String, f64>,
    pub summary_text: String,
    pub key_opportunities: Vec<String>,
    pub key_risks: Vec<String>,
    pub market_insights: MarketInsights,
    pub investors: Vec<InvestorMatch>,
}

impl ResearchResult {
    /// Mean of all trend scores, or `None` when no trend data was collected.
    #[must_use]
    pub fn average_trend(&self) -> Option<f64> {
        average(&self.trends)
    }
}

/// Mean of the values in a keyword→score map.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average(trends: &BTreeMap<String, f64>) -> Option<f64> {
    if trends.is_empty() {
        return None;
    }
    Some(trends.values().sum::<f64>() / trends.len() as f64)
}
