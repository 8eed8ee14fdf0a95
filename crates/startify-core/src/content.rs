use serde::{Deserialize, Serialize};

/// The seven fixed pitch-deck narrative sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchSections {
    pub problem: String,
    pub solution: String,
    pub value_proposition: String,
    pub business_model: String,
    pub market_size_estimate: String,
    pub go_to_market: String,
    pub team_reqs: String,
}

impl PitchSections {
    /// Section keys paired with their text, in deck order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("problem", &self.problem),
            ("solution", &self.solution),
            ("value_proposition", &self.value_proposition),
            ("business_model", &self.business_model),
            ("market_size_estimate", &self.market_size_estimate),
            ("go_to_market", &self.go_to_market),
            ("team_reqs", &self.team_reqs),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    /// Ranked, best first.
    pub brand_names: Vec<String>,
    /// Ranked, best first.
    pub slogans: Vec<String>,
    pub logo_prompts: Vec<String>,
    pub ad_copies: Vec<String>,
    pub pitch_sections: PitchSections,
}
