use startify_core::{PitchSections, ResearchResult, StructuredIdea};

const DEFAULT_TREND_SCORE: f64 = 70.0;

/// Templated pitch narrative. Never model-backed.
#[must_use]
pub fn pitch_sections(idea: &StructuredIdea, research: &ResearchResult) -> PitchSections {
    let industry = &idea.industry;
    let audience = &idea.target_audience;
    let features = idea.feature_phrase();

    let avg_trend = research.average_trend().unwrap_or(DEFAULT_TREND_SCORE);
    let opportunities = if research.key_opportunities.is_empty() {
        "Significant growth potential".to_string()
    } else {
        research
            .key_opportunities
            .iter()
            .take(3)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    PitchSections {
        problem: format!(
            "Current {industry} solutions fail to adequately serve {audience}.\n\
             Key challenges include limited accessibility, high costs, and lack of tailored features.\n\
             This creates a significant gap in the market for a dedicated solution."
        ),
        solution: format!(
            "Our {industry} platform addresses these challenges by providing {features}.\n\
             Designed specifically for {audience}, we offer an intuitive, affordable, and comprehensive solution\n\
             that meets their unique needs."
        ),
        value_proposition: format!(
            "We deliver unmatched value through:\n\
             - Tailored features for {audience}\n\
             - {features}\n\
             - Competitive pricing and accessibility\n\
             - User-centric design and experience"
        ),
        business_model: format!(
            "Revenue streams:\n\
             1. Freemium model with premium features\n\
             2. Subscription tiers for {audience}\n\
             3. B2B partnerships and enterprise solutions\n\
             4. In-app purchases and value-added services"
        ),
        market_size_estimate: format!(
            "Target market: {audience} in {industry} sector\n\
             Market interest score: {avg_trend:.1}/100 (based on trend analysis)\n\
             Addressable market: Growing segment with strong digital adoption\n\
             Key opportunities: {opportunities}"
        ),
        go_to_market: format!(
            "Phase 1: Launch MVP targeting early adopters in {audience}\n\
             Phase 2: Digital marketing campaigns (social media, content marketing)\n\
             Phase 3: Strategic partnerships and community building\n\
             Phase 4: Scale operations and expand feature set\n\
             Key channels: App stores, social media, word-of-mouth, partnerships"
        ),
        team_reqs: format!(
            "Core team needed:\n\
             - Technical Lead (Full-stack development, {industry} domain expertise)\n\
             - Product Manager (User experience, {audience} insights)\n\
             - Marketing Lead (Growth hacking, digital marketing)\n\
             - Designer (UI/UX, branding)\n\
             - Business Development (Partnerships, sales)"
        ),
    }
}
