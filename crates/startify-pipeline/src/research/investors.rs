use startify_core::{InvestorMatch, InvestorProfile};

const TOP_MATCHES: usize = 5;

/// Score every investor against `industry` and keep the five best.
///
/// Exact focus match scores 95, a generalist ("general"/"technology") 70,
/// anyone else 50. Ties keep pool order.
pub fn match_investors(industry: &str, pool: &[InvestorProfile]) -> Vec<InvestorMatch> {
    let mut matches: Vec<InvestorMatch> = pool
        .iter()
        .map(|investor| {
            let score = if investor.focuses_on(industry) {
                95
            } else if investor.focus.iter().any(|f| f == "general" || f == "technology") {
                70
            } else {
                50
            };
            let rationale = match investor.focus.first() {
                Some(primary) if score > 80 => format!("Strong focus on {primary} sector"),
                _ => "General technology investor".to_string(),
            };
            InvestorMatch {
                name: investor.name.clone(),
                firm: investor.firm.clone(),
                focus: investor.focus.join(", "),
                stage: investor.stage.clone(),
                match_score: score,
                rationale,
                description: investor.description.clone(),
                portfolio: investor.portfolio.clone(),
            }
        })
        .collect();

    matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    matches.truncate(TOP_MATCHES);
    matches
}

#[cfg(test)]
mod tests {
    use startify_core::builtin_investor_pool;

    use super::*;

    fn pool() -> Vec<InvestorProfile> {
        builtin_investor_pool().unwrap().investors
    }

    #[test]
    fn healthcare_ranks_focused_investors_first() {
        let matches = match_investors("healthcare", &pool());
        assert_eq!(matches.len(), 5);
        assert_eq!(matches[0].name, "Sarah Chen");
        assert_eq!(matches[0].match_score, 95);
        assert_eq!(matches[0].rationale, "Strong focus on fitness sector");
        assert_eq!(matches[1].name, "David Park");
        assert_eq!(matches[2].name, "Alex Kumar");
        assert_eq!(matches[2].match_score, 70);
        assert_eq!(matches[2].rationale, "General technology investor");
        assert_eq!(matches[3].match_score, 50);
        assert_eq!(matches[3].name, "Michael Rodriguez");
    }

    #[test]
    fn scores_are_descending() {
        let matches = match_investors("unknown", &pool());
        assert!(matches.windows(2).all(|w| w[0].match_score >= w[1].match_score));
        assert_eq!(matches[0].name, "Alex Kumar");
        assert_eq!(matches[0].focus, "general, technology, innovation");
    }

    #[test]
    fn industry_match_is_case_insensitive() {
        let matches = match_investors("FinTech", &pool());
        assert_eq!(matches[0].name, "Michael Rodriguez");
        assert_eq!(matches[1].name, "Tom Anderson");
    }
}
