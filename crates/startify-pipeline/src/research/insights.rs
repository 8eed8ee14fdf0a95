use std::collections::BTreeMap;

use startify_core::research::average;
use startify_core::{Competitor, MarketInsights, StructuredIdea};

use super::scrape::ScrapedPage;

const MAX_ITEMS: usize = 4;
const MAX_COMPETITORS: usize = 3;
const DEFAULT_AVERAGE_TREND: f64 = 65.0;
const COMPETITION_LEVELS: [&str; 3] = ["Low", "Medium", "High"];

pub fn competitors(pages: &[ScrapedPage]) -> Vec<Competitor> {
    pages
        .iter()
        .take(MAX_COMPETITORS)
        .map(|p| Competitor {
            name: p.title.clone(),
            url: p.url.clone(),
        })
        .collect()
}

pub fn opportunities(idea: &StructuredIdea) -> Vec<String> {
    let industry = &idea.industry;
    let audience = &idea.target_audience;
    let mut items = vec![
        format!("Growing demand in {audience} segment"),
        format!("Emerging {industry} sector with high growth potential"),
        format!("Digital transformation accelerating in {industry}"),
        format!("Underserved {audience} market opportunity"),
        format!("Mobile-first adoption among {audience}"),
        format!("Low competition in {industry} for {audience}"),
    ];
    items.extend(
        idea.features
            .iter()
            .take(2)
            .map(|feature| format!("High demand for {feature} in {industry}")),
    );
    items.truncate(MAX_ITEMS);
    items
}

pub fn risks(idea: &StructuredIdea) -> Vec<String> {
    let industry = &idea.industry;
    let audience = &idea.target_audience;
    let mut items = vec![
        format!("High competition in {industry} market"),
        format!("User acquisition costs for {audience}"),
        format!("Technology infrastructure challenges in {industry}"),
        format!("Regulatory compliance in {industry} sector"),
        format!("Market education needed for {audience}"),
        format!("Retention challenges in {industry} apps"),
        format!("Scaling difficulties with {audience} segment"),
    ];
    items.truncate(MAX_ITEMS);
    items
}

pub fn market_insights(industry: &str, trends: &BTreeMap<String, f64>) -> MarketInsights {
    let market_size = match industry.to_lowercase().as_str() {
        "fitness" => "$30B",
        "grocery" => "$682B",
        "education" => "$6.5T",
        "healthcare" => "$4.3T",
        "fintech" => "$310B",
        "ecommerce" => "$5.7T",
        "logistics" => "$9.6T",
        _ => "$10B+",
    };

    let avg = average(trends).unwrap_or(DEFAULT_AVERAGE_TREND);
    let growth = if avg > 75.0 {
        "25-35%"
    } else if avg > 60.0 {
        "15-25%"
    } else {
        "10-15%"
    };

    let competition = competition_level(industry);
    let funding = match competition {
        "Low" => "$250K-500K",
        "High" => "$1M-2M",
        _ => "$500K-1M",
    };

    MarketInsights {
        market_size: market_size.to_string(),
        growth: growth.to_string(),
        competition: competition.to_string(),
        timeline: "6-12 months".to_string(),
        funding: funding.to_string(),
    }
}

/// Stable bucket from the industry string: FNV-1a (64-bit) of the lowercase
/// industry, modulo 3. Identical across runs and processes.
pub fn competition_level(industry: &str) -> &'static str {
    let hash = fnv1a_64(industry.to_lowercase().as_bytes());
    // hash % 3 is always < 3
    COMPETITION_LEVELS[usize::try_from(hash % 3).unwrap_or(0)]
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET_BASIS, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idea(features: &[&str]) -> StructuredIdea {
        StructuredIdea::new(
            "grocery",
            "rural areas",
            features.iter().map(|s| (*s).to_string()).collect(),
            vec![],
            "raw",
        )
    }

    #[test]
    fn fnv1a_reference_vectors() {
        assert_eq!(fnv1a_64(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a_64(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fnv1a_64(b"foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn competition_level_is_stable_and_case_insensitive() {
        for industry in ["grocery", "fitness", "general", "pet care"] {
            let level = competition_level(industry);
            assert_eq!(level, competition_level(industry));
            assert_eq!(level, competition_level(&industry.to_uppercase()));
            assert!(COMPETITION_LEVELS.contains(&level));
        }
    }

    #[test]
    fn opportunities_and_risks_capped_at_four() {
        let opps = opportunities(&idea(&["delivery", "digital payments"]));
        assert_eq!(opps.len(), 4);
        assert_eq!(opps[0], "Growing demand in rural areas segment");
        assert_eq!(opps[1], "Emerging grocery sector with high growth potential");

        let risks = risks(&idea(&[]));
        assert_eq!(risks.len(), 4);
        assert_eq!(risks[3], "Regulatory compliance in grocery sector");
    }

    #[test]
    fn market_insights_lookup_and_growth_bands() {
        let mut trends = BTreeMap::new();
        trends.insert("fitness".to_string(), 80.0);
        let insights = market_insights("Fitness", &trends);
        assert_eq!(insights.market_size, "$30B");
        assert_eq!(insights.growth, "25-35%");
        assert_eq!(insights.timeline, "6-12 months");

        trends.insert("fitness".to_string(), 61.0);
        assert_eq!(market_insights("fitness", &trends).growth, "15-25%");

        trends.insert("fitness".to_string(), 20.0);
        assert_eq!(market_insights("fitness", &trends).growth, "10-15%");

        // Empty trends average to 65.
        let insights = market_insights("underwater basket weaving", &BTreeMap::new());
        assert_eq!(insights.market_size, "$10B+");
        assert_eq!(insights.growth, "15-25%");
    }

    #[test]
    fn funding_follows_competition() {
        for industry in ["grocery", "fitness", "education", "pets", "travel"] {
            let insights = market_insights(industry, &BTreeMap::new());
            let expected = match insights.competition.as_str() {
                "Low" => "$250K-500K",
                "Medium" => "$500K-1M",
                _ => "$1M-2M",
            };
            assert_eq!(insights.funding, expected, "{industry}");
        }
    }

    #[test]
    fn competitors_take_first_three_pages() {
        let pages: Vec<ScrapedPage> = (0..5)
            .map(|i| ScrapedPage {
                url: format!("https://x.test/{i}"),
                title: format!("Page {i}"),
                text: String::new(),
            })
            .collect();
        let comps = competitors(&pages);
        assert_eq!(comps.len(), 3);
        assert_eq!(comps[2].name, "Page 2");
        assert_eq!(comps[2].url, "https://x.test/2");
    }
}
