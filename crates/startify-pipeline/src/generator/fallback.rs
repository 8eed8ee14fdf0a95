//! Deterministic templated copy. Always yields the target counts.

use startify_core::StructuredIdea;

use super::scoring::rank_names;

pub const NAME_COUNT: usize = 10;
pub const SLOGAN_COUNT: usize = 5;
pub const AD_COUNT: usize = 5;

const SUFFIXES: [&str; 10] = [
    "ly", "ify", "Hub", "Pro", "Go", "Now", "App", "Plus", "Zone", "Spot",
];
const PREFIXES: [&str; 7] = ["My", "Get", "The", "Quick", "Easy", "Smart", "Pro"];

/// First letter upper, the rest lower.
pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Ten ranked brand names built from industry and audience words.
///
/// Candidates come from base+suffix, prefix+base, and two-base compounds.
/// When those collapse below ten after deduplication, further suffix and
/// prefix combinations are appended. The first ten are then ranked.
pub fn brand_names(idea: &StructuredIdea) -> Vec<String> {
    let audience_words: Vec<&str> = idea.target_audience.split_whitespace().collect();
    let mut bases = vec![
        capitalize(&idea.industry.replace(char::is_whitespace, "")),
        audience_words
            .first()
            .map_or_else(|| "Smart".to_string(), |w| capitalize(w)),
    ];
    bases.extend(
        audience_words
            .iter()
            .filter(|w| w.chars().count() > 3)
            .take(2)
            .map(|w| capitalize(w)),
    );

    let mut candidates: Vec<String> = Vec::new();
    for base in bases.iter().take(3) {
        for suffix in &SUFFIXES[..4] {
            candidates.push(format!("{base}{suffix}"));
        }
    }
    for prefix in &PREFIXES[..3] {
        for base in bases.iter().take(2) {
            candidates.push(format!("{prefix}{base}"));
        }
    }
    candidates.push(format!("{}{}", bases[0], bases[1]));
    candidates.push(format!("{}{}", bases[1], bases[0]));

    let mut unique: Vec<String> = Vec::new();
    let extra = bases
        .iter()
        .flat_map(|base| SUFFIXES.iter().map(move |s| format!("{base}{s}")))
        .chain(
            PREFIXES
                .iter()
                .flat_map(|p| bases.iter().map(move |base| format!("{p}{base}"))),
        );
    for name in candidates.into_iter().chain(extra) {
        if unique.len() == NAME_COUNT {
            break;
        }
        if !name.is_empty() && !unique.contains(&name) {
            unique.push(name);
        }
    }

    rank_names(unique, &idea.industry)
}

pub fn slogans(idea: &StructuredIdea) -> Vec<String> {
    let industry = &idea.industry;
    let audience = &idea.target_audience;
    [
        format!("Empowering {audience} with {industry} solutions"),
        format!("Your trusted {industry} partner"),
        format!("Transforming {industry} for {audience}"),
        format!("Smart {industry}, Better life"),
        format!("Innovation meets {industry}"),
    ]
    .into_iter()
    .take(SLOGAN_COUNT)
    .collect()
}

pub fn ad_copies(idea: &StructuredIdea) -> Vec<String> {
    let industry = &idea.industry;
    let audience = &idea.target_audience;
    let features: Vec<&str> = if idea.features.is_empty() {
        vec!["innovative features"]
    } else {
        idea.features.iter().map(String::as_str).collect()
    };
    let features_text = features.iter().take(2).copied().collect::<Vec<_>>().join(", ");
    let lead_feature = capitalize(features[0]);

    [
        format!("Discover the future of {industry}! Perfect for {audience}. Download now!"),
        format!(
            "Transform your {industry} experience with {features_text}. Built for {audience}. Try it free!"
        ),
        format!("Join thousands of {audience} using our {industry} app. {lead_feature} included!"),
        format!("The smart way to {industry}. Trusted by {audience} everywhere."),
        format!(
            "Revolutionize your {industry} journey with {features_text}. Made for {audience}. Get started today!"
        ),
    ]
    .into_iter()
    .take(AD_COUNT)
    .collect()
}

pub fn logo_prompts(idea: &StructuredIdea) -> Vec<String> {
    let industry = &idea.industry;
    let base = format!(
        "Logo design prompt for {industry} brand: modern, minimalist logo featuring"
    );
    vec![
        format!("{base} {industry} elements, clean lines, professional color palette"),
        format!("{base} abstract shapes, vibrant colors, modern typography"),
        format!("{base} geometric patterns, gradient colors, tech-inspired"),
        format!("{base} nature-inspired elements, organic shapes, earthy tones"),
        format!("{base} bold typography, minimalist icon, monochrome design"),
    ]
}
