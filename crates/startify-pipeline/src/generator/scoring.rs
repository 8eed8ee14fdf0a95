//! Ranking heuristics for candidate names and short copy.

/// Score a brand-name candidate. Higher is better.
///
/// +3 for 6–12 characters (else +1 for 4–15), +2 when it contains the
/// industry (case-insensitive), +2 for a vowel ratio in 0.3–0.5, +1 when
/// purely alphanumeric.
#[must_use]
pub fn name_score(name: &str, industry: &str) -> u32 {
    let len = name.chars().count();
    let mut score = 0;

    if (6..=12).contains(&len) {
        score += 3;
    } else if (4..=15).contains(&len) {
        score += 1;
    }

    let lower = name.to_lowercase();
    if !industry.is_empty() && lower.contains(&industry.to_lowercase()) {
        score += 2;
    }

    if len > 0 {
        let vowels = lower.chars().filter(|c| "aeiou".contains(*c)).count();
        #[allow(clippy::cast_precision_loss)]
        let ratio = vowels as f64 / len as f64;
        if (0.3..=0.5).contains(&ratio) {
            score += 2;
        }
    }

    if len > 0 && name.chars().all(char::is_alphanumeric) {
        score += 1;
    }

    score
}

/// Deduplicate (first occurrence wins) and stable-sort by [`name_score`].
#[must_use]
pub fn rank_names(names: Vec<String>, industry: &str) -> Vec<String> {
    let mut scored: Vec<(u32, String)> = dedup(names)
        .into_iter()
        .map(|name| (name_score(&name, industry), name))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, name)| name).collect()
}

/// Keep snippets with `min..=max` words, scored by closeness to the midpoint
/// word count, stable-sorted best first.
#[must_use]
pub fn rank_texts(texts: Vec<String>, min_words: usize, max_words: usize) -> Vec<String> {
    let midpoint = (min_words + max_words) / 2;
    let mut scored: Vec<(usize, String)> = dedup(texts)
        .into_iter()
        .filter_map(|text| {
            let words = text.split_whitespace().count();
            (min_words..=max_words)
                .contains(&words)
                .then(|| (words.abs_diff(midpoint), text))
        })
        .collect();
    // Smaller distance from the midpoint means a higher 10 - distance score.
    scored.sort_by_key(|(distance, _)| *distance);
    scored.into_iter().map(|(_, text)| text).collect()
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
