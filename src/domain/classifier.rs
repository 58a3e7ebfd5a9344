use super::{CategoryStore, FALLBACK_CATEGORY};

/// Suggest a category for a free-text description.
///
/// Categories are tried in store order and keywords in list order; the first
/// keyword found anywhere in the description (case-insensitively) decides.
/// Matching is by substring, so "gasket" hits the keyword "gas".
/// Returns "Other" when nothing matches.
pub fn classify<'a>(description: &str, store: &'a CategoryStore) -> &'a str {
    let description = description.to_lowercase();

    store
        .iter()
        .find(|category| {
            category
                .keywords
                .iter()
                .any(|keyword| description.contains(&keyword.to_lowercase()))
        })
        .map(|category| category.name.as_str())
        .unwrap_or(FALLBACK_CATEGORY)
}
