//! Product tags for incidents
//!
//! Incident feeds don't say which products an incident affects, so tags are
//! derived from the incident name by case-insensitive substring match against
//! a configured vocabulary.

/// Tags from `vocabulary` contained in `incident_name`, in vocabulary order
///
/// Returns `[fallback]` when nothing matches.
pub fn derive_product_tags(
    incident_name: &str,
    vocabulary: &[String],
    fallback: &str,
) -> Vec<String> {
    let name = incident_name.to_lowercase();

    let tags: Vec<String> = vocabulary
        .iter()
        .filter(|product| !product.is_empty() && name.contains(&product.to_lowercase()))
        .cloned()
        .collect();

    if tags.is_empty() {
        vec![fallback.to_string()]
    } else {
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn matches_case_insensitively() {
        let tags = derive_product_tags(
            "Elevated error rates for CHATGPT and file uploads",
            &vocabulary(&["ChatGPT", "File uploads", "Sora"]),
            "All Services",
        );
        assert_eq!(tags, vec!["ChatGPT", "File uploads"]);
    }

    #[test]
    fn falls_back_when_nothing_matches() {
        let tags = derive_product_tags("Degraded performance", &vocabulary(&["Sora"]), "All Services");
        assert_eq!(tags, vec!["All Services"]);
    }

    #[test]
    fn longer_term_needs_full_match() {
        let tags = derive_product_tags(
            "Files API errors",
            &vocabulary(&["Files", "File uploads"]),
            "All Services",
        );
        assert_eq!(tags, vec!["Files"]);
    }

    #[test]
    fn empty_vocabulary_entries_are_ignored() {
        let tags = derive_product_tags("Anything", &vocabulary(&[""]), "All Services");
        assert_eq!(tags, vec!["All Services"]);
    }
}
