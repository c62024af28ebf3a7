//! Hybrid search: semantic candidate retrieval, keyword filtering, and the
//! reverse-chronological fallback pass.

use super::store::MemoryStore;

/// Default number of results returned by a search.
pub const DEFAULT_SEARCH_K: usize = 3;

impl MemoryStore {
    /// Search for up to `k` records relevant to `query`, most relevant first.
    ///
    /// Retrieval runs in two stages. First the index supplies an oversized
    /// candidate set (`2 * k` nearest vectors) and candidates are kept, in
    /// relevance order, only when they contain at least one query keyword as
    /// a case-insensitive substring. If that pass keeps nothing, a fallback
    /// pass scans all records newest-first with the same keyword test.
    /// Results are deduplicated by exact text equality in both passes.
    ///
    /// An empty result is a valid outcome meaning "no relevant memory" — it
    /// is returned for an empty store, an empty query, and a query sharing no
    /// keyword with any record.
    pub fn search(&self, query: &str, k: usize) -> Vec<String> {
        if self.records.is_empty() {
            tracing::debug!("memory is empty, nothing to search");
            return Vec::new();
        }
        if k == 0 {
            return Vec::new();
        }

        let keywords = query_keywords(query);
        if keywords.is_empty() {
            tracing::debug!("query has no keywords, nothing to match");
            return Vec::new();
        }

        let query_vec = self.embed_normalized(query);
        let candidates: Vec<&str> = self
            .index
            .search(&query_vec, k * 2)
            .into_iter()
            .map(|(position, _)| self.records[position].as_str())
            .collect();

        let filtered = keep_keyword_matches(candidates.iter().copied(), &keywords, k);
        if !filtered.is_empty() {
            tracing::debug!(matches = filtered.len(), "semantic candidates matched keywords");
            return filtered;
        }

        tracing::warn!("no filtered semantic matches, trying fallback keyword scan");
        let fallback = keep_keyword_matches(
            self.records.iter().rev().map(String::as_str),
            &keywords,
            k,
        );
        tracing::debug!(matches = fallback.len(), "fallback keyword scan finished");
        fallback
    }
}

/// Split a query into lowercase whitespace-separated keywords.
fn query_keywords(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Keep entries containing at least one keyword as a case-insensitive
/// substring, preserving the input order, deduplicated by exact text
/// equality, capped at `k`.
///
/// Both search passes share this one selection rule; only the entry ordering
/// differs (index relevance order vs. reverse insertion order).
fn keep_keyword_matches<'a>(
    entries: impl Iterator<Item = &'a str>,
    keywords: &[String],
    k: usize,
) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();

    for entry in entries {
        if kept.len() >= k {
            break;
        }
        let entry_lower = entry.to_lowercase();
        if keywords.iter().any(|keyword| entry_lower.contains(keyword))
            && !kept.iter().any(|seen| seen == entry)
        {
            kept.push(entry.to_string());
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_keywords_lowercased_and_split() {
        assert_eq!(
            query_keywords("Deploy  THE App"),
            vec!["deploy", "the", "app"]
        );
    }

    #[test]
    fn test_query_keywords_empty_for_whitespace() {
        assert!(query_keywords("   \t ").is_empty());
    }

    #[test]
    fn test_keep_matches_preserves_input_order() {
        let entries = ["scale replicas", "deploy the app", "restart deployment"];
        let keywords = vec!["deploy".to_string()];

        let kept = keep_keyword_matches(entries.iter().copied(), &keywords, 5);
        assert_eq!(kept, vec!["deploy the app", "restart deployment"]);
    }

    #[test]
    fn test_keep_matches_case_insensitive_substring() {
        let entries = ["Deploy The App"];
        let keywords = vec!["deploy".to_string()];

        let kept = keep_keyword_matches(entries.iter().copied(), &keywords, 5);
        assert_eq!(kept, vec!["Deploy The App"]);
    }

    #[test]
    fn test_keep_matches_deduplicates_exact_text() {
        let entries = ["deploy the app", "deploy the app", "deploy again"];
        let keywords = vec!["deploy".to_string()];

        let kept = keep_keyword_matches(entries.iter().copied(), &keywords, 5);
        assert_eq!(kept, vec!["deploy the app", "deploy again"]);
    }

    #[test]
    fn test_keep_matches_caps_at_k() {
        let entries = ["deploy a", "deploy b", "deploy c"];
        let keywords = vec!["deploy".to_string()];

        let kept = keep_keyword_matches(entries.iter().copied(), &keywords, 2);
        assert_eq!(kept, vec!["deploy a", "deploy b"]);
    }

    #[test]
    fn test_keep_matches_no_overlap_is_empty() {
        let entries = ["deploy the app", "scale replicas"];
        let keywords = vec!["banana".to_string()];

        assert!(keep_keyword_matches(entries.iter().copied(), &keywords, 3).is_empty());
    }
}
