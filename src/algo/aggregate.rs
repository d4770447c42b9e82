//! Genre fan-out and leaf aggregation.
//!
//! Aggregation is a commutative sum per (category, genre, language) bucket;
//! bucket order is first-seen so downstream tree construction stays
//! deterministic.

use indexmap::IndexMap;

use crate::algo::normalize::{Category, Entry};

/// Identifies one leaf bucket of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeafKey {
    pub category: Category,
    pub genre: String,
    pub language: String,
}

/// Expand multi-genre entries, one clone per genre, when `split` is on.
///
/// Each clone carries the full original metric value — the metric is
/// attributed to every genre independently, not divided between them. With
/// `split` off, entries pass through and keep their first-listed genre as
/// primary.
pub fn expand_genres(entries: Vec<Entry>, split: bool) -> Vec<Entry> {
    if !split {
        return entries;
    }
    entries
        .into_iter()
        .flat_map(|entry| {
            entry
                .genres
                .clone()
                .into_iter()
                .map(move |genre| Entry {
                    primary_genre: genre,
                    ..entry.clone()
                })
        })
        .collect()
}

/// Sum the active metric over all entries sharing a leaf key, then drop
/// every bucket whose sum is not positive.
pub fn aggregate_leaves(entries: &[Entry]) -> IndexMap<LeafKey, f64> {
    let mut buckets: IndexMap<LeafKey, f64> = IndexMap::new();
    for entry in entries {
        let key = LeafKey {
            category: entry.category,
            genre: entry.primary_genre.clone(),
            language: entry.language.clone(),
        };
        *buckets.entry(key).or_insert(0.0) += entry.value;
    }
    buckets.retain(|_, sum| *sum > 0.0);
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::normalize::{normalize_record, MetricMode};
    use serde_json::json;

    fn entry(category: Category, genres: &str, language: &str, value: f64) -> Entry {
        let row = json!({
            "Title": "t",
            "genres": genres,
            "language": language,
            "Hours Viewed": value.to_string(),
        });
        normalize_record(&row, category, MetricMode::Hours)
    }

    #[test]
    fn fan_out_one_entry_per_genre_full_value() {
        let entries = vec![entry(Category::Movie, "Comedy, Drama, Action", "English", 100.0)];
        let expanded = expand_genres(entries, true);
        assert_eq!(expanded.len(), 3);
        let genres: Vec<&str> = expanded.iter().map(|e| e.primary_genre.as_str()).collect();
        assert_eq!(genres, vec!["Comedy", "Drama", "Action"]);
        for e in &expanded {
            assert_eq!(e.value, 100.0);
            assert_eq!(e.genres.len(), 3);
        }
    }

    #[test]
    fn no_split_keeps_single_entry_with_first_genre() {
        let entries = vec![entry(Category::Movie, "Comedy, Drama", "English", 100.0)];
        let kept = expand_genres(entries, false);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].primary_genre, "Comedy");
    }

    #[test]
    fn buckets_sum_per_key() {
        let entries = vec![
            entry(Category::Movie, "Comedy", "English", 100.0),
            entry(Category::Movie, "Comedy", "English", 50.0),
        ];
        let buckets = aggregate_leaves(&entries);
        assert_eq!(buckets.len(), 1);
        let key = LeafKey {
            category: Category::Movie,
            genre: "Comedy".into(),
            language: "English".into(),
        };
        assert_eq!(buckets[&key], 150.0);
    }

    #[test]
    fn distinct_keys_stay_separate() {
        let entries = vec![
            entry(Category::Movie, "Comedy", "English", 10.0),
            entry(Category::Tv, "Comedy", "English", 20.0),
            entry(Category::Movie, "Comedy", "Spanish", 30.0),
        ];
        let buckets = aggregate_leaves(&entries);
        assert_eq!(buckets.len(), 3);
    }

    #[test]
    fn non_positive_buckets_dropped() {
        let entries = vec![
            entry(Category::Movie, "Comedy", "English", 0.0),
            entry(Category::Movie, "Drama", "English", 5.0),
        ];
        let buckets = aggregate_leaves(&entries);
        assert_eq!(buckets.len(), 1);
        assert!(buckets
            .keys()
            .all(|k| k.genre == "Drama"));
    }

    #[test]
    fn bucket_order_is_first_seen() {
        let entries = vec![
            entry(Category::Movie, "Drama", "English", 1.0),
            entry(Category::Movie, "Comedy", "English", 1.0),
            entry(Category::Movie, "Drama", "English", 1.0),
        ];
        let buckets = aggregate_leaves(&entries);
        let genres: Vec<&str> = buckets.keys().map(|k| k.genre.as_str()).collect();
        assert_eq!(genres, vec!["Drama", "Comedy"]);
    }
}
