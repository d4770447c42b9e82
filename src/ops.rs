//! Shared operation wrappers for the CLI (and any embedding caller).
//!
//! Each `op_*` function is a pure, synchronous wrapper around one or more
//! `algo` modules. Input and output are `serde_json::Value` — no dependency
//! on clap or any I/O. Configuration (metric mode, fan-out flag, category
//! field) is passed explicitly; there is no ambient state.

use rayon::prelude::*;
use serde_json::Value;

use crate::algo::engagement::{self, TitleMetrics};
use crate::algo::normalize::{self, Category, Entry, MetricMode};
use crate::algo::{aggregate, hierarchy, keywords};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Extract a text field from a JSON object, returning "" if missing.
pub fn get_text(row: &Value, field: &str) -> String {
    row.get(field)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Read a row's category from `category_field`; unparseable rows count as
/// movies.
fn category_of(row: &Value, category_field: &str) -> Category {
    Category::from_str(&get_text(row, category_field)).unwrap_or(Category::Movie)
}

fn parse_mode(mode: &str) -> Result<MetricMode, String> {
    MetricMode::from_str(mode)
        .ok_or_else(|| format!("Unknown metric mode '{mode}'. Use: hours, views"))
}

fn normalized_entries(
    rows: &[Value],
    category_field: &str,
    mode: MetricMode,
    split: bool,
) -> Vec<Entry> {
    let entries: Vec<Entry> = rows
        .par_iter()
        .map(|row| normalize::normalize_record(row, category_of(row, category_field), mode))
        .collect();
    aggregate::expand_genres(entries, split)
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ── Operations ───────────────────────────────────────────────────────────────

/// Normalize rows into canonical entries, optionally fanned out per genre.
pub fn op_normalize(
    rows: &[Value],
    category_field: &str,
    mode: &str,
    split: bool,
) -> Result<Value, String> {
    let mode = parse_mode(mode)?;
    let entries = normalized_entries(rows, category_field, mode, split);
    serde_json::to_value(entries).map_err(|e| format!("Failed to serialize entries: {e}"))
}

/// Build the pruned Category → Genre → Language aggregation tree.
///
/// A dataset whose aggregated values are all non-positive yields an empty
/// root, not an error.
pub fn op_hierarchy(
    rows: &[Value],
    category_field: &str,
    mode: &str,
    split: bool,
) -> Result<Value, String> {
    let mode = parse_mode(mode)?;
    let entries = normalized_entries(rows, category_field, mode, split);
    let buckets = aggregate::aggregate_leaves(&entries);
    let sequences = hierarchy::leaf_sequences(&buckets);
    let tree = hierarchy::build_tree(&sequences);
    let total = tree.total();
    let tree_value =
        serde_json::to_value(&tree).map_err(|e| format!("Failed to serialize tree: {e}"))?;
    Ok(serde_json::json!({
        "tree": tree_value,
        "total": total,
        "leaf_count": buckets.len(),
    }))
}

/// Rank keywords for one (category, genre, optional language) group.
#[allow(clippy::too_many_arguments)]
pub fn op_keywords(
    rows: &[Value],
    category_field: &str,
    mode: &str,
    split: bool,
    category: &str,
    genre: &str,
    language: Option<&str>,
    limit: usize,
) -> Result<Value, String> {
    let mode = parse_mode(mode)?;
    let target = Category::from_str(category)
        .ok_or_else(|| format!("Unknown category '{category}'. Use: movie, tv"))?;
    let entries = normalized_entries(rows, category_field, mode, split);
    let index = keywords::KeywordIndex::build(&entries);
    let top = index.top_keywords(target, genre, language, limit);
    Ok(serde_json::json!({
        "category": target.as_str(),
        "genre": genre,
        "language": language,
        "keywords": top,
    }))
}

/// Segment titles by engagement. Returns JSON null when no record exposes
/// both metrics with positive values.
pub fn op_matrix(rows: &[Value], category_field: &str, k: usize, seed: u64) -> Result<Value, String> {
    if k == 0 {
        return Err("Cluster count must be at least 1".to_string());
    }

    let records: Vec<TitleMetrics> = rows
        .par_iter()
        .map(|row| {
            let category = category_of(row, category_field);
            let entry = normalize::normalize_record(row, category, MetricMode::Hours);
            TitleMetrics {
                category,
                title: entry.title,
                release_year: entry.release_year,
                genre: capitalize_first(&entry.primary_genre),
                language: entry.language,
                country: entry.country,
                runtime_minutes: entry.runtime_minutes,
                poster: entry.poster,
                hours: normalize::metric_value(row, MetricMode::Hours),
                views: normalize::metric_value(row, MetricMode::Views),
            }
        })
        .collect();

    match engagement::segment(records, k, seed) {
        Some(segmentation) => {
            let total_points = segmentation.points.len();
            let value = serde_json::to_value(&segmentation)
                .map_err(|e| format!("Failed to serialize segmentation: {e}"))?;
            let mut object = value;
            if let Some(obj) = object.as_object_mut() {
                obj.insert("total_points".into(), serde_json::json!(total_points));
            }
            Ok(object)
        }
        None => Ok(Value::Null),
    }
}
