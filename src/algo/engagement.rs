//! Two-dimensional engagement segmentation of titles.
//!
//! Takes records carrying both viewing metrics, deduplicates per title,
//! derives percentile-rank coordinates, and segments the population with
//! seeded k-means. The output is plain data for the scatter renderer.

use indexmap::IndexMap;
use serde::Serialize;

use crate::algo::kmeans;
use crate::algo::normalize::Category;

/// Default cluster count.
pub const DEFAULT_K: usize = 4;
/// Iteration cap for the k-means loop.
pub const MAX_ITERATIONS: usize = 50;

/// One title with both metrics resolved, pre-segmentation.
#[derive(Debug, Clone)]
pub struct TitleMetrics {
    pub category: Category,
    pub title: String,
    pub release_year: Option<String>,
    pub genre: String,
    pub language: String,
    pub country: String,
    pub runtime_minutes: Option<u32>,
    pub poster: Option<String>,
    /// Primary metric (e.g. hours viewed).
    pub hours: f64,
    /// Secondary metric (e.g. view count).
    pub views: f64,
}

/// One segmented title: rank coordinates plus consumer-facing metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterPoint {
    pub title: String,
    pub category: Category,
    pub genre: String,
    pub language: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub hours: f64,
    pub views: f64,
    /// Engagement depth: hours / views.
    pub ratio: f64,
    /// Percentile rank of `ratio` in [0, 1].
    pub x: f64,
    /// Percentile rank of `hours` in [0, 1].
    pub y: f64,
    pub cluster: usize,
    /// Bubble size hint: sqrt(hours).
    pub size: f64,
}

/// Aggregate description of one cluster.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterSummary {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub quadrant: &'static str,
    pub count: usize,
    pub total_hours: f64,
    pub top_genres: Vec<String>,
    pub mean_ratio: f64,
}

/// Full segmentation result.
#[derive(Debug, Clone, Serialize)]
pub struct Segmentation {
    pub points: Vec<ClusterPoint>,
    pub clusters: Vec<ClusterSummary>,
}

/// Quadrant label from centroid coordinates. x splits casual from deep
/// engagement ("cold"/"warm"), y splits niche from mainstream
/// ("flat"/"charged").
pub fn quadrant_label(x: f64, y: f64) -> &'static str {
    match (x >= 0.5, y >= 0.5) {
        (false, false) => "cold-flat",
        (false, true) => "cold-charged",
        (true, false) => "warm-flat",
        (true, true) => "warm-charged",
    }
}

/// Segment titles into labeled engagement clusters.
///
/// Returns `None` when no record survives the dual-metric filter. The seed
/// feeds centroid initialization only; everything else is deterministic.
pub fn segment(records: Vec<TitleMetrics>, k: usize, seed: u64) -> Option<Segmentation> {
    // Dedup by (category, title, year): duplicates sum both metrics,
    // first-seen metadata wins.
    let mut merged: IndexMap<(Category, String, String), TitleMetrics> = IndexMap::new();
    for record in records {
        let key = (
            record.category,
            record.title.clone(),
            record.release_year.clone().unwrap_or_default(),
        );
        match merged.get_mut(&key) {
            Some(existing) => {
                existing.hours += record.hours;
                existing.views += record.views;
            }
            None => {
                merged.insert(key, record);
            }
        }
    }

    let survivors: Vec<TitleMetrics> = merged
        .into_values()
        .filter(|r| r.hours > 0.0 && r.views > 0.0)
        .collect();
    if survivors.is_empty() {
        return None;
    }

    let ratios: Vec<f64> = survivors.iter().map(|r| r.hours / r.views).collect();
    let x_ranks = percentile_ranks(&ratios);
    let y_ranks = percentile_ranks(&survivors.iter().map(|r| r.hours).collect::<Vec<f64>>());

    let coords: Vec<[f64; 2]> = x_ranks
        .iter()
        .zip(&y_ranks)
        .map(|(&x, &y)| [x, y])
        .collect();
    let result = kmeans::kmeans(&coords, k, MAX_ITERATIONS, seed);

    let points: Vec<ClusterPoint> = survivors
        .into_iter()
        .enumerate()
        .map(|(i, r)| ClusterPoint {
            title: r.title,
            category: r.category,
            genre: r.genre,
            language: r.language,
            country: r.country,
            release_year: r.release_year,
            runtime_minutes: r.runtime_minutes,
            poster: r.poster,
            hours: r.hours,
            views: r.views,
            ratio: ratios[i],
            x: x_ranks[i],
            y: y_ranks[i],
            cluster: result.assignments[i],
            size: r.hours.sqrt(),
        })
        .collect();

    let clusters = summarize(&points, &result.centroids);
    Some(Segmentation { points, clusters })
}

/// Ascending percentile ranks: rank(i) = i / (N - 1), or 0 when N = 1.
/// Stable sort keeps ties in input order.
fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let denom = if n > 1 { (n - 1) as f64 } else { 1.0 };
    let mut ranks = vec![0.0; n];
    for (pos, &idx) in order.iter().enumerate() {
        ranks[idx] = if n > 1 { pos as f64 / denom } else { 0.0 };
    }
    ranks
}

fn summarize(points: &[ClusterPoint], centroids: &[[f64; 2]]) -> Vec<ClusterSummary> {
    centroids
        .iter()
        .enumerate()
        .map(|(id, centroid)| {
            let members: Vec<&ClusterPoint> =
                points.iter().filter(|p| p.cluster == id).collect();

            let mut genre_counts: IndexMap<&str, usize> = IndexMap::new();
            for p in &members {
                *genre_counts.entry(p.genre.as_str()).or_insert(0) += 1;
            }
            let mut ranked: Vec<(&str, usize)> = genre_counts.into_iter().collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1));
            let top_genres: Vec<String> =
                ranked.iter().take(3).map(|(g, _)| g.to_string()).collect();

            let total_hours: f64 = members.iter().map(|p| p.hours).sum();
            let mean_ratio = if members.is_empty() {
                0.0
            } else {
                members.iter().map(|p| p.ratio).sum::<f64>() / members.len() as f64
            };

            ClusterSummary {
                id,
                x: centroid[0],
                y: centroid[1],
                quadrant: quadrant_label(centroid[0], centroid[1]),
                count: members.len(),
                total_hours,
                top_genres,
                mean_ratio,
            }
        })
        .collect()
}
