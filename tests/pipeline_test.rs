//! End-to-end invariants over the full pipeline: value conservation through
//! fan-out and pruning, and determinism of every view under fixed seeds.

use catalens::ops;
use serde_json::{json, Value};

fn catalog(n: usize) -> Vec<Value> {
    let genres = [
        "Drama",
        "Comedy, Drama",
        "Action | Thriller",
        "science fiction, Adventure",
        "Documentary",
    ];
    let languages = ["English", "Spanish", "Korean", "French", "English"];
    (0..n)
        .map(|i| {
            let category = if i % 3 == 0 { "TV" } else { "Movie" };
            json!({
                "Type": category,
                "Title": format!("Feature Number {i}"),
                "genres": genres[i % genres.len()],
                "language": languages[i % languages.len()],
                "Hours Viewed": format!("{}", (i + 1) * 1000),
                "View Count": format!("{}", (i % 9 + 1) * 100),
                "ReleaseYear": format!("{}", 2000 + (i % 20)),
            })
        })
        .collect()
}

/// Walk a serialized tree and assert the pruning invariant: every node has
/// either children or a positive value.
fn assert_pruned(node: &Value) {
    let children = node["children"].as_array().unwrap();
    let value = node["value"].as_f64().unwrap_or(0.0);
    if node["name"] != "root" {
        assert!(
            !children.is_empty() || value > 0.0,
            "unpruned empty node: {node}"
        );
    }
    for child in children {
        assert_pruned(child);
    }
}

fn leaf_sum(node: &Value) -> f64 {
    let own = node["value"].as_f64().unwrap_or(0.0);
    let children: f64 = node["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(leaf_sum)
        .sum();
    own + children
}

#[test]
fn tree_conserves_positive_entry_values() {
    let rows = catalog(50);
    let entries = ops::op_normalize(&rows, "Type", "hours", true).unwrap();
    let expected: f64 = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["value"].as_f64().unwrap())
        .filter(|v| *v > 0.0)
        .sum();

    let result = ops::op_hierarchy(&rows, "Type", "hours", true).unwrap();
    let total = result["total"].as_f64().unwrap();
    assert!((total - expected).abs() < 1e-6);
    assert!((leaf_sum(&result["tree"]) - expected).abs() < 1e-6);
}

#[test]
fn tree_survives_pruning_invariant() {
    let mut rows = catalog(30);
    // Entries that aggregate to zero must vanish without a trace.
    rows.push(json!({
        "Type": "Movie",
        "Title": "Ghost Entry",
        "genres": "Noir",
        "language": "English",
        "Hours Viewed": "0",
    }));
    let result = ops::op_hierarchy(&rows, "Type", "hours", true).unwrap();
    assert_pruned(&result["tree"]);

    let text = serde_json::to_string(&result).unwrap();
    assert!(!text.contains("Noir"));
}

#[test]
fn fan_out_attributes_full_value_to_each_genre() {
    let rows = vec![json!({
        "Type": "Movie",
        "Title": "Triple Tag",
        "genres": "Comedy, Drama, Action",
        "language": "English",
        "Hours Viewed": "900",
    })];
    let entries = ops::op_normalize(&rows, "Type", "hours", true).unwrap();
    let arr = entries.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    for entry in arr {
        assert_eq!(entry["value"], 900.0);
    }
    // The tree sums all three attributions.
    let result = ops::op_hierarchy(&rows, "Type", "hours", true).unwrap();
    assert_eq!(result["total"], 2700.0);
}

#[test]
fn views_mode_reads_its_own_candidates() {
    let rows = vec![json!({
        "Type": "Movie",
        "Title": "Dual",
        "genres": "Drama",
        "Hours Viewed": "500",
        "View Count": "20",
    })];
    let hours = ops::op_hierarchy(&rows, "Type", "hours", true).unwrap();
    let views = ops::op_hierarchy(&rows, "Type", "views", true).unwrap();
    assert_eq!(hours["total"], 500.0);
    assert_eq!(views["total"], 20.0);
}

#[test]
fn every_view_is_deterministic() {
    let rows = catalog(60);

    let h1 = ops::op_hierarchy(&rows, "Type", "hours", true).unwrap();
    let h2 = ops::op_hierarchy(&rows, "Type", "hours", true).unwrap();
    assert_eq!(h1, h2);

    let k1 = ops::op_keywords(&rows, "Type", "hours", true, "movie", "Drama", None, 5).unwrap();
    let k2 = ops::op_keywords(&rows, "Type", "hours", true, "movie", "Drama", None, 5).unwrap();
    assert_eq!(k1, k2);

    let m1 = ops::op_matrix(&rows, "Type", 4, 7).unwrap();
    let m2 = ops::op_matrix(&rows, "Type", 4, 7).unwrap();
    assert_eq!(m1, m2);
}

#[test]
fn matrix_deduplicates_before_ranking() {
    let mut rows = catalog(10);
    // The same title split across two source rows: metrics must merge.
    rows.push(json!({
        "Type": "Movie",
        "Title": "Split Release",
        "genres": "Drama",
        "ReleaseYear": "2020",
        "Hours Viewed": "1000",
        "View Count": "100",
    }));
    rows.push(json!({
        "Type": "Movie",
        "Title": "Split Release",
        "genres": "Drama",
        "ReleaseYear": "2020",
        "Hours Viewed": "500",
        "View Count": "50",
    }));

    let result = ops::op_matrix(&rows, "Type", 4, 42).unwrap();
    let points = result["points"].as_array().unwrap();
    let merged: Vec<&Value> = points
        .iter()
        .filter(|p| p["title"] == "Split Release")
        .collect();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0]["hours"], 1500.0);
    assert_eq!(merged[0]["views"], 150.0);
}

#[test]
fn matrix_cluster_sizes_sum_to_population() {
    let rows = catalog(80);
    let result = ops::op_matrix(&rows, "Type", 4, 42).unwrap();
    let total = result["total_points"].as_u64().unwrap();
    let cluster_sum: u64 = result["clusters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["count"].as_u64().unwrap())
        .sum();
    assert_eq!(cluster_sum, total);
}
