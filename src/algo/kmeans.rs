//! Seeded k-means over 2-d points.
//!
//! Initial centroids are k distinct points chosen through a seeded LCG, so
//! identical input + identical seed always reproduces the same clustering.
//! When the input holds fewer than k distinct points, k is reduced to the
//! distinct-point count rather than guessing.

use rayon::prelude::*;

/// Clustering output: one assignment per input point plus final centroids.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    pub assignments: Vec<usize>,
    pub centroids: Vec<[f64; 2]>,
}

/// Run k-means with Euclidean distance.
///
/// Assignment ties break to the lowest centroid index; a cluster that loses
/// all members keeps its previous centroid. Converges when no assignment
/// changes between iterations, or after `max_iter`.
pub fn kmeans(points: &[[f64; 2]], k: usize, max_iter: usize, seed: u64) -> KMeansResult {
    if points.is_empty() || k == 0 {
        return KMeansResult {
            assignments: Vec::new(),
            centroids: Vec::new(),
        };
    }

    let mut centroids = initial_centroids(points, k, seed);
    let k = centroids.len();
    let mut assignments = vec![0usize; points.len()];

    for _ in 0..max_iter {
        let new_assignments: Vec<usize> = points
            .par_iter()
            .map(|p| nearest_centroid(p, &centroids))
            .collect();

        let changed = new_assignments != assignments;
        assignments = new_assignments;
        if !changed {
            break;
        }

        // Barrier: centroids are recomputed only after every point has been
        // reassigned.
        let mut sums = vec![[0.0f64; 2]; k];
        let mut counts = vec![0usize; k];
        for (point, &cluster) in points.iter().zip(&assignments) {
            sums[cluster][0] += point[0];
            sums[cluster][1] += point[1];
            counts[cluster] += 1;
        }
        for (cluster, count) in counts.iter().enumerate() {
            if *count > 0 {
                centroids[cluster] = [
                    sums[cluster][0] / *count as f64,
                    sums[cluster][1] / *count as f64,
                ];
            }
        }
    }

    KMeansResult {
        assignments,
        centroids,
    }
}

fn nearest_centroid(point: &[f64; 2], centroids: &[[f64; 2]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let dx = point[0] - c[0];
        let dy = point[1] - c[1];
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// Choose up to k centroids at distinct coordinates, seeded.
///
/// A partial Fisher-Yates shuffle orders the candidate indices; the first k
/// indices pointing at unseen coordinates become centroids. Reduces k when
/// the input has fewer distinct coordinates.
fn initial_centroids(points: &[[f64; 2]], k: usize, seed: u64) -> Vec<[f64; 2]> {
    let n = points.len();
    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = LcgRng::new(seed);
    for i in 0..n.saturating_sub(1) {
        let j = i + (rng.next() as usize % (n - i));
        order.swap(i, j);
    }

    let mut centroids: Vec<[f64; 2]> = Vec::with_capacity(k);
    let mut seen: Vec<[u64; 2]> = Vec::with_capacity(k);
    for idx in order {
        if centroids.len() == k {
            break;
        }
        let p = points[idx];
        let bits = [p[0].to_bits(), p[1].to_bits()];
        if seen.contains(&bits) {
            continue;
        }
        seen.push(bits);
        centroids.push(p);
    }
    centroids
}

/// Simple Linear Congruential Generator for deterministic seeding.
struct LcgRng {
    state: u64,
}

impl LcgRng {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next(&mut self) -> u64 {
        // LCG constants from Numerical Recipes
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner_points() -> Vec<[f64; 2]> {
        // Four tight groups near the unit-square corners.
        let mut pts = Vec::new();
        for &(cx, cy) in &[(0.1, 0.1), (0.9, 0.1), (0.1, 0.9), (0.9, 0.9)] {
            for i in 0..5 {
                let off = i as f64 * 0.01;
                pts.push([cx + off, cy + off]);
            }
        }
        pts
    }

    #[test]
    fn separates_corner_groups() {
        let pts = corner_points();
        let result = kmeans(&pts, 4, 50, 42);
        assert_eq!(result.assignments.len(), pts.len());
        assert_eq!(result.centroids.len(), 4);
        // Every group of five should land in one cluster.
        for group in result.assignments.chunks(5) {
            assert!(group.iter().all(|&c| c == group[0]), "split group: {group:?}");
        }
        // And the four groups should occupy four different clusters.
        let firsts: std::collections::HashSet<usize> =
            result.assignments.chunks(5).map(|g| g[0]).collect();
        assert_eq!(firsts.len(), 4);
    }

    #[test]
    fn same_seed_same_result() {
        let pts = corner_points();
        let a = kmeans(&pts, 4, 50, 7);
        let b = kmeans(&pts, 4, 50, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_may_relabel_but_cover_all_points() {
        let pts = corner_points();
        for seed in 0..5 {
            let result = kmeans(&pts, 4, 50, seed);
            assert_eq!(result.assignments.len(), pts.len());
            assert!(result.assignments.iter().all(|&c| c < result.centroids.len()));
        }
    }

    #[test]
    fn k_reduced_to_distinct_points() {
        // Ten points but only two distinct coordinates.
        let mut pts = vec![[0.0, 0.0]; 5];
        pts.extend(vec![[1.0, 1.0]; 5]);
        let result = kmeans(&pts, 4, 50, 42);
        assert_eq!(result.centroids.len(), 2);
        assert!(result.assignments.iter().all(|&c| c < 2));
    }

    #[test]
    fn empty_input() {
        let result = kmeans(&[], 4, 50, 42);
        assert!(result.assignments.is_empty());
        assert!(result.centroids.is_empty());
    }

    #[test]
    fn single_point() {
        let result = kmeans(&[[0.5, 0.5]], 4, 50, 42);
        assert_eq!(result.assignments, vec![0]);
        assert_eq!(result.centroids, vec![[0.5, 0.5]]);
    }

    #[test]
    fn centroids_are_member_means() {
        let pts = vec![[0.0, 0.0], [0.0, 0.2], [1.0, 1.0], [1.0, 0.8]];
        let result = kmeans(&pts, 2, 50, 42);
        for (i, c) in result.centroids.iter().enumerate() {
            let members: Vec<&[f64; 2]> = pts
                .iter()
                .zip(&result.assignments)
                .filter(|(_, &a)| a == i)
                .map(|(p, _)| p)
                .collect();
            if members.is_empty() {
                continue;
            }
            let mx = members.iter().map(|p| p[0]).sum::<f64>() / members.len() as f64;
            let my = members.iter().map(|p| p[1]).sum::<f64>() / members.len() as f64;
            assert!((c[0] - mx).abs() < 1e-9);
            assert!((c[1] - my).abs() < 1e-9);
        }
    }

    #[test]
    fn lcg_is_deterministic() {
        let mut a = LcgRng::new(9);
        let mut b = LcgRng::new(9);
        for _ in 0..10 {
            assert_eq!(a.next(), b.next());
        }
    }
}
