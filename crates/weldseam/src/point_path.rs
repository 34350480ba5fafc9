//! Ordering loose marker points into a single path.

use weldseam_math::Point3;

/// Order `points` into a path that visits each of them exactly once.
///
/// Greedy nearest neighbor, seeded with the point whose summed distance to
/// all others is largest, so the path tends to start at an extremity.
/// This is a heuristic, not a shortest tour. It is deterministic: ties go
/// to the point that comes first in `points`.
///
/// Two or fewer points are returned unchanged.
pub fn construct_line(points: &[Point3]) -> Vec<Point3> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }

    let dist: Vec<Vec<f64>> = points
        .iter()
        .map(|a| points.iter().map(|b| (b - a).norm()).collect())
        .collect();

    let mut seed = 0;
    let mut best_sum = f64::NEG_INFINITY;
    for (i, row) in dist.iter().enumerate() {
        let sum: f64 = row.iter().sum();
        if sum > best_sum {
            best_sum = sum;
            seed = i;
        }
    }

    let mut visited = vec![false; n];
    visited[seed] = true;
    let mut order = Vec::with_capacity(n);
    order.push(seed);

    let mut last = seed;
    while order.len() < n {
        let mut next = None;
        let mut best = f64::INFINITY;
        for (k, &d) in dist[last].iter().enumerate() {
            if !visited[k] && (next.is_none() || d < best) {
                best = d;
                next = Some(k);
            }
        }
        let Some(k) = next else { break };
        visited[k] = true;
        order.push(k);
        last = k;
    }

    order.into_iter().map(|i| points[i]).collect()
}
