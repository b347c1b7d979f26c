//! Linial-style iterative refinement of an n-coloring.
//!
//! The graph's current colors are the seed; unset nodes start from their
//! index. Colors are 1-indexed while refining. Each pass splits the current palette
//! into buckets of `2p²` colors (`p = max(Δ, 1)`), recolors every bucket into
//! `[1, p²]` from the least-used neighbor colors below and above each node,
//! and stacks the buckets back into one palette of `buckets · p²` colors.
//! Refinement stops once the palette fits in `p²`.
//!
//! From a seed in `[0, n)` the result lies in `[0, p²)`; it is not
//! guaranteed to be proper.

use crate::concurrency::parallel_read_then_commit;
use crate::config::RunContext;
use crate::error::ReductionResult;
use crate::graph::Graph;
use crate::narrate;

/// Palette geometry for one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
    p: usize,
    p2: usize,
    q: usize,
}

impl Geometry {
    fn new(max_degree: usize) -> Self {
        let p = max_degree.max(1);
        Self {
            p,
            p2: p * p,
            q: 2 * p * p,
        }
    }

    /// Bucket of a 1-indexed `color`, clamped to `buckets`.
    fn bucket(self, color: usize, buckets: usize) -> usize {
        ((color + self.q - 1) / self.q).clamp(1, buckets)
    }

    fn local(self, color: usize, bucket: usize) -> usize {
        color - (bucket - 1) * self.q
    }
}

/// Index in `[1, p]` of the smallest count, ties toward the smaller color.
fn least_used(counts: &[usize]) -> usize {
    (1..counts.len())
        .min_by_key(|&c| counts[c])
        .unwrap_or(1)
}

/// New local color for `v`, counting only same-bucket neighbors whose local
/// colors fall in `[1, p]`.
fn refine(graph: &Graph, geo: Geometry, colors: &[usize], bucket_of: &[usize], v: usize) -> usize {
    let b = bucket_of[v];
    let own = geo.local(colors[v], b);
    let mut below = vec![0_usize; geo.p + 1];
    let mut above = vec![0_usize; geo.p + 1];
    for &u in graph.neighbors(v) {
        if bucket_of[u] != b {
            continue;
        }
        let theirs = geo.local(colors[u], b);
        if !(1..=geo.p).contains(&theirs) {
            continue;
        }
        if theirs < own {
            below[theirs] += 1;
        } else {
            above[theirs] += 1;
        }
    }
    (least_used(&above) - 1) * geo.p + least_used(&below)
}

/// Linial refinement into the palette `[0, p²)`.
///
/// # Errors
/// Never fails on a validated graph; the signature matches the other reducers.
pub fn reduce(graph: &mut Graph, ctx: &RunContext) -> ReductionResult<()> {
    let geo = Geometry::new(graph.max_degree());
    let mut colors: Vec<usize> = graph
        .nodes()
        .iter()
        .map(|node| node.color().unwrap_or(node.index()) + 1)
        .collect();
    let mut total = graph.len();
    let mut pass = 0_usize;

    while total > geo.p2 {
        let buckets = (total / geo.q).max(1);
        let bucket_of: Vec<usize> = colors.iter().map(|&c| geo.bucket(c, buckets)).collect();
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); buckets];
        for (v, &b) in bucket_of.iter().enumerate() {
            members[b - 1].push(v);
        }

        let shared: &Graph = graph;
        let snapshot = &colors;
        let updates = parallel_read_then_commit(
            buckets,
            |i| {
                members[i]
                    .iter()
                    .map(|&v| (v, refine(shared, geo, snapshot, &bucket_of, v)))
                    .collect::<Vec<_>>()
            },
            |per_bucket| per_bucket,
        );
        for (v, local) in updates.into_iter().flatten() {
            colors[v] = local + (bucket_of[v] - 1) * geo.p2;
        }

        total = buckets * geo.p2;
        pass += 1;
        tracing::trace!(pass, buckets, total, "linial: pass done");
    }
    narrate!(ctx.verbosity(), passes = pass, palette = geo.p2, "linial: refined");

    for (v, c) in colors.into_iter().enumerate() {
        graph.set_color(v, Some(c - 1));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generate;
    use crate::logging::Verbosity;

    const CTX: RunContext = RunContext::new(0, Verbosity::QUIET);

    #[test]
    fn least_used_prefers_small_colors() {
        assert_eq!(least_used(&[0, 0, 0, 0]), 1);
        assert_eq!(least_used(&[0, 2, 1, 1]), 2);
        assert_eq!(least_used(&[9, 1, 0]), 2);
    }

    #[test]
    fn bucket_is_clamped() {
        let geo = Geometry::new(2);
        assert_eq!(geo.q, 8);
        assert_eq!(geo.bucket(1, 3), 1);
        assert_eq!(geo.bucket(8, 3), 1);
        assert_eq!(geo.bucket(9, 3), 2);
        assert_eq!(geo.bucket(40, 3), 3);
        assert_eq!(geo.local(9, 2), 1);
    }

    #[test]
    fn unset_nodes_start_from_their_index() {
        let mut g = generate::cycle(4).unwrap();
        reduce(&mut g, &CTX).unwrap();
        assert_eq!(g.colors(), vec![Some(0), Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn small_graphs_keep_their_seed() {
        let mut g = generate::cycle(4).unwrap();
        g.set_colors([3, 2, 1, 0]);
        reduce(&mut g, &CTX).unwrap();
        assert_eq!(g.colors(), vec![Some(3), Some(2), Some(1), Some(0)]);
    }

    #[test]
    fn permuted_seed_still_refines_into_p_squared() {
        let mut g = generate::random_bounded(300, 3, 9).unwrap();
        let n = g.len();
        g.set_colors((0..n).rev());
        reduce(&mut g, &CTX).unwrap();
        assert!(g.nodes().iter().all(|node| node.color().unwrap() < 9));
    }

    #[test]
    fn palette_shrinks_below_p_squared() {
        for (n, d) in [(500, 3), (64, 1), (1000, 6)] {
            let mut g = generate::random_bounded(n, d, 4).unwrap();
            reduce(&mut g, &CTX).unwrap();
            let p2 = d.max(1) * d.max(1);
            assert!(g.nodes().iter().all(|node| node.color().unwrap() < p2));
        }
    }
}
