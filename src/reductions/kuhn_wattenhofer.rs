//! Kuhn–Wattenhofer binning: color small bins independently, then merge color
//! classes group by group until Δ+1 remain.

use std::collections::HashMap;
use std::ops::Range;

use super::naive;
use crate::concurrency::{map_then_commit, parallel_read_then_commit};
use crate::config::RunContext;
use crate::error::ReductionResult;
use crate::graph::Graph;
use crate::narrate;

/// An independent set of node indices.
type Class = Vec<usize>;

/// Contiguous bins of `size` nodes; the last absorbs the remainder.
fn bins(len: usize, size: usize) -> Vec<Range<usize>> {
    let count = (len / size).max(1);
    (0..count)
        .map(|i| {
            let end = if i + 1 == count { len } else { (i + 1) * size };
            i * size..end
        })
        .collect()
}

/// First-fit sweep over `bin` that only looks at in-bin neighbors. Returns
/// the bin's color classes in color order, all non-empty.
fn color_bin(graph: &Graph, bin: Range<usize>) -> Vec<Class> {
    let mut local: Vec<Option<usize>> = vec![None; bin.len()];
    let mut classes: Vec<Class> = Vec::new();
    for v in bin.clone() {
        let mut taken = vec![false; graph.node(v).degree() + 1];
        for &u in graph.neighbors(v) {
            if let Some(c) = bin.contains(&u).then(|| local[u - bin.start]).flatten() {
                if let Some(t) = taken.get_mut(c) {
                    *t = true;
                }
            }
        }
        let color = taken.iter().position(|&t| !t).unwrap_or(taken.len());
        local[v - bin.start] = Some(color);
        if classes.len() <= color {
            classes.resize_with(color + 1, Vec::new);
        }
        classes[color].push(v);
    }
    classes.retain(|c| !c.is_empty());
    classes
}

/// Re-homes every node of a high class (position ≥ `low_count`) into the
/// first low class holding none of its neighbors; returns the low classes.
fn merge_group(graph: &Graph, group: &[Class], low_count: usize) -> Vec<Class> {
    let split = low_count.min(group.len());
    let mut low: Vec<Class> = group[..split].to_vec();
    let mut class_of: HashMap<usize, usize> = low
        .iter()
        .enumerate()
        .flat_map(|(c, class)| class.iter().map(move |&v| (v, c)))
        .collect();

    let mut blocked = vec![false; split];
    for &v in group[split..].iter().flatten() {
        blocked.iter_mut().for_each(|b| *b = false);
        for u in graph.neighbors(v) {
            if let Some(&c) = class_of.get(u) {
                blocked[c] = true;
            }
        }
        // At most Δ neighbors can block Δ+1 low classes.
        let target = blocked.iter().position(|&b| !b).unwrap_or(0);
        low[target].push(v);
        class_of.insert(v, target);
    }
    low
}

/// Kuhn–Wattenhofer reduction to at most Δ+1 colors.
///
/// Graphs smaller than one bin are first-fit seeded and handed to the greedy
/// reducer.
///
/// # Errors
/// Only those of the greedy fallback.
pub fn reduce(graph: &mut Graph, ctx: &RunContext) -> ReductionResult<()> {
    let target = graph.max_degree() + 1;
    let bin_size = 2 * target;
    if graph.len() < bin_size {
        narrate!(ctx.verbosity(), nodes = graph.len(), bin_size, "kw: below one bin, greedy");
        naive::seed_first_fit(graph);
        return naive::reduce(graph, ctx);
    }

    let ranges = bins(graph.len(), bin_size);
    let shared: &Graph = graph;
    let mut classes: Vec<Class> = parallel_read_then_commit(
        ranges.len(),
        |b| color_bin(shared, ranges[b].clone()),
        |per_bin| per_bin.into_iter().flatten().collect(),
    );
    narrate!(
        ctx.verbosity(),
        bins = ranges.len(),
        classes = classes.len(),
        "kw: bins colored"
    );

    let mut iteration = 0_usize;
    while classes.len() > target {
        let groups: Vec<&[Class]> = classes.chunks(bin_size).collect();
        classes = map_then_commit(
            &groups,
            |group| merge_group(shared, group, target),
            |merged| merged.into_iter().flatten().collect(),
        );
        iteration += 1;
        tracing::trace!(iteration, classes = classes.len(), "kw: merge pass");
    }

    for (color, class) in classes.iter().enumerate() {
        for &v in class {
            graph.set_color(v, Some(color));
        }
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
    fn bins_absorb_the_remainder() {
        assert_eq!(bins(25, 10), vec![0..10, 10..25]);
        assert_eq!(bins(8, 10), vec![0..8]);
    }

    #[test]
    fn bin_classes_are_independent() {
        let g = generate::complete(4).unwrap();
        let classes = color_bin(&g, 0..4);
        assert_eq!(classes, vec![vec![0], vec![1], vec![2], vec![3]]);
        let c = generate::cycle(6).unwrap();
        assert_eq!(color_bin(&c, 0..6), vec![vec![0, 2, 4], vec![1, 3, 5]]);
    }

    #[test]
    fn star_needs_two_colors() {
        for leaves in [1, 3, 12] {
            let mut g = generate::star(leaves).unwrap();
            reduce(&mut g, &CTX).unwrap();
            assert!(g.is_safe());
            assert_eq!(g.count_colors(), 2);
        }
    }

    #[test]
    fn merging_reaches_delta_plus_one() {
        let mut g = generate::random_bounded(300, 3, 8).unwrap();
        reduce(&mut g, &CTX).unwrap();
        assert!(g.is_safe());
        assert!(g.count_colors() <= 4);
    }
}
