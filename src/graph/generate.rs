//! Graph generators for tests, benchmarks and the comparison task.
//!
//! Every generator names its nodes `N0, N1, ...` and leaves colors unset;
//! call [`Graph::seed_identity`] for the n-coloring runs start from.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::Graph;
use crate::config::splitmix64;
use crate::error::GraphError;

/// A cycle on `n` nodes (Δ = 2). `n < 3` degenerates to a path.
pub fn cycle(n: usize) -> Result<Graph, GraphError> {
    if n < 3 {
        return path(n);
    }
    let edges: Vec<_> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    let mut graph = Graph::from_edges(format!("Cycle_N{n}"), 2, n, &edges)?;
    graph.set_description(format!("A cycle on {n} nodes"));
    Ok(graph)
}

/// A path on `n` nodes.
pub fn path(n: usize) -> Result<Graph, GraphError> {
    let edges: Vec<_> = (1..n).map(|i| (i - 1, i)).collect();
    let max_degree = if n > 2 { 2 } else { n.saturating_sub(1) };
    let mut graph = Graph::from_edges(format!("Path_N{n}"), max_degree, n, &edges)?;
    graph.set_description(format!("A path on {n} nodes"));
    Ok(graph)
}

/// A star: hub `N0` joined to `leaves` leaves (Δ = `leaves`).
pub fn star(leaves: usize) -> Result<Graph, GraphError> {
    let edges: Vec<_> = (1..=leaves).map(|i| (0, i)).collect();
    let mut graph = Graph::from_edges(format!("Star_K{leaves}"), leaves, leaves + 1, &edges)?;
    graph.set_description(format!("A star with {leaves} leaves"));
    Ok(graph)
}

/// The complete graph on `n` nodes (Δ = n - 1).
pub fn complete(n: usize) -> Result<Graph, GraphError> {
    let edges: Vec<_> = (0..n)
        .flat_map(|a| (a + 1..n).map(move |b| (a, b)))
        .collect();
    let mut graph = Graph::from_edges(format!("Complete_N{n}"), n.saturating_sub(1), n, &edges)?;
    graph.set_description(format!("The complete graph on {n} nodes"));
    Ok(graph)
}

/// A random graph on `n` nodes whose degrees never exceed `max_degree`.
///
/// Node `N0` is joined to the last node and to `max_degree - 2` random
/// others; then each node in turn draws partners uniformly among the nodes
/// still under the bound until it reaches the bound or runs out. The same
/// `seed` always yields the same graph.
pub fn random_bounded(n: usize, max_degree: usize, seed: u64) -> Result<Graph, GraphError> {
    let mut rng = SmallRng::seed_from_u64(splitmix64(seed));
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];

    let link = |adjacency: &mut Vec<Vec<usize>>, a: usize, b: usize| {
        adjacency[a].push(b);
        adjacency[b].push(a);
    };

    if n >= 2 && max_degree >= 1 {
        link(&mut adjacency, 0, n - 1);
        let mut spokes: Vec<usize> = (1..n - 1).collect();
        spokes.shuffle(&mut rng);
        for &b in spokes.iter().take(max_degree.saturating_sub(2)) {
            link(&mut adjacency, 0, b);
        }
    }

    for x in 1..n {
        let need = max_degree.saturating_sub(adjacency[x].len());
        if need == 0 {
            continue;
        }
        let candidates: Vec<usize> = (0..n)
            .filter(|&y| y != x && adjacency[y].len() < max_degree && !adjacency[x].contains(&y))
            .collect();
        let picked: Vec<usize> = candidates.choose_multiple(&mut rng, need).copied().collect();
        for y in picked {
            link(&mut adjacency, x, y);
        }
    }

    let edges: Vec<(usize, usize)> = adjacency
        .iter()
        .enumerate()
        .flat_map(|(a, list)| list.iter().filter(move |&&b| a < b).map(move |&b| (a, b)))
        .collect();
    let mut graph = Graph::from_edges(format!("Graph_N{n}_D{max_degree}"), max_degree, n, &edges)?;
    graph.set_description(format!(
        "A graph with {n} nodes and a max degree of {max_degree}"
    ));
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_shapes() {
        let c = cycle(4).unwrap();
        assert_eq!(c.edge_count(), 4);
        assert!(c.nodes().iter().all(|n| n.degree() == 2));

        let s = star(5).unwrap();
        assert_eq!(s.node(0).degree(), 5);
        assert_eq!(s.max_degree(), 5);

        let k = complete(5).unwrap();
        assert_eq!(k.edge_count(), 10);

        let p = path(1).unwrap();
        assert_eq!(p.edge_count(), 0);
        assert_eq!(cycle(2).unwrap().edge_count(), 1);
    }

    #[test]
    fn random_respects_bound_and_seed() {
        let a = random_bounded(60, 5, 11).unwrap();
        let b = random_bounded(60, 5, 11).unwrap();
        assert_eq!(a, b);
        assert!(a.nodes().iter().all(|n| n.degree() <= 5));
        assert!(a.edge_count() > 60);
    }
}
