//! Folds the per-forest 3-colorings back into one graph coloring.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use super::ColoredForest;
use crate::error::ProtocolError;
use crate::graph::Graph;

/// Recolors `graph` node by node from `[0, Δ]`.
///
/// A node drops every color an already colored neighbor holds, and within
/// each forest it belongs to, the forest colors of forest neighbors that are
/// still uncolored. It then draws uniformly among what is left.
pub(super) fn unify(
    graph: &mut Graph,
    forests: &[ColoredForest],
    rng: &mut SmallRng,
) -> Result<(), ProtocolError> {
    graph.clear_colors();
    let palette = graph.max_degree() + 1;
    let mut allowed = vec![true; palette];

    for index in 0..graph.len() {
        allowed.iter_mut().for_each(|a| *a = true);
        let mut ban = |color: usize| {
            if let Some(slot) = allowed.get_mut(color) {
                *slot = false;
            }
        };

        for &n in graph.neighbors(index) {
            if let Some(c) = graph.color(n) {
                ban(c);
            }
        }
        for colored in forests {
            let Some(slot) = colored.forest.slot_of(index) else {
                continue;
            };
            for &peer in colored.forest.node(slot).neighbors() {
                let origin = colored.forest.node(peer).origin();
                if graph.color(origin).is_none() {
                    ban(colored.color(peer));
                }
            }
        }

        let survivors: Vec<usize> = (0..palette).filter(|&c| allowed[c]).collect();
        let color = survivors
            .choose(rng)
            .copied()
            .ok_or_else(|| ProtocolError::NoFreeColor {
                node: graph.node(index).name().to_owned(),
                palette,
            })?;
        graph.set_color(index, Some(color));
    }
    Ok(())
}
