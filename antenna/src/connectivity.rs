//! Electrical connectivity across the island graph.
//!
//! Unions islands through cut layers with a disjoint-set structure,
//! walking the stack bottom to top so each layer's union state reflects
//! exactly the wiring fabricated so far. After each layer's unions, the
//! pins reachable from every island on that layer are attached to it.

use aph_disjoint_set::DisjointSet;
use indexmap::IndexMap;

use crate::db::design::{Design, Net, PinRef};
use crate::db::tech::LayerKind;
use crate::islands::LayerGraph;

/// Attaches to every island the set of pins electrically connected to it
/// through wiring at or below the island's layer.
pub(crate) fn attach_pins(design: &Design, net: &Net, graph: &mut LayerGraph) {
    let tech = design.tech();

    // Islands a pin touches directly: on the pin's own routing layer, and
    // on the cut layers immediately above and below it.
    let mut pin_neighbors: IndexMap<PinRef, Vec<usize>> = IndexMap::new();
    for &pin in &net.pins {
        for shape in design.pin_shapes(pin) {
            if tech.layer(shape.layer).kind() != LayerKind::Routing {
                continue;
            }
            let neighborhood = [Some(shape.layer), tech.above(shape.layer), tech.below(shape.layer)];
            for layer in neighborhood.into_iter().flatten() {
                for &island in &graph.by_layer[layer.index()] {
                    if graph.islands[island].polygon.connects_rect(shape.rect) {
                        pin_neighbors.entry(pin).or_default().push(island);
                    }
                }
            }
        }
    }

    if graph.islands.is_empty() {
        return;
    }

    let mut dsu = DisjointSet::new(graph.islands.len());
    for layer_index in 0..graph.by_layer.len() {
        for &island in &graph.by_layer[layer_index] {
            for &lower in &graph.islands[island].lower {
                dsu.union(island, lower);
            }
        }
        for &island in &graph.by_layer[layer_index] {
            let root = dsu.get_root(island).into_inner();
            for (&pin, neighbors) in &pin_neighbors {
                if neighbors
                    .iter()
                    .any(|&n| dsu.get_root(n).into_inner() == root)
                {
                    graph.islands[island].gates.insert(pin);
                }
            }
        }
    }
}
