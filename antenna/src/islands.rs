//! Per-net island graph construction.
//!
//! A net's routed shapes are unioned into one polygon set per layer; each
//! maximal polygon becomes an island. Pin footprints are subtracted first,
//! so islands model conductor only. Cut-layer islands record which islands
//! they touch on the adjacent routing layers, giving the vertical edges
//! the connectivity pass unions over.

use geometry::polyset::{Polygon, PolygonSet};
use indexmap::IndexSet;

use crate::db::design::{Design, Net, PinRef, Wire, WireShape};
use crate::db::tech::{LayerId, LayerKind};

/// One conductor island on one layer.
///
/// Islands are identified by their index into the graph's island vector;
/// ids are dense and assigned bottom layer first.
#[derive(Debug, Clone)]
pub(crate) struct Island {
    pub(crate) polygon: Polygon,
    /// Ids of touching islands one layer down. For a cut island these are
    /// islands on the routing layer below; for a routing island, cut
    /// islands on the cut layer below.
    pub(crate) lower: Vec<usize>,
    /// Pins electrically reachable from this island once the net is
    /// fabricated up to this layer. Filled in by the connectivity pass.
    pub(crate) gates: IndexSet<PinRef>,
}

/// The layered island graph of one net.
#[derive(Debug, Clone)]
pub(crate) struct LayerGraph {
    /// Island ids per layer, indexed by layer stack position.
    pub(crate) by_layer: Vec<Vec<usize>>,
    pub(crate) islands: Vec<Island>,
}

impl LayerGraph {
    /// Builds the island graph for one routed net.
    pub(crate) fn build(design: &Design, net: &Net, wire: &Wire) -> Self {
        let tech = design.tech();
        let mut sets: Vec<PolygonSet> = vec![PolygonSet::new(); tech.num_layers()];

        for shape in &wire.shapes {
            match shape {
                WireShape::Segment { layer, rect } => sets[layer.index()].add(*rect),
                WireShape::Via { def, at } => {
                    for part in design.via(*def).boxes_at(*at) {
                        sets[part.layer.index()].add(part.rect);
                    }
                }
            }
        }

        // Pins are external terminals, not conductor: remove their
        // footprints so islands end where pins begin.
        for &pin in &net.pins {
            for shape in design.pin_shapes(pin) {
                if tech.layer(shape.layer).kind() == LayerKind::Routing {
                    sets[shape.layer.index()].cut(shape.rect);
                }
            }
        }

        let mut islands = Vec::new();
        let mut by_layer = vec![Vec::new(); tech.num_layers()];
        for (index, set) in sets.iter().enumerate() {
            for polygon in set.polygons() {
                let id = islands.len();
                islands.push(Island {
                    polygon,
                    lower: Vec::new(),
                    gates: IndexSet::new(),
                });
                by_layer[index].push(id);
            }
        }

        let mut graph = Self { by_layer, islands };
        graph.link_cut_layers(design, net);
        graph
    }

    /// Finds, for every cut island, the islands it touches on the two
    /// adjacent routing layers, and records the vertical adjacency.
    fn link_cut_layers(&mut self, design: &Design, net: &Net) {
        let tech = design.tech();
        let mut links: Vec<(usize, Vec<usize>, Vec<usize>)> = Vec::new();
        for (layer_id, layer) in tech.layers() {
            if layer.kind() != LayerKind::Cut {
                continue;
            }
            // Cut layers always have routing neighbors on both sides.
            let below = tech.below(layer_id).unwrap();
            let above = tech.above(layer_id).unwrap();
            for &cut in &self.by_layer[layer_id.index()] {
                let hits = |neighbor: LayerId| -> Vec<usize> {
                    self.by_layer[neighbor.index()]
                        .iter()
                        .copied()
                        .filter(|&m| self.islands[cut].polygon.connects(&self.islands[m].polygon))
                        .collect()
                };
                let lower_hits = hits(below);
                let upper_hits = hits(above);
                for (side, hits) in [("lower", &lower_hits), ("upper", &upper_hits)] {
                    if hits.len() > 2 {
                        tracing::warn!(
                            net = %net.name,
                            cut_layer = %tech.layer(layer_id).name(),
                            side,
                            count = hits.len(),
                            "cut island connects to more than two wires on its neighbor layer"
                        );
                    }
                }
                links.push((cut, lower_hits, upper_hits));
            }
        }
        for (cut, lower_hits, upper_hits) in links {
            if lower_hits.len() <= 2 {
                self.islands[cut].lower.extend(lower_hits);
            }
            if upper_hits.len() <= 2 {
                for upper in upper_hits {
                    self.islands[upper].lower.push(cut);
                }
            }
        }
    }
}
