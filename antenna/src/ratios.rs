//! Partial and cumulative antenna ratios.
//!
//! For every gate a net exposes, one record per layer accumulates the
//! conductor area over that gate, then the partial ratios (PAR, PSR, and
//! their diffusion-credited variants) and the cumulative ratios (CAR,
//! CSR) derived from them.

use std::collections::BTreeMap;

use indexmap::{IndexMap, IndexSet};

use crate::db::design::{Design, ITermRef, PinRef};
use crate::db::tech::{AntennaRule, LayerId, Tech};
use crate::islands::LayerGraph;
use crate::rules::{AntennaModel, RuleStore};

/// Accumulated per-gate, per-layer antenna quantities.
///
/// Areas are in µm². `iterm_gate_area` and `iterm_diff_area` are the
/// owning gate's own terminal properties; when several disjoint islands
/// on one layer reach the same gate, the conductor areas sum but the
/// terminal areas do not.
#[derive(Debug, Default, Clone)]
pub(crate) struct AntennaInfo {
    pub(crate) area: f64,
    pub(crate) side_area: f64,
    pub(crate) iterm_gate_area: f64,
    pub(crate) iterm_diff_area: f64,
    /// All gates reached by the islands contributing to this record.
    pub(crate) gates: IndexSet<ITermRef>,
    pub(crate) par: f64,
    pub(crate) psr: f64,
    pub(crate) diff_par: f64,
    pub(crate) diff_psr: f64,
    pub(crate) car: f64,
    pub(crate) csr: f64,
    pub(crate) diff_car: f64,
    pub(crate) diff_csr: f64,
}

/// Per-gate, per-layer records. The inner map is keyed by [`LayerId`],
/// whose ordering is stack order, so iteration runs bottom to top.
pub(crate) type InfoTable = IndexMap<ITermRef, BTreeMap<LayerId, AntennaInfo>>;

/// Aggregates island areas into per-gate, per-layer records.
pub(crate) fn collect(design: &Design, graph: &LayerGraph) -> InfoTable {
    let tech = design.tech();
    let mut table = InfoTable::new();
    for (index, ids) in graph.by_layer.iter().enumerate() {
        let layer_id = LayerId(index);
        let layer = tech.layer(layer_id);
        for &id in ids {
            let island = &graph.islands[id];
            let gates: Vec<ITermRef> = island
                .gates
                .iter()
                .filter_map(|pin| match pin {
                    PinRef::Instance(iterm) if design.is_gate(*iterm) => Some(*iterm),
                    _ => None,
                })
                .collect();
            if gates.is_empty() {
                continue;
            }
            let area = tech.area_to_sq_microns(island.polygon.area());
            let side_area = if layer.is_routing() {
                tech.to_microns(island.polygon.perimeter()) * tech.to_microns(layer.thickness())
            } else {
                // Cuts contribute no side area.
                0.0
            };
            for &gate in &gates {
                let record = table
                    .entry(gate)
                    .or_default()
                    .entry(layer_id)
                    .or_default();
                record.area += area;
                record.side_area += side_area;
                record.iterm_gate_area = design.gate_area(gate);
                record.iterm_diff_area = design.diff_area(gate);
                record.gates.extend(gates.iter().copied());
            }
        }
    }
    table
}

/// Computes PAR and PSR (and diffusion variants) for every record.
pub(crate) fn compute_par(design: &Design, rules: &RuleStore, table: &mut InfoTable) {
    let tech = design.tech();
    for records in table.values_mut() {
        for (layer_id, info) in records.iter_mut() {
            let layer = tech.layer(*layer_id);
            let model = rules.model(*layer_id);
            if layer.is_routing() {
                calculate_wire_par(model, layer.antenna_rule(), info);
            } else {
                calculate_via_par(model, layer.antenna_rule(), info);
            }
        }
    }
}

/// Computes PAR/PSR for one routing-layer record.
///
/// Also used by the diode sizing loop to re-evaluate a record after
/// raising its diffusion area.
pub(crate) fn calculate_wire_par(
    model: &AntennaModel,
    rule: Option<&AntennaRule>,
    info: &mut AntennaInfo,
) {
    if info.iterm_gate_area == 0.0 {
        return;
    }
    let reduce = match rule {
        Some(rule) => rule
            .area_diff_reduce
            .eval(info.iterm_diff_area, model.diff_metal_reduce_factor),
        None => model.diff_metal_reduce_factor,
    };
    if info.iterm_diff_area != 0.0 {
        let protected = info.iterm_gate_area + model.plus_diff_factor * info.iterm_diff_area;
        let credit = model.minus_diff_factor * info.iterm_diff_area;
        info.par = model.diff_metal_factor * info.area / info.iterm_gate_area;
        info.psr = model.diff_side_metal_factor * info.side_area / info.iterm_gate_area;
        info.diff_par = (model.diff_metal_factor * info.area * reduce - credit) / protected;
        info.diff_psr = (model.diff_side_metal_factor * info.side_area * reduce - credit) / protected;
    } else {
        info.par = model.metal_factor * info.area / info.iterm_gate_area;
        info.psr = model.side_metal_factor * info.side_area / info.iterm_gate_area;
        info.diff_par = model.metal_factor * info.area * reduce / info.iterm_gate_area;
        info.diff_psr = model.side_metal_factor * info.side_area * reduce / info.iterm_gate_area;
    }
}

/// Computes PAR for one cut-layer record. Cuts have no side area, so PSR
/// and its diffusion variant stay zero.
pub(crate) fn calculate_via_par(
    model: &AntennaModel,
    rule: Option<&AntennaRule>,
    info: &mut AntennaInfo,
) {
    if info.iterm_gate_area == 0.0 {
        return;
    }
    let reduce = match rule {
        Some(rule) => rule
            .area_diff_reduce
            .eval(info.iterm_diff_area, model.diff_metal_reduce_factor),
        None => model.diff_metal_reduce_factor,
    };
    if info.iterm_diff_area != 0.0 {
        let protected = info.iterm_gate_area + model.plus_diff_factor * info.iterm_diff_area;
        let credit = model.minus_diff_factor * info.iterm_diff_area;
        info.par = model.diff_cut_factor * info.area / info.iterm_gate_area;
        info.diff_par = (model.diff_cut_factor * info.area * reduce - credit) / protected;
    } else {
        info.par = model.cut_factor * info.area / info.iterm_gate_area;
        info.diff_par = model.cut_factor * info.area * reduce / info.iterm_gate_area;
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct RatioSum {
    par: f64,
    psr: f64,
    diff_par: f64,
    diff_psr: f64,
}

impl RatioSum {
    fn accumulate(&mut self, info: &AntennaInfo) {
        self.par += info.par;
        self.psr += info.psr;
        self.diff_par += info.diff_par;
        self.diff_psr += info.diff_psr;
    }
}

/// Computes CAR and CSR (and diffusion variants) for every record.
///
/// Wire and cut contributions accumulate separately, bottom to top. A
/// routing layer whose rule sets `cum_routing_plus_cut` additionally
/// counts the accumulated cut contribution in its cumulative area ratio.
pub(crate) fn compute_car(tech: &Tech, table: &mut InfoTable) {
    for records in table.values_mut() {
        let mut sum_wire = RatioSum::default();
        let mut sum_via = RatioSum::default();
        for (layer_id, info) in records.iter_mut() {
            let layer = tech.layer(*layer_id);
            if layer.is_routing() {
                sum_wire.accumulate(info);
                info.car = sum_wire.par;
                info.csr = sum_wire.psr;
                info.diff_car = sum_wire.diff_par;
                info.diff_csr = sum_wire.diff_psr;
                if layer
                    .antenna_rule()
                    .is_some_and(|rule| rule.cum_routing_plus_cut)
                {
                    info.car += sum_via.par;
                    info.diff_car += sum_via.diff_par;
                }
            } else {
                sum_via.accumulate(info);
                info.car = sum_via.par;
                info.diff_car = sum_via.diff_par;
            }
        }
    }
}
