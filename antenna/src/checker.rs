//! The checker driver: runs the per-net pipeline, compares ratios to rule
//! limits, sizes repair diodes, and emits reports and violation records.

use std::borrow::Cow;
use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::connectivity;
use crate::db::design::{Design, ITermRef, MTermRef, Net, NetId, Wire};
use crate::db::tech::{AntennaRule, Layer, LayerId, PwlTable};
use crate::error::{Error, Result};
use crate::islands::LayerGraph;
use crate::ratios::{self, AntennaInfo, InfoTable};
use crate::report::ReportSink;
use crate::rules::RuleStore;

/// The diode sizing loop gives up past this many diodes per gate.
const MAX_DIODE_COUNT_PER_GATE: u32 = 100;

/// Options for one checker run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckOptions {
    /// Report non-violating checks too.
    pub verbose: bool,
    /// Emit every checked net's report header, even when the net is clean.
    pub report_if_no_violation: bool,
    /// The diffusion diode to size repairs with. Enables the
    /// diode-estimate loop on violating routing-layer records.
    pub diode_mterm: Option<MTermRef>,
    /// Percentage reduction applied to fixed ratio limits, in `[0, 100)`.
    /// PWL limits are not reduced.
    pub ratio_margin: f64,
}

/// Violation counts from a checker run.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckSummary {
    /// Nets with at least one violating pin.
    pub net_violations: usize,
    /// Pins with at least one violating layer.
    pub pin_violations: usize,
}

/// A diode-repairable violation on one routing level, for the diode
/// insertion engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    /// The routing level of the violating layer.
    pub routing_level: usize,
    /// The gates sharing the violating record.
    pub gates: Vec<ITermRef>,
    /// The number of diodes per gate estimated to repair the violation.
    pub diode_count_per_gate: u32,
}

/// A source of estimated routes, consulted when the design carries no
/// detailed routes yet.
pub trait GlobalRouteSource {
    /// Returns `true` if global routes are available.
    fn have_routes(&self) -> bool;
    /// Builds the estimated wire for a net, if the router covered it.
    fn net_wire(&self, net: NetId) -> Option<Wire>;
}

/// The antenna rule checker for one design.
///
/// Holds only run-scoped state besides the immutable
/// [`RuleStore`](crate::rules::RuleStore); per-net scratch (the island
/// graph and ratio records) is created and dropped inside each net's
/// check.
pub struct AntennaChecker<'a> {
    design: &'a Design,
    rules: RuleStore,
    route_source: Option<&'a dyn GlobalRouteSource>,
    report_path: Option<PathBuf>,
    net_violation_count: usize,
}

impl<'a> AntennaChecker<'a> {
    /// Creates a checker for the given design, deriving the rule cache.
    pub fn new(design: &'a Design) -> Self {
        Self {
            design,
            rules: RuleStore::new(design.tech()),
            route_source: None,
            report_path: None,
            net_violation_count: 0,
        }
    }

    /// Attaches a global-route source used as a fallback when the design
    /// has no detailed routes.
    pub fn with_route_source(mut self, source: &'a dyn GlobalRouteSource) -> Self {
        self.route_source = Some(source);
        self
    }

    /// Sets or clears the report file path.
    pub fn set_report_file(&mut self, path: Option<PathBuf>) {
        self.report_path = path;
    }

    /// The net-violation count of the most recent
    /// [`check_antennas`](AntennaChecker::check_antennas) run.
    pub fn violation_count(&self) -> usize {
        self.net_violation_count
    }

    /// Checks one net, or every non-special net.
    ///
    /// Returns the violation counts and the diode-repairable violations
    /// (populated only when [`CheckOptions::diode_mterm`] is set).
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NoRoutes`] if neither detailed nor global
    /// routes exist, and with [`Error::SpecialNet`] if `net` explicitly
    /// selects a special net.
    pub fn check_antennas(
        &mut self,
        net: Option<NetId>,
        options: &CheckOptions,
    ) -> Result<(CheckSummary, Vec<Violation>)> {
        let mut sink = ReportSink::open(self.report_path.as_deref())?;

        let have_detailed = self
            .design
            .nets()
            .any(|(_, net)| !net.special && net.wire.is_some());
        let have_global = self.route_source.is_some_and(|s| s.have_routes());
        if !have_detailed && !have_global {
            return Err(Error::NoRoutes);
        }
        let use_global = !have_detailed;

        let mut summary = CheckSummary::default();
        let mut violations = Vec::new();
        match net {
            Some(id) => {
                let net = self.design.net(id);
                if net.special {
                    return Err(Error::SpecialNet(net.name.clone()));
                }
                self.check_net(id, options, use_global, &mut sink, &mut summary, &mut violations)?;
            }
            None => {
                for (id, net) in self.design.nets() {
                    if net.special {
                        continue;
                    }
                    self.check_net(id, options, use_global, &mut sink, &mut summary, &mut violations)?;
                }
            }
        }
        sink.finish()?;

        tracing::info!(
            violating_nets = summary.net_violations,
            "found {} net violations",
            summary.net_violations
        );
        tracing::info!(
            violating_pins = summary.pin_violations,
            "found {} pin violations",
            summary.pin_violations
        );
        self.net_violation_count = summary.net_violations;
        Ok((summary, violations))
    }

    /// Computes the diode-repairable violations of one net, without
    /// opening the report file. Special nets yield an empty list.
    pub fn violations(
        &self,
        net: NetId,
        diode_mterm: Option<MTermRef>,
        ratio_margin: f64,
    ) -> Result<Vec<Violation>> {
        if self.design.net(net).special {
            return Ok(Vec::new());
        }
        let options = CheckOptions {
            verbose: false,
            report_if_no_violation: false,
            diode_mterm,
            ratio_margin,
        };
        let mut sink = ReportSink::log_only();
        let mut summary = CheckSummary::default();
        let mut violations = Vec::new();
        self.check_net(net, &options, false, &mut sink, &mut summary, &mut violations)?;
        Ok(violations)
    }

    /// Runs the full pipeline on one net and accumulates results.
    fn check_net(
        &self,
        id: NetId,
        options: &CheckOptions,
        use_global: bool,
        sink: &mut ReportSink,
        summary: &mut CheckSummary,
        violations: &mut Vec<Violation>,
    ) -> Result<()> {
        let net = self.design.net(id);
        let wire: Option<Cow<Wire>> = if use_global {
            self.route_source
                .and_then(|source| source.net_wire(id).map(Cow::Owned))
        } else {
            net.wire.as_ref().map(Cow::Borrowed)
        };
        let Some(wire) = wire else {
            return Ok(());
        };
        tracing::debug!(net = %net.name, "checking net");

        let mut graph = LayerGraph::build(self.design, net, &wire);
        connectivity::attach_pins(self.design, net, &mut graph);
        let mut table = ratios::collect(self.design, &graph);
        ratios::compute_par(self.design, &self.rules, &mut table);
        ratios::compute_car(self.design.tech(), &mut table);

        let pin_violations = self.check_records(net, &table, options, sink, violations)?;
        if pin_violations > 0 {
            summary.net_violations += 1;
            summary.pin_violations += pin_violations;
        }
        Ok(())
    }

    /// Checks every (gate, layer) record of one net against its layer's
    /// rule, reporting and sizing diodes as requested. Returns the number
    /// of violating pins.
    fn check_records(
        &self,
        net: &Net,
        table: &InfoTable,
        options: &CheckOptions,
        sink: &mut ReportSink,
        violations: &mut Vec<Violation>,
    ) -> Result<usize> {
        let tech = self.design.tech();
        let margin = options.ratio_margin;
        let mut pin_violation_count = 0;
        let mut net_reported = false;
        // Gates already granted diodes on a layer through an earlier
        // record's gate set.
        let mut pins_added: IndexMap<LayerId, IndexSet<ITermRef>> = IndexMap::new();

        for (gate, records) in table.iter() {
            let mut pin_has_violation = false;
            let mut pin_reported = false;

            for (layer_id, info) in records.iter() {
                let layer = tech.layer(*layer_id);
                let Some(rule) = layer.antenna_rule() else {
                    // Normal for top layers and the substrate.
                    continue;
                };
                let checks = run_checks(layer, rule, info, margin);
                let node_has_violation = checks.iter().any(|check| check.violated);

                let reported: Vec<&RatioCheck> = checks
                    .iter()
                    .filter(|check| check.violated || options.verbose)
                    .collect();
                if !reported.is_empty() {
                    if !net_reported {
                        sink.line(&format!("Net: {}", net.name))?;
                        net_reported = true;
                    }
                    if !pin_reported {
                        sink.line(&format!("  Pin: {}", self.design.iterm_name(*gate)))?;
                        pin_reported = true;
                    }
                    sink.line(&format!("    Layer: {}", layer.name()))?;
                    for check in reported {
                        sink.line(&format!("      {}: {:7.2}", check.heading, check.ratio))?;
                        let verdict = if check.violated { " (VIOLATED)" } else { "" };
                        sink.line(&format!(
                            "      Required ratio: {:7.2} ({}){}",
                            check.required, check.qualifier, verdict
                        ))?;
                    }
                }

                if node_has_violation {
                    pin_has_violation = true;
                    if let Some(diode) = options.diode_mterm {
                        let already_added = pins_added
                            .get(layer_id)
                            .is_some_and(|gates| gates.contains(gate));
                        if layer.is_routing() && !already_added {
                            let (gates, diode_count) =
                                self.size_diodes(net, *layer_id, rule, info, diode, margin);
                            pins_added
                                .entry(*layer_id)
                                .or_default()
                                .extend(gates.iter().copied());
                            if diode_count > 0 {
                                violations.push(Violation {
                                    routing_level: layer.routing_level(),
                                    gates,
                                    diode_count_per_gate: diode_count,
                                });
                            }
                        }
                    }
                }
            }

            if pin_has_violation {
                pin_violation_count += 1;
            }
            if pin_reported {
                sink.line("")?;
            }
        }

        if !net_reported && options.report_if_no_violation {
            sink.line(&format!("Net: {}", net.name))?;
            sink.line("")?;
        } else if net_reported {
            sink.line("")?;
        }
        Ok(pin_violation_count)
    }

    /// Estimates how many diodes per gate pull a violating routing-layer
    /// record's PAR and PSR under their limits.
    ///
    /// Cumulative ratios are deliberately not re-evaluated: the loop sizes
    /// the diode, it does not re-run the full check.
    fn size_diodes(
        &self,
        net: &Net,
        layer_id: LayerId,
        rule: &AntennaRule,
        info: &AntennaInfo,
        diode: MTermRef,
        margin: f64,
    ) -> (Vec<ITermRef>, u32) {
        let diode_diff_area = self.design.master_mterm(diode).antenna.diff_area();
        let model = self.rules.model(layer_id);
        let mut probe = info.clone();
        let gates: Vec<ITermRef> = probe.gates.iter().copied().collect();
        let mut diode_count = 0u32;

        while partial_ratios_violated(rule, &probe, margin) {
            // One diode per gate per round, shared across the record.
            probe.iterm_diff_area += diode_diff_area * gates.len() as f64;
            diode_count += 1;
            ratios::calculate_wire_par(model, Some(rule), &mut probe);
            if diode_count > MAX_DIODE_COUNT_PER_GATE {
                tracing::warn!(
                    net = %net.name,
                    "net requires more than {} diodes per gate to repair violations",
                    MAX_DIODE_COUNT_PER_GATE
                );
                break;
            }
        }
        (gates, diode_count)
    }
}

/// One applicable ratio check, resolved to a value and a limit.
struct RatioCheck {
    heading: &'static str,
    qualifier: &'static str,
    ratio: f64,
    required: f64,
    violated: bool,
}

/// Resolves a check to `(value, limit)`: the fixed limit (margin-reduced)
/// when present, else the PWL limit at the record's diffusion area, else
/// not applicable.
fn applicable_check(
    fixed: f64,
    pwl: &PwlTable,
    diff_area: f64,
    margin: f64,
    value: f64,
    diff_value: f64,
) -> Option<(f64, f64)> {
    if fixed != 0.0 {
        Some((value, fixed * (1.0 - margin / 100.0)))
    } else {
        let required = pwl.eval(diff_area, 0.0);
        (required != 0.0).then_some((diff_value, required))
    }
}

/// Runs every check applicable to one record: PAR/PSR/CAR/CSR on routing
/// layers, PAR/CAR on cut layers.
fn run_checks(layer: &Layer, rule: &AntennaRule, info: &AntennaInfo, margin: f64) -> Vec<RatioCheck> {
    let mut checks = Vec::new();
    let diff_area = info.iterm_diff_area;
    let mut push = |heading, qualifier, fixed, pwl: &PwlTable, value, diff_value| {
        if let Some((ratio, required)) =
            applicable_check(fixed, pwl, diff_area, margin, value, diff_value)
        {
            checks.push(RatioCheck {
                heading,
                qualifier,
                ratio,
                required,
                violated: ratio > required,
            });
        }
    };
    push(
        "Partial area ratio",
        "Gate area",
        rule.par,
        &rule.diff_par,
        info.par,
        info.diff_par,
    );
    if layer.is_routing() {
        push(
            "Partial area ratio",
            "Side area",
            rule.psr,
            &rule.diff_psr,
            info.psr,
            info.diff_psr,
        );
    }
    push(
        "Cumulative area ratio",
        "Cumulative area",
        rule.car,
        &rule.diff_car,
        info.car,
        info.diff_car,
    );
    if layer.is_routing() {
        push(
            "Cumulative area ratio",
            "Cumulative side area",
            rule.csr,
            &rule.diff_csr,
            info.csr,
            info.diff_csr,
        );
    }
    checks
}

/// The diode loop's exit test: PAR and PSR only.
///
/// A diffusion-connected record is judged against the diffusion-aware
/// limits when the rule provides them.
fn partial_ratios_violated(rule: &AntennaRule, info: &AntennaInfo, margin: f64) -> bool {
    let one = |fixed: f64, pwl: &PwlTable, value: f64, diff_value: f64| -> bool {
        if info.iterm_diff_area != 0.0 && !pwl.is_empty() {
            let required = pwl.eval(info.iterm_diff_area, 0.0);
            required != 0.0 && diff_value > required
        } else {
            match applicable_check(fixed, pwl, info.iterm_diff_area, margin, value, diff_value) {
                Some((ratio, required)) => ratio > required,
                None => false,
            }
        }
    };
    one(rule.par, &rule.diff_par, info.par, info.diff_par)
        || one(rule.psr, &rule.diff_psr, info.psr, info.diff_psr)
}
