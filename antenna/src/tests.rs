//! Scenario tests on a toy two-metal, one-cut technology.
//!
//! The toy stack uses 1000 dbu per micron, 1 µm wide and 1 µm thick
//! metals, and unit area/side factors, so expected ratios can be read off
//! the geometry directly.

use std::fs;
use std::path::PathBuf;

use approx::assert_relative_eq;
use geometry::dir::Dir;
use geometry::point::Point;
use geometry::rect::Rect;
use test_log::test;

use crate::checker::{AntennaChecker, CheckOptions, CheckSummary, GlobalRouteSource, Violation};
use crate::connectivity;
use crate::db::design::{
    AntennaPinModel, Design, Direction, ITermRef, LayerArea, MTerm, MTermRef, Master, NetId,
    Orient, PinGeometry, PinRef, Placement, ViaDef, ViaId, Wire, WireShape,
};
use crate::db::tech::{AntennaRule, LayerId, PwlTable, Tech, TechBuilder};
use crate::error::Error;
use crate::islands::LayerGraph;
use crate::ratios;
use crate::rules::RuleStore;

const BUILD_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/build");

fn get_path(test_name: &str, file_name: &str) -> PathBuf {
    let dir = PathBuf::from(BUILD_DIR).join(test_name);
    fs::create_dir_all(&dir).unwrap();
    dir.join(file_name)
}

struct Layers {
    m1: LayerId,
    v1: LayerId,
    m2: LayerId,
}

fn toy_tech(
    m1_rule: Option<AntennaRule>,
    v1_rule: Option<AntennaRule>,
    m2_rule: Option<AntennaRule>,
) -> (Tech, Layers) {
    let mut builder = TechBuilder::new(1000);
    let m1 = builder.add_routing_layer("met1", Dir::Horiz, 1000, 1000, m1_rule);
    let v1 = builder.add_cut_layer("via1", v1_rule);
    let m2 = builder.add_routing_layer("met2", Dir::Vert, 1000, 1000, m2_rule);
    (builder.build().unwrap(), Layers { m1, v1, m2 })
}

fn unit_pin(layer: LayerId) -> PinGeometry {
    PinGeometry {
        layer,
        rect: Rect::from_sides(0, 0, 1000, 1000),
    }
}

fn receiver_master(m1: LayerId, gate_area: f64, diff_area: f64) -> Master {
    let mut antenna = AntennaPinModel {
        gate_area: vec![LayerArea {
            layer: Some(m1),
            area: gate_area,
        }],
        diff_area: Vec::new(),
    };
    if diff_area > 0.0 {
        antenna.diff_area.push(LayerArea {
            layer: Some(m1),
            area: diff_area,
        });
    }
    Master {
        name: "inv".into(),
        mterms: vec![MTerm {
            name: "a".into(),
            direction: Direction::Input,
            pins: vec![unit_pin(m1)],
            antenna,
        }],
    }
}

fn driver_master(m1: LayerId) -> Master {
    Master {
        name: "buf".into(),
        mterms: vec![MTerm {
            name: "x".into(),
            direction: Direction::Output,
            pins: vec![unit_pin(m1)],
            antenna: AntennaPinModel::default(),
        }],
    }
}

fn diode_master(diff_area: f64) -> Master {
    Master {
        name: "antenna_diode".into(),
        mterms: vec![MTerm {
            name: "d".into(),
            direction: Direction::InOut,
            pins: Vec::new(),
            antenna: AntennaPinModel {
                gate_area: Vec::new(),
                diff_area: vec![LayerArea {
                    layer: None,
                    area: diff_area,
                }],
            },
        }],
    }
}

fn simple_via(layers: &Layers) -> ViaDef {
    let square = Rect::from_sides(-500, -500, 500, 500);
    ViaDef {
        name: "via1_simple".into(),
        bottom: PinGeometry {
            layer: layers.m1,
            rect: square,
        },
        cut: PinGeometry {
            layer: layers.v1,
            rect: square,
        },
        top: PinGeometry {
            layer: layers.m2,
            rect: square,
        },
    }
}

fn single_wire_shapes(length_dbu: i64, m1: LayerId, via: ViaId) -> Wire {
    Wire::new([
        WireShape::Segment {
            layer: m1,
            rect: Rect::from_sides(0, 0, length_dbu, 1000),
        },
        WireShape::Via {
            def: via,
            at: Point::new(length_dbu - 500, 500),
        },
    ])
}

struct SingleWire {
    design: Design,
    net: NetId,
    gate: ITermRef,
    via: ViaId,
}

/// One receiver at the left end of a `met1` wire, a driver at the right
/// end, and a via up to `met2` at the far end.
fn single_wire(
    length_dbu: i64,
    tech: Tech,
    layers: &Layers,
    gate_area: f64,
    diff_area: f64,
    routed: bool,
) -> SingleWire {
    let mut design = Design::new("top", tech);
    let receiver = design.add_master(receiver_master(layers.m1, gate_area, diff_area));
    let driver = design.add_master(driver_master(layers.m1));
    let via = design.add_via(simple_via(layers));
    let recv = design.add_instance(
        "recv",
        receiver,
        Placement::new(Point::new(-1000, 0), Orient::R0),
    );
    let drv = design.add_instance(
        "drv",
        driver,
        Placement::new(Point::new(length_dbu, 0), Orient::R0),
    );
    let gate = ITermRef {
        inst: recv,
        mterm: 0,
    };
    let net = design.add_net("n1", false);
    design.connect(net, PinRef::Instance(gate));
    design.connect(net, PinRef::Instance(ITermRef { inst: drv, mterm: 0 }));
    if routed {
        let wire = single_wire_shapes(length_dbu, layers.m1, via);
        design.set_wire(net, wire);
    }
    SingleWire {
        design,
        net,
        gate,
        via,
    }
}

fn par_only_rule(par: f64) -> AntennaRule {
    AntennaRule {
        par,
        ..Default::default()
    }
}

#[test]
fn clean_net_passes_fixed_par() {
    let (tech, layers) = toy_tech(Some(par_only_rule(1.0)), None, None);
    let s = single_wire(10_000, tech, &layers, 20.0, 0.0, true);
    let mut checker = AntennaChecker::new(&s.design);
    let (summary, violations) = checker
        .check_antennas(Some(s.net), &CheckOptions::default())
        .unwrap();
    assert_eq!(summary, CheckSummary::default());
    assert!(violations.is_empty());
    assert_eq!(checker.violation_count(), 0);
}

#[test]
fn long_wire_violates_fixed_par() {
    let (tech, layers) = toy_tech(Some(par_only_rule(1.0)), None, None);
    let s = single_wire(40_000, tech, &layers, 20.0, 0.0, true);
    let mut checker = AntennaChecker::new(&s.design);
    let (summary, violations) = checker
        .check_antennas(Some(s.net), &CheckOptions::default())
        .unwrap();
    assert_eq!(
        summary,
        CheckSummary {
            net_violations: 1,
            pin_violations: 1,
        }
    );
    // No diode terminal, so no repair estimates.
    assert!(violations.is_empty());
    assert_eq!(checker.violation_count(), 1);
}

#[test]
fn diffusion_pwl_limit_protects_net() {
    let rule = AntennaRule {
        diff_par: PwlTable::new([(0.0, 1.0), (10.0, 3.0)]),
        ..Default::default()
    };
    let (tech, layers) = toy_tech(Some(rule), None, None);
    let s = single_wire(40_000, tech, &layers, 20.0, 5.0, true);
    let mut checker = AntennaChecker::new(&s.design);
    let (summary, _) = checker
        .check_antennas(Some(s.net), &CheckOptions::default())
        .unwrap();
    // diff_PAR is 40/20 = 2.0, exactly the interpolated limit at a
    // diffusion area of 5; only ratios above the limit violate.
    assert_eq!(summary, CheckSummary::default());
}

#[test]
fn pwl_limits_ignore_ratio_margin() {
    let rule = AntennaRule {
        diff_par: PwlTable::new([(0.0, 1.0), (10.0, 3.0)]),
        ..Default::default()
    };
    let (tech, layers) = toy_tech(Some(rule), None, None);
    let s = single_wire(40_000, tech, &layers, 20.0, 5.0, true);
    let mut checker = AntennaChecker::new(&s.design);
    let options = CheckOptions {
        ratio_margin: 20.0,
        ..Default::default()
    };
    let (summary, _) = checker.check_antennas(Some(s.net), &options).unwrap();
    assert_eq!(summary, CheckSummary::default());
}

/// Builds two `met1` islands bridged by a `met2` wire: the receiver sees
/// 25 µm² on `met1` and 15 µm² on `met2`, so each layer's PAR passes a
/// limit of 1.5 but the cumulative ratio on `met2` reaches 2.0.
fn bridged_islands(m1_rule: Option<AntennaRule>, m2_rule: Option<AntennaRule>) -> SingleWire {
    let (tech, layers) = toy_tech(m1_rule, None, m2_rule);
    let mut design = Design::new("top", tech);
    let receiver = design.add_master(receiver_master(layers.m1, 20.0, 0.0));
    let via = design.add_via(simple_via(&layers));
    let recv = design.add_instance(
        "recv",
        receiver,
        Placement::new(Point::new(-1000, 0), Orient::R0),
    );
    let gate = ITermRef {
        inst: recv,
        mterm: 0,
    };
    let net = design.add_net("n1", false);
    design.connect(net, PinRef::Instance(gate));
    design.set_wire(
        net,
        Wire::new([
            WireShape::Segment {
                layer: layers.m1,
                rect: Rect::from_sides(0, 0, 25_000, 1000),
            },
            WireShape::Via {
                def: via,
                at: Point::new(24_500, 500),
            },
            WireShape::Segment {
                layer: layers.m2,
                rect: Rect::from_sides(24_000, 0, 39_000, 1000),
            },
            WireShape::Via {
                def: via,
                at: Point::new(38_500, 500),
            },
            WireShape::Segment {
                layer: layers.m1,
                rect: Rect::from_sides(38_000, 0, 43_000, 1000),
            },
        ]),
    );
    SingleWire {
        design,
        net,
        gate,
        via,
    }
}

#[test]
fn cumulative_ratio_violates_on_upper_layer_only() {
    let s = bridged_islands(
        Some(par_only_rule(1.5)),
        Some(AntennaRule {
            par: 1.5,
            car: 1.0,
            ..Default::default()
        }),
    );
    let path = get_path("cumulative_ratio_violates_on_upper_layer_only", "report.txt");
    let mut checker = AntennaChecker::new(&s.design);
    checker.set_report_file(Some(path.clone()));
    let (summary, _) = checker
        .check_antennas(Some(s.net), &CheckOptions::default())
        .unwrap();
    assert_eq!(
        summary,
        CheckSummary {
            net_violations: 1,
            pin_violations: 1,
        }
    );
    let report = fs::read_to_string(path).unwrap();
    assert!(report.contains("Layer: met2"));
    assert!(!report.contains("Layer: met1"));
    assert!(report.contains("Cumulative area ratio:    2.00"));
    assert!(report.contains("Required ratio:    1.00 (Cumulative area) (VIOLATED)"));
}

#[test]
fn diode_loop_sizes_one_diode() {
    let rule = AntennaRule {
        par: 1.0,
        diff_par: PwlTable::new([(0.0, 1.0), (10.0, 5.0)]),
        ..Default::default()
    };
    let (tech, layers) = toy_tech(Some(rule), None, None);
    let mut s = single_wire(40_000, tech, &layers, 20.0, 0.0, true);
    let diode = s.design.add_master(diode_master(10.0));
    let options = CheckOptions {
        diode_mterm: Some(MTermRef {
            master: diode,
            mterm: 0,
        }),
        ..Default::default()
    };
    let mut checker = AntennaChecker::new(&s.design);
    let (summary, violations) = checker.check_antennas(Some(s.net), &options).unwrap();
    // The diode loop never changes the violation counts.
    assert_eq!(
        summary,
        CheckSummary {
            net_violations: 1,
            pin_violations: 1,
        }
    );
    assert_eq!(
        violations,
        vec![Violation {
            routing_level: 1,
            gates: vec![s.gate],
            diode_count_per_gate: 1,
        }]
    );
}

#[test]
fn diode_loop_saturates_on_unrepairable_violation() {
    // A fixed PAR limit with no diffusion-aware limit: adding diffusion
    // cannot lower the plain ratio, so the loop hits its cap.
    let (tech, layers) = toy_tech(Some(par_only_rule(1.0)), None, None);
    let mut s = single_wire(40_000, tech, &layers, 20.0, 0.0, true);
    let diode = s.design.add_master(diode_master(10.0));
    let checker = AntennaChecker::new(&s.design);
    let violations = checker
        .violations(
            s.net,
            Some(MTermRef {
                master: diode,
                mterm: 0,
            }),
            0.0,
        )
        .unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].diode_count_per_gate, 101);
}

#[test]
fn ratio_margin_tightens_fixed_limits() {
    let (tech, layers) = toy_tech(Some(par_only_rule(0.6)), None, None);
    let s = single_wire(10_000, tech, &layers, 20.0, 0.0, true);
    let mut checker = AntennaChecker::new(&s.design);
    let clean = checker
        .check_antennas(Some(s.net), &CheckOptions::default())
        .unwrap();
    assert_eq!(clean.0, CheckSummary::default());
    let options = CheckOptions {
        ratio_margin: 20.0,
        ..Default::default()
    };
    let (summary, _) = checker.check_antennas(Some(s.net), &options).unwrap();
    // PAR is 0.5; the margin lowers the limit from 0.6 to 0.48.
    assert_eq!(
        summary,
        CheckSummary {
            net_violations: 1,
            pin_violations: 1,
        }
    );
}

#[test]
fn report_is_deterministic() {
    let expected = "Net: n1\n  Pin: recv/a\n    Layer: met1\n      Partial area ratio:    2.00\n      Required ratio:    1.00 (Gate area) (VIOLATED)\n\n\n";
    let mut reports = Vec::new();
    for run in 0..2 {
        let (tech, layers) = toy_tech(Some(par_only_rule(1.0)), None, None);
        let s = single_wire(40_000, tech, &layers, 20.0, 0.0, true);
        let path = get_path("report_is_deterministic", &format!("report{run}.txt"));
        let mut checker = AntennaChecker::new(&s.design);
        checker.set_report_file(Some(path.clone()));
        checker
            .check_antennas(Some(s.net), &CheckOptions::default())
            .unwrap();
        reports.push(fs::read_to_string(path).unwrap());
    }
    assert_eq!(reports[0], expected);
    assert_eq!(reports[0], reports[1]);
}

#[test]
fn verbose_report_includes_clean_records() {
    let (tech, layers) = toy_tech(Some(par_only_rule(1.0)), None, None);
    let s = single_wire(10_000, tech, &layers, 20.0, 0.0, true);
    let path = get_path("verbose_report_includes_clean_records", "report.txt");
    let mut checker = AntennaChecker::new(&s.design);
    checker.set_report_file(Some(path.clone()));
    let options = CheckOptions {
        verbose: true,
        report_if_no_violation: true,
        ..Default::default()
    };
    checker.check_antennas(Some(s.net), &options).unwrap();
    let report = fs::read_to_string(path).unwrap();
    assert_eq!(
        report,
        "Net: n1\n  Pin: recv/a\n    Layer: met1\n      Partial area ratio:    0.50\n      Required ratio:    1.00 (Gate area)\n\n\n"
    );
}

#[test]
fn clean_net_header_appears_when_requested() {
    let (tech, layers) = toy_tech(Some(par_only_rule(1.0)), None, None);
    let s = single_wire(10_000, tech, &layers, 20.0, 0.0, true);
    let path = get_path("clean_net_header_appears_when_requested", "report.txt");
    let mut checker = AntennaChecker::new(&s.design);
    checker.set_report_file(Some(path.clone()));
    let options = CheckOptions {
        report_if_no_violation: true,
        ..Default::default()
    };
    checker.check_antennas(Some(s.net), &options).unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), "Net: n1\n\n");
}

#[test]
fn cumulative_includes_cuts_when_flagged() {
    for (flagged, expect_violation) in [(false, false), (true, true)] {
        let m2_rule = AntennaRule {
            car: 0.58,
            cum_routing_plus_cut: flagged,
            ..Default::default()
        };
        let (tech, layers) = toy_tech(None, None, Some(m2_rule));
        let s = single_wire(10_000, tech, &layers, 20.0, 0.0, true);
        let mut checker = AntennaChecker::new(&s.design);
        let (summary, _) = checker
            .check_antennas(Some(s.net), &CheckOptions::default())
            .unwrap();
        // Wire CAR on met2 is 0.5 + 0.05; the cut contributes another
        // 0.05 only when the rule counts cuts.
        assert_eq!(summary.net_violations > 0, expect_violation, "flagged = {flagged}");
    }
}

#[test]
fn special_net_selection_is_an_error() {
    let (tech, layers) = toy_tech(Some(par_only_rule(1.0)), None, None);
    let mut s = single_wire(40_000, tech, &layers, 20.0, 0.0, true);
    let supply = s.design.add_net("vdd", true);
    let mut checker = AntennaChecker::new(&s.design);
    let result = checker.check_antennas(Some(supply), &CheckOptions::default());
    assert!(matches!(result, Err(Error::SpecialNet(name)) if name == "vdd"));
}

#[test]
fn special_nets_are_skipped_in_full_runs() {
    let (tech, layers) = toy_tech(Some(par_only_rule(1.0)), None, None);
    let mut s = single_wire(10_000, tech, &layers, 20.0, 0.0, true);
    let supply = s.design.add_net("vdd", true);
    let wire = single_wire_shapes(400_000, layers.m1, s.via);
    s.design.set_wire(supply, wire);
    let mut checker = AntennaChecker::new(&s.design);
    let (summary, _) = checker
        .check_antennas(None, &CheckOptions::default())
        .unwrap();
    assert_eq!(summary, CheckSummary::default());
}

#[test]
fn unrouted_design_is_an_error() {
    let (tech, layers) = toy_tech(Some(par_only_rule(1.0)), None, None);
    let s = single_wire(40_000, tech, &layers, 20.0, 0.0, false);
    let mut checker = AntennaChecker::new(&s.design);
    let result = checker.check_antennas(Some(s.net), &CheckOptions::default());
    assert!(matches!(result, Err(Error::NoRoutes)));
}

struct OneNetRoutes {
    net: NetId,
    wire: Wire,
}

impl GlobalRouteSource for OneNetRoutes {
    fn have_routes(&self) -> bool {
        true
    }

    fn net_wire(&self, net: NetId) -> Option<Wire> {
        (net == self.net).then(|| self.wire.clone())
    }
}

#[test]
fn global_routes_back_fill_unrouted_nets() {
    let (tech, layers) = toy_tech(Some(par_only_rule(1.0)), None, None);
    let s = single_wire(40_000, tech, &layers, 20.0, 0.0, false);
    let source = OneNetRoutes {
        net: s.net,
        wire: single_wire_shapes(40_000, layers.m1, s.via),
    };
    let mut checker = AntennaChecker::new(&s.design).with_route_source(&source);
    let (summary, _) = checker
        .check_antennas(Some(s.net), &CheckOptions::default())
        .unwrap();
    assert_eq!(
        summary,
        CheckSummary {
            net_violations: 1,
            pin_violations: 1,
        }
    );
}

#[test]
fn empty_wire_has_no_violations() {
    let (tech, layers) = toy_tech(Some(par_only_rule(1.0)), None, None);
    let mut s = single_wire(40_000, tech, &layers, 20.0, 0.0, false);
    s.design.set_wire(s.net, Wire::default());
    let mut checker = AntennaChecker::new(&s.design);
    let (summary, violations) = checker
        .check_antennas(Some(s.net), &CheckOptions::default())
        .unwrap();
    assert_eq!(summary, CheckSummary::default());
    assert!(violations.is_empty());
}

/// Runs the analysis pipeline without the checker, for inspecting the
/// computed records.
fn analyze(design: &Design, net_id: NetId) -> ratios::InfoTable {
    let net = design.net(net_id);
    let wire = net.wire.as_ref().unwrap();
    let mut graph = LayerGraph::build(design, net, wire);
    connectivity::attach_pins(design, net, &mut graph);
    let mut table = ratios::collect(design, &graph);
    let rules = RuleStore::new(design.tech());
    ratios::compute_par(design, &rules, &mut table);
    ratios::compute_car(design.tech(), &mut table);
    table
}

#[test]
fn partial_ratios_match_geometry() {
    let (tech, layers) = toy_tech(Some(par_only_rule(1.0)), None, None);
    let s = single_wire(10_000, tech, &layers, 20.0, 0.0, true);
    let table = analyze(&s.design, s.net);
    let records = &table[&s.gate];
    let m1 = &records[&layers.m1];
    // 10 µm² of wire over a 20 µm² gate.
    assert_relative_eq!(m1.area, 10.0);
    assert_relative_eq!(m1.par, 0.5);
    // Perimeter 22 µm at 1 µm thickness.
    assert_relative_eq!(m1.side_area, 22.0);
    assert_relative_eq!(m1.psr, 1.1);
    // The cut stamps a 1 µm² island on each of via1 and met2.
    assert_relative_eq!(records[&layers.v1].par, 0.05);
    assert_relative_eq!(records[&layers.m2].par, 0.05);
}

#[test]
fn cumulative_ratios_dominate_partial_ratios() {
    let s = bridged_islands(Some(par_only_rule(1.5)), Some(par_only_rule(1.5)));
    let table = analyze(&s.design, s.net);
    for records in table.values() {
        let mut lowest = true;
        for info in records.values() {
            assert!(info.par >= 0.0 && info.psr >= 0.0);
            assert!(info.car >= info.par - 1e-12);
            if lowest {
                assert_relative_eq!(info.car, info.par);
                lowest = false;
            }
        }
    }
}

#[test]
fn disjoint_islands_merge_per_gate_records() {
    let (tech, layers) = toy_tech(Some(par_only_rule(1.0)), None, None);
    let mut design = Design::new("top", tech);
    let receiver = design.add_master(receiver_master(layers.m1, 20.0, 0.0));
    let recv = design.add_instance(
        "recv",
        receiver,
        Placement::new(Point::new(0, 0), Orient::R0),
    );
    let gate = ITermRef {
        inst: recv,
        mterm: 0,
    };
    let net = design.add_net("n1", false);
    design.connect(net, PinRef::Instance(gate));
    // Two wires abut the pin from opposite sides but never touch each
    // other: two islands, one record.
    design.set_wire(
        net,
        Wire::new([
            WireShape::Segment {
                layer: layers.m1,
                rect: Rect::from_sides(-5000, 0, 0, 1000),
            },
            WireShape::Segment {
                layer: layers.m1,
                rect: Rect::from_sides(1000, 0, 6000, 1000),
            },
        ]),
    );
    let table = analyze(&design, net);
    let m1 = &table[&gate][&layers.m1];
    assert_relative_eq!(m1.area, 10.0);
    // The gate's own area is counted once, not once per island.
    assert_relative_eq!(m1.iterm_gate_area, 20.0);
    assert_relative_eq!(m1.par, 0.5);
}

#[test]
fn wide_cut_touching_many_wires_is_tolerated() {
    let (tech, layers) = toy_tech(Some(par_only_rule(1.0)), None, None);
    let mut design = Design::new("top", tech);
    let receiver = design.add_master(receiver_master(layers.m1, 20.0, 0.0));
    let recv = design.add_instance(
        "recv",
        receiver,
        Placement::new(Point::new(-1000, 0), Orient::R0),
    );
    let gate = ITermRef {
        inst: recv,
        mterm: 0,
    };
    // A single malformed cut box overlapping three met1 wires.
    let via = design.add_via(ViaDef {
        name: "wide_cut".into(),
        bottom: PinGeometry {
            layer: layers.m1,
            rect: Rect::from_sides(0, 0, 200, 200),
        },
        cut: PinGeometry {
            layer: layers.v1,
            rect: Rect::from_sides(0, 0, 5000, 1000),
        },
        top: PinGeometry {
            layer: layers.m2,
            rect: Rect::from_sides(0, 0, 5000, 1000),
        },
    });
    let net = design.add_net("n1", false);
    design.connect(net, PinRef::Instance(gate));
    design.set_wire(
        net,
        Wire::new([
            WireShape::Segment {
                layer: layers.m1,
                rect: Rect::from_sides(0, 0, 1000, 1000),
            },
            WireShape::Segment {
                layer: layers.m1,
                rect: Rect::from_sides(2000, 0, 3000, 1000),
            },
            WireShape::Segment {
                layer: layers.m1,
                rect: Rect::from_sides(4000, 0, 5000, 1000),
            },
            WireShape::Via {
                def: via,
                at: Point::new(0, 0),
            },
        ]),
    );
    let mut checker = AntennaChecker::new(&design);
    // The malformed adjacency is logged and skipped, not fatal.
    let (summary, _) = checker
        .check_antennas(Some(net), &CheckOptions::default())
        .unwrap();
    assert_eq!(summary, CheckSummary::default());
}
