//! The technology layer stack and per-layer antenna rules.

use arcstr::ArcStr;
use geometry::dir::Dir;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A stack-wide unique identifier for a layer.
///
/// Layer IDs are assigned in stack order, so ordering on IDs is ordering
/// in the stack: lower layers compare less than the layers above them.
#[derive(
    Debug, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct LayerId(pub(crate) usize);

impl LayerId {
    /// The position of this layer in the stack, counted from the bottom.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The function of a layer within the stack.
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq)]
pub enum LayerKind {
    /// A metal routing layer.
    Routing,
    /// A cut (via) layer bridging the routing layers above and below it.
    Cut,
}

/// A piecewise-linear table mapping an index value to a ratio.
///
/// Evaluation interpolates linearly between consecutive points and
/// extrapolates with the last segment's slope outside the covered range.
/// A single-point table is constant; an empty table evaluates to a
/// caller-supplied default.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct PwlTable {
    points: Vec<(f64, f64)>,
}

impl PwlTable {
    /// Creates a table from `(index, ratio)` points.
    ///
    /// # Panics
    ///
    /// Panics if the indices are not strictly increasing.
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let points: Vec<_> = points.into_iter().collect();
        assert!(
            points.windows(2).all(|w| w[0].0 < w[1].0),
            "PWL table indices must be strictly increasing"
        );
        Self { points }
    }

    /// Creates an empty table.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if the table has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Evaluates the table at `x`, returning `default` if the table is
    /// empty.
    pub fn eval(&self, x: f64, default: f64) -> f64 {
        let n = self.points.len();
        match n {
            0 => default,
            1 => self.points[0].1,
            _ => {
                for window in self.points.windows(2) {
                    let ((x0, y0), (x1, y1)) = (window[0], window[1]);
                    if x >= x0 && x < x1 {
                        let slope = (y1 - y0) / (x1 - x0);
                        return y0 + (x - x0) * slope;
                    }
                }
                // Outside the covered range: extend the final segment.
                let (x0, y0) = self.points[n - 2];
                let (x1, y1) = self.points[n - 1];
                let slope = (y1 - y0) / (x1 - x0);
                y1 + (x - x1) * slope
            }
        }
    }
}

/// A layer's default antenna rule.
///
/// Zero thresholds and empty tables mean "not specified"; the checker
/// skips any check whose fixed and PWL thresholds are both absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AntennaRule {
    /// Multiplier applied to metal (or cut) area when computing ratios.
    pub area_factor: f64,
    /// If set, [`area_factor`](AntennaRule::area_factor) applies only to
    /// diffusion-connected nets.
    pub area_factor_diff_only: bool,
    /// Multiplier applied to metal side area when computing side ratios.
    pub side_area_factor: f64,
    /// If set, [`side_area_factor`](AntennaRule::side_area_factor) applies
    /// only to diffusion-connected nets.
    pub side_area_factor_diff_only: bool,
    /// Additive diffusion credit subtracted from the collected area.
    pub minus_diff_factor: f64,
    /// Multiplicative diffusion credit added to the protected gate area.
    pub plus_diff_factor: f64,
    /// Area reduction factor as a function of connected diffusion area.
    pub area_diff_reduce: PwlTable,
    /// Fixed partial area ratio limit.
    pub par: f64,
    /// Fixed partial side-area ratio limit.
    pub psr: f64,
    /// Fixed cumulative area ratio limit.
    pub car: f64,
    /// Fixed cumulative side-area ratio limit.
    pub csr: f64,
    /// Partial area ratio limit as a function of diffusion area.
    pub diff_par: PwlTable,
    /// Partial side-area ratio limit as a function of diffusion area.
    pub diff_psr: PwlTable,
    /// Cumulative area ratio limit as a function of diffusion area.
    pub diff_car: PwlTable,
    /// Cumulative side-area ratio limit as a function of diffusion area.
    pub diff_csr: PwlTable,
    /// If set, cumulative ratios on this layer also count the cut layers
    /// fabricated below it.
    pub cum_routing_plus_cut: bool,
}

impl Default for AntennaRule {
    fn default() -> Self {
        Self {
            area_factor: 1.0,
            area_factor_diff_only: false,
            side_area_factor: 1.0,
            side_area_factor_diff_only: false,
            minus_diff_factor: 0.0,
            plus_diff_factor: 0.0,
            area_diff_reduce: PwlTable::empty(),
            par: 0.0,
            psr: 0.0,
            car: 0.0,
            csr: 0.0,
            diff_par: PwlTable::empty(),
            diff_psr: PwlTable::empty(),
            diff_car: PwlTable::empty(),
            diff_csr: PwlTable::empty(),
            cum_routing_plus_cut: false,
        }
    }
}

impl AntennaRule {
    /// Returns `true` if any partial-ratio threshold depends on diffusion
    /// area.
    pub fn diff_dependent(&self) -> bool {
        !self.diff_par.is_empty() || !self.diff_psr.is_empty()
    }

    /// Returns `true` if the rule constrains side area, through either the
    /// fixed or the PWL threshold.
    pub(crate) fn has_side_rule(&self) -> bool {
        self.psr != 0.0 || !self.diff_psr.is_empty()
    }
}

/// A layer in the technology stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    name: ArcStr,
    kind: LayerKind,
    level: usize,
    dir: Option<Dir>,
    width: i64,
    thickness: i64,
    antenna_rule: Option<AntennaRule>,
}

impl Layer {
    /// The layer name.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The layer kind.
    #[inline]
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Returns `true` if this is a routing layer.
    #[inline]
    pub fn is_routing(&self) -> bool {
        self.kind == LayerKind::Routing
    }

    /// The routing level: 1 and up for routing layers counted from the
    /// bottom, 0 for cut layers.
    #[inline]
    pub fn routing_level(&self) -> usize {
        self.level
    }

    /// The preferred routing direction, if any.
    #[inline]
    pub fn dir(&self) -> Option<Dir> {
        self.dir
    }

    /// The default wire width, in dbu.
    #[inline]
    pub fn width(&self) -> i64 {
        self.width
    }

    /// The wire thickness, in dbu. May be zero if the technology does not
    /// provide one.
    #[inline]
    pub fn thickness(&self) -> i64 {
        self.thickness
    }

    /// The layer's default antenna rule, if any.
    #[inline]
    pub fn antenna_rule(&self) -> Option<&AntennaRule> {
        self.antenna_rule.as_ref()
    }
}

/// An error arising when building a [`Tech`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TechBuildError {
    /// The stack contains no routing layer.
    #[error("technology stack has no routing layers")]
    NoRoutingLayers,
    /// Two layers share a name.
    #[error("layer `{0}` duplicates an existing layer name")]
    DuplicateName(ArcStr),
    /// A cut layer is not enclosed by routing layers.
    #[error("cut layer `{0}` must sit between two routing layers")]
    MisplacedCut(ArcStr),
}

/// A builder for [`Tech`].
///
/// Layers are added bottom to top; cut layers must alternate with the
/// routing layers they bridge.
#[derive(Debug, Clone)]
pub struct TechBuilder {
    dbu_per_micron: i64,
    layers: Vec<Layer>,
    name_map: IndexMap<ArcStr, LayerId>,
    routing_count: usize,
}

impl TechBuilder {
    /// Creates a builder with the given database resolution.
    ///
    /// # Panics
    ///
    /// Panics if `dbu_per_micron` is not positive.
    pub fn new(dbu_per_micron: i64) -> Self {
        assert!(dbu_per_micron > 0, "dbu_per_micron must be positive");
        Self {
            dbu_per_micron,
            layers: Vec::new(),
            name_map: IndexMap::new(),
            routing_count: 0,
        }
    }

    /// Appends a routing layer to the top of the stack.
    pub fn add_routing_layer(
        &mut self,
        name: impl Into<ArcStr>,
        dir: Dir,
        width: i64,
        thickness: i64,
        antenna_rule: Option<AntennaRule>,
    ) -> LayerId {
        self.routing_count += 1;
        self.push(Layer {
            name: name.into(),
            kind: LayerKind::Routing,
            level: self.routing_count,
            dir: Some(dir),
            width,
            thickness,
            antenna_rule,
        })
    }

    /// Appends a cut layer to the top of the stack.
    pub fn add_cut_layer(
        &mut self,
        name: impl Into<ArcStr>,
        antenna_rule: Option<AntennaRule>,
    ) -> LayerId {
        self.push(Layer {
            name: name.into(),
            kind: LayerKind::Cut,
            level: 0,
            dir: None,
            width: 0,
            thickness: 0,
            antenna_rule,
        })
    }

    fn push(&mut self, layer: Layer) -> LayerId {
        let id = LayerId(self.layers.len());
        self.name_map.insert(layer.name.clone(), id);
        self.layers.push(layer);
        id
    }

    /// Validates the stack and builds the technology.
    pub fn build(self) -> Result<Tech, TechBuildError> {
        if self.routing_count == 0 {
            return Err(TechBuildError::NoRoutingLayers);
        }
        if self.name_map.len() != self.layers.len() {
            let mut seen = IndexMap::new();
            for layer in &self.layers {
                if seen.insert(layer.name.clone(), ()).is_some() {
                    return Err(TechBuildError::DuplicateName(layer.name.clone()));
                }
            }
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.kind == LayerKind::Cut {
                let below = i.checked_sub(1).map(|j| self.layers[j].kind);
                let above = self.layers.get(i + 1).map(|l| l.kind);
                if below != Some(LayerKind::Routing) || above != Some(LayerKind::Routing) {
                    return Err(TechBuildError::MisplacedCut(layer.name.clone()));
                }
            }
        }
        Ok(Tech {
            dbu_per_micron: self.dbu_per_micron,
            layers: self.layers,
            name_map: self.name_map,
        })
    }
}

/// An ordered technology layer stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tech {
    dbu_per_micron: i64,
    layers: Vec<Layer>,
    name_map: IndexMap<ArcStr, LayerId>,
}

impl Tech {
    /// The number of database units per micron.
    #[inline]
    pub fn dbu_per_micron(&self) -> i64 {
        self.dbu_per_micron
    }

    /// Converts a distance in dbu to microns.
    #[inline]
    pub fn to_microns(&self, dbu: i64) -> f64 {
        dbu as f64 / self.dbu_per_micron as f64
    }

    /// Converts an area in dbu² to square microns.
    #[inline]
    pub fn area_to_sq_microns(&self, dbu_sq: i64) -> f64 {
        let scale = self.dbu_per_micron as f64;
        dbu_sq as f64 / (scale * scale)
    }

    /// The number of layers in the stack.
    #[inline]
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Iterates over `(id, layer)` pairs in stack order, bottom to top.
    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &Layer)> {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, layer)| (LayerId(i), layer))
    }

    /// Returns the layer with the given ID.
    pub fn layer(&self, id: LayerId) -> &Layer {
        &self.layers[id.0]
    }

    /// Returns the ID of the layer with the given name.
    pub fn layer_named(&self, name: &str) -> Option<LayerId> {
        self.name_map.get(name).copied()
    }

    /// The layer immediately above `id`, if any.
    pub fn above(&self, id: LayerId) -> Option<LayerId> {
        (id.0 + 1 < self.layers.len()).then(|| LayerId(id.0 + 1))
    }

    /// The layer immediately below `id`, if any.
    pub fn below(&self, id: LayerId) -> Option<LayerId> {
        id.0.checked_sub(1).map(LayerId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pwl_empty_returns_default() {
        let table = PwlTable::empty();
        assert_relative_eq!(table.eval(3.0, 1.0), 1.0);
    }

    #[test]
    fn pwl_single_point_is_constant() {
        let table = PwlTable::new([(5.0, 2.5)]);
        assert_relative_eq!(table.eval(0.0, 0.0), 2.5);
        assert_relative_eq!(table.eval(100.0, 0.0), 2.5);
    }

    #[test]
    fn pwl_interpolates_between_points() {
        let table = PwlTable::new([(0.0, 1.0), (10.0, 3.0)]);
        assert_relative_eq!(table.eval(5.0, 0.0), 2.0);
        assert_relative_eq!(table.eval(0.0, 0.0), 1.0);
    }

    #[test]
    fn pwl_extrapolates_with_last_slope() {
        let table = PwlTable::new([(0.0, 1.0), (10.0, 3.0), (20.0, 4.0)]);
        assert_relative_eq!(table.eval(30.0, 0.0), 5.0);
        // Below the range the final segment is extended too, anchored at
        // the last point.
        assert_relative_eq!(table.eval(-10.0, 0.0), 1.0);
    }

    #[test]
    fn cut_layer_requires_routing_neighbors() {
        let mut builder = TechBuilder::new(1000);
        builder.add_routing_layer("met1", Dir::Horiz, 140, 350, None);
        builder.add_cut_layer("via1", None);
        assert_eq!(
            builder.build(),
            Err(TechBuildError::MisplacedCut("via1".into()))
        );
    }

    #[test]
    fn routing_levels_count_from_one() {
        let mut builder = TechBuilder::new(1000);
        let m1 = builder.add_routing_layer("met1", Dir::Horiz, 140, 350, None);
        let v1 = builder.add_cut_layer("via1", None);
        let m2 = builder.add_routing_layer("met2", Dir::Vert, 140, 350, None);
        let tech = builder.build().unwrap();
        assert_eq!(tech.layer(m1).routing_level(), 1);
        assert_eq!(tech.layer(v1).routing_level(), 0);
        assert_eq!(tech.layer(m2).routing_level(), 2);
        assert_eq!(tech.above(v1), Some(m2));
        assert_eq!(tech.below(v1), Some(m1));
        assert_eq!(tech.above(m2), None);
    }
}
