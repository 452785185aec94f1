//! Cached per-layer antenna factors.
//!
//! Antenna rules express their factors with conditional fallbacks (a
//! factor may apply only to diffusion-connected nets, or be absent
//! entirely). [`RuleStore`] resolves those conditionals once per design so
//! the per-net hot path reads plain multipliers.

use serde::{Deserialize, Serialize};

use crate::db::tech::{LayerId, LayerKind, Tech};

/// Resolved antenna multipliers for one layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AntennaModel {
    /// Area multiplier for metal on non-diffusion-connected nets.
    pub metal_factor: f64,
    /// Area multiplier for metal on diffusion-connected nets.
    pub diff_metal_factor: f64,
    /// Area multiplier for cuts on non-diffusion-connected nets.
    pub cut_factor: f64,
    /// Area multiplier for cuts on diffusion-connected nets.
    pub diff_cut_factor: f64,
    /// Side-area multiplier for metal on non-diffusion-connected nets.
    pub side_metal_factor: f64,
    /// Side-area multiplier for metal on diffusion-connected nets.
    pub diff_side_metal_factor: f64,
    /// Additive diffusion credit.
    pub minus_diff_factor: f64,
    /// Multiplicative diffusion credit.
    pub plus_diff_factor: f64,
    /// Default area reduction factor; overridden per record by the rule's
    /// `area_diff_reduce` table when one is present.
    pub diff_metal_reduce_factor: f64,
}

impl Default for AntennaModel {
    fn default() -> Self {
        Self {
            metal_factor: 1.0,
            diff_metal_factor: 1.0,
            cut_factor: 1.0,
            diff_cut_factor: 1.0,
            side_metal_factor: 1.0,
            diff_side_metal_factor: 1.0,
            minus_diff_factor: 0.0,
            plus_diff_factor: 0.0,
            diff_metal_reduce_factor: 1.0,
        }
    }
}

/// Per-layer [`AntennaModel`]s derived from a technology.
///
/// Built once per design and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleStore {
    models: Vec<AntennaModel>,
}

impl RuleStore {
    /// Derives the factor cache from the technology's antenna rules.
    ///
    /// Warns about routing layers that carry a side-area rule but no
    /// thickness; side areas on such layers compute as zero.
    pub fn new(tech: &Tech) -> Self {
        let models = tech
            .layers()
            .map(|(_, layer)| {
                let mut model = AntennaModel::default();
                let Some(rule) = layer.antenna_rule() else {
                    return model;
                };
                if rule.area_factor_diff_only {
                    model.diff_metal_factor = rule.area_factor;
                    model.diff_cut_factor = rule.area_factor;
                } else {
                    model.metal_factor = rule.area_factor;
                    model.diff_metal_factor = rule.area_factor;
                    model.cut_factor = rule.area_factor;
                    model.diff_cut_factor = rule.area_factor;
                }
                if rule.side_area_factor_diff_only {
                    model.diff_side_metal_factor = rule.side_area_factor;
                } else {
                    model.side_metal_factor = rule.side_area_factor;
                    model.diff_side_metal_factor = rule.side_area_factor;
                }
                model.minus_diff_factor = rule.minus_diff_factor;
                model.plus_diff_factor = rule.plus_diff_factor;

                if rule.has_side_rule()
                    && layer.kind() == LayerKind::Routing
                    && layer.thickness() == 0
                {
                    tracing::warn!(
                        layer = %layer.name(),
                        "no thickness is provided for layer; side-area checks on it will not be correct"
                    );
                }
                model
            })
            .collect();
        Self { models }
    }

    /// The resolved model for the given layer.
    pub fn model(&self, layer: LayerId) -> &AntennaModel {
        &self.models[layer.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tech::{AntennaRule, TechBuilder};
    use approx::assert_relative_eq;
    use geometry::dir::Dir;

    #[test]
    fn diff_only_area_factor_leaves_plain_factors_alone() {
        let mut builder = TechBuilder::new(1000);
        let m1 = builder.add_routing_layer(
            "met1",
            Dir::Horiz,
            140,
            350,
            Some(AntennaRule {
                area_factor: 3.0,
                area_factor_diff_only: true,
                side_area_factor: 2.0,
                ..Default::default()
            }),
        );
        let tech = builder.build().unwrap();
        let store = RuleStore::new(&tech);
        let model = store.model(m1);
        assert_relative_eq!(model.metal_factor, 1.0);
        assert_relative_eq!(model.cut_factor, 1.0);
        assert_relative_eq!(model.diff_metal_factor, 3.0);
        assert_relative_eq!(model.diff_cut_factor, 3.0);
        assert_relative_eq!(model.side_metal_factor, 2.0);
        assert_relative_eq!(model.diff_side_metal_factor, 2.0);
    }

    #[test]
    fn layers_without_rules_use_unit_factors() {
        let mut builder = TechBuilder::new(1000);
        let m1 = builder.add_routing_layer("met1", Dir::Horiz, 140, 350, None);
        let tech = builder.build().unwrap();
        let store = RuleStore::new(&tech);
        assert_eq!(store.model(m1), &AntennaModel::default());
    }
}
