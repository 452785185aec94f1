//! Antenna-effect rule checking for placed-and-routed designs.
//!
//! During fabrication, the metal connected to a logic gate's input is
//! built up layer by layer. Until the net's protective diffusion diode is
//! attached, that partially built metallization acts as a charge-collecting
//! antenna; if its area grows too large relative to the gate-oxide area it
//! drives, the oxide is damaged. Foundries bound this with per-layer
//! antenna rules: limits on the partial (per-layer) and cumulative area
//! and side-area ratios, optionally relaxed by connected diffusion.
//!
//! This crate checks those rules on a routed [`Design`](db::Design). Per
//! net, the routed wires and vias are abstracted as per-layer polygon
//! islands, islands are connected through cuts with a disjoint-set union,
//! each island learns which gates it exposes, and the resulting
//! partial/cumulative ratios are compared against each layer's rule. The
//! checker reports violating nets, pins, and layers, and can estimate how
//! many protection diodes per gate would repair each violation.
//!
//! The entry point is [`AntennaChecker`].
#![warn(missing_docs)]

pub mod checker;
mod connectivity;
pub mod db;
pub mod error;
mod islands;
mod ratios;
mod report;
pub mod rules;

#[cfg(test)]
pub(crate) mod tests;

pub use checker::{AntennaChecker, CheckOptions, CheckSummary, GlobalRouteSource, Violation};
pub use error::{Error, Result};
