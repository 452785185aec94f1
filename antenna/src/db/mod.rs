//! The in-memory design database consumed by the checker.
//!
//! [`tech`] models the layer stack and its antenna rules; [`design`]
//! models the placed-and-routed design: masters and their terminals,
//! instances, block terminals, via definitions, and nets with routed
//! wires.

pub mod design;
pub mod tech;

pub use design::{
    AntennaPinModel, BTerm, BTermId, Design, Direction, ITermRef, InstId, Instance, LayerArea,
    Master, MasterId, MTerm, MTermRef, Net, NetId, Orient, PinGeometry, PinRef, Placement, ViaDef,
    ViaId, Wire, WireShape,
};
pub use tech::{AntennaRule, Layer, LayerId, LayerKind, PwlTable, Tech, TechBuildError, TechBuilder};
