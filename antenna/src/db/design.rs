//! The placed-and-routed design: masters, instances, terminals, vias,
//! and nets.
//!
//! Geometry is stored in dbu; antenna pin areas (gate and diffusion) are
//! in square microns, matching how technology libraries specify them.

use arcstr::ArcStr;
use geometry::point::Point;
use geometry::rect::Rect;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::db::tech::{LayerId, Tech};

/// An identifier for a [`Master`] in a [`Design`].
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct MasterId(usize);

/// An identifier for an [`Instance`] in a [`Design`].
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct InstId(usize);

/// An identifier for a [`BTerm`] in a [`Design`].
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct BTermId(usize);

/// An identifier for a [`ViaDef`] in a [`Design`].
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct ViaId(usize);

/// An identifier for a [`Net`] in a [`Design`].
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct NetId(usize);

/// A reference to one terminal of one placed instance.
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct ITermRef {
    /// The instance.
    pub inst: InstId,
    /// The index of the terminal within the instance's master.
    pub mterm: usize,
}

/// A reference to a terminal of a master, independent of any placed
/// instance.
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct MTermRef {
    /// The master.
    pub master: MasterId,
    /// The index of the terminal within the master.
    pub mterm: usize,
}

/// A pin of a net: either an instance terminal or a block terminal.
///
/// Equality is identity on the referenced terminal, not on names.
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum PinRef {
    /// A terminal of a placed instance.
    Instance(ITermRef),
    /// A terminal of the block itself.
    Block(BTermId),
}

/// Terminal signal directions.
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Direction {
    /// Input.
    Input,
    /// Output.
    Output,
    /// Input or output.
    #[default]
    InOut,
}

/// An eight-way placement orientation: four rotations, each optionally
/// mirrored about the y-axis before rotating.
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Orient {
    /// No rotation.
    #[default]
    R0,
    /// 90° counterclockwise.
    R90,
    /// 180°.
    R180,
    /// 270° counterclockwise.
    R270,
    /// Mirrored, no rotation.
    MirroredR0,
    /// Mirrored, then rotated 90° counterclockwise.
    MirroredR90,
    /// Mirrored, then rotated 180°.
    MirroredR180,
    /// Mirrored, then rotated 270° counterclockwise.
    MirroredR270,
}

impl Orient {
    fn apply(&self, p: Point) -> Point {
        let Point { x, y } = p;
        match self {
            Orient::R0 => Point::new(x, y),
            Orient::R90 => Point::new(-y, x),
            Orient::R180 => Point::new(-x, -y),
            Orient::R270 => Point::new(y, -x),
            Orient::MirroredR0 => Point::new(-x, y),
            Orient::MirroredR90 => Point::new(-y, -x),
            Orient::MirroredR180 => Point::new(x, -y),
            Orient::MirroredR270 => Point::new(y, x),
        }
    }
}

/// The placement of an instance: an orientation about the master origin
/// followed by a translation.
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Placement {
    /// The placed location of the master origin.
    pub loc: Point,
    /// The placement orientation.
    pub orient: Orient,
}

impl Placement {
    /// Creates a placement at `loc` with the given orientation.
    pub fn new(loc: Point, orient: Orient) -> Self {
        Self { loc, orient }
    }

    /// Transforms a rectangle from master coordinates to design
    /// coordinates.
    pub fn apply_rect(&self, rect: Rect) -> Rect {
        let p0 = self.orient.apply(Point::new(rect.left(), rect.bot()));
        let p1 = self.orient.apply(Point::new(rect.right(), rect.top()));
        Rect::new(p0, p1).translate(self.loc)
    }
}

/// A pin shape on a layer.
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq)]
pub struct PinGeometry {
    /// The layer the shape is drawn on.
    pub layer: LayerId,
    /// The shape.
    pub rect: Rect,
}

/// One antenna area entry of a terminal, optionally bound to a layer.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerArea {
    /// The layer the entry applies to, if restricted.
    pub layer: Option<LayerId>,
    /// The area, in square microns.
    pub area: f64,
}

/// The antenna properties of a master terminal.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct AntennaPinModel {
    /// Gate-oxide area entries.
    pub gate_area: Vec<LayerArea>,
    /// Protective diffusion area entries.
    pub diff_area: Vec<LayerArea>,
}

fn max_area(entries: &[LayerArea]) -> f64 {
    entries.iter().fold(0.0, |max, entry| max.max(entry.area))
}

impl AntennaPinModel {
    /// The terminal's gate area: the maximum over all entries, in µm².
    pub fn gate_area(&self) -> f64 {
        max_area(&self.gate_area)
    }

    /// The terminal's diffusion area: the maximum over all entries, in µm².
    pub fn diff_area(&self) -> f64 {
        max_area(&self.diff_area)
    }
}

/// A terminal of a [`Master`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MTerm {
    /// The terminal name.
    pub name: ArcStr,
    /// The terminal's signal direction.
    pub direction: Direction,
    /// Pin shapes, in master coordinates.
    pub pins: Vec<PinGeometry>,
    /// Antenna gate/diffusion areas.
    pub antenna: AntennaPinModel,
}

/// A library cell that can be placed in a [`Design`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Master {
    /// The master name.
    pub name: ArcStr,
    /// The master's terminals.
    pub mterms: Vec<MTerm>,
}

impl Master {
    /// Returns the index of the terminal with the given name.
    pub fn mterm_named(&self, name: &str) -> Option<usize> {
        self.mterms.iter().position(|mterm| mterm.name == name)
    }
}

/// A placed instance of a [`Master`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instance {
    /// The instance name.
    pub name: ArcStr,
    /// The placed master.
    pub master: MasterId,
    /// The placement.
    pub placement: Placement,
}

/// A block terminal, with pin shapes already in design coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BTerm {
    /// The terminal name.
    pub name: ArcStr,
    /// Pin shapes, in design coordinates.
    pub pins: Vec<PinGeometry>,
}

/// A via definition: the three boxes a placed via stamps out, in via
/// coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViaDef {
    /// The via name.
    pub name: ArcStr,
    /// The enclosure on the lower routing layer.
    pub bottom: PinGeometry,
    /// The cut itself.
    pub cut: PinGeometry,
    /// The enclosure on the upper routing layer.
    pub top: PinGeometry,
}

impl ViaDef {
    /// The three boxes of this via placed at `at`, bottom to top.
    pub fn boxes_at(&self, at: Point) -> [PinGeometry; 3] {
        let place = |shape: &PinGeometry| PinGeometry {
            layer: shape.layer,
            rect: shape.rect.translate(at),
        };
        [place(&self.bottom), place(&self.cut), place(&self.top)]
    }
}

/// One shape of a routed wire.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum WireShape {
    /// A wire segment on a routing layer.
    Segment {
        /// The routing layer.
        layer: LayerId,
        /// The segment's footprint.
        rect: Rect,
    },
    /// A placed via.
    Via {
        /// The via definition.
        def: ViaId,
        /// The via location.
        at: Point,
    },
}

/// A routed wire: the shapes the router produced for one net.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Wire {
    /// The wire's shapes.
    pub shapes: Vec<WireShape>,
}

impl Wire {
    /// Creates a wire from shapes.
    pub fn new(shapes: impl IntoIterator<Item = WireShape>) -> Self {
        Self {
            shapes: shapes.into_iter().collect(),
        }
    }
}

/// A net connecting pins, possibly routed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Net {
    /// The net name.
    pub name: ArcStr,
    /// Special (supply) nets are exempt from antenna analysis.
    pub special: bool,
    /// The pins the net connects.
    pub pins: Vec<PinRef>,
    /// The routed wire, if the net has been routed.
    pub wire: Option<Wire>,
}

/// An in-memory placed-and-routed design.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Design {
    name: ArcStr,
    tech: Tech,
    masters: Vec<Master>,
    insts: Vec<Instance>,
    bterms: Vec<BTerm>,
    vias: Vec<ViaDef>,
    nets: Vec<Net>,
    net_name_map: IndexMap<ArcStr, NetId>,
}

impl Design {
    /// Creates an empty design on the given technology.
    pub fn new(name: impl Into<ArcStr>, tech: Tech) -> Self {
        Self {
            name: name.into(),
            tech,
            masters: Vec::new(),
            insts: Vec::new(),
            bterms: Vec::new(),
            vias: Vec::new(),
            nets: Vec::new(),
            net_name_map: IndexMap::new(),
        }
    }

    /// The design name.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The technology the design is built on.
    #[inline]
    pub fn tech(&self) -> &Tech {
        &self.tech
    }

    /// Adds a master to the design's library.
    pub fn add_master(&mut self, master: Master) -> MasterId {
        let id = MasterId(self.masters.len());
        self.masters.push(master);
        id
    }

    /// Places an instance of a master.
    pub fn add_instance(
        &mut self,
        name: impl Into<ArcStr>,
        master: MasterId,
        placement: Placement,
    ) -> InstId {
        let id = InstId(self.insts.len());
        self.insts.push(Instance {
            name: name.into(),
            master,
            placement,
        });
        id
    }

    /// Adds a block terminal.
    pub fn add_bterm(&mut self, bterm: BTerm) -> BTermId {
        let id = BTermId(self.bterms.len());
        self.bterms.push(bterm);
        id
    }

    /// Adds a via definition.
    pub fn add_via(&mut self, via: ViaDef) -> ViaId {
        let id = ViaId(self.vias.len());
        self.vias.push(via);
        id
    }

    /// Creates a net.
    pub fn add_net(&mut self, name: impl Into<ArcStr>, special: bool) -> NetId {
        let id = NetId(self.nets.len());
        let name = name.into();
        self.net_name_map.insert(name.clone(), id);
        self.nets.push(Net {
            name,
            special,
            pins: Vec::new(),
            wire: None,
        });
        id
    }

    /// Connects a pin to a net.
    pub fn connect(&mut self, net: NetId, pin: PinRef) {
        self.nets[net.0].pins.push(pin);
    }

    /// Attaches a routed wire to a net.
    pub fn set_wire(&mut self, net: NetId, wire: Wire) {
        self.nets[net.0].wire = Some(wire);
    }

    /// Returns the master with the given ID.
    pub fn master(&self, id: MasterId) -> &Master {
        &self.masters[id.0]
    }

    /// Returns the instance with the given ID.
    pub fn instance(&self, id: InstId) -> &Instance {
        &self.insts[id.0]
    }

    /// Returns the block terminal with the given ID.
    pub fn bterm(&self, id: BTermId) -> &BTerm {
        &self.bterms[id.0]
    }

    /// Returns the via definition with the given ID.
    pub fn via(&self, id: ViaId) -> &ViaDef {
        &self.vias[id.0]
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.0]
    }

    /// Returns the ID of the net with the given name.
    pub fn net_named(&self, name: &str) -> Option<NetId> {
        self.net_name_map.get(name).copied()
    }

    /// Iterates over `(id, net)` pairs in creation order.
    pub fn nets(&self) -> impl Iterator<Item = (NetId, &Net)> {
        self.nets.iter().enumerate().map(|(i, net)| (NetId(i), net))
    }

    /// Returns the master terminal an instance terminal refers to.
    pub fn mterm(&self, iterm: ITermRef) -> &MTerm {
        let inst = self.instance(iterm.inst);
        &self.master(inst.master).mterms[iterm.mterm]
    }

    /// Returns the master terminal a master-terminal reference refers to.
    pub fn master_mterm(&self, mterm: MTermRef) -> &MTerm {
        &self.master(mterm.master).mterms[mterm.mterm]
    }

    /// The `instance/terminal` display name of an instance terminal.
    pub fn iterm_name(&self, iterm: ITermRef) -> String {
        let inst = self.instance(iterm.inst);
        format!("{}/{}", inst.name, self.mterm(iterm).name)
    }

    /// The pin shapes of a pin, in design coordinates.
    pub fn pin_shapes(&self, pin: PinRef) -> Vec<PinGeometry> {
        match pin {
            PinRef::Instance(iterm) => {
                let placement = self.instance(iterm.inst).placement;
                self.mterm(iterm)
                    .pins
                    .iter()
                    .map(|shape| PinGeometry {
                        layer: shape.layer,
                        rect: placement.apply_rect(shape.rect),
                    })
                    .collect()
            }
            PinRef::Block(bterm) => self.bterm(bterm).pins.clone(),
        }
    }

    /// The gate area of an instance terminal, in µm².
    pub fn gate_area(&self, iterm: ITermRef) -> f64 {
        self.mterm(iterm).antenna.gate_area()
    }

    /// The diffusion area of an instance terminal, in µm².
    pub fn diff_area(&self, iterm: ITermRef) -> f64 {
        self.mterm(iterm).antenna.diff_area()
    }

    /// Returns `true` if the terminal is a gate at risk during
    /// fabrication: an input with positive gate area.
    pub fn is_gate(&self, iterm: ITermRef) -> bool {
        let mterm = self.mterm(iterm);
        mterm.direction == Direction::Input && mterm.antenna.gate_area() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_transforms_rects() {
        let rect = Rect::from_sides(0, 0, 10, 20);
        let placement = Placement::new(Point::new(100, 100), Orient::R90);
        assert_eq!(
            placement.apply_rect(rect),
            Rect::from_sides(80, 100, 100, 110)
        );
        let mirrored = Placement::new(Point::zero(), Orient::MirroredR0);
        assert_eq!(mirrored.apply_rect(rect), Rect::from_sides(-10, 0, 0, 20));
    }
}
