//! Freeform map objects and their shape variants.

use super::layer::DEFAULT_VISIBLE;
use super::{Gid, Point, Properties, PxSize};

/// The geometric form of an object.
///
/// Every encode/decode site matches exhaustively on this enum, so a new
/// shape cannot be added without every codec handling it.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle; zero size components are omitted.
    Rect { size: PxSize },
    /// Ellipse inscribed in the rectangle of the same size.
    Ellipse { size: PxSize },
    /// Closed point list, coordinates relative to the object position.
    Polygon { points: Vec<Point> },
    /// Open point list, coordinates relative to the object position.
    Polyline { points: Vec<Point> },
    /// A placed tile instance, referenced by global id.
    Tile(Gid),
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Rect { size: PxSize::default() }
    }
}

/// An object on an object layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Unique id, assigned by the owning map and never reused.
    pub id: u32,
    pub name: String,
    /// Free-form type tag.
    pub kind: String,
    pub position: Point,
    pub shape: Shape,
    /// Rotation in degrees, clockwise around the position.
    pub rotation: f64,
    pub visible: bool,
    pub properties: Properties,
}

impl Object {
    pub fn new(id: u32, position: Point, shape: Shape) -> Self {
        Self {
            id,
            name: String::new(),
            kind: String::new(),
            position,
            shape,
            rotation: 0.0,
            visible: DEFAULT_VISIBLE,
            properties: Properties::new(),
        }
    }
}
