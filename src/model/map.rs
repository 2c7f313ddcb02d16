//! The top-level map document model.

use super::{Color, Layer, Properties, Size, Tileset};

/// TMX format version stamped on written documents.
pub const FORMAT_VERSION: &str = "1.0";

/// Order in which a renderer should draw a layer's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum RenderOrder {
    #[default]
    RightDown,
    RightUp,
    LeftDown,
    LeftUp,
}

/// Axis along which staggered and hexagonal rows/columns shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaggerAxis {
    X,
    Y,
}

/// Whether even or odd rows/columns along the stagger axis shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaggerIndex {
    Even,
    Odd,
}

/// Map orientation. Exactly one variant is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Orthogonal,
    Isometric,
    Staggered {
        axis: StaggerAxis,
        index: StaggerIndex,
    },
    Hexagonal {
        /// Length in pixels of a hexagon's straight edge.
        side_length: u32,
        axis: StaggerAxis,
        index: StaggerIndex,
    },
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Orthogonal
    }
}

/// A complete tile-map document.
///
/// The map exclusively owns its tile sets, layers and properties.
/// Invariant: `next_object_id` exceeds every object id ever assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub version: String,
    pub orientation: Orientation,
    pub render_order: RenderOrder,
    /// Size in cells.
    pub size: Size,
    /// Default cell size in pixels.
    pub tile_size: Size,
    pub background: Option<Color>,
    /// Next unique object id the map will assign.
    pub next_object_id: u32,
    pub properties: Properties,
    pub tile_sets: Vec<Tileset>,
    pub layers: Vec<Layer>,
}

impl Map {
    /// An empty orthogonal map of the given cell and tile size.
    pub fn new(size: Size, tile_size: Size) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            orientation: Orientation::default(),
            render_order: RenderOrder::default(),
            size,
            tile_size,
            background: None,
            next_object_id: 1,
            properties: Properties::new(),
            tile_sets: Vec::new(),
            layers: Vec::new(),
        }
    }

    /// Largest object id used by any object layer, if any objects exist.
    pub fn max_object_id(&self) -> Option<u32> {
        self.layers
            .iter()
            .filter_map(|l| match l {
                Layer::Object(ol) => ol.objects.iter().map(|o| o.id).max(),
                _ => None,
            })
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Layer, Object, ObjectLayer, Point, Shape};

    #[test]
    fn test_max_object_id() {
        let mut map = Map::new(Size::new(4, 4), Size::new(16, 16));
        assert_eq!(map.max_object_id(), None);

        let mut layer = ObjectLayer::new("things");
        layer.objects.push(Object::new(3, Point::default(), Shape::default()));
        layer.objects.push(Object::new(7, Point::default(), Shape::default()));
        map.layers.push(Layer::Object(layer));

        assert_eq!(map.max_object_id(), Some(7));
    }
}
