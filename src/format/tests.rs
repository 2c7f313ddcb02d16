use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use super::*;
use crate::model::{
    Color, CollectionStorage, CollectionTile, Compression, Data, DrawOrder, Flip, Frame, Gid,
    GridStorage, GridTile, Image, ImageLayer, Layer, Map, Object, ObjectLayer, Offset,
    Orientation, Point, Property, PxSize, RenderOrder, Shape, Size, StaggerAxis, StaggerIndex,
    TileLayer, TileOffset, TileStorage, Tileset, TilesetContent, Value,
};
use crate::util::{Error, Result};

fn round_trip(map: &Map) -> Result<Map> {
    let dir = tempdir()?;
    let path = dir.path().join("map.tmx");
    write_map(map, &path)?;
    read_map(&path)
}

fn write_doc(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

fn map_doc(attrs: &str, body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <map version=\"1.0\" orientation=\"orthogonal\" width=\"2\" height=\"2\" \
         tilewidth=\"16\" tileheight=\"16\"{attrs}>{body}</map>"
    )
}

fn flip_h(id: u32) -> Gid {
    Gid::with_flip(id, Flip { horizontal: true, ..Flip::NONE })
}

fn grid_content() -> TilesetContent {
    TilesetContent::new(
        "terrain",
        TileStorage::Grid(GridStorage {
            tile_size: Size::new(16, 16),
            spacing: 0,
            margin: 0,
            columns: 2,
            rows: 2,
            image: Image::new("terrain.png", Size::new(32, 32)),
            tiles: Vec::new(),
        }),
    )
}

fn sample_map() -> Map {
    let mut map = Map::new(Size::new(2, 2), Size::new(16, 16));
    map.tile_sets.push(Tileset::embedded(1, grid_content()));

    let mut layer = TileLayer::new("ground", map.size);
    layer.data = Data::csv(vec![Gid::new(1), Gid::new(2), Gid::EMPTY, flip_h(3)]);
    map.layers.push(Layer::Tile(layer));
    map
}

// Round trips -----------------------------------------------------------------

#[test]
fn test_empty_map_round_trip() -> Result<()> {
    let map = Map::new(Size::new(4, 3), Size::new(32, 32));
    assert_eq!(round_trip(&map)?, map);
    Ok(())
}

#[test]
fn test_map_attribute_round_trip() -> Result<()> {
    let mut map = Map::new(Size::new(8, 8), Size::new(16, 16));
    map.render_order = RenderOrder::LeftUp;
    map.background = Some(Color::rgb(0x64, 0x95, 0xed));
    map.next_object_id = 42;
    assert_eq!(round_trip(&map)?, map);
    Ok(())
}

#[test]
fn test_orientation_variants_round_trip() -> Result<()> {
    let orientations = [
        Orientation::Orthogonal,
        Orientation::Isometric,
        Orientation::Staggered { axis: StaggerAxis::X, index: StaggerIndex::Even },
        Orientation::Staggered { axis: StaggerAxis::Y, index: StaggerIndex::Odd },
        Orientation::Hexagonal { side_length: 8, axis: StaggerAxis::Y, index: StaggerIndex::Even },
    ];

    for orientation in orientations {
        let mut map = Map::new(Size::new(4, 4), Size::new(16, 16));
        map.orientation = orientation;
        assert_eq!(round_trip(&map)?, map, "{orientation:?}");
    }
    Ok(())
}

#[test]
fn test_property_kinds_round_trip() -> Result<()> {
    let mut map = Map::new(Size::new(1, 1), Size::new(8, 8));
    map.properties = vec![
        Property::new("depth", Value::Int(-7)),
        Property::new("gravity", Value::Float(9.81)),
        Property::new("looping", Value::Bool(true)),
        Property::new("tint", Value::Color(Color::argb(0x80, 0xff, 0x00, 0x00))),
        Property::new("script", Value::File("scripts/level.lua".into())),
        Property::new("title", Value::String("overworld".into())),
        Property::new("notes", Value::String("line one\nline two".into())),
        Property::new("empty", Value::String(String::new())),
    ];
    assert_eq!(round_trip(&map)?, map);
    Ok(())
}

#[test]
fn test_multiline_property_uses_element_text() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("map.tmx");

    let mut map = Map::new(Size::new(1, 1), Size::new(8, 8));
    map.properties = vec![Property::new("notes", Value::String("line one\nline two".into()))];
    write_map(&map, &path)?;

    let text = fs::read_to_string(&path)?;
    assert!(text.contains("line one\nline two"));
    assert!(!text.contains("value="));
    assert!(!text.contains("type="));
    Ok(())
}

#[test]
fn test_layer_kinds_round_trip() -> Result<()> {
    let mut map = sample_map();

    let mut objects = ObjectLayer::new("things");
    objects.color = Some(Color::rgb(0xa0, 0x00, 0x78));
    objects.draw_order = DrawOrder::Index;
    objects.opacity = 0.5;
    objects.offset = Offset::new(4.0, -2.5);
    objects.objects = vec![
        Object::new(1, Point::new(3.0, 4.5), Shape::Rect { size: PxSize::new(10.0, 20.0) }),
        Object::new(2, Point::new(0.0, 0.0), Shape::Ellipse { size: PxSize::new(6.0, 6.0) }),
        Object {
            name: "path".into(),
            kind: "patrol".into(),
            rotation: 45.0,
            visible: false,
            ..Object::new(
                3,
                Point::new(1.0, 2.0),
                Shape::Polyline {
                    points: vec![Point::new(0.0, 0.0), Point::new(16.0, 8.0)],
                },
            )
        },
        Object::new(
            4,
            Point::new(8.0, 8.0),
            Shape::Polygon {
                points: vec![Point::new(0.0, 0.0), Point::new(8.0, 0.0), Point::new(4.0, 8.0)],
            },
        ),
        Object::new(5, Point::new(16.0, 16.0), Shape::Tile(flip_h(3))),
    ];
    map.layers.push(Layer::Object(objects));

    let mut image_layer = ImageLayer::new("backdrop");
    image_layer.image = Some(Image::new("sky.png", Size::new(640, 480)));
    map.layers.push(Layer::Image(image_layer));
    map.next_object_id = 6;

    assert_eq!(round_trip(&map)?, map);
    Ok(())
}

#[test]
fn test_data_encoding_round_trips() -> Result<()> {
    let cells = vec![Gid::new(1), Gid::new(2), Gid::EMPTY, flip_h(3)];

    for data in [
        Data::csv(cells.clone()),
        Data::base64(Compression::None, cells.clone()),
        Data::base64(Compression::Zlib, cells.clone()),
    ] {
        let mut map = sample_map();
        if let Layer::Tile(layer) = &mut map.layers[0] {
            layer.data = data;
        }
        assert_eq!(round_trip(&map)?, map);
    }
    Ok(())
}

#[test]
fn test_grid_tileset_round_trip() -> Result<()> {
    let mut collision = ObjectLayer::new("");
    collision.draw_order = DrawOrder::Index;
    collision.objects = vec![Object::new(
        1,
        Point::new(2.0, 2.0),
        Shape::Rect { size: PxSize::new(12.0, 12.0) },
    )];

    let mut map = Map::new(Size::new(2, 2), Size::new(16, 16));
    let mut content = TilesetContent::new(
        "terrain",
        TileStorage::Grid(GridStorage {
            tile_size: Size::new(16, 16),
            spacing: 1,
            margin: 2,
            columns: 2,
            rows: 2,
            image: Image {
                source: "terrain.png".into(),
                transparent: Some(Color::rgb(0xff, 0x00, 0xff)),
                size: Size::new(35, 35),
            },
            tiles: vec![
                GridTile {
                    id: 0,
                    properties: vec![Property::new("solid", Value::Bool(true))],
                    collision: Some(collision),
                    animation: Vec::new(),
                },
                GridTile {
                    id: 3,
                    properties: Vec::new(),
                    collision: None,
                    animation: vec![
                        Frame { tile_id: 0, duration_ms: 100 },
                        Frame { tile_id: 3, duration_ms: 250 },
                    ],
                },
            ],
        }),
    );
    content.tile_offset = TileOffset::new(0, -8);
    content.properties = vec![Property::new("biome", Value::String("forest".into()))];
    map.tile_sets.push(Tileset::embedded(1, content));

    assert_eq!(round_trip(&map)?, map);
    Ok(())
}

#[test]
fn test_collection_tileset_round_trip() -> Result<()> {
    let mut map = Map::new(Size::new(2, 2), Size::new(16, 16));
    map.tile_sets.push(Tileset::embedded(
        1,
        TilesetContent::new(
            "props",
            TileStorage::Collection(CollectionStorage {
                max_tile_size: Size::new(64, 48),
                tile_count: 2,
                columns: 4,
                tiles: vec![
                    CollectionTile {
                        id: 0,
                        properties: Vec::new(),
                        image: Image::new("barrel.png", Size::new(24, 32)),
                        animation: Vec::new(),
                    },
                    CollectionTile {
                        id: 1,
                        properties: vec![Property::new("weight", Value::Int(3))],
                        image: Image::new("crate.png", Size::new(64, 48)),
                        animation: Vec::new(),
                    },
                ],
            }),
        ),
    ));

    assert_eq!(round_trip(&map)?, map);
    Ok(())
}

// Default omission ------------------------------------------------------------

#[test]
fn test_defaults_are_omitted() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("map.tmx");
    write_map(&sample_map(), &path)?;

    let text = fs::read_to_string(&path)?;
    assert!(!text.contains("opacity="));
    assert!(!text.contains("visible="));
    assert!(!text.contains("offsetx="));
    assert!(!text.contains("draworder="));
    assert!(!text.contains("spacing="));
    assert!(!text.contains("compression="));
    Ok(())
}

#[test]
fn test_absent_defaults_decode_to_default_values() -> Result<()> {
    let dir = tempdir()?;
    let body = "<layer name=\"ground\" width=\"2\" height=\"2\">\
                <data encoding=\"csv\">0,0,0,0</data></layer>\
                <objectgroup name=\"things\"/>";
    let path = write_doc(dir.path(), "map.tmx", &map_doc("", body));

    let map = read_map(&path)?;
    assert_eq!(map.render_order, RenderOrder::RightDown);
    assert_eq!(map.next_object_id, 1);
    assert!(map.properties.is_empty());

    let Layer::Tile(layer) = &map.layers[0] else { panic!("expected tile layer") };
    assert!(layer.visible);
    assert_eq!(layer.opacity, 1.0);
    assert_eq!(layer.offset, Offset::default());

    let Layer::Object(layer) = &map.layers[1] else { panic!("expected object layer") };
    assert_eq!(layer.draw_order, DrawOrder::TopDown);
    assert_eq!(layer.color, None);
    Ok(())
}

#[test]
fn test_hidden_layer_written_as_zero() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("map.tmx");

    let mut map = sample_map();
    if let Layer::Tile(layer) = &mut map.layers[0] {
        layer.visible = false;
    }
    write_map(&map, &path)?;

    assert!(fs::read_to_string(&path)?.contains("visible=\"0\""));
    assert_eq!(round_trip(&map)?, map);
    Ok(())
}

#[test]
fn test_bool_property_styles() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("map.tmx");

    let mut map = Map::new(Size::new(1, 1), Size::new(8, 8));
    map.properties = vec![Property::new("looping", Value::Bool(true))];

    write_map(&map, &path)?;
    assert!(fs::read_to_string(&path)?.contains("value=\"true\""));
    assert_eq!(read_map(&path)?, map);

    let opts = WriteOptions { bool_style: BoolStyle::Numeric };
    write_map_with(&map, &path, &opts)?;
    assert!(fs::read_to_string(&path)?.contains("value=\"1\""));
    assert_eq!(read_map(&path)?, map);
    Ok(())
}

// The concrete scenario -------------------------------------------------------

#[test]
fn test_concrete_map_scenario() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("map.tmx");
    let map = sample_map();
    write_map(&map, &path)?;

    let text = fs::read_to_string(&path)?;
    assert!(text.contains("encoding=\"csv\""));
    assert!(text.contains("1,2,"));
    assert!(text.contains("0,2147483651"));

    let decoded = read_map(&path)?;
    let Layer::Tile(layer) = &decoded.layers[0] else { panic!("expected tile layer") };
    assert_eq!(
        layer.data.cells,
        vec![Gid::new(1), Gid::new(2), Gid::EMPTY, flip_h(3)]
    );
    Ok(())
}

// External tile sets ----------------------------------------------------------

#[test]
fn test_external_tileset_writes_two_documents() -> Result<()> {
    let dir = tempdir()?;
    let map_path = dir.path().join("map.tmx");
    let tsx_path = dir.path().join("terrain.tsx");

    let mut map = sample_map();
    map.tile_sets[0] = Tileset::external(1, "terrain.tsx", grid_content());
    write_map(&map, &map_path)?;

    let map_text = fs::read_to_string(&map_path)?;
    assert!(map_text.contains("firstgid=\"1\""));
    assert!(map_text.contains("source=\"terrain.tsx\""));
    // The stub carries no content; that all lives in the other document.
    assert!(!map_text.contains("tilecount="));

    let tsx_text = fs::read_to_string(&tsx_path)?;
    assert!(tsx_text.contains("<tileset"));
    assert!(tsx_text.contains("tilecount=\"4\""));
    assert!(!tsx_text.contains("firstgid="));

    let decoded = read_map(&map_path)?;
    assert_eq!(decoded, map);
    assert_eq!(read_tileset(&tsx_path)?, grid_content());
    Ok(())
}

#[test]
fn test_standalone_tileset_entry_point() -> Result<()> {
    let dir = tempdir()?;
    let tileset = Tileset::external(1, "props.tsx", grid_content());

    write_tileset(&tileset, dir.path())?;
    assert_eq!(read_tileset(dir.path().join("props.tsx"))?, grid_content());
    Ok(())
}

#[test]
fn test_external_tileset_empty_source_fails() -> Result<()> {
    let dir = tempdir()?;

    let mut map = sample_map();
    map.tile_sets[0].source = Some(PathBuf::new());
    let err = write_map(&map, dir.path().join("map.tmx")).unwrap_err();
    assert!(matches!(err, Error::Unsupported(_)));

    let embedded = Tileset::embedded(1, grid_content());
    let err = write_tileset(&embedded, dir.path()).unwrap_err();
    assert!(matches!(err, Error::Unsupported(_)));
    Ok(())
}

#[test]
fn test_unfollowed_external_reference_stays_a_stub() -> Result<()> {
    let dir = tempdir()?;
    let map_path = dir.path().join("map.tmx");

    let mut map = sample_map();
    map.tile_sets[0] = Tileset::external(1, "terrain.tsx", grid_content());
    write_map(&map, &map_path)?;

    let opts = ReadOptions { follow_external: false };
    let stub_map = read_map_with(&map_path, &opts)?;
    let stub = &stub_map.tile_sets[0];
    assert_eq!(stub.first_gid, 1);
    assert_eq!(stub.source, Some(PathBuf::from("terrain.tsx")));
    assert_eq!(stub.content, None);

    // Re-writing the stub re-emits the reference without touching the
    // external document.
    fs::remove_file(dir.path().join("terrain.tsx"))?;
    write_map(&stub_map, &map_path)?;
    assert!(!dir.path().join("terrain.tsx").exists());
    assert_eq!(read_map_with(&map_path, &opts)?, stub_map);
    Ok(())
}

#[test]
fn test_cyclic_external_reference_rejected() -> Result<()> {
    let dir = tempdir()?;
    let body = "<tileset firstgid=\"1\" source=\"map.tmx\"/>";
    let path = write_doc(dir.path(), "map.tmx", &map_doc("", body));

    let err = read_map(&path).unwrap_err();
    assert!(matches!(err, Error::Unsupported(_)), "{err}");
    Ok(())
}

#[test]
fn test_missing_external_tileset_fails() -> Result<()> {
    let dir = tempdir()?;
    let body = "<tileset firstgid=\"1\" source=\"gone.tsx\"/>";
    let path = write_doc(dir.path(), "map.tmx", &map_doc("", body));

    let err = read_map(&path).unwrap_err();
    assert!(matches!(err, Error::Open { .. }), "{err}");
    Ok(())
}

// Rejection -------------------------------------------------------------------

#[test]
fn test_enum_rejection_names_attribute_and_token() -> Result<()> {
    let dir = tempdir()?;

    let doc = map_doc("", "").replace("orthogonal", "diagonal");
    let path = write_doc(dir.path(), "bad-orientation.tmx", &doc);
    match read_map(&path).unwrap_err() {
        Error::InvalidAttribute { name, value } => {
            assert_eq!(name, "orientation");
            assert_eq!(value, "diagonal");
        }
        err => panic!("unexpected error: {err}"),
    }

    let doc = map_doc(" renderorder=\"down-under\"", "");
    let path = write_doc(dir.path(), "bad-renderorder.tmx", &doc);
    match read_map(&path).unwrap_err() {
        Error::InvalidAttribute { name, value } => {
            assert_eq!(name, "renderorder");
            assert_eq!(value, "down-under");
        }
        err => panic!("unexpected error: {err}"),
    }

    let doc = map_doc("", "<objectgroup draworder=\"bottomup\"/>");
    let path = write_doc(dir.path(), "bad-draworder.tmx", &doc);
    match read_map(&path).unwrap_err() {
        Error::InvalidAttribute { name, value } => {
            assert_eq!(name, "draworder");
            assert_eq!(value, "bottomup");
        }
        err => panic!("unexpected error: {err}"),
    }

    let doc = map_doc(
        "",
        "<properties><property name=\"p\" type=\"vector\" value=\"1\"/></properties>",
    );
    let path = write_doc(dir.path(), "bad-property-type.tmx", &doc);
    match read_map(&path).unwrap_err() {
        Error::InvalidAttribute { name, value } => {
            assert_eq!(name, "type");
            assert_eq!(value, "vector");
        }
        err => panic!("unexpected error: {err}"),
    }
    Ok(())
}

#[test]
fn test_missing_required_attributes_rejected() -> Result<()> {
    let dir = tempdir()?;

    let doc = map_doc("", "").replace(" width=\"2\"", "");
    let path = write_doc(dir.path(), "no-width.tmx", &doc);
    assert!(matches!(
        read_map(&path).unwrap_err(),
        Error::MissingAttribute("width")
    ));

    let doc = map_doc("", "<tileset name=\"t\"/>");
    let path = write_doc(dir.path(), "no-firstgid.tmx", &doc);
    assert!(matches!(
        read_map(&path).unwrap_err(),
        Error::MissingAttribute("firstgid")
    ));
    Ok(())
}

#[test]
fn test_tile_layer_without_data_rejected() -> Result<()> {
    let dir = tempdir()?;
    let doc = map_doc("", "<layer name=\"ground\" width=\"2\" height=\"2\"/>");
    let path = write_doc(dir.path(), "map.tmx", &doc);
    assert!(matches!(
        read_map(&path).unwrap_err(),
        Error::MissingElement("data")
    ));
    Ok(())
}

#[test]
fn test_grid_size_mismatch_rejected_on_write() -> Result<()> {
    let dir = tempdir()?;
    let mut map = sample_map();
    if let Layer::Tile(layer) = &mut map.layers[0] {
        layer.data.cells.pop();
    }

    let err = write_map(&map, dir.path().join("map.tmx")).unwrap_err();
    assert!(matches!(err, Error::InvalidElement { name: "data", .. }));
    Ok(())
}

#[test]
fn test_grid_size_mismatch_rejected_on_read() -> Result<()> {
    let dir = tempdir()?;
    let body = "<layer width=\"2\" height=\"2\">\
                <data encoding=\"csv\">1,2,3</data></layer>";
    let path = write_doc(dir.path(), "map.tmx", &map_doc("", body));

    let err = read_map(&path).unwrap_err();
    assert!(matches!(err, Error::InvalidElement { name: "data", .. }));
    Ok(())
}

#[test]
fn test_tile_count_mismatch_rejected() -> Result<()> {
    let dir = tempdir()?;
    let body = "<tileset firstgid=\"1\" name=\"t\" tilewidth=\"16\" tileheight=\"16\" \
                tilecount=\"5\" columns=\"2\"><image source=\"t.png\"/></tileset>";
    let path = write_doc(dir.path(), "map.tmx", &map_doc("", body));

    match read_map(&path).unwrap_err() {
        Error::InvalidAttribute { name, value } => {
            assert_eq!(name, "tilecount");
            assert_eq!(value, "5");
        }
        err => panic!("unexpected error: {err}"),
    }
    Ok(())
}

#[test]
fn test_duplicate_tile_id_rejected() -> Result<()> {
    let dir = tempdir()?;
    let body = "<tileset firstgid=\"1\" name=\"t\" tilewidth=\"16\" tileheight=\"16\" \
                tilecount=\"4\" columns=\"2\"><image source=\"t.png\"/>\
                <tile id=\"1\"/><tile id=\"1\"/></tileset>";
    let path = write_doc(dir.path(), "map.tmx", &map_doc("", body));

    assert!(matches!(
        read_map(&path).unwrap_err(),
        Error::InvalidAttribute { name: "id", .. }
    ));
    Ok(())
}

#[test]
fn test_stale_next_object_id_rejected() -> Result<()> {
    let dir = tempdir()?;
    let body = "<objectgroup><object id=\"5\" x=\"0\" y=\"0\"/></objectgroup>";

    let doc = map_doc(" nextobjectid=\"5\"", body);
    let path = write_doc(dir.path(), "map.tmx", &doc);
    assert!(matches!(
        read_map(&path).unwrap_err(),
        Error::InvalidAttribute { name: "nextobjectid", .. }
    ));

    // Without the attribute the counter is derived past the largest id.
    let path = write_doc(dir.path(), "derived.tmx", &map_doc("", body));
    assert_eq!(read_map(&path)?.next_object_id, 6);
    Ok(())
}

#[test]
fn test_opacity_out_of_range_rejected() -> Result<()> {
    let dir = tempdir()?;
    let body = "<objectgroup opacity=\"1.5\"/>";
    let path = write_doc(dir.path(), "map.tmx", &map_doc("", body));

    assert!(matches!(
        read_map(&path).unwrap_err(),
        Error::InvalidAttribute { name: "opacity", .. }
    ));
    Ok(())
}

#[test]
fn test_malformed_points_rejected() -> Result<()> {
    let dir = tempdir()?;
    let body = "<objectgroup><object id=\"1\" x=\"0\" y=\"0\">\
                <polygon points=\"0,0 nonsense\"/></object></objectgroup>";
    let path = write_doc(dir.path(), "map.tmx", &map_doc(" nextobjectid=\"2\"", body));

    assert!(matches!(
        read_map(&path).unwrap_err(),
        Error::InvalidAttribute { name: "points", .. }
    ));
    Ok(())
}

// I/O boundaries --------------------------------------------------------------

#[test]
fn test_unwritable_output_path_fails() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("missing-dir").join("map.tmx");

    let err = write_map(&sample_map(), &path).unwrap_err();
    assert!(matches!(err, Error::Create { .. }), "{err}");
    Ok(())
}

#[test]
fn test_missing_input_path_fails() {
    let err = read_map("/nonexistent/map.tmx").unwrap_err();
    assert!(matches!(err, Error::Open { .. }), "{err}");
}
