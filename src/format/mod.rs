//! The TMX document format codec.
//!
//! Entry points for encoding a [`Map`] or a standalone tile set to a
//! file and decoding them back. Each call is synchronous and
//! self-contained: it runs to completion, touches the file system only
//! at the document's own path (plus externally referenced tile-set
//! paths), and shares no state with other calls.

mod data;
mod names;
mod points;
mod reader;
mod writer;

use std::collections::HashSet;
use std::path::Path;

use crate::model::{Map, Tileset, TilesetContent};
use crate::util::Result;
use crate::xml;

/// How boolean property values are spelled.
///
/// The format's schema versions disagree on the canonical token set, so
/// the choice is explicit rather than guessed. Reading accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolStyle {
    /// `true` / `false`, the current schema's form.
    #[default]
    Literal,
    /// `1` / `0`, the legacy form.
    Numeric,
}

/// Options controlling how documents are written.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    pub bool_style: BoolStyle,
}

/// Options controlling how documents are read.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Load and merge externally referenced tile-set documents. When
    /// off, external references decode to stubs that re-serialize
    /// unchanged without touching the referenced file.
    pub follow_external: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { follow_external: true }
    }
}

/// Write a map document to `path`.
///
/// Tile sets marked for external storage are additionally written as
/// their own documents, resolved relative to the map's directory.
pub fn write_map(map: &Map, path: impl AsRef<Path>) -> Result<()> {
    write_map_with(map, path, &WriteOptions::default())
}

/// Write a map document with explicit options.
pub fn write_map_with(map: &Map, path: impl AsRef<Path>, opts: &WriteOptions) -> Result<()> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "writing map");

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let root = writer::write_map_root(map, base, opts)?;
    xml::save(&root, path)
}

/// Write a tile set as a standalone document at its source path,
/// resolved relative to `base`.
///
/// Fails if the tile set's source path is empty or absent.
pub fn write_tileset(tileset: &Tileset, base: impl AsRef<Path>) -> Result<()> {
    write_tileset_with(tileset, base, &WriteOptions::default())
}

/// Write a standalone tile-set document with explicit options.
pub fn write_tileset_with(
    tileset: &Tileset,
    base: impl AsRef<Path>,
    opts: &WriteOptions,
) -> Result<()> {
    writer::write_standalone_tileset(tileset, base.as_ref(), opts)
}

/// Read a map document, following external tile-set references.
pub fn read_map(path: impl AsRef<Path>) -> Result<Map> {
    read_map_with(path, &ReadOptions::default())
}

/// Read a map document with explicit options.
pub fn read_map_with(path: impl AsRef<Path>, opts: &ReadOptions) -> Result<Map> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading map");

    let root = xml::load(path)?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));

    let mut visited = HashSet::new();
    visited.insert(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()));

    reader::parse_map_root(&root, dir, opts, &visited)
}

/// Read a standalone tile-set document.
///
/// The standalone form has no first-global-id; the caller assigns one
/// when attaching the content to a map.
pub fn read_tileset(path: impl AsRef<Path>) -> Result<TilesetContent> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading tile set");

    let root = xml::load(path)?;
    reader::parse_tileset_root(&root)
}

#[cfg(test)]
mod tests;
