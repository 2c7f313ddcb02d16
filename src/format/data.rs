//! Tile grid (data block) codec.
//!
//! A tile layer's cells serialize as a flat row-major list of packed
//! global tile ids, either as a comma/newline-delimited decimal list or
//! as base64 over the 4-byte little-endian cell stream, optionally
//! zlib-compressed before encoding. The requested mode is explicit:
//! an unsupported combination is a hard error, never a silent fallback,
//! so every emitted document is re-readable by this same codec.

use std::io::{Cursor, Read, Write};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::model::{Compression, Data, Encoding, Gid, Size};
use crate::util::{Error, Result};
use crate::xml::Element;

use super::names;

/// Encode a data block into its `<data>` element.
///
/// The cell count must equal the owning layer's width × height.
pub fn encode(data: &Data, size: Size, elem: &mut Element) -> Result<()> {
    check_cell_count(data.cells.len(), size)?;

    let text = match (data.encoding, data.compression) {
        (Encoding::Csv, Compression::None) => {
            elem.set_attribute(names::DATA_ENCODING, names::ENCODING_CSV);
            encode_csv(&data.cells, size)?
        }
        (Encoding::Csv, _) => {
            return Err(Error::unsupported("csv-encoded data cannot be compressed"));
        }
        (Encoding::Base64, Compression::Gzip) => {
            return Err(Error::unsupported("gzip-compressed data is not supported"));
        }
        (Encoding::Base64, compression) => {
            elem.set_attribute(names::DATA_ENCODING, names::ENCODING_BASE64);
            if compression == Compression::Zlib {
                elem.set_attribute(names::DATA_COMPRESSION, names::COMPRESSION_ZLIB);
            }
            encode_base64(&data.cells, compression)?
        }
    };

    elem.set_text(text);
    Ok(())
}

/// Decode a `<data>` element, dispatching on its declared encoding and
/// compression attributes. The decoded cell count must match the
/// declared layer size.
pub fn decode(elem: &Element, size: Size) -> Result<Data> {
    let encoding = match elem
        .attribute(names::DATA_ENCODING)
        .ok_or(Error::MissingAttribute(names::DATA_ENCODING))?
    {
        t if t == names::ENCODING_CSV => Encoding::Csv,
        t if t == names::ENCODING_BASE64 => Encoding::Base64,
        t => return Err(Error::invalid_attribute(names::DATA_ENCODING, t)),
    };

    let compression = match elem.attribute(names::DATA_COMPRESSION) {
        None => Compression::None,
        Some(t) if t == names::COMPRESSION_ZLIB => Compression::Zlib,
        Some(t) if t == names::COMPRESSION_GZIP => Compression::Gzip,
        Some(t) => return Err(Error::invalid_attribute(names::DATA_COMPRESSION, t)),
    };

    let text = elem.text().unwrap_or("");
    let cells = match (encoding, compression) {
        (Encoding::Csv, Compression::None) => decode_csv(text)?,
        (Encoding::Csv, _) => {
            return Err(Error::unsupported("csv-encoded data cannot be compressed"));
        }
        (Encoding::Base64, Compression::Gzip) => {
            return Err(Error::unsupported("gzip-compressed data is not supported"));
        }
        (Encoding::Base64, compression) => decode_base64(text, compression)?,
    };

    check_cell_count(cells.len(), size)?;
    Ok(Data { encoding, compression, cells })
}

fn check_cell_count(count: usize, size: Size) -> Result<()> {
    if count != size.area() {
        return Err(Error::invalid_element(
            names::DATA,
            format!("{count} cells for a {}x{} layer", size.w, size.h),
        ));
    }
    Ok(())
}

fn pack(gid: Gid) -> Result<u32> {
    gid.pack().ok_or_else(|| {
        Error::invalid_element(names::DATA, format!("tile id {} out of range", gid.id))
    })
}

fn unpack(raw: u32) -> Result<Gid> {
    Gid::unpack(raw)
        .ok_or_else(|| Error::invalid_element(names::DATA, format!("flipped empty cell {raw:#010x}")))
}

// CSV -------------------------------------------------------------------------

fn encode_csv(cells: &[Gid], size: Size) -> Result<String> {
    let mut out = String::from("\n");
    for (i, &gid) in cells.iter().enumerate() {
        out.push_str(&pack(gid)?.to_string());
        let row_end = (i + 1) % size.w.max(1) as usize == 0;
        if i + 1 < cells.len() {
            out.push(',');
        }
        if row_end {
            out.push('\n');
        }
    }
    Ok(out)
}

fn decode_csv(text: &str) -> Result<Vec<Gid>> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            let raw = token
                .parse::<u32>()
                .map_err(|_| Error::invalid_element(names::DATA, token))?;
            unpack(raw)
        })
        .collect()
}

// Base64 ----------------------------------------------------------------------

fn encode_base64(cells: &[Gid], compression: Compression) -> Result<String> {
    let mut bytes = Vec::with_capacity(cells.len() * 4);
    for &gid in cells {
        bytes.write_u32::<LittleEndian>(pack(gid)?)?;
    }

    if compression == Compression::Zlib {
        let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&bytes)?;
        bytes = encoder.finish()?;
    }

    Ok(BASE64.encode(&bytes))
}

fn decode_base64(text: &str, compression: Compression) -> Result<Vec<Gid>> {
    let mut bytes = BASE64
        .decode(text.trim())
        .map_err(|e| Error::invalid_element(names::DATA, e.to_string()))?;

    if compression == Compression::Zlib {
        let mut decoder = ZlibDecoder::new(bytes.as_slice());
        let mut inflated = Vec::new();
        decoder
            .read_to_end(&mut inflated)
            .map_err(|e| Error::invalid_element(names::DATA, e.to_string()))?;
        bytes = inflated;
    }

    if bytes.len() % 4 != 0 {
        return Err(Error::invalid_element(
            names::DATA,
            format!("{} bytes is not a whole number of cells", bytes.len()),
        ));
    }

    let mut cursor = Cursor::new(bytes.as_slice());
    let mut cells = Vec::with_capacity(bytes.len() / 4);
    for _ in 0..bytes.len() / 4 {
        cells.push(unpack(cursor.read_u32::<LittleEndian>()?)?);
    }
    Ok(cells)
}
