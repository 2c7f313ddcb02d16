//! Point-list codec for polygon and polyline shapes.
//!
//! The schema stores a shape's vertices as one attribute: a
//! space-separated list of `x,y` pairs, relative to the owning object's
//! position, in original list order.

use crate::model::Point;
use crate::util::{Error, Result};

use super::names;

/// Format a point list as the canonical `points` attribute value.
pub fn format_points(points: &[Point]) -> String {
    let mut out = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{},{}", p.x, p.y));
    }
    out
}

/// Parse a `points` attribute value, re-splitting on whitespace then
/// comma. Any token that is not a valid coordinate pair is an error.
pub fn parse_points(value: &str) -> Result<Vec<Point>> {
    value
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| Error::invalid_attribute(names::POLY_POINTS, pair))?;
            let x = x
                .parse()
                .map_err(|_| Error::invalid_attribute(names::POLY_POINTS, pair))?;
            let y = y
                .parse()
                .map_err(|_| Error::invalid_attribute(names::POLY_POINTS, pair))?;
            Ok(Point::new(x, y))
        })
        .collect()
}
