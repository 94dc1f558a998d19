//! Affine georeferencing carried by containers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Affine transformation coefficients in GDAL/rasterio tuple order:
/// `(origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height)`.
///
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub col_rotation: f64,
    /// Usually negative for north-up images
    pub pixel_height: f64,
}

impl GeoTransform {
    /// North-up transform without rotation
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            pixel_width,
            row_rotation: 0.0,
            origin_y,
            col_rotation: 0.0,
            pixel_height,
        }
    }

    /// Build from the 6-tuple coefficient order
    pub fn from_coefficients(c: [f64; 6]) -> Self {
        Self {
            origin_x: c[0],
            pixel_width: c[1],
            row_rotation: c[2],
            origin_y: c[3],
            col_rotation: c[4],
            pixel_height: c[5],
        }
    }

    pub fn coefficients(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// Map a (possibly fractional) pixel position to world coordinates.
    /// Integer inputs address the top-left corner of a cell.
    pub fn pixel_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Inverse of [`pixel_to_geo`](Self::pixel_to_geo); `None` for a
    /// degenerate transform.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;
        if det.abs() < 1e-12 {
            return None;
        }
        let dx = x - self.origin_x;
        let dy = y - self.origin_y;
        Some((
            (self.pixel_height * dx - self.row_rotation * dy) / det,
            (self.pixel_width * dy - self.col_rotation * dx) / det,
        ))
    }

    pub fn is_north_up(&self) -> bool {
        self.row_rotation == 0.0 && self.col_rotation == 0.0 && self.pixel_height < 0.0
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(c: [f64; 6]) -> Self {
        Self::from_coefficients(c)
    }
}

/// The three georeferencing fields a container hands to exporters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Georeference {
    pub transform: Option<GeoTransform>,
    /// Coordinate reference system identifier (EPSG code, WKT, PROJ string)
    pub projection: Option<String>,
    pub metadata: Option<BTreeMap<String, String>>,
}

impl Georeference {
    /// True when none of the three fields is set
    pub fn is_empty(&self) -> bool {
        self.transform.is_none() && self.projection.is_none() && self.metadata.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_coefficient_order() {
        let gt = GeoTransform::from_coefficients([500.0, 30.0, 0.0, 4200.0, 0.0, -30.0]);
        assert_eq!(gt.origin_x, 500.0);
        assert_eq!(gt.origin_y, 4200.0);
        assert_eq!(gt.pixel_height, -30.0);
        assert_eq!(gt.coefficients(), [500.0, 30.0, 0.0, 4200.0, 0.0, -30.0]);
        assert!(gt.is_north_up());
    }

    #[test]
    fn test_pixel_geo_inverse() {
        let gt = GeoTransform::north_up(100.0, 200.0, 10.0, -10.0);
        let (x, y) = gt.pixel_to_geo(5.5, 10.5);
        assert_relative_eq!(x, 155.0);
        assert_relative_eq!(y, 95.0);

        let (col, row) = gt.geo_to_pixel(x, y).unwrap();
        assert_relative_eq!(col, 5.5, epsilon = 1e-10);
        assert_relative_eq!(row, 10.5, epsilon = 1e-10);
    }

    #[test]
    fn test_degenerate_inverse() {
        let gt = GeoTransform::north_up(0.0, 0.0, 0.0, -1.0);
        assert!(gt.geo_to_pixel(1.0, 1.0).is_none());
    }
}
