//! Geometry normalization
//!
//! Incoming geometries come straight from the map SDK: either a polygon
//! (`rings`) or a point (`x`/`y`), in Web Mercator meters or WGS84 degrees.
//! Normalization yields a WGS84 center point and, for polygons, an
//! approximate surface in hectares.

use serde::{Deserialize, Serialize};

use crate::types::GeoPoint;

/// Half circumference of the spherical Web Mercator projection, in meters
pub const WEB_MERCATOR_HALF_EXTENT: f64 = 20_037_508.34;

/// Kilometers per degree of latitude near 12°N
pub const KM_PER_DEGREE_LAT: f64 = 111.0;

/// Kilometers per degree of longitude near 12°N
pub const KM_PER_DEGREE_LON: f64 = 109.0;

/// Placeholder surface assigned to a bare point
pub const POINT_SURFACE_HECTARES: f64 = 100.0;

/// Any raw ordinate with a larger magnitude is treated as projected
pub const PROJECTED_MAGNITUDE_THRESHOLD: f64 = 180.0;

/// Spatial reference attached to SDK geometries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReference {
    pub wkid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_wkid: Option<u32>,
}

/// Raw geometry as posted by the client
///
/// Both shapes are accepted through optional fields: a payload with neither
/// `rings` nor `x`/`y` is not rejected and normalizes to (0, 0).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rings: Option<Vec<Vec<Vec<f64>>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

impl GeometryInput {
    pub fn polygon(ring: Vec<[f64; 2]>) -> Self {
        Self {
            rings: Some(vec![ring.into_iter().map(|p| p.to_vec()).collect()]),
            ..Self::default()
        }
    }

    pub fn point(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn with_wkid(mut self, wkid: u32) -> Self {
        self.spatial_reference = Some(SpatialReference {
            wkid: Some(wkid),
            latest_wkid: None,
        });
        self
    }

    /// Outer ring as (x, y) pairs; vertices with fewer than two ordinates are skipped
    fn outer_ring(&self) -> Option<Vec<(f64, f64)>> {
        let ring = self.rings.as_ref()?.first()?;
        let points: Vec<(f64, f64)> = ring
            .iter()
            .filter(|p| p.len() >= 2)
            .map(|p| (p[0], p[1]))
            .collect();
        if points.is_empty() {
            None
        } else {
            Some(points)
        }
    }
}

/// Coordinate system of a raw geometry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSystem {
    /// WGS84 degrees (EPSG:4326)
    Geographic,
    /// Spherical Web Mercator meters (EPSG:3857)
    WebMercator,
}

impl CoordinateSystem {
    /// Map a well-known id; unknown ids yield `None`
    pub fn from_wkid(wkid: u32) -> Option<Self> {
        match wkid {
            4326 => Some(CoordinateSystem::Geographic),
            3857 | 102100 | 102113 | 900913 => Some(CoordinateSystem::WebMercator),
            _ => None,
        }
    }

    /// Magnitude heuristic: projected when either ordinate exceeds 180
    pub fn detect(x: f64, y: f64) -> Self {
        if x.abs() > PROJECTED_MAGNITUDE_THRESHOLD || y.abs() > PROJECTED_MAGNITUDE_THRESHOLD {
            CoordinateSystem::WebMercator
        } else {
            CoordinateSystem::Geographic
        }
    }

    /// Convert a raw position to WGS84, wrapped into the valid ranges
    pub fn to_geographic(self, x: f64, y: f64) -> GeoPoint {
        let point = match self {
            CoordinateSystem::Geographic => GeoPoint::new(x, y),
            CoordinateSystem::WebMercator => web_mercator_to_wgs84(x, y),
        };
        wrap_geographic(point)
    }
}

/// Wrap longitude into [-180, 180] and clamp latitude to [-90, 90]
///
/// In-range values are returned untouched. Map SDKs emit Mercator x beyond
/// the half extent once the view wraps across the antimeridian.
pub fn wrap_geographic(point: GeoPoint) -> GeoPoint {
    let longitude = if (-180.0..=180.0).contains(&point.longitude) {
        point.longitude
    } else {
        (point.longitude + 180.0).rem_euclid(360.0) - 180.0
    };
    GeoPoint::new(longitude, point.latitude.clamp(-90.0, 90.0))
}

/// Normalized geometry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedGeometry {
    pub center: GeoPoint,
    pub surface_hectares: f64,
    pub coordinate_system: CoordinateSystem,
    /// Outer ring in WGS84; empty for points
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ring: Vec<GeoPoint>,
}

/// Inverse spherical Web Mercator
pub fn web_mercator_to_wgs84(x: f64, y: f64) -> GeoPoint {
    let longitude = x * 180.0 / WEB_MERCATOR_HALF_EXTENT;
    let latitude = (y * std::f64::consts::PI / WEB_MERCATOR_HALF_EXTENT)
        .exp()
        .atan()
        * 360.0
        / std::f64::consts::PI
        - 90.0;
    GeoPoint::new(longitude, latitude)
}

/// Shoelace area of a ring, in square degrees
pub fn shoelace_area(ring: &[GeoPoint]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let twice_area: f64 = ring
        .iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| a.longitude * b.latitude - b.longitude * a.latitude)
        .sum();

    (twice_area / 2.0).abs()
}

/// Ring area in hectares using the flat per-degree scale calibrated near 12°N
///
/// Not geodesic: the error grows with distance from the calibration latitude.
pub fn polygon_area_hectares(ring: &[GeoPoint]) -> f64 {
    let km_squared = shoelace_area(ring) * KM_PER_DEGREE_LAT * KM_PER_DEGREE_LON;
    km_squared * 100.0
}

/// Normalize a raw geometry to a WGS84 center and surface
///
/// A `spatialReference` with a known wkid decides the coordinate system;
/// otherwise the raw center is tested with the magnitude heuristic.
pub fn normalize_geometry(geometry: &GeometryInput) -> NormalizedGeometry {
    let declared = geometry
        .spatial_reference
        .and_then(|sr| sr.latest_wkid.or(sr.wkid))
        .and_then(CoordinateSystem::from_wkid);

    if let Some(points) = geometry.outer_ring() {
        let n = points.len() as f64;
        let raw_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let raw_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let system = declared.unwrap_or_else(|| CoordinateSystem::detect(raw_x, raw_y));
        let center = system.to_geographic(raw_x, raw_y);
        let ring: Vec<GeoPoint> = points
            .iter()
            .map(|&(x, y)| system.to_geographic(x, y))
            .collect();

        return NormalizedGeometry {
            center,
            surface_hectares: polygon_area_hectares(&ring),
            coordinate_system: system,
            ring,
        };
    }

    if let (Some(x), Some(y)) = (geometry.x, geometry.y) {
        let system = declared.unwrap_or_else(|| CoordinateSystem::detect(x, y));
        return NormalizedGeometry {
            center: system.to_geographic(x, y),
            surface_hectares: POINT_SURFACE_HECTARES,
            coordinate_system: system,
            ring: Vec::new(),
        };
    }

    NormalizedGeometry {
        center: GeoPoint::default(),
        surface_hectares: 0.0,
        coordinate_system: declared.unwrap_or(CoordinateSystem::Geographic),
        ring: Vec::new(),
    }
}
