//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// A geographic position in WGS84 degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// True when both ordinates are valid geographic degrees
    pub fn is_geographic(&self) -> bool {
        (-180.0..=180.0).contains(&self.longitude) && (-90.0..=90.0).contains(&self.latitude)
    }
}

/// Axis-aligned bounding box in geographic degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub const fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// Inclusive containment on both axes
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
            && point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
    }
}

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub const MAX_PER_PAGE: u32 = 1000;

    /// Clamp to sane values (page >= 1, 1 <= per_page <= MAX_PER_PAGE)
    pub fn normalized(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, Self::MAX_PER_PAGE),
        }
    }

    pub fn offset(&self) -> u64 {
        let p = self.normalized();
        u64::from(p.page - 1) * u64::from(p.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 100,
        }
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u64) -> Self {
        let p = pagination.normalized();
        let total_pages = total_items.div_ceil(u64::from(p.per_page));
        Self {
            page: p.page,
            per_page: p.per_page,
            total_items,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_is_inclusive() {
        let bbox = BoundingBox::new(-1.8, -1.0, 12.1, 12.6);
        assert!(bbox.contains(GeoPoint::new(-1.8, 12.1)));
        assert!(bbox.contains(GeoPoint::new(-1.0, 12.6)));
        assert!(bbox.contains(GeoPoint::new(-1.5584, 12.2395)));
        assert!(!bbox.contains(GeoPoint::new(-0.99, 12.3)));
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(&Pagination { page: 2, per_page: 10 }, 25);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.page, 2);

        let empty = PaginationMeta::new(&Pagination::default(), 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_pagination_offset_clamps() {
        assert_eq!(Pagination { page: 0, per_page: 0 }.offset(), 0);
        assert_eq!(Pagination { page: 3, per_page: 20 }.offset(), 40);
    }
}
