//! Agricultural zone reference table
//!
//! Production areas of Burkina Faso (FAOSTAT / INSD figures) as
//! axis-aligned bounding boxes. Boxes overlap on purpose: one region
//! carries one entry per crop.

use serde::{Deserialize, Serialize};

use crate::types::{BoundingBox, GeoPoint};

/// Hectares per parcel used to estimate parcel counts
pub const HECTARES_PER_PARCEL: f64 = 50.0;

/// A labeled agricultural production area
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgriculturalZone {
    pub crop_type: String,
    /// Tons per hectare
    pub average_yield: f64,
    pub area_hectares: f64,
    pub bounding_box: BoundingBox,
    pub region_label: String,
}

impl AgriculturalZone {
    pub fn new(
        crop_type: &str,
        average_yield: f64,
        area_hectares: f64,
        bounding_box: BoundingBox,
        region_label: &str,
    ) -> Self {
        Self {
            crop_type: crop_type.to_string(),
            average_yield,
            area_hectares,
            bounding_box,
            region_label: region_label.to_string(),
        }
    }

    /// Estimated parcel count (~50 ha each)
    pub fn parcels(&self) -> u64 {
        (self.area_hectares / HECTARES_PER_PARCEL).floor().max(0.0) as u64
    }
}

/// Immutable table of zones, loaded once and shared
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ZoneTable {
    zones: Vec<AgriculturalZone>,
}

impl ZoneTable {
    pub fn new(zones: Vec<AgriculturalZone>) -> Self {
        Self { zones }
    }

    /// Parse a JSON array of zones
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn zones(&self) -> &[AgriculturalZone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// All zones whose box contains the point, in table order
    pub fn match_point(&self, point: GeoPoint) -> Vec<&AgriculturalZone> {
        self.zones
            .iter()
            .filter(|zone| zone.bounding_box.contains(point))
            .collect()
    }

    /// Built-in Burkina Faso table
    pub fn burkina_faso() -> Self {
        const HAUTS_BASSINS: BoundingBox = BoundingBox::new(-4.5, -3.8, 11.0, 11.6);
        const BOUCLE_DU_MOUHOUN: BoundingBox = BoundingBox::new(-3.8, -2.8, 11.8, 12.8);
        const CASCADES: BoundingBox = BoundingBox::new(-5.2, -4.5, 10.2, 10.9);
        const CENTRE: BoundingBox = BoundingBox::new(-1.8, -1.0, 12.1, 12.6);
        const CENTRE_NORD: BoundingBox = BoundingBox::new(-1.5, -0.5, 12.8, 13.5);
        const NORD: BoundingBox = BoundingBox::new(-2.8, -2.0, 13.2, 13.8);
        const SAHEL: BoundingBox = BoundingBox::new(-0.5, 1.0, 13.8, 14.5);
        const EST: BoundingBox = BoundingBox::new(0.0, 1.2, 11.8, 12.5);
        const SUD_OUEST: BoundingBox = BoundingBox::new(-3.5, -2.8, 10.0, 10.8);
        const CENTRE_EST: BoundingBox = BoundingBox::new(-0.8, 0.2, 11.2, 12.0);
        const RICE_WEST: BoundingBox = BoundingBox::new(-4.8, -4.0, 10.8, 11.4);
        const RICE_CENTRE_SUD: BoundingBox = BoundingBox::new(-1.5, -0.8, 11.5, 12.2);

        Self::new(vec![
            AgriculturalZone::new("Cotton", 1.2, 185_000.0, HAUTS_BASSINS, "Hauts-Bassins"),
            AgriculturalZone::new("Maize", 2.1, 95_000.0, HAUTS_BASSINS, "Hauts-Bassins"),
            AgriculturalZone::new("Cotton", 1.3, 165_000.0, BOUCLE_DU_MOUHOUN, "Boucle du Mouhoun"),
            AgriculturalZone::new("Maize", 1.9, 78_000.0, BOUCLE_DU_MOUHOUN, "Boucle du Mouhoun"),
            AgriculturalZone::new("Sorghum", 1.1, 52_000.0, BOUCLE_DU_MOUHOUN, "Boucle du Mouhoun"),
            AgriculturalZone::new("Cotton", 1.4, 45_000.0, CASCADES, "Cascades"),
            AgriculturalZone::new("Mango", 8.5, 12_000.0, CASCADES, "Cascades"),
            AgriculturalZone::new("Sugarcane", 45.0, 8_500.0, CASCADES, "Cascades"),
            AgriculturalZone::new("Maize", 1.8, 42_000.0, CENTRE, "Centre"),
            AgriculturalZone::new("Sorghum", 1.2, 38_000.0, CENTRE, "Centre"),
            AgriculturalZone::new("Cowpea", 0.6, 15_000.0, CENTRE, "Centre"),
            AgriculturalZone::new("Millet", 0.9, 125_000.0, CENTRE_NORD, "Centre-Nord"),
            AgriculturalZone::new("Sorghum", 1.0, 85_000.0, CENTRE_NORD, "Centre-Nord"),
            AgriculturalZone::new("Groundnut", 0.8, 32_000.0, CENTRE_NORD, "Centre-Nord"),
            AgriculturalZone::new("Millet", 0.8, 98_000.0, NORD, "Nord"),
            AgriculturalZone::new("Sorghum", 0.9, 72_000.0, NORD, "Nord"),
            AgriculturalZone::new("Groundnut", 0.9, 28_000.0, NORD, "Nord"),
            AgriculturalZone::new("Millet", 0.5, 45_000.0, SAHEL, "Sahel"),
            AgriculturalZone::new("Cowpea", 0.4, 18_000.0, SAHEL, "Sahel"),
            AgriculturalZone::new("Sesame", 0.5, 35_000.0, EST, "Est"),
            AgriculturalZone::new("Millet", 1.0, 65_000.0, EST, "Est"),
            AgriculturalZone::new("Sorghum", 1.1, 42_000.0, EST, "Est"),
            AgriculturalZone::new("Cotton", 1.3, 78_000.0, SUD_OUEST, "Sud-Ouest"),
            AgriculturalZone::new("Millet", 1.2, 48_000.0, SUD_OUEST, "Sud-Ouest"),
            AgriculturalZone::new("Maize", 1.8, 35_000.0, SUD_OUEST, "Sud-Ouest"),
            AgriculturalZone::new("Sorghum", 1.1, 58_000.0, CENTRE_EST, "Centre-Est"),
            AgriculturalZone::new("Millet", 1.0, 52_000.0, CENTRE_EST, "Centre-Est"),
            AgriculturalZone::new("Irrigated rice", 4.5, 28_000.0, RICE_WEST, "Sud-Ouest"),
            AgriculturalZone::new("Irrigated rice", 4.2, 15_000.0, RICE_CENTRE_SUD, "Centre-Sud"),
        ])
    }
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self::burkina_faso()
    }
}

/// Per-crop line of the agriculture statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CropBreakdown {
    pub crop_type: String,
    pub surface_hectares: f64,
    pub average_yield: f64,
    pub parcels: u64,
}

/// Aggregate statistics over matched zones
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AgricultureStats {
    pub total_surface: f64,
    pub crop_breakdown: Vec<CropBreakdown>,
    pub average_yield: f64,
    pub total_parcels: u64,
}

impl AgricultureStats {
    pub fn from_zones(zones: &[&AgriculturalZone]) -> Self {
        let crop_breakdown: Vec<CropBreakdown> = zones
            .iter()
            .map(|zone| CropBreakdown {
                crop_type: zone.crop_type.clone(),
                surface_hectares: zone.area_hectares,
                average_yield: zone.average_yield,
                parcels: zone.parcels(),
            })
            .collect();

        let average_yield = if zones.is_empty() {
            0.0
        } else {
            zones.iter().map(|z| z.average_yield).sum::<f64>() / zones.len() as f64
        };

        Self {
            total_surface: zones.iter().map(|z| z.area_hectares).sum(),
            total_parcels: crop_breakdown.iter().map(|c| c.parcels).sum(),
            crop_breakdown,
            average_yield,
        }
    }

    /// Distinct crop types in first-seen order
    pub fn crop_types(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for crop in &self.crop_breakdown {
            if !seen.contains(&crop.crop_type.as_str()) {
                seen.push(&crop.crop_type);
            }
        }
        seen
    }
}
