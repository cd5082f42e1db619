//! Validation utilities for water monitoring inputs

use crate::models::GeometryInput;

/// Validate a longitude in WGS84 degrees
pub fn validate_longitude(longitude: f64) -> Result<(), &'static str> {
    if !longitude.is_finite() {
        return Err("Longitude must be a finite number");
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a latitude in WGS84 degrees
pub fn validate_latitude(latitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() {
        return Err("Latitude must be a finite number");
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    Ok(())
}

/// Validate a geographic position
pub fn validate_coordinates(longitude: f64, latitude: f64) -> Result<(), &'static str> {
    validate_longitude(longitude)?;
    validate_latitude(latitude)
}

/// Check that a geometry carries a usable polygon or point
///
/// The analysis endpoint does not call this: a shapeless geometry is
/// analyzed at (0, 0). Clients use it to warn before submitting.
pub fn validate_geometry(geometry: &GeometryInput) -> Result<(), &'static str> {
    if let Some(rings) = &geometry.rings {
        let ring = rings.first().ok_or("Polygon has no rings")?;
        let vertices = ring.iter().filter(|p| p.len() >= 2).count();
        if vertices < 3 {
            return Err("Polygon ring needs at least 3 vertices");
        }
        if ring.iter().flatten().any(|v| !v.is_finite()) {
            return Err("Polygon coordinates must be finite numbers");
        }
        return Ok(());
    }

    match (geometry.x, geometry.y) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Ok(()),
        (Some(_), Some(_)) => Err("Point coordinates must be finite numbers"),
        _ => Err("Geometry must have rings or x/y coordinates"),
    }
}

/// Validate a tag: 1-40 chars, letters, digits, '-' or '_'
pub fn validate_tag(tag: &str) -> Result<(), &'static str> {
    if tag.is_empty() {
        return Err("Tag cannot be empty");
    }
    if tag.chars().count() > 40 {
        return Err("Tag must be at most 40 characters");
    }
    if !tag.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Err("Tag may only contain letters, digits, '-' and '_'");
    }
    Ok(())
}

/// Trim, lowercase and deduplicate tags, preserving first-seen order
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(-1.5584, 12.2395).is_ok());
        assert!(validate_coordinates(180.0, -90.0).is_ok());
        assert!(validate_coordinates(180.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, 90.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_validate_geometry_polygon() {
        let ok = GeometryInput::polygon(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
        assert!(validate_geometry(&ok).is_ok());

        let short = GeometryInput::polygon(vec![[0.0, 0.0], [1.0, 0.0]]);
        assert!(validate_geometry(&short).is_err());

        let no_rings = GeometryInput {
            rings: Some(vec![]),
            ..GeometryInput::default()
        };
        assert!(validate_geometry(&no_rings).is_err());
    }

    #[test]
    fn test_validate_geometry_point() {
        assert!(validate_geometry(&GeometryInput::point(1.0, 2.0)).is_ok());
        assert!(validate_geometry(&GeometryInput::point(f64::INFINITY, 2.0)).is_err());
        assert!(validate_geometry(&GeometryInput::default()).is_err());
    }

    #[test]
    fn test_validate_tag() {
        assert!(validate_tag("saison-seche").is_ok());
        assert!(validate_tag("barrage_2024").is_ok());
        assert!(validate_tag("").is_err());
        assert!(validate_tag("two words").is_err());
        assert!(validate_tag(&"x".repeat(41)).is_err());
    }

    #[test]
    fn test_normalize_tags() {
        let tags = vec![
            " Drought ".to_string(),
            "drought".to_string(),
            "".to_string(),
            "Reservoir".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["drought", "reservoir"]);
    }
}
