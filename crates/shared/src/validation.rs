//! Common validation utilities.

use validator::ValidationError;

/// Maximum display name length.
const MAX_DISPLAY_NAME_LEN: usize = 50;

/// Maximum park or game name length.
const MAX_NAME_LEN: usize = 100;

lazy_static::lazy_static! {
    // Display names: letters, digits, spaces and a few separators.
    static ref DISPLAY_NAME_REGEX: regex::Regex =
        regex::Regex::new(r"^[\p{L}\p{N} ._'-]+$").unwrap();
}

/// Validates a user display name.
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_DISPLAY_NAME_LEN {
        let mut err = ValidationError::new("display_name_length");
        err.message = Some("Display name must be 1-50 characters".into());
        return Err(err);
    }
    if !DISPLAY_NAME_REGEX.is_match(trimmed) {
        let mut err = ValidationError::new("display_name_chars");
        err.message = Some("Display name contains invalid characters".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a park or game name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_NAME_LEN {
        let mut err = ValidationError::new("name_length");
        err.message = Some("Name must be 1-100 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

/// Validates a search radius in miles (0 exclusive to 100 inclusive).
pub fn validate_radius_miles(radius: f64) -> Result<(), ValidationError> {
    if radius > 0.0 && radius <= 100.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("radius_range");
        err.message = Some("Radius must be between 0 and 100 miles".into());
        Err(err)
    }
}

/// Normalizes an email address for storage and comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_display_name() {
        assert!(validate_display_name("Jordan").is_ok());
        assert!(validate_display_name("J. O'Neil-Park 23").is_ok());
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("   ").is_err());
        assert!(validate_display_name(&"x".repeat(51)).is_err());
        assert!(validate_display_name("no<script>").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Riverside Park").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"p".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_latitude() {
        assert!(validate_latitude(0.0).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(90.1).is_err());
        assert!(validate_latitude(-90.1).is_err());
    }

    #[test]
    fn test_validate_longitude() {
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(180.0).is_ok());
        assert!(validate_longitude(180.5).is_err());
    }

    #[test]
    fn test_validate_radius_miles() {
        assert!(validate_radius_miles(5.0).is_ok());
        assert!(validate_radius_miles(100.0).is_ok());
        assert!(validate_radius_miles(0.0).is_err());
        assert!(validate_radius_miles(101.0).is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Hooper@Example.COM "), "hooper@example.com");
    }
}
