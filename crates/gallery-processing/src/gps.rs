//! GPS coordinates from EXIF

use std::io::Cursor;

use exif::{In, Rational, Reader, Tag, Value};
use gallery_core::models::GeoLocation;

/// Read the GPS position stored in a photo's EXIF block, if it has one.
pub fn extract_gps(data: &[u8]) -> Option<GeoLocation> {
    let exif = match Reader::new().read_from_container(&mut Cursor::new(data)) {
        Ok(exif) => exif,
        Err(e) => {
            tracing::debug!(error = %e, "No readable EXIF data");
            return None;
        }
    };

    let coordinate = |value_tag: Tag, ref_tag: Tag| -> Option<f64> {
        let field = exif.get_field(value_tag, In::PRIMARY)?;
        let Value::Rational(ref parts) = field.value else {
            return None;
        };
        let reference = exif
            .get_field(ref_tag, In::PRIMARY)
            .and_then(|f| match f.value {
                Value::Ascii(ref values) => values.first().and_then(|v| v.first()).copied(),
                _ => None,
            });
        dms_to_decimal(parts, reference)
    };

    let latitude = coordinate(Tag::GPSLatitude, Tag::GPSLatitudeRef)?;
    let longitude = coordinate(Tag::GPSLongitude, Tag::GPSLongitudeRef)?;

    Some(GeoLocation {
        latitude,
        longitude,
    })
}

/// Degrees/minutes/seconds to signed decimal degrees. `S` and `W` references are negative.
fn dms_to_decimal(parts: &[Rational], reference: Option<u8>) -> Option<f64> {
    let component = |index: usize| -> Option<f64> {
        let part = parts.get(index)?;
        if part.denom == 0 {
            return None;
        }
        Some(part.to_f64())
    };

    let degrees = component(0)?;
    let minutes = component(1).unwrap_or(0.0);
    let seconds = component(2).unwrap_or(0.0);
    let value = degrees + minutes / 60.0 + seconds / 3600.0;

    match reference {
        Some(b'S') | Some(b'W') => Some(-value),
        _ => Some(value),
    }
}
