//! Scale descriptor parsing

use serde::Serialize;

const SCALE_SEPARATOR: char = '@';
const IMPLICIT_SCALE: &str = "1x";

/// Logical size and pixel-density multiplier of one raster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeScale {
    pub size: String,
    pub scale: String,
}

/// Split `60x60@3x` into `60x60` / `3x`.
///
/// Descriptors without a scale part fall back to the full pixel size at 1x.
/// Only the first `@` separates; anything after it belongs to the scale.
pub fn split_descriptor(descriptor: &str, dimension: u32) -> SizeScale {
    match descriptor.split_once(SCALE_SEPARATOR) {
        Some((size, scale)) => SizeScale {
            size: size.to_string(),
            scale: scale.to_string(),
        },
        None => SizeScale {
            size: format!("{}x{}", dimension, dimension),
            scale: IMPLICIT_SCALE.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(size: &str, scale: &str) -> SizeScale {
        SizeScale { size: size.to_string(), scale: scale.to_string() }
    }

    #[test]
    fn test_split_with_scale() {
        assert_eq!(split_descriptor("60x60@3x", 180), pair("60x60", "3x"));
        assert_eq!(split_descriptor("76x76@1x", 76), pair("76x76", "1x"));
    }

    #[test]
    fn test_split_without_scale_uses_dimension() {
        assert_eq!(split_descriptor("1024x1024", 1024), pair("1024x1024", "1x"));
        // size comes from the dimension, not from the descriptor text
        assert_eq!(split_descriptor("whatever", 64), pair("64x64", "1x"));
    }

    #[test]
    fn test_split_uses_first_separator() {
        assert_eq!(split_descriptor("20x20@2x@3x", 40), pair("20x20", "2x@3x"));
    }

    #[test]
    fn test_split_empty_parts() {
        assert_eq!(split_descriptor("@", 10), pair("", ""));
    }
}
