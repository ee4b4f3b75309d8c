//! Size Catalog - The Fixed Icon Set
//!
//! Every image the iOS AppIcon set must contain. Adding a required size is a
//! data-only change: append a row.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform usage category for an icon size
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Idiom {
    Iphone,
    Ipad,
    IosMarketing,
}

impl Idiom {
    pub fn as_str(&self) -> &'static str {
        match self {
            Idiom::Iphone => "iphone",
            Idiom::Ipad => "ipad",
            Idiom::IosMarketing => "ios-marketing",
        }
    }
}

impl fmt::Display for Idiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog row: a square raster of `dimension` pixels
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SizeSpec {
    pub dimension: u32,
    pub idiom: Idiom,
    /// `<base>x<base>@<factor>x`, or `<base>x<base>` for an implicit 1x
    pub descriptor: &'static str,
}

impl SizeSpec {
    pub const fn new(dimension: u32, idiom: Idiom, descriptor: &'static str) -> Self {
        Self { dimension, idiom, descriptor }
    }
}

/// Named, versioned, immutable table of size specs
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Catalog {
    pub name: &'static str,
    pub version: u32,
    pub entries: &'static [SizeSpec],
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'static, SizeSpec> {
        self.entries.iter()
    }
}

impl IntoIterator for &Catalog {
    type Item = &'static SizeSpec;
    type IntoIter = std::slice::Iter<'static, SizeSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// iOS app icon set, as consumed by Xcode's `AppIcon.appiconset`
pub const IOS_APP_ICON: Catalog = Catalog {
    name: "ios-app-icon",
    version: 1,
    entries: &[
        SizeSpec::new(1024, Idiom::IosMarketing, "1024x1024"),
        SizeSpec::new(180, Idiom::Iphone, "60x60@3x"),
        SizeSpec::new(120, Idiom::Iphone, "60x60@2x"),
        SizeSpec::new(120, Idiom::Iphone, "40x40@3x"),
        SizeSpec::new(87, Idiom::Iphone, "29x29@3x"),
        SizeSpec::new(80, Idiom::Iphone, "40x40@2x"),
        SizeSpec::new(76, Idiom::Ipad, "76x76@1x"),
        SizeSpec::new(60, Idiom::Iphone, "20x20@3x"),
        SizeSpec::new(58, Idiom::Iphone, "29x29@2x"),
        SizeSpec::new(40, Idiom::Iphone, "20x20@2x"),
        SizeSpec::new(40, Idiom::Ipad, "20x20@2x"),
        SizeSpec::new(29, Idiom::Iphone, "29x29@1x"),
        SizeSpec::new(20, Idiom::Iphone, "20x20@1x"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ios_catalog_has_thirteen_rows() {
        assert_eq!(IOS_APP_ICON.len(), 13);
        assert!(!IOS_APP_ICON.is_empty());
    }

    #[test]
    fn test_catalog_order_is_stable() {
        let first = IOS_APP_ICON.entries.first().unwrap();
        let last = IOS_APP_ICON.entries.last().unwrap();
        assert_eq!(*first, SizeSpec::new(1024, Idiom::IosMarketing, "1024x1024"));
        assert_eq!(*last, SizeSpec::new(20, Idiom::Iphone, "20x20@1x"));
    }

    #[test]
    fn test_catalog_allows_shared_dimensions() {
        let at_120 = IOS_APP_ICON.iter().filter(|s| s.dimension == 120).count();
        let at_40 = IOS_APP_ICON.iter().filter(|s| s.dimension == 40).count();
        assert_eq!(at_120, 2);
        assert_eq!(at_40, 2);
    }

    #[test]
    fn test_idiom_serializes_kebab_case() {
        let json = serde_json::to_string(&Idiom::IosMarketing).unwrap();
        assert_eq!(json, r#""ios-marketing""#);
        assert_eq!(Idiom::Ipad.to_string(), "ipad");
    }
}
