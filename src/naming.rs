//! Filename Derivation
//!
//! `icon-<dimension>.png` is a function of the pixel size alone, so catalog
//! rows sharing a dimension share one output file. That stays the default;
//! `Disambiguated` gives every row its own file.

use serde::{Deserialize, Serialize};

use crate::catalog::SizeSpec;
use crate::descriptor::split_descriptor;

/// `icon-<dimension>.png`
pub fn derive_filename(dimension: u32) -> String {
    format!("icon-{}.png", dimension)
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilenamePolicy {
    /// One file per pixel size; later writes overwrite earlier ones
    #[default]
    Dimension,
    /// One file per catalog row: `icon-<idiom>-<size>@<scale>.png`
    Disambiguated,
}

impl FilenamePolicy {
    pub fn filename(&self, spec: &SizeSpec) -> String {
        match self {
            FilenamePolicy::Dimension => derive_filename(spec.dimension),
            FilenamePolicy::Disambiguated => {
                let parts = split_descriptor(spec.descriptor, spec.dimension);
                format!("icon-{}-{}@{}.png", spec.idiom, parts.size, parts.scale)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Idiom, IOS_APP_ICON};
    use std::collections::HashSet;

    #[test]
    fn test_derive_filename() {
        assert_eq!(derive_filename(120), "icon-120.png");
        assert_eq!(derive_filename(1024), "icon-1024.png");
    }

    #[test]
    fn test_dimension_policy_collides_on_shared_size() {
        let a = SizeSpec::new(120, Idiom::Iphone, "60x60@2x");
        let b = SizeSpec::new(120, Idiom::Iphone, "40x40@3x");
        let policy = FilenamePolicy::Dimension;
        assert_eq!(policy.filename(&a), "icon-120.png");
        assert_eq!(policy.filename(&a), policy.filename(&b));
    }

    #[test]
    fn test_disambiguated_policy_is_unique_over_catalog() {
        let policy = FilenamePolicy::Disambiguated;
        let names: HashSet<_> = IOS_APP_ICON.iter().map(|s| policy.filename(s)).collect();
        assert_eq!(names.len(), IOS_APP_ICON.len());
        assert!(names.contains("icon-iphone-60x60@2x.png"));
        assert!(names.contains("icon-ipad-20x20@2x.png"));
        assert!(names.contains("icon-ios-marketing-1024x1024@1x.png"));
    }

    #[test]
    fn test_dimension_policy_has_eleven_distinct_files() {
        let policy = FilenamePolicy::Dimension;
        let names: HashSet<_> = IOS_APP_ICON.iter().map(|s| policy.filename(s)).collect();
        assert_eq!(names.len(), 11);
    }
}
