//! Zoning enumerations.
//!
//! Both enums deserialize leniently: an unrecognised string maps to the
//! documented default (`Local` street, `SingleFamily` development) so that a
//! lookup can never fail.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of the street a parcel fronts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum StreetType {
    MajorThoroughfare,
    Collector,
    #[default]
    Local,
    SharedDriveway,
}

impl StreetType {
    pub const ALL: [StreetType; 4] = [
        StreetType::MajorThoroughfare,
        StreetType::Collector,
        StreetType::Local,
        StreetType::SharedDriveway,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StreetType::MajorThoroughfare => "major-thoroughfare",
            StreetType::Collector => "collector",
            StreetType::Local => "local",
            StreetType::SharedDriveway => "shared-driveway",
        }
    }

    /// Parse a street type, falling back to `Local` for anything unknown.
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "major-thoroughfare" | "major" => StreetType::MajorThoroughfare,
            "collector" => StreetType::Collector,
            "shared-driveway" | "driveway" => StreetType::SharedDriveway,
            _ => StreetType::Local,
        }
    }
}

impl From<String> for StreetType {
    fn from(value: String) -> Self {
        StreetType::parse_lossy(&value)
    }
}

impl From<&str> for StreetType {
    fn from(value: &str) -> Self {
        StreetType::parse_lossy(value)
    }
}

impl fmt::Display for StreetType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target development type for the parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum DevelopmentType {
    #[default]
    SingleFamily,
    MultiFamily,
    Townhome,
    MixedUse,
}

impl DevelopmentType {
    pub const ALL: [DevelopmentType; 4] = [
        DevelopmentType::SingleFamily,
        DevelopmentType::MultiFamily,
        DevelopmentType::Townhome,
        DevelopmentType::MixedUse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DevelopmentType::SingleFamily => "single-family",
            DevelopmentType::MultiFamily => "multi-family",
            DevelopmentType::Townhome => "townhome",
            DevelopmentType::MixedUse => "mixed-use",
        }
    }

    /// Parse a development type, falling back to `SingleFamily` for anything unknown.
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "multi-family" | "multifamily" => DevelopmentType::MultiFamily,
            "townhome" | "townhouse" => DevelopmentType::Townhome,
            "mixed-use" | "mixeduse" => DevelopmentType::MixedUse,
            _ => DevelopmentType::SingleFamily,
        }
    }
}

impl From<String> for DevelopmentType {
    fn from(value: String) -> Self {
        DevelopmentType::parse_lossy(&value)
    }
}

impl From<&str> for DevelopmentType {
    fn from(value: &str) -> Self {
        DevelopmentType::parse_lossy(value)
    }
}

impl fmt::Display for DevelopmentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_street_type_round_trips_through_its_name() {
        for street in StreetType::ALL {
            assert_eq!(StreetType::parse_lossy(street.as_str()), street);
        }
    }

    #[test]
    fn test_unknown_street_type_falls_back_to_local() {
        assert_eq!(StreetType::parse_lossy("boulevard"), StreetType::Local);
        assert_eq!(StreetType::parse_lossy(""), StreetType::Local);
    }

    #[test]
    fn test_unknown_development_type_falls_back_to_single_family() {
        assert_eq!(DevelopmentType::parse_lossy("castle"), DevelopmentType::SingleFamily);
        assert_eq!(DevelopmentType::parse_lossy("Multi_Family"), DevelopmentType::MultiFamily);
    }

    #[test]
    fn test_serde_uses_kebab_case_and_lenient_decoding() {
        let json = serde_json::to_string(&StreetType::MajorThoroughfare).unwrap();
        assert_eq!(json, "\"major-thoroughfare\"");

        let parsed: StreetType = serde_json::from_str("\"alley\"").unwrap();
        assert_eq!(parsed, StreetType::Local);

        let parsed: DevelopmentType = serde_json::from_str("\"mixed-use\"").unwrap();
        assert_eq!(parsed, DevelopmentType::MixedUse);
    }
}
