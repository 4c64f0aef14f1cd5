//! # Zoning Rule Registry
//!
//! Lookup tables translating development-type / area-type / street-type
//! enumerations into numeric limits.
//!
//! - `types` - street and development enumerations (lenient parsing)
//! - `ruleset` - the [`ZoningRuleSet`] value and its municipal defaults
//!
//! Components take a `ZoningRuleSet` by value at construction. The free
//! functions below read the process-wide municipal ordinance and exist for
//! callers that do not care about jurisdictions.

mod ruleset;
mod types;

pub use ruleset::{
    DensityCaps, LayoutSpacing, LotSizeMinimums, OpenSpaceRule, OptimizerSettings, SetbackTable,
    StreetWidthTable, ZoningRuleSet, COLLECTOR_SETBACK_FT, COLLECTOR_WIDTH_FT, DEFAULT_SITE_EFFICIENCY,
    INTERNAL_STREET_THRESHOLD_ACRES, LOCAL_SETBACK_FT, LOCAL_WIDTH_FT,
    MAJOR_THOROUGHFARE_SETBACK_FT, MAJOR_THOROUGHFARE_WIDTH_FT, MAX_LOT_COVERAGE,
    MIN_LOT_WIDTH_FT, MULTI_FAMILY_MAX_DENSITY, OPEN_SPACE_PER_LOT_SQFT,
    OPEN_SPACE_UNIT_DEPTH_FT, OPEN_SPACE_UNIT_WIDTH_FT, OPEN_SPACE_WIDTH_MULTIPLIER,
    RULESET_ENV_VAR, SHARED_DRIVEWAY_SETBACK_FT, SHARED_DRIVEWAY_WIDTH_FT,
    SINGLE_FAMILY_MAX_DENSITY, SQFT_PER_ACRE, SUBURBAN_MIN_LOT_SIZE_SQFT,
    URBAN_MIN_LOT_SIZE_SQFT,
};
pub use types::{DevelopmentType, StreetType};

use once_cell::sync::Lazy;

static MUNICIPAL: Lazy<ZoningRuleSet> = Lazy::new(ZoningRuleSet::municipal);

/// The shared municipal ordinance.
pub fn municipal() -> &'static ZoningRuleSet {
    &MUNICIPAL
}

pub fn setback(street: StreetType) -> f64 {
    MUNICIPAL.setback(street)
}

pub fn street_width(street: StreetType) -> f64 {
    MUNICIPAL.street_width(street)
}

pub fn min_lot_size(is_urban: bool) -> f64 {
    MUNICIPAL.min_lot_size(is_urban)
}

pub fn max_density(development: DevelopmentType) -> f64 {
    MUNICIPAL.max_density(development)
}
