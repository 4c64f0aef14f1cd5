//! Zoning rule-set value.
//!
//! Every numeric limit the generator and evaluator consume lives here, so a
//! different jurisdiction (or a revised ordinance) is just another value. The
//! municipal ordinance is the default.
//!
//! ## Loading
//!
//! ```rust
//! use siteplan_core::rules::ZoningRuleSet;
//!
//! // Built-in municipal ordinance
//! let rules = ZoningRuleSet::municipal();
//! assert_eq!(rules.max_lot_coverage, 0.60);
//!
//! // From the SITEPLAN_RULESET file, or the municipal ordinance
//! let from_env = ZoningRuleSet::from_env_or_default();
//! # let _ = from_env;
//! ```
//!
//! Partial files are allowed: any field they omit keeps its municipal value.

use super::types::{DevelopmentType, StreetType};
use crate::error::{Result, SitePlanError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming a rule-set file (JSON or YAML).
pub const RULESET_ENV_VAR: &str = "SITEPLAN_RULESET";

// ============================================================================
// Municipal ordinance constants
// ============================================================================

pub const MAJOR_THOROUGHFARE_SETBACK_FT: f64 = 25.0;
pub const COLLECTOR_SETBACK_FT: f64 = 10.0;
pub const LOCAL_SETBACK_FT: f64 = 10.0;
pub const SHARED_DRIVEWAY_SETBACK_FT: f64 = 3.0;

pub const MAJOR_THOROUGHFARE_WIDTH_FT: f64 = 60.0;
pub const COLLECTOR_WIDTH_FT: f64 = 50.0;
pub const LOCAL_WIDTH_FT: f64 = 40.0;
pub const SHARED_DRIVEWAY_WIDTH_FT: f64 = 20.0;

pub const URBAN_MIN_LOT_SIZE_SQFT: f64 = 3_500.0;
pub const SUBURBAN_MIN_LOT_SIZE_SQFT: f64 = 5_000.0;

/// Single-family cap; applies to every type except multi-family.
pub const SINGLE_FAMILY_MAX_DENSITY: f64 = 27.0;
pub const MULTI_FAMILY_MAX_DENSITY: f64 = 30.0;

pub const MAX_LOT_COVERAGE: f64 = 0.60;
pub const OPEN_SPACE_PER_LOT_SQFT: f64 = 240.0;
pub const OPEN_SPACE_UNIT_WIDTH_FT: f64 = 20.0;
pub const OPEN_SPACE_UNIT_DEPTH_FT: f64 = 12.0;
pub const OPEN_SPACE_WIDTH_MULTIPLIER: f64 = 5.0;

/// Planning heuristic only; the generator does not consume it.
pub const DEFAULT_SITE_EFFICIENCY: f64 = 0.70;

pub const MIN_LOT_WIDTH_FT: f64 = 50.0;
pub const INTERNAL_STREET_THRESHOLD_ACRES: f64 = 5.0;

pub const SQFT_PER_ACRE: f64 = 43_560.0;

// ============================================================================
// Rule-set sections
// ============================================================================

/// Minimum setback by frontage street classification (ft).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetbackTable {
    pub major_thoroughfare: f64,
    pub collector: f64,
    pub local: f64,
    pub shared_driveway: f64,
}

impl Default for SetbackTable {
    fn default() -> Self {
        Self {
            major_thoroughfare: MAJOR_THOROUGHFARE_SETBACK_FT,
            collector: COLLECTOR_SETBACK_FT,
            local: LOCAL_SETBACK_FT,
            shared_driveway: SHARED_DRIVEWAY_SETBACK_FT,
        }
    }
}

impl SetbackTable {
    pub fn get(&self, street: StreetType) -> f64 {
        match street {
            StreetType::MajorThoroughfare => self.major_thoroughfare,
            StreetType::Collector => self.collector,
            StreetType::Local => self.local,
            StreetType::SharedDriveway => self.shared_driveway,
        }
    }

    fn values(&self) -> [f64; 4] {
        [self.major_thoroughfare, self.collector, self.local, self.shared_driveway]
    }
}

/// Right-of-way width by street classification (ft).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreetWidthTable {
    pub major_thoroughfare: f64,
    pub collector: f64,
    pub local: f64,
    pub shared_driveway: f64,
}

impl Default for StreetWidthTable {
    fn default() -> Self {
        Self {
            major_thoroughfare: MAJOR_THOROUGHFARE_WIDTH_FT,
            collector: COLLECTOR_WIDTH_FT,
            local: LOCAL_WIDTH_FT,
            shared_driveway: SHARED_DRIVEWAY_WIDTH_FT,
        }
    }
}

impl StreetWidthTable {
    pub fn get(&self, street: StreetType) -> f64 {
        match street {
            StreetType::MajorThoroughfare => self.major_thoroughfare,
            StreetType::Collector => self.collector,
            StreetType::Local => self.local,
            StreetType::SharedDriveway => self.shared_driveway,
        }
    }

    fn values(&self) -> [f64; 4] {
        [self.major_thoroughfare, self.collector, self.local, self.shared_driveway]
    }
}

/// Minimum lot size by area type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotSizeMinimums {
    pub urban: f64,
    pub suburban: f64,
}

impl Default for LotSizeMinimums {
    fn default() -> Self {
        Self {
            urban: URBAN_MIN_LOT_SIZE_SQFT,
            suburban: SUBURBAN_MIN_LOT_SIZE_SQFT,
        }
    }
}

/// Maximum dwelling units per acre by development type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityCaps {
    pub single_family: f64,
    pub multi_family: f64,
    pub townhome: f64,
    pub mixed_use: f64,
}

impl Default for DensityCaps {
    fn default() -> Self {
        Self {
            single_family: SINGLE_FAMILY_MAX_DENSITY,
            multi_family: MULTI_FAMILY_MAX_DENSITY,
            townhome: SINGLE_FAMILY_MAX_DENSITY,
            mixed_use: SINGLE_FAMILY_MAX_DENSITY,
        }
    }
}

/// Compensating open-space requirement and the shape of its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenSpaceRule {
    /// Required open space per lot (sq ft)
    pub per_lot_sqft: f64,
    /// Width of one open-space unit (ft)
    pub unit_width_ft: f64,
    /// Depth of one open-space unit (ft)
    pub unit_depth_ft: f64,
    /// Rectangle width = unit width × multiplier
    pub width_multiplier: f64,
}

impl Default for OpenSpaceRule {
    fn default() -> Self {
        Self {
            per_lot_sqft: OPEN_SPACE_PER_LOT_SQFT,
            unit_width_ft: OPEN_SPACE_UNIT_WIDTH_FT,
            unit_depth_ft: OPEN_SPACE_UNIT_DEPTH_FT,
            width_multiplier: OPEN_SPACE_WIDTH_MULTIPLIER,
        }
    }
}

impl OpenSpaceRule {
    pub fn rectangle_width(&self) -> f64 {
        self.unit_width_ft * self.width_multiplier
    }
}

/// Fixed spacing used when laying lots out on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSpacing {
    /// Gap between adjacent lots in a row (ft)
    pub lot_spacing_ft: f64,
    /// Gap between rows (ft)
    pub row_spacing_ft: f64,
    /// Footprint inset from each side lot line (ft)
    pub footprint_side_inset_ft: f64,
    /// Footprint inset from the front lot line (ft)
    pub footprint_front_inset_ft: f64,
    /// Total depth removed from the lot for the footprint (front + rear, ft)
    pub footprint_depth_inset_ft: f64,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        Self {
            lot_spacing_ft: 5.0,
            row_spacing_ft: 10.0,
            footprint_side_inset_ft: 5.0,
            footprint_front_inset_ft: 10.0,
            footprint_depth_inset_ft: 20.0,
        }
    }
}

/// Tuning for the density optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// Density share of the cap below which the optimizer acts
    pub density_target_ratio: f64,
    /// Lot-size multiplier applied per step
    pub lot_size_step: f64,
    /// Upper bound on refinement iterations
    pub max_iterations: u32,
    /// Refinement stops when a step gains less than this (units/acre)
    pub min_density_gain: f64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            density_target_ratio: 0.9,
            lot_size_step: 0.9,
            max_iterations: 10,
            min_density_gain: 0.01,
        }
    }
}

// ============================================================================
// ZoningRuleSet
// ============================================================================

/// Complete zoning ordinance consumed by the generator, evaluator and optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoningRuleSet {
    /// Jurisdiction / ordinance name, stamped onto generated plans
    pub name: String,
    pub setbacks: SetbackTable,
    pub street_widths: StreetWidthTable,
    pub min_lot_size: LotSizeMinimums,
    pub max_density: DensityCaps,
    /// Maximum share of the site covered by lots (0-1)
    pub max_lot_coverage: f64,
    pub open_space: OpenSpaceRule,
    /// Planning heuristic (0-1); carried for reporting, not enforced
    pub site_efficiency: f64,
    /// Narrowest lot the ordinance accepts (ft)
    pub min_lot_width_ft: f64,
    /// Parcels larger than this get an internal street (acres)
    pub internal_street_threshold_acres: f64,
    pub spacing: LayoutSpacing,
    pub optimizer: OptimizerSettings,
}

impl Default for ZoningRuleSet {
    fn default() -> Self {
        Self::municipal()
    }
}

impl ZoningRuleSet {
    /// The municipal ordinance.
    pub fn municipal() -> Self {
        Self {
            name: "municipal".to_string(),
            setbacks: SetbackTable::default(),
            street_widths: StreetWidthTable::default(),
            min_lot_size: LotSizeMinimums::default(),
            max_density: DensityCaps::default(),
            max_lot_coverage: MAX_LOT_COVERAGE,
            open_space: OpenSpaceRule::default(),
            site_efficiency: DEFAULT_SITE_EFFICIENCY,
            min_lot_width_ft: MIN_LOT_WIDTH_FT,
            internal_street_threshold_acres: INTERNAL_STREET_THRESHOLD_ACRES,
            spacing: LayoutSpacing::default(),
            optimizer: OptimizerSettings::default(),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Required setback from a street of the given classification (ft).
    pub fn setback(&self, street: StreetType) -> f64 {
        self.setbacks.get(street)
    }

    /// Right-of-way width of a street of the given classification (ft).
    pub fn street_width(&self, street: StreetType) -> f64 {
        self.street_widths.get(street)
    }

    /// Minimum lot size (sq ft).
    pub fn min_lot_size(&self, is_urban: bool) -> f64 {
        if is_urban {
            self.min_lot_size.urban
        } else {
            self.min_lot_size.suburban
        }
    }

    /// Maximum density (units/acre).
    pub fn max_density(&self, development: DevelopmentType) -> f64 {
        match development {
            DevelopmentType::SingleFamily => self.max_density.single_family,
            DevelopmentType::MultiFamily => self.max_density.multi_family,
            DevelopmentType::Townhome => self.max_density.townhome,
            DevelopmentType::MixedUse => self.max_density.mixed_use,
        }
    }

    /// Maximum lot coverage as a percentage (0-100).
    pub fn max_coverage_percent(&self) -> f64 {
        self.max_lot_coverage * 100.0
    }

    /// Required compensating open space for `lots` lots (sq ft).
    pub fn required_open_space(&self, lots: usize) -> f64 {
        lots as f64 * self.open_space.per_lot_sqft
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Load a rule set from a JSON or YAML file (chosen by extension).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let rules: ZoningRuleSet = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)?,
            _ => serde_json::from_str(&text)?,
        };
        rules.validate()?;
        tracing::info!(path = %path.display(), name = %rules.name, "loaded zoning rule set");
        Ok(rules)
    }

    /// Load from `SITEPLAN_RULESET`, or return the municipal ordinance.
    ///
    /// An unreadable or invalid file is logged and ignored.
    pub fn from_env_or_default() -> Self {
        Self::from_env_value(std::env::var(RULESET_ENV_VAR).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(path) if !path.is_empty() => Self::load(path).unwrap_or_else(|err| {
                tracing::warn!(%path, %err, "falling back to municipal rule set");
                Self::municipal()
            }),
            _ => Self::municipal(),
        }
    }

    /// Reject rule sets the generator cannot lay out sensibly.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SitePlanError::InvalidRuleSet(msg));

        if self.setbacks.values().iter().any(|v| !(*v >= 0.0)) {
            return invalid("setbacks must be non-negative".to_string());
        }
        if self.street_widths.values().iter().any(|v| !(*v > 0.0)) {
            return invalid("street widths must be positive".to_string());
        }
        if !(self.min_lot_size.urban > 0.0) || !(self.min_lot_size.suburban > 0.0) {
            return invalid("minimum lot sizes must be positive".to_string());
        }
        let caps = self.max_density;
        if [caps.single_family, caps.multi_family, caps.townhome, caps.mixed_use]
            .iter()
            .any(|v| !(*v > 0.0))
        {
            return invalid("density caps must be positive".to_string());
        }
        for (label, ratio) in [
            ("max_lot_coverage", self.max_lot_coverage),
            ("site_efficiency", self.site_efficiency),
            ("optimizer.density_target_ratio", self.optimizer.density_target_ratio),
            ("optimizer.lot_size_step", self.optimizer.lot_size_step),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return invalid(format!("{label} must be in (0, 1], got {ratio}"));
            }
        }
        if !(self.open_space.per_lot_sqft >= 0.0) || !(self.open_space.rectangle_width() > 0.0) {
            return invalid("open space rule must have a positive rectangle width".to_string());
        }
        if !(self.min_lot_width_ft > 0.0) {
            return invalid("min_lot_width_ft must be positive".to_string());
        }
        let spacing = self.spacing;
        for (label, value) in [
            ("internal_street_threshold_acres", self.internal_street_threshold_acres),
            ("spacing.lot_spacing_ft", spacing.lot_spacing_ft),
            ("spacing.row_spacing_ft", spacing.row_spacing_ft),
            ("spacing.footprint_side_inset_ft", spacing.footprint_side_inset_ft),
            ("spacing.footprint_front_inset_ft", spacing.footprint_front_inset_ft),
            ("spacing.footprint_depth_inset_ft", spacing.footprint_depth_inset_ft),
            ("optimizer.min_density_gain", self.optimizer.min_density_gain),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return invalid(format!("{label} must be a non-negative number, got {value}"));
            }
        }
        Ok(())
    }
}
