//! Site plan data model.
//!
//! A [`SitePlan`] is a value: the generator builds it in one go and nothing
//! mutates it afterwards. Optimization produces a new plan.

use crate::error::ParameterError;
use crate::geometry::Rect;
use crate::rules::{DevelopmentType, StreetType};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Input to one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteParameters {
    /// Site area (acres)
    pub area: f64,
    /// Parcel frontage width (ft)
    pub width: f64,
    /// Parcel depth (ft)
    pub depth: f64,
    #[serde(default)]
    pub is_urban: bool,
    #[serde(default)]
    #[schemars(with = "String")]
    pub street_type: StreetType,
    #[serde(default)]
    #[schemars(with = "String")]
    pub development_type: DevelopmentType,
    /// Desired lot size (sq ft); raised to the legal minimum when smaller
    pub target_lot_size: f64,
}

impl SiteParameters {
    /// Check the inputs a caller must supply before generation.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.area > 0.0) {
            return Err(ParameterError::MissingArea(self.area));
        }
        if !(self.width > 0.0) {
            return Err(ParameterError::NonPositiveWidth(self.width));
        }
        if !(self.depth > 0.0) {
            return Err(ParameterError::NonPositiveDepth(self.depth));
        }
        if !(self.target_lot_size > 0.0) {
            return Err(ParameterError::NonPositiveLotSize(self.target_lot_size));
        }
        Ok(())
    }

    /// Same parameters with a different target lot size.
    pub fn with_target_lot_size(&self, target_lot_size: f64) -> Self {
        Self {
            target_lot_size,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    /// 0-based, in generation order
    pub id: u32,
    pub bounds: Rect,
    /// width × height of `bounds` (sq ft)
    pub area: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footprint: Option<Rect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreetRole {
    /// Runs along the frontage; every plan has exactly one
    MainAccess,
    /// Bisects the depth on larger sites
    Internal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Street {
    pub name: String,
    pub role: StreetRole,
    pub street_type: StreetType,
    pub bounds: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSpace {
    pub bounds: Rect,
    pub area: f64,
}

/// Intermediate grid sizing of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSummary {
    /// Legal density ceiling for the site
    pub max_units: u32,
    pub effective_lot_size: f64,
    pub usable_width: f64,
    pub usable_depth: f64,
    pub columns: u32,
    pub rows: u32,
    pub lot_width: f64,
    pub lot_depth: f64,
}

impl GridSummary {
    pub fn capacity(&self) -> u32 {
        self.columns.saturating_mul(self.rows)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SitePlanStatistics {
    pub total_lots: u32,
    /// Lots per acre
    pub density: f64,
    /// Mean lot area (sq ft)
    pub avg_lot_size: f64,
    /// Share of the site covered by lots (%)
    pub coverage: f64,
    /// Total open space (sq ft)
    pub open_space_area: f64,
    /// Share of the buildable envelope covered by lots (%)
    pub efficiency: f64,
}

/// Generated layout for one parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePlan {
    /// Derived from the parameters and rule set, stable across runs
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Name of the rule set the plan was generated under
    pub rule_set: String,
    pub parameters: SiteParameters,
    pub grid: GridSummary,
    pub lots: Vec<Lot>,
    pub streets: Vec<Street>,
    pub open_spaces: Vec<OpenSpace>,
    pub statistics: SitePlanStatistics,
}

impl SitePlan {
    pub fn main_access(&self) -> Option<&Street> {
        self.streets.iter().find(|s| s.role == StreetRole::MainAccess)
    }

    pub fn has_internal_street(&self) -> bool {
        self.streets.iter().any(|s| s.role == StreetRole::Internal)
    }

    /// Parcel outline.
    pub fn parcel(&self) -> Rect {
        Rect::new(0.0, 0.0, self.parameters.width, self.parameters.depth)
    }

    /// Same layout, ignoring the creation timestamp.
    pub fn same_layout(&self, other: &SitePlan) -> bool {
        self.id == other.id
            && self.rule_set == other.rule_set
            && self.parameters == other.parameters
            && self.lots == other.lots
            && self.streets == other.streets
            && self.open_spaces == other.open_spaces
            && self.statistics == other.statistics
    }
}
