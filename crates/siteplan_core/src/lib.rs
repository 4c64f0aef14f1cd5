//! # siteplan_core - Zoning Site-Plan Generator
//!
//! Generates a residential site layout (frontage street, optional internal
//! street, a grid of lots with building footprints, open space) from a
//! handful of parcel parameters, then scores it against a municipal zoning
//! ordinance.
//!
//! ## Features
//! - Deterministic generation (same parameters = same layout and plan id)
//! - Compliance report with one check per zoning rule
//! - Density optimizer that never goes below the legal lot size
//! - Injectable rule sets (JSON/YAML), municipal ordinance built in
//! - JSON API and a pan/zoom scene renderer with an SVG backend

pub mod analysis;
pub mod api;
pub mod compliance;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod optimizer;
pub mod plan;
pub mod rules;
pub mod view;

#[cfg(test)]
mod properties;

// Re-export main API functions
pub use api::{plan_site_json, OptimizeMode, SitePlanRequest, SitePlanResponse};
pub use error::{ParameterError, Result, SitePlanError};

pub use analysis::{OptimizationSummary, SiteAnalysis};
pub use compliance::{evaluate, ComplianceCheck, ComplianceEvaluator, ComplianceResult};
pub use generator::{generate, LayoutGenerator};
pub use geometry::Rect;
pub use optimizer::{optimize, LayoutOptimizer, OptimizationOutcome, StopReason};
pub use plan::{
    GridSummary, Lot, OpenSpace, SiteParameters, SitePlan, SitePlanStatistics, Street, StreetRole,
};
pub use rules::{DevelopmentType, StreetType, ZoningRuleSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the JSON request/response contract
pub const SCHEMA_VERSION: u8 = 1;
