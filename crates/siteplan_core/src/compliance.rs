//! # Compliance Evaluator
//!
//! Validates a generated [`SitePlan`] against a [`ZoningRuleSet`].
//!
//! ## Checks
//! 1. Density <= cap for the development type
//! 2. Average lot size >= minimum for the area type
//! 3. Narrowest placed lot >= minimum lot width
//! 4. Smallest lot clearance to the parcel edges and frontage street >= setback
//! 5. Coverage <= maximum lot coverage
//! 6. Open space >= lots × per-lot requirement
//!
//! Lot width and setbacks are measured on the placed rectangles, so the report
//! stays correct even for layouts the generator did not produce. Checks that
//! depend on lots pass vacuously when the plan has none.

use crate::geometry::EPSILON;
use crate::plan::SitePlan;
use crate::rules::ZoningRuleSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One rule evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceCheck {
    pub compliant: bool,
    /// Measured value
    pub current: f64,
    /// Limit the measured value is compared against
    pub required: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResult {
    pub density: ComplianceCheck,
    pub lot_size: ComplianceCheck,
    pub lot_width: ComplianceCheck,
    pub setbacks: ComplianceCheck,
    pub coverage: ComplianceCheck,
    pub open_space: ComplianceCheck,
    pub overall_compliant: bool,
}

impl ComplianceResult {
    /// Checks in report order, with their labels.
    pub fn checks(&self) -> [(&'static str, &ComplianceCheck); 6] {
        [
            ("density", &self.density),
            ("lotSize", &self.lot_size),
            ("lotWidth", &self.lot_width),
            ("setbacks", &self.setbacks),
            ("coverage", &self.coverage),
            ("openSpace", &self.open_space),
        ]
    }

    /// Labels of failing checks.
    pub fn violations(&self) -> Vec<&'static str> {
        self.checks()
            .into_iter()
            .filter(|(_, check)| !check.compliant)
            .map(|(label, _)| label)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComplianceEvaluator {
    rules: ZoningRuleSet,
}

impl ComplianceEvaluator {
    pub fn new(rules: ZoningRuleSet) -> Self {
        Self { rules }
    }

    pub fn evaluate(&self, plan: &SitePlan) -> ComplianceResult {
        let density = self.check_density(plan);
        let lot_size = self.check_lot_size(plan);
        let lot_width = self.check_lot_width(plan);
        let setbacks = self.check_setbacks(plan);
        let coverage = self.check_coverage(plan);
        let open_space = self.check_open_space(plan);

        let overall_compliant = [&density, &lot_size, &lot_width, &setbacks, &coverage, &open_space]
            .iter()
            .all(|check| check.compliant);

        let result = ComplianceResult {
            density,
            lot_size,
            lot_width,
            setbacks,
            coverage,
            open_space,
            overall_compliant,
        };

        if !overall_compliant {
            tracing::warn!(plan = %plan.id, violations = ?result.violations(), "plan is not compliant");
        }
        result
    }

    fn check_density(&self, plan: &SitePlan) -> ComplianceCheck {
        let current = plan.statistics.density;
        let required = self.rules.max_density(plan.parameters.development_type);
        let compliant = current <= required + EPSILON;
        ComplianceCheck {
            compliant,
            current,
            required,
            message: format!(
                "Density {current:.2} units/acre {} the {required:.0} units/acre cap for {}",
                if compliant { "is within" } else { "exceeds" },
                plan.parameters.development_type,
            ),
        }
    }

    fn check_lot_size(&self, plan: &SitePlan) -> ComplianceCheck {
        let current = plan.statistics.avg_lot_size;
        let required = self.rules.min_lot_size(plan.parameters.is_urban);
        let area_type = if plan.parameters.is_urban { "urban" } else { "suburban" };
        if plan.lots.is_empty() {
            return vacuous(current, required, "No lots to check against the minimum lot size");
        }
        let compliant = current + EPSILON >= required;
        ComplianceCheck {
            compliant,
            current,
            required,
            message: format!(
                "Average lot size {current:.0} sq ft {} the {required:.0} sq ft {area_type} minimum",
                if compliant { "meets" } else { "is below" },
            ),
        }
    }

    fn check_lot_width(&self, plan: &SitePlan) -> ComplianceCheck {
        let required = self.rules.min_lot_width_ft;
        let Some(current) = plan
            .lots
            .iter()
            .map(|lot| lot.bounds.width)
            .min_by(f64::total_cmp)
        else {
            return vacuous(0.0, required, "No lots to check against the minimum lot width");
        };
        let compliant = current + EPSILON >= required;
        ComplianceCheck {
            compliant,
            current,
            required,
            message: format!(
                "Narrowest lot is {current:.1} ft wide ({} {required:.0} ft minimum)",
                if compliant { "meets the" } else { "below the" },
            ),
        }
    }

    fn check_setbacks(&self, plan: &SitePlan) -> ComplianceCheck {
        let required = self.rules.setback(plan.parameters.street_type);
        let Some(current) = min_lot_clearance(plan) else {
            return vacuous(0.0, required, "No lots to check against the setback");
        };
        let compliant = current + EPSILON >= required;
        ComplianceCheck {
            compliant,
            current,
            required,
            message: format!(
                "Smallest lot clearance is {current:.1} ft ({} {required:.0} ft {} setback)",
                if compliant { "meets the" } else { "below the" },
                plan.parameters.street_type,
            ),
        }
    }

    fn check_coverage(&self, plan: &SitePlan) -> ComplianceCheck {
        let current = plan.statistics.coverage;
        let required = self.rules.max_coverage_percent();
        let compliant = current <= required + EPSILON;
        ComplianceCheck {
            compliant,
            current,
            required,
            message: format!(
                "Lot coverage {current:.1}% {} the {required:.0}% maximum",
                if compliant { "is within" } else { "exceeds" },
            ),
        }
    }

    fn check_open_space(&self, plan: &SitePlan) -> ComplianceCheck {
        let current = plan.statistics.open_space_area;
        let required = self.rules.required_open_space(plan.statistics.total_lots as usize);
        let compliant = current + EPSILON >= required;
        ComplianceCheck {
            compliant,
            current,
            required,
            message: format!(
                "Open space {current:.0} sq ft {} the {required:.0} sq ft required for {} lots",
                if compliant { "meets" } else { "falls short of" },
                plan.statistics.total_lots,
            ),
        }
    }
}

/// Evaluate with the municipal ordinance.
pub fn evaluate(plan: &SitePlan) -> ComplianceResult {
    ComplianceEvaluator::new(crate::rules::municipal().clone()).evaluate(plan)
}

fn vacuous(current: f64, required: f64, message: &str) -> ComplianceCheck {
    ComplianceCheck {
        compliant: true,
        current,
        required,
        message: message.to_string(),
    }
}

/// Smallest distance from any lot to the parcel sides, the rear line, or the
/// far edge of the main-access street. Lots overlapping a boundary give a
/// negative clearance.
fn min_lot_clearance(plan: &SitePlan) -> Option<f64> {
    let parcel = plan.parcel();
    let frontage_edge = plan
        .main_access()
        .map(|street| street.bounds.bottom())
        .unwrap_or(parcel.y);

    plan.lots
        .iter()
        .map(|lot| {
            let b = &lot.bounds;
            [
                b.x - parcel.x,
                parcel.right() - b.right(),
                b.y - frontage_edge,
                parcel.bottom() - b.bottom(),
            ]
            .into_iter()
            .fold(f64::INFINITY, f64::min)
        })
        .min_by(f64::total_cmp)
}
