//! Site analysis export payload.
//!
//! Combines the raw inputs, the compliance report for the generated plan and
//! an optimization summary into one serializable value. The document export
//! service that consumes it lives outside this crate.

use crate::compliance::{ComplianceEvaluator, ComplianceResult};
use crate::error::{ParameterError, Result};
use crate::generator::LayoutGenerator;
use crate::optimizer::{LayoutOptimizer, StopReason};
use crate::plan::{SiteParameters, SitePlan, SitePlanStatistics};
use crate::rules::{ZoningRuleSet, SQFT_PER_ACRE};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Raw inputs as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInputs {
    #[serde(flatten)]
    pub parameters: SiteParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_units: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationSummary {
    pub recommended_units: u32,
    /// Units per acre
    pub recommended_density: f64,
    /// Average lot size of the recommended layout (sq ft)
    pub recommended_lot_size: f64,
    /// Gross site area (sq ft)
    pub total_sq_ft: f64,
    /// Refinement steps taken to reach the recommendation
    pub iterations: u32,
    /// Why refinement stopped
    pub stop_reason: StopReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnalysis {
    pub plan_id: String,
    /// RFC 3339 timestamp of the analysed plan
    pub generated_at: String,
    pub rule_set: String,
    pub inputs: AnalysisInputs,
    pub statistics: SitePlanStatistics,
    pub compliance: ComplianceResult,
    pub optimization: OptimizationSummary,
    /// Planning benchmark for efficiency (%); informational
    pub benchmark_efficiency: f64,
}

impl SiteAnalysis {
    /// Validate the inputs, generate, evaluate and refine.
    pub fn build(
        params: &SiteParameters,
        proposed_units: Option<u32>,
        rules: &ZoningRuleSet,
    ) -> Result<Self> {
        params.validate()?;
        if proposed_units == Some(0) {
            return Err(ParameterError::MissingProposedUnits.into());
        }

        let plan = LayoutGenerator::new(rules.clone()).generate(params);
        Ok(Self::from_plan(&plan, proposed_units, rules))
    }

    /// Analyse an already generated plan.
    pub fn from_plan(plan: &SitePlan, proposed_units: Option<u32>, rules: &ZoningRuleSet) -> Self {
        let compliance = ComplianceEvaluator::new(rules.clone()).evaluate(plan);
        let outcome = LayoutOptimizer::new(rules.clone()).refine(plan);
        let recommended = &outcome.plan.statistics;

        SiteAnalysis {
            plan_id: plan.id.to_string(),
            generated_at: plan.created_at.to_rfc3339(),
            rule_set: plan.rule_set.clone(),
            inputs: AnalysisInputs {
                parameters: plan.parameters.clone(),
                proposed_units,
            },
            statistics: plan.statistics,
            compliance,
            optimization: OptimizationSummary {
                recommended_units: recommended.total_lots,
                recommended_density: recommended.density,
                recommended_lot_size: recommended.avg_lot_size,
                total_sq_ft: (plan.parameters.area * SQFT_PER_ACRE).max(0.0),
                iterations: outcome.iterations,
                stop_reason: outcome.stop_reason,
            },
            benchmark_efficiency: rules.site_efficiency * 100.0,
        }
    }

    /// JSON schema of the export payload.
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(SiteAnalysis)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
