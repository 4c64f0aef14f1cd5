use serde::{Deserialize, Serialize};

use crate::analysis::SiteAnalysis;
use crate::compliance::{ComplianceEvaluator, ComplianceResult};
use crate::error::{ParameterError, Result, SitePlanError};
use crate::generator::LayoutGenerator;
use crate::optimizer::LayoutOptimizer;
use crate::plan::{SiteParameters, SitePlan};
use crate::rules::ZoningRuleSet;
use crate::SCHEMA_VERSION;

/// How far to optimize the generated plan before responding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizeMode {
    #[default]
    None,
    /// One greedy step
    Single,
    /// Bounded iterative refinement
    Refine,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePlanRequest {
    pub schema_version: u8,
    pub parameters: SiteParameters,
    #[serde(default)]
    pub optimize: OptimizeMode,
    #[serde(default)]
    pub proposed_units: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePlanResponse {
    pub schema_version: u8,
    pub plan: SitePlan,
    pub compliance: ComplianceResult,
    pub analysis: SiteAnalysis,
}

/// Generate, optionally optimize, evaluate and analyse a site from a JSON
/// request, returning the JSON response.
pub fn plan_site_json(request_json: &str) -> Result<String> {
    plan_site_json_with_rules(request_json, &ZoningRuleSet::from_env_or_default())
}

pub fn plan_site_json_with_rules(request_json: &str, rules: &ZoningRuleSet) -> Result<String> {
    let request: SitePlanRequest = serde_json::from_str(request_json)?;
    let response = plan_site(&request, rules)?;
    Ok(serde_json::to_string(&response)?)
}

pub fn plan_site(request: &SitePlanRequest, rules: &ZoningRuleSet) -> Result<SitePlanResponse> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(SitePlanError::UnsupportedSchema {
            found: request.schema_version,
            expected: SCHEMA_VERSION,
        });
    }
    request.parameters.validate()?;
    if request.proposed_units == Some(0) {
        return Err(ParameterError::MissingProposedUnits.into());
    }

    let generated = LayoutGenerator::new(rules.clone()).generate(&request.parameters);
    let plan = match request.optimize {
        OptimizeMode::None => generated,
        OptimizeMode::Single => LayoutOptimizer::new(rules.clone()).optimize(&generated),
        OptimizeMode::Refine => LayoutOptimizer::new(rules.clone()).refine(&generated).plan,
    };

    let compliance = ComplianceEvaluator::new(rules.clone()).evaluate(&plan);
    let analysis = SiteAnalysis::from_plan(&plan, request.proposed_units, rules);

    Ok(SitePlanResponse {
        schema_version: SCHEMA_VERSION,
        plan,
        compliance,
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(optimize: &str) -> String {
        json!({
            "schemaVersion": 1,
            "parameters": {
                "area": 3.0,
                "width": 400.0,
                "depth": 400.0,
                "isUrban": false,
                "streetType": "local",
                "developmentType": "single-family",
                "targetLotSize": 10000.0
            },
            "optimize": optimize
        })
        .to_string()
    }

    #[test]
    fn test_plan_site_json_round_trip() {
        let rules = ZoningRuleSet::municipal();
        let out = plan_site_json_with_rules(&request("none"), &rules).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["schemaVersion"], 1);
        assert_eq!(parsed["plan"]["statistics"]["totalLots"], 9);
        assert_eq!(parsed["plan"]["streets"].as_array().unwrap().len(), 1);
        assert!(parsed["compliance"]["overallCompliant"].is_boolean());
        assert!(parsed["analysis"]["optimization"]["recommendedUnits"].is_number());
    }

    #[test]
    fn test_plan_site_json_uses_ambient_rule_set() {
        let out = plan_site_json(&request("none")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        let expected = ZoningRuleSet::from_env_or_default();

        assert_eq!(parsed["analysis"]["ruleSet"], expected.name.as_str());
        assert_eq!(parsed["plan"]["ruleSet"], expected.name.as_str());
        let explicit: serde_json::Value = serde_json::from_str(
            &plan_site_json_with_rules(&request("none"), &expected).unwrap(),
        )
        .unwrap();
        assert_eq!(parsed["plan"]["id"], explicit["plan"]["id"]);
        assert_eq!(parsed["plan"]["lots"], explicit["plan"]["lots"]);
    }

    #[test]
    fn test_optimize_modes_shrink_lot_size() {
        let rules = ZoningRuleSet::municipal();
        let single: serde_json::Value =
            serde_json::from_str(&plan_site_json_with_rules(&request("single"), &rules).unwrap())
                .unwrap();
        let target = single["plan"]["parameters"]["targetLotSize"].as_f64().unwrap();
        assert!((target - 9_000.0).abs() < 1e-9);

        let refined: serde_json::Value =
            serde_json::from_str(&plan_site_json_with_rules(&request("refine"), &rules).unwrap())
                .unwrap();
        let lots = refined["plan"]["statistics"]["totalLots"].as_u64().unwrap();
        assert!(lots >= 9);
    }

    #[test]
    fn test_wrong_schema_version_is_rejected() {
        let body = request("none").replace("\"schemaVersion\":1", "\"schemaVersion\":9");
        let err = plan_site_json_with_rules(&body, &ZoningRuleSet::municipal()).unwrap_err();
        assert!(matches!(err, SitePlanError::UnsupportedSchema { found: 9, expected: 1 }));
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let body = request("none").replace("\"width\":400.0", "\"width\":0.0");
        let err = plan_site_json_with_rules(&body, &ZoningRuleSet::municipal()).unwrap_err();
        assert!(matches!(
            err,
            SitePlanError::InvalidParameters(ParameterError::NonPositiveWidth(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_a_json_error() {
        let err = plan_site_json_with_rules("{ not json", &ZoningRuleSet::municipal()).unwrap_err();
        assert!(matches!(err, SitePlanError::Json(_)));
    }
}
