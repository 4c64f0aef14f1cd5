//! # Layout Optimizer
//!
//! Pushes density toward the cap by shrinking the target lot size, never below
//! the legal minimum.
//!
//! - [`LayoutOptimizer::optimize`] performs one greedy step.
//! - [`LayoutOptimizer::refine`] repeats that step until density reaches the
//!   target share of the cap, the lot size hits the floor, a step stops paying
//!   off, or the iteration bound is reached.

use crate::generator::LayoutGenerator;
use crate::plan::SitePlan;
use crate::rules::ZoningRuleSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Why [`LayoutOptimizer::refine`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StopReason {
    /// Density reached the target share of the cap
    TargetReached,
    /// Target lot size is already the legal minimum
    MinimumLotSize,
    /// Last step gained less density than the configured minimum
    DiminishingReturns,
    /// Iteration bound reached
    IterationLimit,
}

#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    /// Densest plan found
    pub plan: SitePlan,
    /// Number of regenerations performed
    pub iterations: u32,
    pub stop_reason: StopReason,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutOptimizer {
    generator: LayoutGenerator,
}

impl LayoutOptimizer {
    pub fn new(rules: ZoningRuleSet) -> Self {
        Self {
            generator: LayoutGenerator::new(rules),
        }
    }

    fn rules(&self) -> &ZoningRuleSet {
        self.generator.rules()
    }

    /// Density below which a plan is worth optimizing.
    pub fn density_target(&self, plan: &SitePlan) -> f64 {
        self.rules().optimizer.density_target_ratio
            * self.rules().max_density(plan.parameters.development_type)
    }

    /// One greedy step: regenerate with a smaller target lot size when the
    /// plan is below the density target, otherwise return the plan as is.
    ///
    /// A dense plan whose target lot size is below the legal minimum is
    /// regenerated at the minimum instead. The layout is unchanged (lots were
    /// already sized at the minimum) but the returned target is legal.
    pub fn optimize(&self, plan: &SitePlan) -> SitePlan {
        let params = &plan.parameters;
        let floor = self.rules().min_lot_size(params.is_urban);

        if plan.statistics.density >= self.density_target(plan) {
            if params.target_lot_size >= floor {
                return plan.clone();
            }
            tracing::debug!(
                from = params.target_lot_size,
                to = floor,
                "raising target lot size to the legal minimum"
            );
            return self.generator.generate(&params.with_target_lot_size(floor));
        }

        let reduced = (params.target_lot_size * self.rules().optimizer.lot_size_step).max(floor);

        tracing::debug!(
            from = params.target_lot_size,
            to = reduced,
            density = plan.statistics.density,
            "shrinking target lot size"
        );
        self.generator.generate(&params.with_target_lot_size(reduced))
    }

    /// Bounded iterative refinement built from [`Self::optimize`].
    ///
    /// Steps that do not add density are kept walking (a smaller lot can open
    /// a new column later) but only a strictly denser plan replaces the best
    /// one, so ties keep the larger lots.
    pub fn refine(&self, plan: &SitePlan) -> OptimizationOutcome {
        let settings = self.rules().optimizer;
        let floor = self.rules().min_lot_size(plan.parameters.is_urban);
        let mut current = plan.clone();
        let mut best = plan.clone();
        let mut iterations = 0;

        let stop_reason = loop {
            if current.statistics.density >= self.density_target(&current) {
                break StopReason::TargetReached;
            }
            if current.parameters.target_lot_size <= floor {
                break StopReason::MinimumLotSize;
            }
            if iterations >= settings.max_iterations {
                break StopReason::IterationLimit;
            }

            let next = self.optimize(&current);
            iterations += 1;
            let gain = next.statistics.density - best.statistics.density;
            if gain > 0.0 {
                best = next.clone();
                if gain < settings.min_density_gain {
                    break StopReason::DiminishingReturns;
                }
            }
            current = next;
        };

        tracing::info!(
            iterations,
            ?stop_reason,
            density = best.statistics.density,
            target_lot_size = best.parameters.target_lot_size,
            "refined site plan"
        );

        OptimizationOutcome {
            plan: best,
            iterations,
            stop_reason,
        }
    }
}

/// One optimization step with the municipal ordinance.
pub fn optimize(plan: &SitePlan) -> SitePlan {
    LayoutOptimizer::new(crate::rules::municipal().clone()).optimize(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::plan::SiteParameters;
    use crate::rules::{DevelopmentType, StreetType};

    fn scenario() -> SiteParameters {
        SiteParameters {
            area: 1.0,
            width: 200.0,
            depth: 200.0,
            is_urban: false,
            street_type: StreetType::Local,
            development_type: DevelopmentType::SingleFamily,
            target_lot_size: 5_000.0,
        }
    }

    #[test]
    fn test_optimize_shrinks_lot_size_by_ten_percent() {
        let params = SiteParameters {
            target_lot_size: 8_000.0,
            ..scenario()
        };
        let plan = generate(&params);
        let optimized = optimize(&plan);
        assert!((optimized.parameters.target_lot_size - 7_200.0).abs() < 1e-9);
        assert_ne!(optimized.id, plan.id);
    }

    #[test]
    fn test_optimize_respects_minimum_lot_size() {
        let plan = generate(&scenario());
        let optimized = optimize(&plan);
        assert_eq!(optimized.parameters.target_lot_size, 5_000.0);
        assert!(optimized.statistics.avg_lot_size >= 5_000.0 - 1e-6);
    }

    #[test]
    fn test_optimize_leaves_dense_plans_alone() {
        // Tight cap: 0.15 acres allows floor(4.05) = 4 lots, density 26.7 >= 24.3
        let params = SiteParameters {
            area: 0.15,
            width: 400.0,
            depth: 400.0,
            ..scenario()
        };
        let plan = generate(&params);
        assert!(plan.statistics.density >= 0.9 * 27.0);

        let optimized = optimize(&plan);
        assert!(optimized.same_layout(&plan));
    }

    #[test]
    fn test_dense_plan_with_sub_minimum_target_gets_a_legal_target() {
        // Already at the cap, but the caller asked for 1,000 sq ft lots
        let params = SiteParameters {
            area: 0.15,
            width: 400.0,
            depth: 400.0,
            target_lot_size: 1_000.0,
            ..scenario()
        };
        let plan = generate(&params);
        assert!(plan.statistics.density >= 0.9 * 27.0);

        let optimized = optimize(&plan);
        assert_eq!(optimized.parameters.target_lot_size, 5_000.0);
        assert_eq!(optimized.lots, plan.lots);
        assert_eq!(optimized.statistics, plan.statistics);
    }

    #[test]
    fn test_optimize_does_not_iterate_on_its_own() {
        let params = SiteParameters {
            area: 3.0,
            width: 400.0,
            depth: 400.0,
            target_lot_size: 10_000.0,
            ..scenario()
        };
        let once = optimize(&generate(&params));
        let twice = optimize(&once);
        assert!((once.parameters.target_lot_size - 9_000.0).abs() < 1e-9);
        assert!((twice.parameters.target_lot_size - 8_100.0).abs() < 1e-9);
    }

    #[test]
    fn test_refine_walks_down_to_the_floor() {
        let params = SiteParameters {
            area: 3.0,
            width: 400.0,
            depth: 400.0,
            target_lot_size: 10_000.0,
            ..scenario()
        };
        let start = generate(&params);
        let outcome = LayoutOptimizer::default().refine(&start);

        assert!(outcome.iterations >= 1);
        assert!(outcome.iterations <= 10);
        assert!(outcome.plan.statistics.density >= start.statistics.density);
        assert!(outcome.plan.parameters.target_lot_size >= 5_000.0);
        assert!(outcome.plan.parameters.target_lot_size < 10_000.0);
    }

    #[test]
    fn test_refine_stops_immediately_at_floor() {
        let outcome = LayoutOptimizer::default().refine(&generate(&scenario()));
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.stop_reason, StopReason::MinimumLotSize);
    }

    #[test]
    fn test_refine_respects_iteration_limit() {
        let mut rules = ZoningRuleSet::municipal();
        rules.optimizer.max_iterations = 2;
        rules.optimizer.min_density_gain = 0.0;
        let params = SiteParameters {
            area: 3.0,
            width: 400.0,
            depth: 400.0,
            target_lot_size: 50_000.0,
            ..scenario()
        };
        let outcome = LayoutOptimizer::new(rules).refine(&generate(&params));
        assert_eq!(outcome.iterations, 2);
        assert_eq!(outcome.stop_reason, StopReason::IterationLimit);
        // 45,000 and 40,500 sq ft still fit one column of two lots: no gain
        assert_eq!(outcome.plan.parameters.target_lot_size, 50_000.0);
        assert_eq!(outcome.plan.statistics.total_lots, 2);
    }
}
