//! Property-based tests over the generator, optimizer and evaluator.

use crate::compliance::evaluate;
use crate::generator::generate;
use crate::optimizer::optimize;
use crate::plan::SiteParameters;
use crate::rules::{self, DevelopmentType, StreetType};
use proptest::prelude::*;

pub fn street_type_strategy() -> impl Strategy<Value = StreetType> {
    prop_oneof![
        Just(StreetType::MajorThoroughfare),
        Just(StreetType::Collector),
        Just(StreetType::Local),
        Just(StreetType::SharedDriveway),
    ]
}

pub fn development_type_strategy() -> impl Strategy<Value = DevelopmentType> {
    prop_oneof![
        Just(DevelopmentType::SingleFamily),
        Just(DevelopmentType::MultiFamily),
        Just(DevelopmentType::Townhome),
        Just(DevelopmentType::MixedUse),
    ]
}

/// Valid parameters: positive area, frontage, depth and lot size.
pub fn site_parameters_strategy() -> impl Strategy<Value = SiteParameters> {
    (
        0.05f64..=20.0,     // area (acres)
        20.0f64..=1_500.0,  // width (ft)
        20.0f64..=1_500.0,  // depth (ft)
        any::<bool>(),      // is_urban
        street_type_strategy(),
        development_type_strategy(),
        500.0f64..=20_000.0, // target lot size (sq ft)
    )
        .prop_map(
            |(area, width, depth, is_urban, street_type, development_type, target_lot_size)| {
                SiteParameters {
                    area,
                    width,
                    depth,
                    is_urban,
                    street_type,
                    development_type,
                    target_lot_size,
                }
            },
        )
}

/// Parcels too small to hold a buildable rectangle.
pub fn degenerate_parameters_strategy() -> impl Strategy<Value = SiteParameters> {
    (site_parameters_strategy(), 0.0f64..=20.0).prop_map(|(params, width)| SiteParameters {
        width,
        ..params
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_density_never_exceeds_cap(params in site_parameters_strategy()) {
        let plan = generate(&params);
        let cap = rules::max_density(params.development_type);
        prop_assert!(plan.statistics.density <= cap + 1e-9);
    }

    #[test]
    fn prop_lots_meet_minimum_size(params in site_parameters_strategy()) {
        let plan = generate(&params);
        let min = rules::min_lot_size(params.is_urban);
        if plan.statistics.total_lots > 0 {
            prop_assert!(plan.statistics.avg_lot_size >= min * (1.0 - 1e-9));
        }
    }

    #[test]
    fn prop_open_space_covers_requirement(params in site_parameters_strategy()) {
        let plan = generate(&params);
        let required = rules::municipal().required_open_space(plan.lots.len());
        prop_assert!(plan.statistics.open_space_area + 1e-6 >= required);
    }

    #[test]
    fn prop_percentages_stay_in_range(params in site_parameters_strategy()) {
        let stats = generate(&params).statistics;
        prop_assert!((0.0..=100.0).contains(&stats.coverage));
        prop_assert!((0.0..=100.0).contains(&stats.efficiency));
    }

    #[test]
    fn prop_lots_do_not_overlap(params in site_parameters_strategy()) {
        let plan = generate(&params);
        for (i, a) in plan.lots.iter().enumerate() {
            for b in &plan.lots[i + 1..] {
                prop_assert!(!a.bounds.overlaps(&b.bounds), "lot {} overlaps lot {}", a.id, b.id);
            }
        }
    }

    #[test]
    fn prop_lots_stay_inside_the_parcel(params in site_parameters_strategy()) {
        let plan = generate(&params);
        let parcel = plan.parcel();
        for lot in &plan.lots {
            prop_assert!(parcel.contains(&lot.bounds), "lot {} leaves the parcel", lot.id);
        }
    }

    #[test]
    fn prop_generation_is_deterministic(params in site_parameters_strategy()) {
        prop_assert!(generate(&params).same_layout(&generate(&params)));
    }

    #[test]
    fn prop_optimize_respects_minimum_lot_size(params in site_parameters_strategy()) {
        let plan = generate(&params);
        let optimized = optimize(&plan);
        let min = rules::min_lot_size(params.is_urban);
        prop_assert!(optimized.grid.effective_lot_size >= min);
        prop_assert!(optimized.parameters.target_lot_size >= min);
    }

    #[test]
    fn prop_degenerate_parcels_have_no_lots(params in degenerate_parameters_strategy()) {
        let plan = generate(&params);
        prop_assert!(plan.lots.is_empty());
        prop_assert!(plan.open_spaces.is_empty());
        prop_assert!(plan.main_access().is_some());
    }

    #[test]
    fn prop_plans_without_lots_are_compliant(params in degenerate_parameters_strategy()) {
        prop_assert!(evaluate(&generate(&params)).overall_compliant);
    }
}
