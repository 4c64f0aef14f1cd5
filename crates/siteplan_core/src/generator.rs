//! # Site Layout Generator
//!
//! Turns [`SiteParameters`] into a [`SitePlan`] by packing a regular grid of
//! lots into the buildable rectangle left after setbacks and the frontage
//! street, capped by the legal density ceiling.
//!
//! ## Steps
//! 1. `max_units = floor(area × max_density)`
//! 2. `effective_lot_size = max(target, min_lot_size)`
//! 3. Buildable rectangle: width minus both side setbacks, depth minus front
//!    and rear setbacks and the frontage street
//! 4. Grid: columns from `sqrt(effective_lot_size)`, rows from the lot depth
//! 5. `total_lots = min(columns × rows, max_units)`
//! 6. Streets, lots (row-major), open space, statistics
//!
//! Generation is total: degenerate parcels yield a plan with no lots, one
//! frontage street and no open space.

use crate::geometry::Rect;
use crate::plan::{
    GridSummary, Lot, OpenSpace, SiteParameters, SitePlan, SitePlanStatistics, Street, StreetRole,
};
use crate::rules::{StreetType, ZoningRuleSet, SQFT_PER_ACRE};
use chrono::Utc;
use uuid::Uuid;

/// Namespace for plan ids (v5 UUIDs over the generation inputs).
const PLAN_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6a1f_3c2e_9b7d_4e58_a0c4_5d2f_81e6_b930);

pub const MAIN_ACCESS_NAME: &str = "Main Access";
pub const INTERNAL_STREET_NAME: &str = "Internal Street";

#[derive(Debug, Clone, Default)]
pub struct LayoutGenerator {
    rules: ZoningRuleSet,
}

impl LayoutGenerator {
    pub fn new(rules: ZoningRuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ZoningRuleSet {
        &self.rules
    }

    /// Generate a plan. Identical parameters always give an identical layout.
    pub fn generate(&self, params: &SiteParameters) -> SitePlan {
        let grid = self.size_grid(params);
        let total_lots = grid.capacity().min(grid.max_units);

        tracing::debug!(
            columns = grid.columns,
            rows = grid.rows,
            max_units = grid.max_units,
            lot_width = grid.lot_width,
            lot_depth = grid.lot_depth,
            "sized lot grid"
        );

        let streets = self.lay_streets(params);
        let lots = self.place_lots(params, &grid, total_lots);
        let open_spaces = self.place_open_space(params, &grid, &lots);
        let statistics = compute_statistics(params, &grid, &lots, &open_spaces);

        tracing::info!(
            total_lots = statistics.total_lots,
            density = statistics.density,
            coverage = statistics.coverage,
            streets = streets.len(),
            "generated site plan"
        );

        SitePlan {
            id: plan_id(params, &self.rules.name),
            created_at: Utc::now(),
            rule_set: self.rules.name.clone(),
            parameters: params.clone(),
            grid,
            lots,
            streets,
            open_spaces,
            statistics,
        }
    }

    /// Steps 1-4: density ceiling, lot size and grid dimensions.
    pub fn size_grid(&self, params: &SiteParameters) -> GridSummary {
        let rules = &self.rules;
        let spacing = &rules.spacing;

        let max_units = floor_count(params.area * rules.max_density(params.development_type));
        let effective_lot_size = if params.target_lot_size.is_nan() {
            rules.min_lot_size(params.is_urban)
        } else {
            params.target_lot_size.max(rules.min_lot_size(params.is_urban))
        };

        let setback = rules.setback(params.street_type);
        let street_width = rules.street_width(params.street_type);
        let usable_width = params.width - 2.0 * setback;
        let usable_depth = params.depth - 2.0 * setback - street_width;

        let mut grid = GridSummary {
            max_units,
            effective_lot_size,
            usable_width,
            usable_depth,
            ..GridSummary::default()
        };

        if !(usable_width > 0.0) || !(usable_depth > 0.0) || !(effective_lot_size > 0.0) {
            return grid;
        }

        let columns = floor_count(usable_width / effective_lot_size.sqrt());
        if columns == 0 {
            return grid;
        }
        let lot_width = usable_width / columns as f64 - spacing.lot_spacing_ft;
        if !(lot_width > 0.0) {
            return grid;
        }
        let lot_depth = effective_lot_size / lot_width;
        let rows = floor_count(usable_depth / (lot_depth + spacing.row_spacing_ft));

        grid.columns = columns;
        grid.lot_width = lot_width;
        grid.lot_depth = lot_depth;
        grid.rows = rows;
        grid
    }

    fn lay_streets(&self, params: &SiteParameters) -> Vec<Street> {
        let frontage_width = self.rules.street_width(params.street_type);
        let mut streets = vec![Street {
            name: MAIN_ACCESS_NAME.to_string(),
            role: StreetRole::MainAccess,
            street_type: params.street_type,
            bounds: Rect::new(0.0, 0.0, params.width, frontage_width),
        }];

        if params.area > self.rules.internal_street_threshold_acres {
            let internal_width = self.rules.street_width(StreetType::Local);
            let y = (params.depth / 2.0 - internal_width / 2.0).max(0.0);
            streets.push(Street {
                name: INTERNAL_STREET_NAME.to_string(),
                role: StreetRole::Internal,
                street_type: StreetType::Local,
                bounds: Rect::new(0.0, y, params.width, internal_width),
            });
        }

        streets
    }

    fn place_lots(&self, params: &SiteParameters, grid: &GridSummary, total: u32) -> Vec<Lot> {
        if total == 0 || grid.columns == 0 {
            return Vec::new();
        }
        let spacing = &self.rules.spacing;
        let setback = self.rules.setback(params.street_type);
        let origin_y = self.rules.street_width(params.street_type) + setback;
        let column_pitch = grid.lot_width + spacing.lot_spacing_ft;
        let row_pitch = grid.lot_depth + spacing.row_spacing_ft;

        (0..total)
            .map(|id| {
                let row = id / grid.columns;
                let col = id % grid.columns;
                let bounds = Rect::new(
                    setback + col as f64 * column_pitch,
                    origin_y + row as f64 * row_pitch,
                    grid.lot_width,
                    grid.lot_depth,
                );
                Lot {
                    id,
                    bounds,
                    area: bounds.area(),
                    footprint: bounds.inset(
                        spacing.footprint_side_inset_ft,
                        spacing.footprint_front_inset_ft,
                        spacing.footprint_depth_inset_ft,
                    ),
                }
            })
            .collect()
    }

    fn place_open_space(
        &self,
        params: &SiteParameters,
        grid: &GridSummary,
        lots: &[Lot],
    ) -> Vec<OpenSpace> {
        let Some(last) = lots.last() else {
            return Vec::new();
        };
        let required = self.rules.required_open_space(lots.len());
        let width = self.rules.open_space.rectangle_width().min(grid.usable_width);
        if !(required > 0.0) || !(width > 0.0) {
            return Vec::new();
        }

        let bounds = Rect::new(
            self.rules.setback(params.street_type),
            last.bounds.bottom() + self.rules.spacing.row_spacing_ft,
            width,
            required / width,
        );
        vec![OpenSpace {
            bounds,
            area: bounds.area(),
        }]
    }
}

/// Generate with the municipal ordinance.
pub fn generate(params: &SiteParameters) -> SitePlan {
    LayoutGenerator::new(crate::rules::municipal().clone()).generate(params)
}

fn compute_statistics(
    params: &SiteParameters,
    grid: &GridSummary,
    lots: &[Lot],
    open_spaces: &[OpenSpace],
) -> SitePlanStatistics {
    let total_lots = lots.len() as u32;
    // fold from +0.0: an empty f64 `sum()` is -0.0
    let lot_area = lots.iter().fold(0.0, |acc, lot| acc + lot.area);
    let site_sqft = params.area * SQFT_PER_ACRE;
    let buildable = grid.usable_width * grid.usable_depth;

    SitePlanStatistics {
        total_lots,
        density: ratio(total_lots as f64, params.area),
        avg_lot_size: ratio(lot_area, total_lots as f64),
        coverage: percent(lot_area, site_sqft),
        open_space_area: open_spaces.iter().fold(0.0, |acc, space| acc + space.area),
        efficiency: if grid.usable_width > 0.0 && grid.usable_depth > 0.0 {
            percent(lot_area, buildable)
        } else {
            0.0
        },
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && numerator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

fn percent(part: f64, whole: f64) -> f64 {
    (ratio(part, whole) * 100.0).clamp(0.0, 100.0)
}

/// `floor(value)` as a count; negative, NaN and infinite values give 0.
fn floor_count(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.floor().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

fn plan_id(params: &SiteParameters, rule_set: &str) -> Uuid {
    let key = format!(
        "{rule_set}|{:?}|{:?}|{:?}|{}|{}|{}|{:?}",
        params.area,
        params.width,
        params.depth,
        params.is_urban,
        params.street_type,
        params.development_type,
        params.target_lot_size,
    );
    Uuid::new_v5(&PLAN_ID_NAMESPACE, key.as_bytes())
}
