pub mod json_api;

pub use json_api::{plan_site_json, OptimizeMode, SitePlanRequest, SitePlanResponse};
