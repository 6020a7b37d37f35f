//! Deterministic quote pricing for painting jobs.
//!
//! Quotes are estimates, not invoices: arithmetic is plain `f64` and only the
//! displayed `basePrice` and `total` are rounded to cents. The total is
//! rounded once over the raw sum, so it can legitimately differ from
//! `basePrice + extras` when the raw values carry sub-cent noise.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Base rate per square foot. Unknown service types price as interior work.
fn base_rate(service_type: &str) -> f64 {
    match service_type {
        "exterior" => 2.0,
        "commercial" => 2.5,
        "cabinet" => 3.0,
        "sheetrock" => 1.8,
        "epoxy" => 4.0,
        _ => 1.5,
    }
}

/// Per-square-foot surcharge for an add-on tag.
fn extra_rate(tag: &str) -> f64 {
    match tag {
        "trim" => 0.20,
        "ceiling" => 0.15,
        "primer" => 0.10,
        _ => 0.05,
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteRequest {
    pub service_type: String,
    pub square_feet: f64,
    pub floors: u32,
    pub rooms: u32,
    pub extras: Vec<String>,
}

impl Default for QuoteRequest {
    fn default() -> Self {
        Self {
            service_type: "interior".to_string(),
            square_feet: 0.0,
            floors: 1,
            rooms: 1,
            extras: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub service_type: String,
    pub square_feet: f64,
    pub floors: u32,
    pub rooms: u32,
    pub base_price: f64,
    pub extras: BTreeMap<String, f64>,
    pub total: f64,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Price a quote request.
///
/// Exterior jobs gain 10% per floor above the first (scaffolding); interior
/// jobs gain 5% per room above the first. Duplicate extras tags each add
/// their cost to the running total while the returned map keeps a single
/// entry per tag.
pub fn price_quote(request: &QuoteRequest) -> QuoteResult {
    let rate = base_rate(&request.service_type);
    let mut base_price = request.square_feet * rate;

    if request.service_type == "exterior" && request.floors > 1 {
        base_price *= 1.0 + f64::from(request.floors - 1) * 0.10;
    } else if request.service_type == "interior" && request.rooms > 1 {
        base_price *= 1.0 + f64::from(request.rooms - 1) * 0.05;
    }

    let mut extras = BTreeMap::new();
    let mut extras_total = 0.0;
    for tag in &request.extras {
        let cost = extra_rate(tag) * request.square_feet;
        extras.insert(tag.clone(), round2(cost));
        extras_total += cost;
    }

    QuoteResult {
        service_type: request.service_type.clone(),
        square_feet: request.square_feet,
        floors: request.floors,
        rooms: request.rooms,
        base_price: round2(base_price),
        extras,
        total: round2(base_price + extras_total),
    }
}
