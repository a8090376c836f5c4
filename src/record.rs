// Record Model - one immutable row per (year, brand) sales figure
// Loaded once at startup, never mutated afterwards

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// BrandOrigin - which region a brand belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrandOrigin {
    Asian,
    Western,
}

impl BrandOrigin {
    /// Fixed key order for the stacked share chart. Stacking bands are
    /// cumulative, so the order must be stable across years.
    pub const STACK_ORDER: [BrandOrigin; 2] = [BrandOrigin::Asian, BrandOrigin::Western];

    /// Human-readable name for display and legends
    pub fn name(&self) -> &'static str {
        match self {
            BrandOrigin::Asian => "Asian",
            BrandOrigin::Western => "Western",
        }
    }
}

/// Record - one input row
///
/// Invariant (assumed, not validated): a brand maps to exactly one
/// origin across all its records, and sales is non-negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub year: i32,

    pub brand: String,

    #[serde(rename = "brand_origin")]
    pub origin: BrandOrigin,

    pub sales: f64,
}

/// Load the full record set from a CSV file.
///
/// Expected columns: year, brand, brand_origin, sales. A malformed row
/// (missing column, non-numeric year/sales, unknown origin label) fails
/// the whole load: a bad input file is a fatal startup error.
pub fn load_csv(csv_path: &Path) -> Result<Vec<Record>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;

    let mut records = Vec::new();

    for (idx, result) in rdr.deserialize().enumerate() {
        // +2: rows are 1-indexed and the header occupies the first line
        let record: Record = result.with_context(|| {
            format!("Failed to parse row {} of {}", idx + 2, csv_path.display())
        })?;
        records.push(record);
    }

    Ok(records)
}
