// Aggregation Transforms - one per scene
//
// Pure functions over the full record set. Derived datasets are
// ephemeral: recomputed on every render, never cached or persisted.

use crate::record::{BrandOrigin, Record};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Number of brands the top-brands scene keeps
pub const TOP_N: usize = 10;

// ============================================================================
// SCENE 0 - YEARLY TOTALS BY ORIGIN
// ============================================================================

/// One (year, origin) total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyTotal {
    pub year: i32,
    pub origin: BrandOrigin,
    pub sales: f64,
}

/// Group by year, then by origin within the year, summing sales.
///
/// Output is sorted by year ascending with origins in stack order, so
/// extracting a per-origin series is deterministic. An origin with no
/// records in a year is omitted, not zero-filled.
pub fn yearly_totals(records: &[Record]) -> Vec<YearlyTotal> {
    // [Asian sum, Western sum]; None = origin absent that year
    let mut by_year: BTreeMap<i32, [Option<f64>; 2]> = BTreeMap::new();

    for rec in records {
        let slot = match rec.origin {
            BrandOrigin::Asian => 0,
            BrandOrigin::Western => 1,
        };
        let sums = by_year.entry(rec.year).or_insert([None, None]);
        *sums[slot].get_or_insert(0.0) += rec.sales;
    }

    let mut totals = Vec::new();
    for (year, sums) in by_year {
        for (slot, &origin) in BrandOrigin::STACK_ORDER.iter().enumerate() {
            if let Some(sales) = sums[slot] {
                totals.push(YearlyTotal { year, origin, sales });
            }
        }
    }

    totals
}

// ============================================================================
// SCENE 1 - YEARLY SHARE BY ORIGIN
// ============================================================================

/// Per-year fractions; the two fractions sum to 1 for every emitted year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearShare {
    pub year: i32,
    pub asian: f64,
    pub western: f64,
}

/// One cumulative band of the stacked share chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackBand {
    pub year: i32,
    pub lower: f64,
    pub upper: f64,
}

/// One origin's band series across all years
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedSeries {
    pub origin: BrandOrigin,
    pub bands: Vec<StackBand>,
}

/// Same grouping as yearly_totals, but each origin's sum is divided by
/// the year's combined total.
///
/// A year whose combined total is 0 is skipped (the fractions would be
/// undefined). An origin absent in a year contributes share 0. Output
/// is sorted by year ascending.
pub fn yearly_shares(records: &[Record]) -> Vec<YearShare> {
    let mut by_year: BTreeMap<i32, (f64, f64)> = BTreeMap::new();

    for rec in records {
        let sums = by_year.entry(rec.year).or_insert((0.0, 0.0));
        match rec.origin {
            BrandOrigin::Asian => sums.0 += rec.sales,
            BrandOrigin::Western => sums.1 += rec.sales,
        }
    }

    by_year
        .into_iter()
        .filter(|&(_, (asian, western))| asian + western > 0.0)
        .map(|(year, (asian, western))| {
            let total = asian + western;
            YearShare {
                year,
                asian: asian / total,
                western: western / total,
            }
        })
        .collect()
}

/// Convert share rows into cumulative lower/upper bounds per origin, in
/// the fixed [Asian, Western] key order required for stable stacking.
///
/// Asian occupies [0, asian], Western [asian, asian + western].
pub fn stack_shares(shares: &[YearShare]) -> Vec<StackedSeries> {
    BrandOrigin::STACK_ORDER
        .iter()
        .map(|&origin| {
            let bands = shares
                .iter()
                .map(|row| {
                    let (lower, upper) = match origin {
                        BrandOrigin::Asian => (0.0, row.asian),
                        BrandOrigin::Western => (row.asian, row.asian + row.western),
                    };
                    StackBand {
                        year: row.year,
                        lower,
                        upper,
                    }
                })
                .collect();

            StackedSeries { origin, bands }
        })
        .collect()
}

// ============================================================================
// SCENE 2 - TOP BRANDS IN THE LATEST YEAR
// ============================================================================

/// One brand's latest-year total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandTotal {
    pub brand: String,
    pub sales: f64,
    pub origin: BrandOrigin,
}

/// The maximum year present in the record set; None when empty
pub fn latest_year(records: &[Record]) -> Option<i32> {
    records.iter().map(|r| r.year).max()
}

/// Top `n` brands by summed sales in the latest year, descending.
///
/// Ties break lexicographically by brand name so repeated runs produce
/// identical output. Each brand's origin is taken from its records
/// (a brand maps to a single origin).
pub fn top_brands(records: &[Record], n: usize) -> Vec<BrandTotal> {
    let latest = match latest_year(records) {
        Some(year) => year,
        None => return Vec::new(),
    };

    let mut by_brand: BTreeMap<&str, (f64, BrandOrigin)> = BTreeMap::new();

    for rec in records.iter().filter(|r| r.year == latest) {
        let entry = by_brand
            .entry(rec.brand.as_str())
            .or_insert((0.0, rec.origin));
        entry.0 += rec.sales;
    }

    let mut totals: Vec<BrandTotal> = by_brand
        .into_iter()
        .map(|(brand, (sales, origin))| BrandTotal {
            brand: brand.to_string(),
            sales,
            origin,
        })
        .collect();

    totals.sort_by(|a, b| {
        b.sales
            .partial_cmp(&a.sales)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.brand.cmp(&b.brand))
    });
    totals.truncate(n);

    totals
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, brand: &str, origin: BrandOrigin, sales: f64) -> Record {
        Record {
            year,
            brand: brand.to_string(),
            origin,
            sales,
        }
    }

    /// The worked example: Toyota/Asian 100 + Ford/Western 50 in 2020
    fn example_records() -> Vec<Record> {
        vec![
            rec(2020, "Toyota", BrandOrigin::Asian, 100.0),
            rec(2020, "Ford", BrandOrigin::Western, 50.0),
        ]
    }

    // ------------------------------------------------------------------------
    // Yearly totals
    // ------------------------------------------------------------------------

    #[test]
    fn test_yearly_totals_example() {
        let totals = yearly_totals(&example_records());

        assert_eq!(
            totals,
            vec![
                YearlyTotal {
                    year: 2020,
                    origin: BrandOrigin::Asian,
                    sales: 100.0
                },
                YearlyTotal {
                    year: 2020,
                    origin: BrandOrigin::Western,
                    sales: 50.0
                },
            ]
        );
    }

    #[test]
    fn test_yearly_totals_sums_within_year_and_origin() {
        let records = vec![
            rec(2019, "Toyota", BrandOrigin::Asian, 70.0),
            rec(2019, "Honda", BrandOrigin::Asian, 30.0),
            rec(2019, "Ford", BrandOrigin::Western, 40.0),
            rec(2020, "Toyota", BrandOrigin::Asian, 55.0),
        ];

        let totals = yearly_totals(&records);

        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].year, 2019);
        assert_eq!(totals[0].origin, BrandOrigin::Asian);
        assert_eq!(totals[0].sales, 100.0);
        assert_eq!(totals[1].origin, BrandOrigin::Western);
        assert_eq!(totals[1].sales, 40.0);
        assert_eq!(totals[2].year, 2020);
        assert_eq!(totals[2].sales, 55.0);
    }

    #[test]
    fn test_yearly_totals_absent_origin_is_omitted() {
        // 2020 has no Western records: no zero-filled row may appear
        let records = vec![rec(2020, "Toyota", BrandOrigin::Asian, 10.0)];

        let totals = yearly_totals(&records);

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].origin, BrandOrigin::Asian);
    }

    #[test]
    fn test_yearly_totals_preserves_all_years_sorted() {
        let records = vec![
            rec(2021, "Kia", BrandOrigin::Asian, 5.0),
            rec(2018, "Ford", BrandOrigin::Western, 7.0),
            rec(2020, "BMW", BrandOrigin::Western, 3.0),
        ];

        let years: Vec<i32> = yearly_totals(&records).iter().map(|t| t.year).collect();
        assert_eq!(years, vec![2018, 2020, 2021]);
    }

    #[test]
    fn test_yearly_totals_empty_input() {
        assert!(yearly_totals(&[]).is_empty());
    }

    // ------------------------------------------------------------------------
    // Yearly share
    // ------------------------------------------------------------------------

    #[test]
    fn test_shares_example() {
        let shares = yearly_shares(&example_records());

        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].year, 2020);
        assert!((shares[0].asian - 2.0 / 3.0).abs() < 1e-9);
        assert!((shares[0].western - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_shares_sum_to_one_per_year() {
        let records = vec![
            rec(2018, "Toyota", BrandOrigin::Asian, 123.0),
            rec(2018, "Ford", BrandOrigin::Western, 456.0),
            rec(2019, "Honda", BrandOrigin::Asian, 7.0),
            rec(2019, "Kia", BrandOrigin::Asian, 11.0),
            rec(2019, "BMW", BrandOrigin::Western, 13.0),
        ];

        for share in yearly_shares(&records) {
            assert!(
                (share.asian + share.western - 1.0).abs() < 1e-9,
                "fractions for {} must sum to 1",
                share.year
            );
        }
    }

    #[test]
    fn test_shares_zero_total_year_is_skipped() {
        let records = vec![
            rec(2019, "Toyota", BrandOrigin::Asian, 0.0),
            rec(2019, "Ford", BrandOrigin::Western, 0.0),
            rec(2020, "Toyota", BrandOrigin::Asian, 10.0),
        ];

        let shares = yearly_shares(&records);

        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].year, 2020);
    }

    #[test]
    fn test_shares_absent_origin_gets_zero() {
        let records = vec![rec(2020, "Toyota", BrandOrigin::Asian, 10.0)];

        let shares = yearly_shares(&records);

        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].asian, 1.0);
        assert_eq!(shares[0].western, 0.0);
    }

    #[test]
    fn test_shares_sorted_by_year() {
        let records = vec![
            rec(2021, "Kia", BrandOrigin::Asian, 5.0),
            rec(2018, "Ford", BrandOrigin::Western, 7.0),
        ];

        let years: Vec<i32> = yearly_shares(&records).iter().map(|s| s.year).collect();
        assert_eq!(years, vec![2018, 2021]);
    }

    // ------------------------------------------------------------------------
    // Stacking
    // ------------------------------------------------------------------------

    #[test]
    fn test_stack_shares_key_order_and_bounds() {
        let shares = yearly_shares(&example_records());
        let series = stack_shares(&shares);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].origin, BrandOrigin::Asian);
        assert_eq!(series[1].origin, BrandOrigin::Western);

        let asian = &series[0].bands[0];
        let western = &series[1].bands[0];

        assert_eq!(asian.lower, 0.0);
        // Bands are contiguous: Western starts where Asian ends
        assert!((asian.upper - western.lower).abs() < 1e-9);
        assert!((western.upper - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_stack_shares_empty() {
        let series = stack_shares(&[]);

        assert_eq!(series.len(), 2);
        assert!(series[0].bands.is_empty());
        assert!(series[1].bands.is_empty());
    }

    // ------------------------------------------------------------------------
    // Top brands
    // ------------------------------------------------------------------------

    #[test]
    fn test_latest_year() {
        let records = vec![
            rec(2018, "Ford", BrandOrigin::Western, 1.0),
            rec(2021, "Kia", BrandOrigin::Asian, 1.0),
            rec(2020, "BMW", BrandOrigin::Western, 1.0),
        ];

        assert_eq!(latest_year(&records), Some(2021));
        assert_eq!(latest_year(&[]), None);
    }

    #[test]
    fn test_top_brands_example() {
        let top = top_brands(&example_records(), TOP_N);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].brand, "Toyota");
        assert_eq!(top[0].sales, 100.0);
        assert_eq!(top[0].origin, BrandOrigin::Asian);
        assert_eq!(top[1].brand, "Ford");
        assert_eq!(top[1].sales, 50.0);
        assert_eq!(top[1].origin, BrandOrigin::Western);
    }

    #[test]
    fn test_top_brands_filters_to_latest_year() {
        let records = vec![
            rec(2019, "Honda", BrandOrigin::Asian, 999.0),
            rec(2020, "Toyota", BrandOrigin::Asian, 10.0),
        ];

        let top = top_brands(&records, TOP_N);

        assert_eq!(top.len(), 1, "only latest-year brands may appear");
        assert_eq!(top[0].brand, "Toyota");
    }

    #[test]
    fn test_top_brands_sums_per_brand() {
        let records = vec![
            rec(2020, "Toyota", BrandOrigin::Asian, 60.0),
            rec(2020, "Toyota", BrandOrigin::Asian, 40.0),
            rec(2020, "Ford", BrandOrigin::Western, 80.0),
        ];

        let top = top_brands(&records, TOP_N);

        assert_eq!(top[0].brand, "Toyota");
        assert_eq!(top[0].sales, 100.0);
    }

    #[test]
    fn test_top_brands_truncates_to_n() {
        let mut records = Vec::new();
        for i in 0..15 {
            records.push(rec(
                2020,
                &format!("Brand{:02}", i),
                BrandOrigin::Asian,
                100.0 - i as f64,
            ));
        }

        let top = top_brands(&records, TOP_N);

        assert_eq!(top.len(), TOP_N);
        for pair in top.windows(2) {
            assert!(pair[0].sales >= pair[1].sales, "must be non-increasing");
        }
    }

    #[test]
    fn test_top_brands_tie_break_is_lexicographic() {
        let records = vec![
            rec(2020, "Nissan", BrandOrigin::Asian, 50.0),
            rec(2020, "Audi", BrandOrigin::Western, 50.0),
            rec(2020, "Mazda", BrandOrigin::Asian, 50.0),
        ];

        let top = top_brands(&records, TOP_N);
        let brands: Vec<&str> = top.iter().map(|b| b.brand.as_str()).collect();

        assert_eq!(brands, vec!["Audi", "Mazda", "Nissan"]);
    }

    #[test]
    fn test_top_brands_empty_input() {
        assert!(top_brands(&[], TOP_N).is_empty());
    }

    // ------------------------------------------------------------------------
    // Idempotence
    // ------------------------------------------------------------------------

    #[test]
    fn test_transforms_are_idempotent() {
        let records = vec![
            rec(2019, "Toyota", BrandOrigin::Asian, 70.0),
            rec(2019, "Ford", BrandOrigin::Western, 40.0),
            rec(2020, "Toyota", BrandOrigin::Asian, 55.0),
            rec(2020, "Ford", BrandOrigin::Western, 65.0),
        ];

        assert_eq!(yearly_totals(&records), yearly_totals(&records));
        assert_eq!(yearly_shares(&records), yearly_shares(&records));
        assert_eq!(
            stack_shares(&yearly_shares(&records)),
            stack_shares(&yearly_shares(&records))
        );
        assert_eq!(
            top_brands(&records, TOP_N),
            top_brands(&records, TOP_N)
        );
    }
}
