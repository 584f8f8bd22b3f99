//! Property tests for aggregation invariants.
//!
//! 1. Group means lie between the group's min and max price
//! 2. Rankings are ordered and contain only defined groups
//! 3. Highest and lowest rankings are disjoint when the groups allow it
//! 4. The shared market-type range bounds every facet
//! 5. The t-test p-value is always in [0, 1] or NaN

use proptest::prelude::*;

use foodtrend_core::aggregate::{largest, mean_by, rank_descending, smallest};
use foodtrend_core::config::AnalysisSettings;
use foodtrend_core::record::{Dataset, Field, PriceRecord, PriceTable};
use foodtrend_core::report::ChartSpec;
use foodtrend_core::stats::two_sample_t_test;
use foodtrend_core::view::{render_view, ViewRequest};

// ── Strategies ───────────────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None),
        6 => (0.5..500.0_f64).prop_map(Some),
    ]
}

fn arb_record() -> impl Strategy<Value = PriceRecord> {
    (
        2008..2016_i32,
        1..13_i32,
        prop::sample::select(vec!["Retail", "Wholesale", "Producer"]),
        prop::sample::select(vec!["Kenya", "Benin", "Ghana", "Mali", "Chad", "Togo"]),
        prop::sample::select(vec!["Maize", "Rice", "Beans"]),
        arb_price(),
    )
        .prop_map(|(year, month, mt, country, produce, price)| PriceRecord {
            year: Some(year),
            month: Some(month),
            market_type: Some(mt.into()),
            country: Some(country.into()),
            produce: Some(produce.into()),
            price,
        })
}

fn arb_records() -> impl Strategy<Value = Vec<PriceRecord>> {
    prop::collection::vec(arb_record(), 0..80)
}

// ── 1. Means are bounded ─────────────────────────────────────────────

proptest! {
    #[test]
    fn mean_within_group_bounds(records in arb_records()) {
        for stat in mean_by(&records, Field::Country) {
            let prices: Vec<f64> = records
                .iter()
                .filter(|r| r.country.as_deref() == Some(stat.key.as_str()))
                .filter_map(|r| r.price)
                .collect();
            match stat.value {
                Some(mean) => {
                    let lo = prices.iter().copied().fold(f64::INFINITY, f64::min);
                    let hi = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    prop_assert!(mean >= lo - 1e-9 && mean <= hi + 1e-9);
                    prop_assert_eq!(stat.count, prices.len());
                }
                None => prop_assert!(prices.is_empty()),
            }
        }
    }
}

// ── 2. Rankings are ordered ──────────────────────────────────────────

proptest! {
    #[test]
    fn ranking_is_non_increasing(records in arb_records()) {
        let stats = mean_by(&records, Field::Country);
        let defined = stats.iter().filter(|s| s.value.is_some()).count();
        let ranked = rank_descending(stats);
        prop_assert_eq!(ranked.len(), defined);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].value >= pair[1].value);
        }
    }
}

// ── 3. Top and bottom are disjoint ───────────────────────────────────

proptest! {
    #[test]
    fn top_and_bottom_disjoint_when_enough_groups(records in arb_records(), n in 1..4_usize) {
        let stats = mean_by(&records, Field::Country);
        let defined = stats.iter().filter(|s| s.value.is_some()).count();
        let top = largest(stats.clone(), n);
        let bottom = smallest(stats, n);
        prop_assert!(top.len() <= n && bottom.len() <= n);
        if defined >= 2 * n {
            for t in &top {
                prop_assert!(bottom.iter().all(|b| b.label != t.label));
            }
        }
    }
}

// ── 4. Shared range ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn shared_range_bounds_every_facet(records in arb_records()) {
        let table = PriceTable::new("t", Field::ALL.to_vec(), records);
        let ds = Dataset::new(table.clone(), table);
        let request = ViewRequest::ComparisonByMarketType {
            produce: Some("Maize".into()),
            market_types: vec!["Retail".into(), "Wholesale".into(), "Producer".into()],
        };
        let report = render_view(&ds, &request, &AnalysisSettings::default());
        let charts: Vec<_> = report.all_charts().collect();
        prop_assert_eq!(charts.len(), 3);
        let ranges: Vec<_> = charts
            .iter()
            .map(|c| match c {
                ChartSpec::Line(l) => l.y_range,
                ChartSpec::Bar(_) => None,
            })
            .collect();
        prop_assert!(ranges.windows(2).all(|w| w[0] == w[1]));
        for chart in charts {
            if let (ChartSpec::Line(line), Some(range)) = (chart, ranges[0]) {
                for p in line.series.iter().flat_map(|s| &s.points) {
                    prop_assert!(p.y >= range.min && p.y <= range.max);
                }
            }
        }
    }
}

// ── 5. p-values ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn p_value_is_a_probability(
        a in prop::collection::vec(arb_price(), 0..20),
        b in prop::collection::vec(arb_price(), 0..20),
    ) {
        let result = two_sample_t_test(&a, &b);
        prop_assert!(result.p_value.is_nan() || (0.0..=1.0).contains(&result.p_value));
    }
}
