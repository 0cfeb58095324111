//! BoM / Distributor Reconciler
//!
//! Matches demand lines against aggregated supply in a single pass and
//! reports shortfalls, unmatched demand and leftover stock as records.

use quotemerge_models::{BomRecord, DistiRecord, MergeStatus, MergedRecord, PartLine};
use tracing::{debug, info};

use crate::error::{QuoteError, QuoteResult};
use crate::validation::validate_model;

/// Outcome of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// One record per demand line in input order, then leftover supply in
    /// supply input order.
    pub records: Vec<MergedRecord>,
    /// Supply lines with their final quantities. A negative quantity means
    /// the last demand matched against that line was short.
    pub remaining: Vec<DistiRecord>,
}

/// Record counts and quantity totals. Totals saturate at `i64::MAX`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationSummary {
    pub matched: usize,
    pub short: usize,
    pub unmatched: usize,
    pub leftover: usize,
    pub total_demand: i64,
    pub total_supplied: i64,
    pub total_leftover: i64,
}

impl Reconciliation {
    pub fn summary(&self) -> ReconciliationSummary {
        let mut summary = ReconciliationSummary::default();

        for record in &self.records {
            match record.status() {
                MergeStatus::Matched => summary.matched += 1,
                MergeStatus::Short => summary.short += 1,
                MergeStatus::Unmatched => summary.unmatched += 1,
                MergeStatus::Leftover => {
                    summary.leftover += 1;
                    summary.total_leftover = summary.total_leftover.saturating_add(record.disti_quantity.unwrap_or(0));
                }
            }
            summary.total_demand = summary.total_demand.saturating_add(record.bom_quantity.unwrap_or(0));
            summary.total_supplied = summary.total_supplied.saturating_add(record.consumed());
        }

        summary
    }

    /// Whether every demand line was fully covered and no stock is left.
    pub fn is_clean(&self) -> bool {
        self.records.iter().all(|record| !record.error_flag)
    }
}

/// Reconciles demand against supply.
///
/// Each demand line looks only at the first supply line with the same part
/// number. If that line still has stock the demand consumes up to what is
/// left; otherwise the demand is reported unmatched even when a later supply
/// line carries the same part number. Supply with stock remaining after all
/// demand is reported as leftover.
///
/// The inputs are not modified. Fails only on malformed lines (empty part
/// number or negative quantity).
pub fn reconcile(bom: &[BomRecord], disti: &[DistiRecord]) -> QuoteResult<Reconciliation> {
    validate_lines("BoM", bom)?;
    validate_lines("Disti", disti)?;

    let mut remaining: Vec<i64> = disti.iter().map(|line| line.quantity).collect();
    let mut records = Vec::with_capacity(bom.len() + disti.len());

    for demand in bom {
        let lot = disti.iter().position(|supply| supply.part_number == demand.part_number);

        let record = match lot {
            Some(index) if remaining[index] > 0 => {
                let available = remaining[index];
                let remainder = available - demand.quantity;
                remaining[index] = remainder;

                let supplied = if remainder >= 0 { demand.quantity } else { available };
                debug!(
                    part = %demand.part_number,
                    demand = demand.quantity,
                    available,
                    supplied,
                    "Matched demand line"
                );
                MergedRecord::matched(demand, supplied)
            }
            Some(index) => {
                debug!(
                    part = %demand.part_number,
                    demand = demand.quantity,
                    available = remaining[index],
                    "Supply lot exhausted"
                );
                MergedRecord::unmatched(demand)
            }
            None => {
                debug!(part = %demand.part_number, demand = demand.quantity, "No supply for part");
                MergedRecord::unmatched(demand)
            }
        };

        records.push(record);
    }

    let remaining: Vec<DistiRecord> = disti
        .iter()
        .zip(remaining)
        .map(|(supply, quantity)| PartLine::new(supply.part_number.clone(), quantity))
        .collect();

    records.extend(
        remaining
            .iter()
            .filter(|supply| supply.quantity > 0)
            .map(MergedRecord::leftover),
    );

    let reconciliation = Reconciliation { records, remaining };
    let summary = reconciliation.summary();
    info!(
        matched = summary.matched,
        short = summary.short,
        unmatched = summary.unmatched,
        leftover = summary.leftover,
        "Reconciled {} demand lines against {} supply lines",
        bom.len(),
        disti.len()
    );

    Ok(reconciliation)
}

fn validate_lines(list: &str, lines: &[PartLine]) -> QuoteResult<()> {
    for (index, line) in lines.iter().enumerate() {
        if line.part_number.trim().is_empty() {
            return Err(QuoteError::invalid_record(list, index, "Missing part number"));
        }
        validate_model(line).map_err(|error| QuoteError::invalid_record(list, index, error.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lines(entries: &[(&str, i64)]) -> Vec<PartLine> {
        entries.iter().map(|(part, qty)| PartLine::new(*part, *qty)).collect()
    }

    fn record(bom: Option<(&str, i64)>, disti: Option<(&str, i64)>, error_flag: bool) -> MergedRecord {
        MergedRecord {
            bom_part_number: bom.map(|(part, _)| part.to_string()),
            bom_quantity: bom.map(|(_, qty)| qty),
            disti_part_number: disti.map(|(part, _)| part.to_string()),
            disti_quantity: disti.map(|(_, qty)| qty),
            error_flag,
        }
    }

    #[test]
    fn test_reference_merge() {
        let bom = lines(&[
            ("ABC", 2),
            ("XYZ", 1),
            ("IJK", 1),
            ("ABC", 1),
            ("IJK", 1),
            ("XYZ", 2),
            ("DEF", 2),
        ]);
        let disti = lines(&[("XYZ", 2), ("GEF", 2), ("ABC", 4), ("IJK", 2)]);

        let result = reconcile(&bom, &disti).unwrap();

        assert_eq!(
            result.records,
            vec![
                record(Some(("ABC", 2)), Some(("ABC", 2)), false),
                record(Some(("XYZ", 1)), Some(("XYZ", 1)), false),
                record(Some(("IJK", 1)), Some(("IJK", 1)), false),
                record(Some(("ABC", 1)), Some(("ABC", 1)), false),
                record(Some(("IJK", 1)), Some(("IJK", 1)), false),
                record(Some(("XYZ", 2)), Some(("XYZ", 1)), true),
                record(Some(("DEF", 2)), None, true),
                record(None, Some(("GEF", 2)), true),
                record(None, Some(("ABC", 1)), true),
            ]
        );
        assert_eq!(result.remaining, lines(&[("XYZ", -1), ("GEF", 2), ("ABC", 1), ("IJK", 0)]));

        // Inputs are untouched.
        assert_eq!(disti[0].quantity, 2);
    }

    #[test]
    fn test_summary() {
        let bom = lines(&[("ABC", 2), ("XYZ", 3), ("DEF", 1)]);
        let disti = lines(&[("ABC", 5), ("XYZ", 1)]);

        let summary = reconcile(&bom, &disti).unwrap().summary();

        assert_eq!(
            summary,
            ReconciliationSummary {
                matched: 1,
                short: 1,
                unmatched: 1,
                leftover: 1,
                total_demand: 6,
                total_supplied: 3,
                total_leftover: 3,
            }
        );
    }

    #[test]
    fn test_summary_totals_saturate() {
        let half = i64::MAX / 2 + 1;
        let result = reconcile(&lines(&[("ABC", half), ("XYZ", half)]), &lines(&[("GEF", half), ("IJK", half)])).unwrap();

        let summary = result.summary();
        assert_eq!(summary.unmatched, 2);
        assert_eq!(summary.leftover, 2);
        assert_eq!(summary.total_demand, i64::MAX);
        assert_eq!(summary.total_leftover, i64::MAX);
        assert_eq!(summary.total_supplied, 0);
    }

    #[test]
    fn test_long_part_numbers_are_accepted() {
        let part = "P".repeat(250);
        let result = reconcile(&lines(&[(part.as_str(), 2)]), &lines(&[(part.as_str(), 2)])).unwrap();

        assert_eq!(result.records, vec![record(Some((part.as_str(), 2)), Some((part.as_str(), 2)), false)]);
    }

    #[test]
    fn test_exhausted_lot_is_unmatched() {
        let bom = lines(&[("ABC", 3), ("ABC", 1)]);
        let disti = lines(&[("ABC", 2), ("ABC", 10)]);

        let result = reconcile(&bom, &disti).unwrap();

        assert_eq!(result.records[0], record(Some(("ABC", 3)), Some(("ABC", 2)), true));
        // The second lot is never looked at.
        assert_eq!(result.records[1], record(Some(("ABC", 1)), None, true));
        assert_eq!(result.records[2], record(None, Some(("ABC", 10)), true));
        assert_eq!(result.records.len(), 3);
    }

    #[test]
    fn test_zero_stock_lot_is_unmatched() {
        let result = reconcile(&lines(&[("ABC", 1)]), &lines(&[("ABC", 0)])).unwrap();

        assert_eq!(result.records, vec![record(Some(("ABC", 1)), None, true)]);
    }

    #[test]
    fn test_zero_demand_matches_cleanly() {
        let result = reconcile(&lines(&[("ABC", 0)]), &lines(&[("ABC", 3)])).unwrap();

        assert_eq!(result.records[0], record(Some(("ABC", 0)), Some(("ABC", 0)), false));
        assert_eq!(result.records[1], record(None, Some(("ABC", 3)), true));
    }

    #[test]
    fn test_empty_inputs() {
        let result = reconcile(&[], &[]).unwrap();
        assert!(result.records.is_empty());
        assert!(result.is_clean());

        let only_supply = reconcile(&[], &lines(&[("ABC", 1), ("XYZ", 0)])).unwrap();
        assert_eq!(only_supply.records, vec![record(None, Some(("ABC", 1)), true)]);
    }

    #[test]
    fn test_exact_match_is_clean() {
        let result = reconcile(&lines(&[("ABC", 2), ("ABC", 2)]), &lines(&[("ABC", 4)])).unwrap();
        assert!(result.is_clean());
    }

    #[test]
    fn test_malformed_lines_are_rejected() {
        let error = reconcile(&lines(&[("ABC", 1), ("", 1)]), &[]).unwrap_err();
        assert_eq!(error, QuoteError::invalid_record("BoM", 1, "Missing part number"));

        let error = reconcile(&[], &lines(&[("ABC", -4)])).unwrap_err();
        match error {
            QuoteError::InvalidRecord { list, index, message } => {
                assert_eq!(list, "Disti");
                assert_eq!(index, 0);
                assert!(message.contains("Quantity must not be negative"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn arb_lines(max_len: usize) -> impl Strategy<Value = Vec<PartLine>> {
        prop::collection::vec(
            (prop::sample::select(vec!["ABC", "DEF", "IJK", "XYZ", "GEF"]), 0..6i64)
                .prop_map(|(part, qty)| PartLine::new(part, qty)),
            0..max_len,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_one_record_per_demand_line_in_order(bom in arb_lines(12), disti in arb_lines(6)) {
            let result = reconcile(&bom, &disti).unwrap();

            prop_assert!(result.records.len() >= bom.len());
            for (record, demand) in result.records.iter().zip(&bom) {
                prop_assert_eq!(record.bom_part_number.as_deref(), Some(demand.part_number.as_str()));
                prop_assert_eq!(record.bom_quantity, Some(demand.quantity));
            }
            for record in &result.records[bom.len()..] {
                prop_assert_eq!(record.status(), MergeStatus::Leftover);
            }
        }

        #[test]
        fn prop_flag_tracks_full_satisfaction(bom in arb_lines(12), disti in arb_lines(6)) {
            let result = reconcile(&bom, &disti).unwrap();

            for record in &result.records[..bom.len()] {
                match record.disti_quantity {
                    Some(supplied) => {
                        prop_assert_eq!(record.error_flag, Some(supplied) != record.bom_quantity);
                        prop_assert!(supplied <= record.bom_quantity.unwrap());
                    }
                    None => prop_assert!(record.error_flag),
                }
            }
        }

        /// Consumption per part never exceeds the stock of its first supply line.
        #[test]
        fn prop_consumption_bounded_by_supply(bom in arb_lines(12), disti in arb_lines(6)) {
            let result = reconcile(&bom, &disti).unwrap();

            for (index, supply) in disti.iter().enumerate() {
                if disti[..index].iter().any(|earlier| earlier.part_number == supply.part_number) {
                    continue;
                }
                let consumed: i64 = result.records[..bom.len()]
                    .iter()
                    .filter(|record| record.disti_part_number.as_deref() == Some(supply.part_number.as_str()))
                    .map(MergedRecord::consumed)
                    .sum();
                prop_assert!(consumed <= supply.quantity);
            }
        }

        #[test]
        fn prop_leftover_iff_stock_remains(bom in arb_lines(12), disti in arb_lines(6)) {
            let result = reconcile(&bom, &disti).unwrap();

            let leftovers: Vec<PartLine> = result.records[bom.len()..]
                .iter()
                .map(|record| PartLine::new(record.disti_part_number.clone().unwrap(), record.disti_quantity.unwrap()))
                .collect();
            let expected: Vec<PartLine> = result
                .remaining
                .iter()
                .filter(|supply| supply.quantity > 0)
                .cloned()
                .collect();
            prop_assert_eq!(leftovers, expected);

            for (supply, original) in result.remaining.iter().zip(&disti) {
                prop_assert!(supply.quantity <= original.quantity);
            }
        }
    }
}
