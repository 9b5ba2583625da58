//! Dashboard aggregates over a day's traffic.
//!
//! All reductions are recomputed from the fetched collections on every
//! render; nothing is cached.

use serde::Serialize;

use crate::models::{GateRecord, TrafficRecord};
use crate::types::{PaymentMethod, Shift};

/// A labelled value for one chart bar or slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub label: String,
    pub value: i64,
}

impl Tally {
    fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Sum of each payment counter across all records, in [`PaymentMethod::ALL`] order.
#[must_use]
pub fn payment_totals(traffic: &[TrafficRecord]) -> Vec<Tally> {
    PaymentMethod::ALL
        .iter()
        .map(|method| {
            let total = traffic.iter().map(|r| r.payments.get(*method)).sum();
            Tally::new(method.label(), total)
        })
        .collect()
}

/// Number of records per gate, one entry per gate record in gate order.
#[must_use]
pub fn gate_counts(gates: &[GateRecord], traffic: &[TrafficRecord]) -> Vec<Tally> {
    gates
        .iter()
        .map(|gate| Tally::new(gate.gate_name.clone(), count(traffic, |r| r.gate_id == gate.id)))
        .collect()
}

/// Number of records per shift for shifts 1, 2 and 3.
#[must_use]
pub fn shift_counts(traffic: &[TrafficRecord]) -> Vec<Tally> {
    Shift::ALL
        .iter()
        .map(|shift| Tally::new(shift.label(), count(traffic, |r| r.shift() == Some(*shift))))
        .collect()
}

/// Number of records per branch, grouped by distinct branch name.
///
/// A record counts toward a branch name when any gate carrying that name has
/// the record's branch id. Names keep first-seen gate order.
#[must_use]
pub fn branch_counts(gates: &[GateRecord], traffic: &[TrafficRecord]) -> Vec<Tally> {
    let mut names: Vec<&str> = Vec::new();
    for gate in gates {
        if !names.contains(&gate.branch_name.as_str()) {
            names.push(&gate.branch_name);
        }
    }

    names
        .into_iter()
        .map(|name| {
            let value = count(traffic, |r| {
                gates
                    .iter()
                    .any(|g| g.branch_name == name && g.branch_id == r.branch_id)
            });
            Tally::new(name, value)
        })
        .collect()
}

fn count(traffic: &[TrafficRecord], predicate: impl Fn(&TrafficRecord) -> bool) -> i64 {
    let n = traffic.iter().filter(|r| predicate(r)).count();
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Everything the dashboard charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub payment_totals: Vec<Tally>,
    pub gate_counts: Vec<Tally>,
    pub shift_counts: Vec<Tally>,
    pub branch_counts: Vec<Tally>,
    pub record_count: usize,
}

impl DashboardStats {
    /// Compute all four aggregates.
    #[must_use]
    pub fn compute(gates: &[GateRecord], traffic: &[TrafficRecord]) -> Self {
        Self {
            payment_totals: payment_totals(traffic),
            gate_counts: gate_counts(gates, traffic),
            shift_counts: shift_counts(traffic),
            branch_counts: branch_counts(gates, traffic),
            record_count: traffic.len(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{BranchId, GateId};

    fn gate(id: i32, branch_id: i32, name: &str, branch: &str) -> GateRecord {
        GateRecord {
            id: GateId::new(id),
            branch_id: BranchId::new(branch_id),
            gate_name: name.to_string(),
            branch_name: branch.to_string(),
        }
    }

    fn traffic() -> Vec<TrafficRecord> {
        serde_json::from_str(
            r#"[
            {"id": 1, "IdGerbang": 1, "IdCabang": 16, "Tanggal": "2023-11-01T01:00:00", "Shift": 1, "Tunai": 5, "eBca": 2, "DinasKary": 1},
            {"id": 2, "IdGerbang": 1, "IdCabang": 16, "Tanggal": "2023-11-01T09:00:00", "Shift": 2, "Tunai": 3, "eBca": 4},
            {"id": 3, "IdGerbang": 2, "IdCabang": 16, "Tanggal": "2023-11-01T17:00:00", "Shift": 3, "eMandiri": 7},
            {"id": 4, "IdGerbang": 3, "IdCabang": 12, "Tanggal": "2023-11-01T18:00:00", "Shift": 3, "eFlo": 1},
            {"id": 5, "IdGerbang": 99, "IdCabang": 77, "Tanggal": "2023-11-01T18:30:00", "Shift": 4}
        ]"#,
        )
        .unwrap()
    }

    fn gates() -> Vec<GateRecord> {
        vec![
            gate(1, 16, "Kalihurip", "Jakarta-Cikampek"),
            gate(2, 16, "Cikatama", "Jakarta-Cikampek"),
            gate(3, 12, "Banyumanik", "Semarang"),
        ]
    }

    fn value_of(tallies: &[Tally], label: &str) -> i64 {
        tallies.iter().find(|t| t.label == label).unwrap().value
    }

    #[test]
    fn test_payment_totals_sum_each_counter() {
        let totals = payment_totals(&traffic());
        assert_eq!(totals.len(), PaymentMethod::ALL.len());
        assert_eq!(value_of(&totals, "Tunai"), 8);
        assert_eq!(value_of(&totals, "BCA"), 6);
        assert_eq!(value_of(&totals, "Mandiri"), 7);
        assert_eq!(value_of(&totals, "Dinas Kary"), 1);
        assert_eq!(value_of(&totals, "Nobu"), 0);
    }

    #[test]
    fn test_gate_counts_ignore_unknown_gates() {
        let counts = gate_counts(&gates(), &traffic());
        assert_eq!(
            counts,
            vec![
                Tally::new("Kalihurip", 2),
                Tally::new("Cikatama", 1),
                Tally::new("Banyumanik", 1),
            ]
        );
    }

    #[test]
    fn test_shift_counts_cover_known_shifts_only() {
        let counts = shift_counts(&traffic());
        assert_eq!(
            counts,
            vec![
                Tally::new("Shift 1", 1),
                Tally::new("Shift 2", 1),
                Tally::new("Shift 3", 2),
            ]
        );
    }

    #[test]
    fn test_branch_counts_dedupe_by_name() {
        let counts = branch_counts(&gates(), &traffic());
        assert_eq!(
            counts,
            vec![Tally::new("Jakarta-Cikampek", 3), Tally::new("Semarang", 1)]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let stats = DashboardStats::compute(&[], &[]);
        assert_eq!(stats.record_count, 0);
        assert!(stats.gate_counts.is_empty());
        assert!(stats.branch_counts.is_empty());
        assert!(stats.payment_totals.iter().all(|t| t.value == 0));
        assert!(stats.shift_counts.iter().all(|t| t.value == 0));
    }
}
