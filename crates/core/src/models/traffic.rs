//! Traffic ("lalin") records.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::listing::Searchable;
use crate::models::GateDirectory;
use crate::types::{BranchId, GateId, PaymentCounts, Shift, Timestamp, TrafficId};

/// One logged traffic aggregate for a gate, shift and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficRecord {
    pub id: TrafficId,
    #[serde(rename = "IdGerbang")]
    pub gate_id: GateId,
    #[serde(rename = "IdCabang")]
    pub branch_id: BranchId,
    #[serde(rename = "Tanggal")]
    pub timestamp: Timestamp,
    /// Raw shift code as sent by the backend.
    #[serde(rename = "Shift")]
    pub shift_code: i32,
    #[serde(flatten)]
    pub payments: PaymentCounts,
}

impl TrafficRecord {
    /// The shift, if the code is one of the three known shifts.
    #[must_use]
    pub const fn shift(&self) -> Option<Shift> {
        Shift::from_code(self.shift_code)
    }
}

/// A traffic record joined with the names of its gate and branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficEntry {
    pub record: TrafficRecord,
    pub gate_name: Option<String>,
    pub branch_name: Option<String>,
}

impl TrafficEntry {
    /// Join every record against the gate directory.
    #[must_use]
    pub fn join_all(records: &[TrafficRecord], directory: &GateDirectory<'_>) -> Vec<Self> {
        records
            .iter()
            .map(|record| Self {
                record: record.clone(),
                gate_name: directory.gate_name(record.gate_id).map(ToString::to_string),
                branch_name: directory.branch_name(record.branch_id).map(ToString::to_string),
            })
            .collect()
    }
}

impl Searchable for TrafficEntry {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = vec![Cow::Owned(self.record.gate_id.to_string())];
        fields.extend(self.gate_name.as_deref().map(Cow::Borrowed));
        fields.extend(self.branch_name.as_deref().map(Cow::Borrowed));
        fields
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_row() {
        let json = r#"{
            "id": 1,
            "IdCabang": 16,
            "IdGerbang": 7,
            "Tanggal": "2023-11-01T08:00:00.000Z",
            "Shift": 2,
            "IdGardu": 3,
            "Golongan": 1,
            "Tunai": 10,
            "eMandiri": 1,
            "eBri": null,
            "DinasKary": 4
        }"#;
        let record: TrafficRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.gate_id, GateId::new(7));
        assert_eq!(record.branch_id, BranchId::new(16));
        assert_eq!(record.shift(), Some(Shift::Second));
        assert_eq!(record.payments.cash, 10);
        assert_eq!(record.payments.bri, 0);
        assert_eq!(record.payments.service_employee, 4);
        assert_eq!(record.timestamp.time_of_day(), "15:00:00");
    }

    #[test]
    fn test_entries_search_on_joined_names() {
        use crate::listing::filter_items;
        use crate::models::GateRecord;

        let gates = vec![GateRecord {
            id: GateId::new(7),
            branch_id: BranchId::new(16),
            gate_name: "Cikatama".to_string(),
            branch_name: "Jakarta-Cikampek".to_string(),
        }];
        let json = r#"[
            {"id": 1, "IdCabang": 16, "IdGerbang": 7, "Tanggal": "2023-11-01T08:00:00", "Shift": 1},
            {"id": 2, "IdCabang": 3, "IdGerbang": 42, "Tanggal": "2023-11-01T09:00:00", "Shift": 1}
        ]"#;
        let records: Vec<TrafficRecord> = serde_json::from_str(json).unwrap();
        let entries = TrafficEntry::join_all(&records, &GateDirectory::new(&gates));

        assert_eq!(entries[0].gate_name.as_deref(), Some("Cikatama"));
        assert_eq!(entries[1].gate_name, None);

        assert_eq!(filter_items(&entries, "cikampek").len(), 1);
        assert_eq!(filter_items(&entries, "42")[0].record.id, TrafficId::new(2));
    }

    #[test]
    fn test_unknown_shift_code_has_no_shift() {
        let json = r#"{"id": 2, "IdCabang": 1, "IdGerbang": 1, "Tanggal": "2023-11-01T00:00:00", "Shift": 9}"#;
        let record: TrafficRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.shift(), None);
        assert_eq!(record.payments.total(), 0);
    }
}
