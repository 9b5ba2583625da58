//! Toll gate master data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{BranchId, GateId};

/// A toll gate and the branch it belongs to.
///
/// Identifiers are assigned by the operator at creation, not by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateRecord {
    pub id: GateId,
    #[serde(rename = "IdCabang")]
    pub branch_id: BranchId,
    #[serde(rename = "NamaGerbang")]
    pub gate_name: String,
    #[serde(rename = "NamaCabang")]
    pub branch_name: String,
}

/// Key identifying a gate for deletion (`{id, IdCabang}` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateKey {
    pub id: GateId,
    #[serde(rename = "IdCabang")]
    pub branch_id: BranchId,
}

impl GateRecord {
    /// The delete key of this gate.
    #[must_use]
    pub const fn key(&self) -> GateKey {
        GateKey {
            id: self.id,
            branch_id: self.branch_id,
        }
    }
}

/// Best-effort lookups from traffic ids into the gate collection.
///
/// Nothing guarantees that a traffic record's gate exists; a miss is `None`.
#[derive(Debug, Default)]
pub struct GateDirectory<'a> {
    by_gate: HashMap<GateId, &'a GateRecord>,
    by_branch: HashMap<BranchId, &'a GateRecord>,
}

impl<'a> GateDirectory<'a> {
    /// Index a gate collection. The first gate wins on duplicate ids.
    #[must_use]
    pub fn new(gates: &'a [GateRecord]) -> Self {
        let mut directory = Self::default();
        for gate in gates {
            directory.by_gate.entry(gate.id).or_insert(gate);
            directory.by_branch.entry(gate.branch_id).or_insert(gate);
        }
        directory
    }

    /// Gate name for a gate id.
    #[must_use]
    pub fn gate_name(&self, id: GateId) -> Option<&'a str> {
        self.by_gate.get(&id).map(|g| g.gate_name.as_str())
    }

    /// Branch name for a branch id.
    #[must_use]
    pub fn branch_name(&self, id: BranchId) -> Option<&'a str> {
        self.by_branch.get(&id).map(|g| g.branch_name.as_str())
    }
}

/// Validation failures for gate input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateValidationError {
    /// One or more of the four fields is empty.
    #[error("Id Gerbang, Id Cabang, Nama Gerbang, and Nama Cabang are required.")]
    MissingFields,

    /// An identifier is not an integer.
    #[error("{0} must be an integer")]
    NotAnInteger(&'static str),
}

/// Unvalidated gate input as typed by the operator.
///
/// All fields arrive as text; [`GateDraft::validate`] turns them into a
/// [`GateRecord`] without touching the network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDraft {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub branch_id: String,
    #[serde(default)]
    pub gate_name: String,
    #[serde(default)]
    pub branch_name: String,
}

impl GateDraft {
    /// Pre-fill a draft from an existing record (edit form).
    #[must_use]
    pub fn from_record(record: &GateRecord) -> Self {
        Self {
            id: record.id.to_string(),
            branch_id: record.branch_id.to_string(),
            gate_name: record.gate_name.clone(),
            branch_name: record.branch_name.clone(),
        }
    }

    /// Validate the draft into a record.
    ///
    /// # Errors
    ///
    /// Returns `MissingFields` if any field is blank, or `NotAnInteger` if an
    /// identifier does not parse.
    pub fn validate(&self) -> Result<GateRecord, GateValidationError> {
        let fields = [&self.id, &self.branch_id, &self.gate_name, &self.branch_name];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(GateValidationError::MissingFields);
        }

        let id = self
            .id
            .parse::<GateId>()
            .map_err(|_| GateValidationError::NotAnInteger("Id Gerbang"))?;
        let branch_id = self
            .branch_id
            .parse::<BranchId>()
            .map_err(|_| GateValidationError::NotAnInteger("Id Cabang"))?;

        Ok(GateRecord {
            id,
            branch_id,
            gate_name: self.gate_name.trim().to_string(),
            branch_name: self.branch_name.trim().to_string(),
        })
    }

    /// Validate the draft as an update of `original`.
    ///
    /// The identifier of the original record wins over whatever the draft
    /// carries.
    ///
    /// # Errors
    ///
    /// Same as [`GateDraft::validate`].
    pub fn validate_update(&self, original: GateId) -> Result<GateRecord, GateValidationError> {
        let pinned = Self {
            id: original.to_string(),
            ..self.clone()
        };
        pinned.validate()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(id: &str, branch_id: &str, gate: &str, branch: &str) -> GateDraft {
        GateDraft {
            id: id.to_string(),
            branch_id: branch_id.to_string(),
            gate_name: gate.to_string(),
            branch_name: branch.to_string(),
        }
    }

    #[test]
    fn test_gate_record_wire_format() {
        let record = draft("5", "2", "A", "B").validate().unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 5, "IdCabang": 2, "NamaGerbang": "A", "NamaCabang": "B"})
        );
    }

    #[test]
    fn test_gate_key_wire_format() {
        let record = draft("5", "2", "A", "B").validate().unwrap();
        let json = serde_json::to_value(record.key()).unwrap();
        assert_eq!(json, serde_json::json!({"id": 5, "IdCabang": 2}));
    }

    #[test]
    fn test_validate_rejects_each_missing_field() {
        let cases = [
            draft("", "2", "A", "B"),
            draft("5", "", "A", "B"),
            draft("5", "2", "  ", "B"),
            draft("5", "2", "A", ""),
        ];
        for case in cases {
            assert_eq!(case.validate(), Err(GateValidationError::MissingFields));
        }
    }

    #[test]
    fn test_validate_rejects_non_integer_ids() {
        assert_eq!(
            draft("x", "2", "A", "B").validate(),
            Err(GateValidationError::NotAnInteger("Id Gerbang"))
        );
        assert_eq!(
            draft("5", "2.5", "A", "B").validate(),
            Err(GateValidationError::NotAnInteger("Id Cabang"))
        );
    }

    #[test]
    fn test_validate_update_pins_original_id() {
        let record = draft("99", "2", "Gerbang Baru", "Cabang")
            .validate_update(GateId::new(5))
            .unwrap();
        assert_eq!(record.id, GateId::new(5));
        assert_eq!(record.gate_name, "Gerbang Baru");
    }

    #[test]
    fn test_directory_lookups_are_best_effort() {
        let gates = vec![
            draft("1", "16", "Cikatama", "Jakarta-Cikampek").validate().unwrap(),
            draft("2", "16", "Kalihurip", "Jakarta-Cikampek").validate().unwrap(),
        ];
        let directory = GateDirectory::new(&gates);
        assert_eq!(directory.gate_name(GateId::new(2)), Some("Kalihurip"));
        assert_eq!(directory.gate_name(GateId::new(9)), None);
        assert_eq!(
            directory.branch_name(BranchId::new(16)),
            Some("Jakarta-Cikampek")
        );
        assert_eq!(directory.branch_name(BranchId::new(1)), None);
    }

    #[test]
    fn test_from_record_round_trips_through_validate() {
        let record = draft("5", "2", "A", "B").validate().unwrap();
        assert_eq!(GateDraft::from_record(&record).validate().unwrap(), record);
    }
}
