//! Payment methods and per-record payment counters.

use serde::{Deserialize, Deserializer, Serialize};

/// A payment channel counted on every traffic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    /// Cash (`Tunai`).
    Cash,
    Mandiri,
    Bri,
    Bni,
    Bca,
    Nobu,
    Dki,
    Mega,
    Flo,
    /// Operator service pass (`DinasOpr`).
    ServiceOperator,
    /// Partner service pass (`DinasMitra`).
    ServicePartner,
    /// Employee service pass (`DinasKary`).
    ServiceEmployee,
}

impl PaymentMethod {
    /// Every counter in dashboard order.
    pub const ALL: [Self; 12] = [
        Self::Cash,
        Self::Mandiri,
        Self::Bri,
        Self::Bni,
        Self::Bca,
        Self::Nobu,
        Self::Dki,
        Self::Mega,
        Self::Flo,
        Self::ServiceOperator,
        Self::ServicePartner,
        Self::ServiceEmployee,
    ];

    /// The counters exported to CSV after the cash column.
    pub const ELECTRONIC: [Self; 8] = [
        Self::Mandiri,
        Self::Bri,
        Self::Bni,
        Self::Bca,
        Self::Nobu,
        Self::Dki,
        Self::Mega,
        Self::Flo,
    ];

    /// Backend field name for this counter.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Cash => "Tunai",
            Self::Mandiri => "eMandiri",
            Self::Bri => "eBri",
            Self::Bni => "eBni",
            Self::Bca => "eBca",
            Self::Nobu => "eNobu",
            Self::Dki => "eDKI",
            Self::Mega => "eMega",
            Self::Flo => "eFlo",
            Self::ServiceOperator => "DinasOpr",
            Self::ServicePartner => "DinasMitra",
            Self::ServiceEmployee => "DinasKary",
        }
    }

    /// Short column label used in tables and the CSV header.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Tunai",
            Self::Mandiri => "Mandiri",
            Self::Bri => "BRI",
            Self::Bni => "BNI",
            Self::Bca => "BCA",
            Self::Nobu => "Nobu",
            Self::Dki => "DKI",
            Self::Mega => "Mega",
            Self::Flo => "Flo",
            Self::ServiceOperator => "Dinas Opr",
            Self::ServicePartner => "Dinas Mitra",
            Self::ServiceEmployee => "Dinas Kary",
        }
    }
}

/// Payment counters of one traffic record.
///
/// Missing or `null` counters deserialize as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCounts {
    #[serde(rename = "Tunai", default, deserialize_with = "nullable_count")]
    pub cash: i64,
    #[serde(rename = "eMandiri", default, deserialize_with = "nullable_count")]
    pub mandiri: i64,
    #[serde(rename = "eBri", default, deserialize_with = "nullable_count")]
    pub bri: i64,
    #[serde(rename = "eBni", default, deserialize_with = "nullable_count")]
    pub bni: i64,
    #[serde(rename = "eBca", default, deserialize_with = "nullable_count")]
    pub bca: i64,
    #[serde(rename = "eNobu", default, deserialize_with = "nullable_count")]
    pub nobu: i64,
    #[serde(rename = "eDKI", default, deserialize_with = "nullable_count")]
    pub dki: i64,
    #[serde(rename = "eMega", default, deserialize_with = "nullable_count")]
    pub mega: i64,
    #[serde(rename = "eFlo", default, deserialize_with = "nullable_count")]
    pub flo: i64,
    #[serde(rename = "DinasOpr", default, deserialize_with = "nullable_count")]
    pub service_operator: i64,
    #[serde(rename = "DinasMitra", default, deserialize_with = "nullable_count")]
    pub service_partner: i64,
    #[serde(rename = "DinasKary", default, deserialize_with = "nullable_count")]
    pub service_employee: i64,
}

impl PaymentCounts {
    /// Counter value for a payment method.
    #[must_use]
    pub const fn get(&self, method: PaymentMethod) -> i64 {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::Mandiri => self.mandiri,
            PaymentMethod::Bri => self.bri,
            PaymentMethod::Bni => self.bni,
            PaymentMethod::Bca => self.bca,
            PaymentMethod::Nobu => self.nobu,
            PaymentMethod::Dki => self.dki,
            PaymentMethod::Mega => self.mega,
            PaymentMethod::Flo => self.flo,
            PaymentMethod::ServiceOperator => self.service_operator,
            PaymentMethod::ServicePartner => self.service_partner,
            PaymentMethod::ServiceEmployee => self.service_employee,
        }
    }

    /// Sum over every counter.
    #[must_use]
    pub fn total(&self) -> i64 {
        PaymentMethod::ALL.iter().map(|m| self.get(*m)).sum()
    }
}

fn nullable_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_default_missing_and_null_to_zero() {
        let counts: PaymentCounts =
            serde_json::from_str(r#"{"Tunai": 10, "eMandiri": null, "eFlo": 3}"#).unwrap();
        assert_eq!(counts.cash, 10);
        assert_eq!(counts.mandiri, 0);
        assert_eq!(counts.bca, 0);
        assert_eq!(counts.get(PaymentMethod::Flo), 3);
        assert_eq!(counts.total(), 13);
    }

    #[test]
    fn test_field_names_match_wire_format() {
        let counts = PaymentCounts {
            dki: 4,
            ..PaymentCounts::default()
        };
        let json = serde_json::to_value(counts).unwrap();
        for method in PaymentMethod::ALL {
            assert!(json.get(method.field_name()).is_some(), "{method:?}");
        }
        assert_eq!(json["eDKI"], 4);
    }
}
