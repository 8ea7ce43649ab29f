//! Points ledger models

use serde::{Deserialize, Serialize};

/// Ledger transaction kind, an integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum TransactionType {
    /// Daily check-in reward
    Daily,
    /// Consecutive-streak bonus
    ConsecutiveBonus,
    /// Retroactive check-in (a deduction on the server side)
    Retroactive,
    /// Unrecognized wire value, preserved as-is
    Other(i32),
}

impl From<i32> for TransactionType {
    fn from(value: i32) -> Self {
        match value {
            1 => Self::Daily,
            2 => Self::ConsecutiveBonus,
            3 => Self::Retroactive,
            other => Self::Other(other),
        }
    }
}

impl From<TransactionType> for i32 {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Daily => 1,
            TransactionType::ConsecutiveBonus => 2,
            TransactionType::Retroactive => 3,
            TransactionType::Other(other) => other,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "check-in"),
            Self::ConsecutiveBonus => write!(f, "bonus"),
            Self::Retroactive => write!(f, "retro-check-in"),
            Self::Other(code) => write!(f, "other({})", code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsRecord {
    pub points_change: i64,
    pub transaction_type: TransactionType,
    pub description: String,
    pub transaction_time: String,
}

/// One page of the points ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsRecordsPage {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub list: Vec<PointsRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointsSummary {
    #[serde(default)]
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_maps_known_codes() {
        assert_eq!(TransactionType::from(1), TransactionType::Daily);
        assert_eq!(TransactionType::from(2), TransactionType::ConsecutiveBonus);
        assert_eq!(TransactionType::from(3), TransactionType::Retroactive);
        assert_eq!(TransactionType::from(9), TransactionType::Other(9));
        assert_eq!(i32::from(TransactionType::Other(9)), 9);
    }

    #[test]
    fn record_deserializes_from_wire_shape() {
        let record: PointsRecord = serde_json::from_str(
            r#"{
                "pointsChange": -5,
                "transactionType": 3,
                "description": "make-up for 2024-12-15",
                "transactionTime": "2024-12-16 09:00:00"
            }"#,
        )
        .unwrap();
        assert_eq!(record.points_change, -5);
        assert_eq!(record.transaction_type, TransactionType::Retroactive);
    }
}
