use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::DomainError;

/// Order identifier in canonical form (`ORD` followed by digits, upper-case).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OrderId(pub String);

impl OrderId {
    /// Trims and upper-cases raw customer input. No format check is applied so that
    /// lookups of malformed ids fall through to a lookup miss.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// Strict parse used when pulling ids out of free text.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = Self::normalize(raw);
        if normalized.is_well_formed() {
            Ok(normalized)
        } else {
            Err(DomainError::InvalidOrderId(raw.trim().to_string()))
        }
    }

    /// First well-formed order id mentioned in free text, e.g. `"check order ord002?"`.
    pub fn find_in(text: &str) -> Option<Self> {
        text.split(|ch: char| !ch.is_ascii_alphanumeric())
            .filter(|token| !token.is_empty())
            .find_map(|token| Self::parse(token).ok())
    }

    pub fn is_well_formed(&self) -> bool {
        self.0
            .strip_prefix("ORD")
            .map(|digits| !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit()))
            .unwrap_or(false)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Delivered,
    Shipped,
    Processing,
    Pending,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Shipped => "shipped",
            Self::Processing => "processing",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub tracking: Option<String>,
    pub date: NaiveDate,
    pub amount: String,
}
