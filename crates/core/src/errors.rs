use thiserror::Error;

use crate::domain::order::OrderId;

pub const ORDER_NOT_FOUND_MESSAGE: &str = "I'm sorry, but I couldn't find that order. Please check the order ID and try again. Order IDs typically start with 'ORD' followed by numbers (e.g., ORD001).";

pub const TECHNICAL_DIFFICULTY_MESSAGE: &str = "I apologize, but I'm experiencing technical difficulties. Please try again or contact our support team directly.";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Order {order_id} not found in our system")]
    OrderNotFound { order_id: OrderId },
    #[error("invalid order id `{0}`")]
    InvalidOrderId(String),
}

impl DomainError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::OrderNotFound { .. } | Self::InvalidOrderId(_) => ORDER_NOT_FOUND_MESSAGE,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("integration failure: {0}")]
    Integration(String),
}

impl ApplicationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(domain) => domain.user_message(),
            Self::Integration(_) => TECHNICAL_DIFFICULTY_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::order::OrderId;
    use crate::errors::{
        ApplicationError, DomainError, ORDER_NOT_FOUND_MESSAGE, TECHNICAL_DIFFICULTY_MESSAGE,
    };

    #[test]
    fn order_not_found_renders_normalized_id() {
        let error = DomainError::OrderNotFound { order_id: OrderId::normalize("ord999") };
        assert_eq!(error.to_string(), "Order ORD999 not found in our system");
    }

    #[test]
    fn domain_error_keeps_scripted_apology_through_application_layer() {
        let error = ApplicationError::from(DomainError::OrderNotFound {
            order_id: OrderId::normalize("ORD999"),
        });
        assert_eq!(error.user_message(), ORDER_NOT_FOUND_MESSAGE);
    }

    #[test]
    fn integration_error_maps_to_technical_difficulty() {
        let error = ApplicationError::Integration("completion backend offline".to_owned());
        assert_eq!(error.user_message(), TECHNICAL_DIFFICULTY_MESSAGE);
        assert_eq!(error.to_string(), "integration failure: completion backend offline");
    }
}
