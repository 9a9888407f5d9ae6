pub mod config;
pub mod domain;
pub mod errors;
pub mod knowledge;

pub use domain::faq::FaqEntry;
pub use domain::order::{OrderId, OrderRecord, OrderStatus};
pub use errors::{ApplicationError, DomainError};
pub use knowledge::{FaqBook, FaqMatch, FaqSearch, KnowledgeBase, OrderBook, OrderLookup};
