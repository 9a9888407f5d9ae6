//! Static support knowledge: the order table and the FAQ table.
//!
//! Both tables are built once at startup and never mutated; callers share a
//! `KnowledgeBase` by reference (or `Arc`) and every lookup is a pure function of its input.

pub mod faq;
pub mod orders;

pub use faq::{FaqBook, FaqMatch, FaqSearch, NO_FAQ_MATCH_MESSAGE};
pub use orders::{OrderBook, OrderLookup};

use crate::errors::DomainError;

#[derive(Clone, Debug, Default)]
pub struct KnowledgeBase {
    orders: OrderBook,
    faqs: FaqBook,
}

impl KnowledgeBase {
    pub fn new(orders: OrderBook, faqs: FaqBook) -> Self {
        Self { orders, faqs }
    }

    pub fn seeded() -> Self {
        Self::new(OrderBook::seeded(), FaqBook::seeded())
    }

    pub fn lookup_order(&self, raw_order_id: &str) -> Result<OrderLookup, DomainError> {
        self.orders.lookup(raw_order_id)
    }

    pub fn search_faq(&self, query: &str) -> FaqSearch {
        self.faqs.search(query)
    }

    pub fn orders(&self) -> &OrderBook {
        &self.orders
    }

    pub fn faqs(&self) -> &FaqBook {
        &self.faqs
    }
}
