pub mod faq;
pub mod order;
