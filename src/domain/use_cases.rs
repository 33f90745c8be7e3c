pub mod catalog;
pub mod extractors;
pub mod reviews;
