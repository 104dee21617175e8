pub mod entries;
pub mod listing;
pub mod log;
pub mod pagination;
pub mod query;
pub mod validate;
