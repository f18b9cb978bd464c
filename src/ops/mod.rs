pub mod catalog_ops;
pub mod catalog_query;
pub mod listing_rules;
pub mod listing_workflow;
pub mod query_url;
