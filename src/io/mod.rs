pub mod catalog_io;
pub mod config_io;
pub mod lock;
pub mod market_io;
pub mod prefs;
pub mod recovery;
pub mod repository;
