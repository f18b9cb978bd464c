pub mod config;
pub mod draft;
pub mod filter;
pub mod item;
pub mod locale;
pub mod market;

pub use config::*;
pub use draft::*;
pub use filter::*;
pub use item::*;
pub use locale::*;
pub use market::*;
