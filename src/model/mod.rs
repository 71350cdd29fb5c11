pub mod avatar;
pub mod catalog;
pub mod config;
pub mod mention;

pub use avatar::*;
pub use catalog::*;
pub use config::*;
pub use mention::*;
