//! Pipeline module - loading, derivations and the statistical steps

pub mod correlation;
pub mod derive;
pub mod describe;
pub mod error;
pub mod groups;
pub mod histogram;
pub mod loader;
pub mod recode;
pub mod regression;
pub mod schema;

pub use correlation::*;
pub use derive::*;
pub use describe::*;
pub use error::*;
pub use groups::*;
pub use histogram::*;
pub use loader::*;
pub use recode::*;
pub use regression::*;
pub use schema::*;
