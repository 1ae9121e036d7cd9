//! Report module - terminal tables, LaTeX output and JSON export

pub mod export;
pub mod latex;
pub mod summary;
pub mod tables;

pub use export::*;
pub use latex::*;
pub use summary::*;
pub use tables::*;
