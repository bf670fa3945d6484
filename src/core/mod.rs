//! Recipe model, platform classification, option translation, and the
//! pipeline executor.

pub mod executor;
pub mod options;
pub mod parser;
pub mod platform;
pub mod types;
