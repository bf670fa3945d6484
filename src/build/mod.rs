//! Build invocation — the standard toolchain lifecycle and the constrained
//! direct cross build.

pub mod cargo;
pub mod cmake;
