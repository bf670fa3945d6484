//! Empaque — Rust-native build-recipe orchestration.
//!
//! One recipe, one working folder, one linear pipeline:
//! fetch → patch|configure → build → package.

pub mod build;
pub mod cli;
pub mod core;
pub mod exec;
pub mod package;
pub mod patch;
pub mod source;
pub mod trace;
