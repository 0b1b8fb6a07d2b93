// src/core/mod.rs

pub mod config;
pub mod credentials;
pub mod pagination;
pub mod paths;
pub mod pattern;
pub mod query;
pub mod registry;
pub mod shaper;
pub mod switches;
