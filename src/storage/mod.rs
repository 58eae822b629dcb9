//! Storage modules: config, identity

pub mod config;
pub mod identity;
