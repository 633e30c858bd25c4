//! Data models shared by the classification and extraction stages.

pub mod category;
pub mod config;
pub mod fields;
