//! Command handlers

pub mod bookmark;
pub mod config;
pub mod corpus;
pub mod status;
