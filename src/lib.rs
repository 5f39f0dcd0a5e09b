//! Pantry Planner Library
//!
//! Recipe search, pantry inventory and shopping list planning.

pub mod auth;
pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod shopping;
pub mod spoonacular;
pub mod tools;
pub mod units;
