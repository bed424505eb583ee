#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Terminal admin console for sport club, event, and news content.

pub mod api;
pub mod config;
pub mod model;
pub mod session;
pub mod tui;
