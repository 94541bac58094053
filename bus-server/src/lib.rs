//! Mo Bus route planner server.
//!
//! Answers questions about the Mo Bus network: which routes run between two
//! places, how to get there with at most one change, what it costs, and
//! which stops are close by.

pub mod cache;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod fare;
pub mod geocoding;
pub mod planner;
pub mod web;
