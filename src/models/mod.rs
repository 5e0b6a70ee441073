//! Database models and DTOs for all domain entities.

pub mod statistic;
