//! Goal decomposition and the goal service built on top of it.

pub mod decompose;
pub mod service;
