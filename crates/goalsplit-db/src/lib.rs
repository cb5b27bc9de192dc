//! Persistence for decomposed goals: configuration, pool, migrations,
//! row models and queries over the `goals` table.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
