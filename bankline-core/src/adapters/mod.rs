//! Adapter implementations
//!
//! Adapters bind the core to concrete technologies. DuckDB is the only
//! persistence provider; everything above it sees plain domain types.

pub mod duckdb;
