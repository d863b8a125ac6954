// salesflow-core/src/lib.rs

// 1. Docs are not mandatory yet
#![allow(missing_docs)]
// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Contracts for reading tables and storing models.
pub mod ports;

// 2. Domain (Cœur du métier)
// Reshape rules, feature inference, boosted trees, metrics.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure (Adapters)
// CSV files, JSON model store, YAML config, input discovery.
pub mod infrastructure;

// 4. Application (Use Cases)
// Preprocess, train, check.
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::SalesflowError;
