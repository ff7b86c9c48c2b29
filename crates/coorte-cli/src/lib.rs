//! Coorte CLI
//!
//! Ingestion, run orchestration and report rendering for the Coorte
//! backtesting system.
//!
//! # Features
//!
//! - **Ingestion**: CSV batch files and labelled text parameter sheets
//! - **Runner**: fetch → simulate → summarize pipeline with batch isolation
//! - **Reports**: plain-text full/simple reports with currency formatting

pub mod ingest;
pub mod report;
pub mod runner;
