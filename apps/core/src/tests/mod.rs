//! Test Module
//!
//! Cross-module test suite for the KlarBot backend.
//!
//! ## Test Categories
//! - `brain_tests`: normalization, extraction and matching across the engine
//! - `pipeline_tests`: full request orchestration with stub and mock collaborators

pub mod pipeline_tests;
