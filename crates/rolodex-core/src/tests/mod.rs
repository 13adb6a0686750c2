//! Scenario tests for rolodex-core
//!
//! Unit tests live beside their modules. These exercise the pieces together:
//! - Debounced dispatch against scripted, delayed and failing sources
//! - The palette flow from opening to navigation
//! - Recent searches across palette sessions
//! - Wiring a palette from configuration on disk

mod dispatch_tests;
