#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`LocatorError`)
//! - [`config`]: Locator configuration (`LocatorConfig`, builder)
//! - [`matcher`]: Approximate product-name matching
//! - [`direction`]: Bounding-box direction resolution
//! - [`detector`]: External detector abstraction (`DetectionGateway` trait, `HttpDetectionGateway`)
//! - [`cache`]: Per-user shelf scan store with TTL (`ShelfScanCache`)
//! - [`catalog`]: Product/allergy catalog (`ProductCatalog` trait, `InMemoryCatalog`)
//! - [`allergy`]: Allergy conflict check (`AllergyAnnotator`)
//! - [`engine`]: Main orchestrator (`LocatorEngine`, `LocatorEngineBuilder`)
//!
//! # Architecture
//!
//! ```text
//! shelf images --> DetectionGateway.detect_shelf() --> ShelfScanCache.put()
//!                                                          |
//!                                      matcher::build_match_set() --> MatchSet
//!
//! current frame --> DetectionGateway.detect_current_frame()
//!                        |
//!             ShelfScanCache.get() + matcher
//!                        |
//!          direction::resolve()  |  AllergyAnnotator (single product)
//!                        |
//!                   LocateResult
//! ```

pub mod allergy;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod detector;
pub mod direction;
pub mod engine;
pub mod error;
pub mod matcher;

// --- Public API Re-exports ---

// Engine (main orchestrator)
pub use engine::{LocatorEngine, LocatorEngineBuilder};

// Configuration
pub use config::{LocatorConfig, LocatorConfigBuilder};

// Error
pub use error::LocatorError;

// Detector
pub use detector::{DetectionGateway, HttpDetectionGateway};

// Cache
pub use cache::ShelfScanCache;

// Catalog
pub use catalog::{InMemoryCatalog, ProductCatalog};

// Allergy
pub use allergy::AllergyAnnotator;
