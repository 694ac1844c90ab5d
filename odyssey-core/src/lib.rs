//! Decade-journey engine with an AI-generated roadmap.
//!
//! This crate provides:
//! - The walk progression state machine (distance, thresholds, milestone
//!   reveals, completion)
//! - A journey controller owning the phase machine and persistence policy
//! - The roadmap provider boundary with a Gemini-backed implementation
//! - The journey store boundary with a file-backed implementation
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use odyssey_core::{
//!     FileStore, GeminiRoadmap, JourneyController, LastJourneyMarker, UserContext,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(GeminiRoadmap::from_env()?);
//!     let store = Arc::new(FileStore::new(".odyssey/journeys"));
//!     let marker = LastJourneyMarker::new(".odyssey/last_journey");
//!
//!     let mut controller = JourneyController::new(provider, store, marker);
//!     controller.open_intro_form();
//!     controller
//!         .start_new_journey(UserContext::new("Gabriel", "where I am", "where I'm going"))
//!         .await?;
//!
//!     // Drive one simulation tick with forward intent.
//!     controller.apply_tick(true, false);
//!     Ok(())
//! }
//! ```

pub mod model;
pub mod progress;
pub mod roadmap;
pub mod session;
pub mod store;
pub mod testing;

// Primary public API
pub use model::{Milestone, Progression, SavedJourney, UserContext};
pub use progress::{TickEvent, OVERRUN_MARGIN, STEP, STEP_VELOCITY, TICK_INTERVAL};
pub use roadmap::{GeminiRoadmap, RoadmapConfig, RoadmapError, RoadmapProvider, MILESTONE_COUNT};
pub use session::{JourneyController, JourneyError, Phase};
pub use store::{FileStore, JourneyStore, LastJourneyMarker, StoreError, PAGE_SIZE};
