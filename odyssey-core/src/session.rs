//! Journey controller - the primary public API for a play-through.
//!
//! The controller owns the top-level phase machine, the active journey, and
//! the collaborators (roadmap provider, journey store, identity marker). It
//! decides when to persist: once on creation, fire-and-forget on each
//! milestone reveal, and never after completion.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::model::{SavedJourney, UserContext};
use crate::progress::{self, TickEvent};
use crate::roadmap::{RoadmapError, RoadmapProvider};
use crate::store::{JourneyStore, LastJourneyMarker, StoreError};

/// Top-level application phase.
///
/// `Finished` is terminal in the sense of requiring an explicit restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Landing,
    Listing,
    IntroForm,
    Generating,
    Playing,
    Finished,
}

/// Errors surfaced by controller operations.
///
/// None of these are fatal; the worst outcome is a routing back to a prior
/// phase with a message.
#[derive(Debug, Error)]
pub enum JourneyError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("failed to generate a roadmap: {0}")]
    Generation(#[from] RoadmapError),

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("saved journey data is corrupted")]
    CorruptData,
}

impl From<StoreError> for JourneyError {
    fn from(e: StoreError) -> Self {
        // A record that exists but cannot be decoded is corrupt data, not a
        // reachability problem.
        match e {
            StoreError::Json(_) => JourneyError::CorruptData,
            other => JourneyError::Store(other),
        }
    }
}

/// Orchestrates the progression engine, store, and roadmap provider for one
/// journey at a time.
pub struct JourneyController {
    provider: Arc<dyn RoadmapProvider>,
    store: Arc<dyn JourneyStore>,
    marker: LastJourneyMarker,
    phase: Phase,
    active: Option<SavedJourney>,
    saved: Vec<SavedJourney>,
}

impl JourneyController {
    /// Create a controller in the Landing phase.
    pub fn new(
        provider: Arc<dyn RoadmapProvider>,
        store: Arc<dyn JourneyStore>,
        marker: LastJourneyMarker,
    ) -> Self {
        Self {
            provider,
            store,
            marker,
            phase: Phase::default(),
            active: None,
            saved: Vec::new(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The active journey, if one is being played.
    pub fn active(&self) -> Option<&SavedJourney> {
        self.active.as_ref()
    }

    /// Saved journeys fetched by the last successful listing.
    pub fn saved(&self) -> &[SavedJourney] {
        &self.saved
    }

    /// Enter the intro form.
    pub fn open_intro_form(&mut self) {
        self.phase = Phase::IntroForm;
    }

    /// Return to the landing screen without touching the active journey.
    pub fn back_to_landing(&mut self) {
        self.phase = Phase::Landing;
    }

    /// Start a brand new journey from the given context.
    ///
    /// Validates the context before any I/O, generates the roadmap, persists
    /// the fresh journey with exactly one store write, and enters Playing.
    /// Generation failure routes back to the intro form; the caller keeps
    /// the form contents.
    pub async fn start_new_journey(&mut self, context: UserContext) -> Result<(), JourneyError> {
        if context.current_status.trim().is_empty() {
            return Err(JourneyError::Validation("Describe where you are today."));
        }
        if context.ten_year_goal.trim().is_empty() {
            return Err(JourneyError::Validation("Describe your ten-year goal."));
        }

        self.phase = Phase::Generating;

        let milestones = match self.provider.generate(&context).await {
            Ok(milestones) => milestones,
            Err(e) => {
                self.phase = Phase::IntroForm;
                return Err(e.into());
            }
        };

        let journey = SavedJourney::new(context, milestones);
        info!(id = %journey.id, "journey created");

        // Persistence is best-effort: a failed create is logged and the
        // journey still starts, locally only, until the next write lands.
        if let Err(e) = self.store.upsert(&journey).await {
            warn!(id = %journey.id, error = %e, "could not persist new journey");
        }
        if let Err(e) = self.marker.write(&journey.id).await {
            warn!(error = %e, "could not record last-journey marker");
        }

        self.active = Some(journey);
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Fetch all saved journeys and enter the Listing phase.
    ///
    /// A reachable-but-empty store is an empty listing, not an error; an
    /// unreachable store routes back to Landing with a `Store` error.
    pub async fn list_saved(&mut self) -> Result<&[SavedJourney], JourneyError> {
        match self.store.get_all().await {
            Ok(journeys) => {
                self.saved = journeys;
                self.phase = Phase::Listing;
                Ok(&self.saved)
            }
            Err(e) => {
                self.phase = Phase::Landing;
                Err(e.into())
            }
        }
    }

    /// Install a saved journey as the active one and enter Playing.
    ///
    /// The journey's id becomes the active identity for future writes and is
    /// recorded in the device-local marker.
    pub async fn resume(&mut self, journey: SavedJourney) -> Result<(), JourneyError> {
        if !journey.is_well_formed() {
            self.phase = Phase::Landing;
            return Err(JourneyError::CorruptData);
        }

        info!(id = %journey.id, distance = journey.progression.distance, "journey resumed");
        if let Err(e) = self.marker.write(&journey.id).await {
            warn!(error = %e, "could not record last-journey marker");
        }
        self.active = Some(journey);
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Default-resume: load the journey named by the device-local marker.
    ///
    /// Returns `Ok(false)` when there is no marker or no matching record.
    pub async fn resume_last(&mut self) -> Result<bool, JourneyError> {
        let Some(id) = self.marker.read().await else {
            return Ok(false);
        };

        match self.store.get_by_id(&id).await {
            Ok(Some(journey)) => {
                self.resume(journey).await?;
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                self.phase = Phase::Landing;
                Err(e.into())
            }
        }
    }

    /// Advance the simulation by one tick.
    ///
    /// On a milestone event the updated journey is persisted by a spawned,
    /// non-awaited write - a slow or failing store never stalls the tick -
    /// and the caller must cancel forward intent and show the milestone
    /// dialog. On completion the phase becomes Finished and nothing further
    /// is persisted. Outside the Playing phase this is a no-op.
    pub fn apply_tick(&mut self, forward: bool, backward: bool) -> Option<TickEvent> {
        if self.phase != Phase::Playing {
            return None;
        }
        let journey = self.active.as_mut()?;

        let (next, event) = progress::tick(
            journey.progression,
            forward,
            backward,
            journey.milestones.len(),
        );
        journey.progression = next;

        match event {
            Some(TickEvent::Milestone(index)) => {
                info!(id = %journey.id, index, "milestone revealed");
                journey.touch();
                let store = Arc::clone(&self.store);
                let snapshot = journey.clone();
                tokio::spawn(async move {
                    if let Err(e) = store.upsert(&snapshot).await {
                        warn!(id = %snapshot.id, error = %e, "milestone save failed; continuing");
                    }
                });
            }
            Some(TickEvent::Finished) => {
                info!(id = %journey.id, "journey finished");
                self.phase = Phase::Finished;
            }
            None => {}
        }

        event
    }

    /// Delete the active journey and reset to Landing.
    ///
    /// Deletion failures are logged only; local state is reset
    /// unconditionally either way.
    pub async fn discard_and_restart(&mut self) {
        if let Some(journey) = self.active.take() {
            if let Err(e) = self.store.delete(&journey.id).await {
                warn!(id = %journey.id, error = %e, "could not delete journey");
            }
            if let Err(e) = self.marker.clear().await {
                warn!(error = %e, "could not clear last-journey marker");
            }
            info!(id = %journey.id, "journey discarded");
        }

        self.saved.clear();
        self.phase = Phase::Landing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_context, sample_milestones, MemoryStore, MockRoadmap};

    fn marker_in(dir: &tempfile::TempDir) -> LastJourneyMarker {
        LastJourneyMarker::new(dir.path().join("last_journey"))
    }

    fn controller(
        provider: Arc<MockRoadmap>,
        store: Arc<MemoryStore>,
        dir: &tempfile::TempDir,
    ) -> JourneyController {
        JourneyController::new(provider, store, marker_in(dir))
    }

    #[tokio::test]
    async fn test_validation_rejects_before_any_io() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockRoadmap::returning(sample_milestones(10)));
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller(Arc::clone(&provider), Arc::clone(&store), &dir);
        ctl.open_intro_form();

        let context = UserContext::new("Ada", "", "run a lab");
        let result = ctl.start_new_journey(context).await;

        assert!(matches!(result, Err(JourneyError::Validation(_))));
        assert_eq!(provider.calls(), 0, "provider must not be called");
        assert_eq!(store.upsert_count(), 0, "store must not be written");
    }

    #[tokio::test]
    async fn test_start_new_journey_persists_once_and_plays() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockRoadmap::returning(sample_milestones(10)));
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller(provider, Arc::clone(&store), &dir);
        ctl.open_intro_form();

        ctl.start_new_journey(sample_context()).await.unwrap();

        assert_eq!(ctl.phase(), Phase::Playing);
        assert_eq!(store.upsert_count(), 1);

        let journey = ctl.active().unwrap();
        assert_eq!(journey.progression.distance, 0.0);
        assert_eq!(journey.progression.current_index, -1);

        // The marker now points at the fresh journey.
        let marker = marker_in(&dir);
        assert_eq!(marker.read().await.as_deref(), Some(journey.id.as_str()));
    }

    #[tokio::test]
    async fn test_generation_failure_returns_to_intro_form() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockRoadmap::failing());
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller(provider, Arc::clone(&store), &dir);
        ctl.open_intro_form();

        let result = ctl.start_new_journey(sample_context()).await;

        assert!(matches!(result, Err(JourneyError::Generation(_))));
        assert_eq!(ctl.phase(), Phase::IntroForm);
        assert_eq!(store.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_listing_empty_store_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockRoadmap::failing());
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller(provider, store, &dir);

        let listed = ctl.list_saved().await.unwrap();
        assert!(listed.is_empty());
        assert_eq!(ctl.phase(), Phase::Listing);
    }

    #[tokio::test]
    async fn test_listing_store_failure_routes_to_landing() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockRoadmap::failing());
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);
        let mut ctl = controller(provider, store, &dir);

        let result = ctl.list_saved().await;
        assert!(matches!(result, Err(JourneyError::Store(_))));
        assert_eq!(ctl.phase(), Phase::Landing);
    }

    #[tokio::test]
    async fn test_resume_rejects_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockRoadmap::failing());
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller(provider, store, &dir);

        let mut journey = SavedJourney::new(sample_context(), sample_milestones(10));
        journey.progression.current_index = 99;

        let result = ctl.resume(journey).await;
        assert!(matches!(result, Err(JourneyError::CorruptData)));
        assert_eq!(ctl.phase(), Phase::Landing);
        assert!(ctl.active().is_none());
    }

    #[tokio::test]
    async fn test_resume_last_follows_marker() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockRoadmap::failing());
        let store = Arc::new(MemoryStore::new());

        let journey = SavedJourney::new(sample_context(), sample_milestones(10));
        store.insert(journey.clone()).await;
        marker_in(&dir).write(&journey.id).await.unwrap();

        let mut ctl = controller(provider, store, &dir);
        assert!(ctl.resume_last().await.unwrap());
        assert_eq!(ctl.phase(), Phase::Playing);
        assert_eq!(ctl.active().unwrap().id, journey.id);
    }

    #[tokio::test]
    async fn test_resume_last_without_marker_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockRoadmap::failing());
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller(provider, store, &dir);

        assert!(!ctl.resume_last().await.unwrap());
        assert_eq!(ctl.phase(), Phase::Landing);
    }

    #[tokio::test]
    async fn test_apply_tick_outside_playing_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockRoadmap::failing());
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller(provider, store, &dir);

        assert_eq!(ctl.apply_tick(true, false), None);
        assert_eq!(ctl.phase(), Phase::Landing);
    }

    #[tokio::test]
    async fn test_milestone_tick_persists_in_background() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockRoadmap::returning(sample_milestones(10)));
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller(provider, Arc::clone(&store), &dir);
        ctl.open_intro_form();
        ctl.start_new_journey(sample_context()).await.unwrap();

        // Walk until the first milestone fires.
        let mut fired = None;
        for _ in 0..250 {
            if let Some(event) = ctl.apply_tick(true, false) {
                fired = Some(event);
                break;
            }
        }
        assert_eq!(fired, Some(TickEvent::Milestone(0)));

        let id = ctl.active().unwrap().id.clone();
        // The write is fire-and-forget; give the spawned task a moment.
        let mut persisted = None;
        for _ in 0..100 {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            if let Some(journey) = store.get_by_id(&id).await.unwrap() {
                if journey.progression.current_index == 0 {
                    persisted = Some(journey);
                    break;
                }
            }
        }
        let persisted = persisted.expect("milestone write should land");
        assert_eq!(persisted.progression.distance, 30.0);
    }

    #[tokio::test]
    async fn test_milestone_store_failure_never_blocks_gameplay() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockRoadmap::returning(sample_milestones(10)));
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller(provider, Arc::clone(&store), &dir);
        ctl.open_intro_form();
        ctl.start_new_journey(sample_context()).await.unwrap();

        store.set_failing(true);

        let mut fired = false;
        for _ in 0..250 {
            if ctl.apply_tick(true, false).is_some() {
                fired = true;
                break;
            }
        }

        assert!(fired, "milestone still fires with a failing store");
        assert_eq!(ctl.phase(), Phase::Playing);
        assert_eq!(ctl.active().unwrap().progression.current_index, 0);
    }

    #[tokio::test]
    async fn test_completion_finishes_once_and_stops_ticking() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockRoadmap::returning(sample_milestones(10)));
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller(provider, Arc::clone(&store), &dir);
        ctl.open_intro_form();
        ctl.start_new_journey(sample_context()).await.unwrap();

        // Place the walk just short of the overrun margin.
        {
            let journey = ctl.active.as_mut().unwrap();
            journey.progression.current_index = 9;
            journey.progression.distance = 10.0 * 30.0 + 10.0 - 0.1;
        }
        let distance_before = ctl.active().unwrap().progression.distance;

        assert_eq!(ctl.apply_tick(true, false), Some(TickEvent::Finished));
        assert_eq!(ctl.phase(), Phase::Finished);
        assert_eq!(ctl.active().unwrap().progression.distance, distance_before);

        // Terminal phase: further ticks are no-ops, completion cannot refire.
        assert_eq!(ctl.apply_tick(true, false), None);
    }

    #[tokio::test]
    async fn test_discard_and_restart_deletes_and_resets() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockRoadmap::returning(sample_milestones(10)));
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller(provider, Arc::clone(&store), &dir);
        ctl.open_intro_form();
        ctl.start_new_journey(sample_context()).await.unwrap();
        let id = ctl.active().unwrap().id.clone();

        ctl.discard_and_restart().await;

        assert_eq!(ctl.phase(), Phase::Landing);
        assert!(ctl.active().is_none());
        assert!(store.get_by_id(&id).await.unwrap().is_none());
        assert_eq!(marker_in(&dir).read().await, None);
    }

    #[tokio::test]
    async fn test_discard_with_failing_store_still_resets() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockRoadmap::returning(sample_milestones(10)));
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller(provider, Arc::clone(&store), &dir);
        ctl.open_intro_form();
        ctl.start_new_journey(sample_context()).await.unwrap();

        store.set_failing(true);
        ctl.discard_and_restart().await;

        assert_eq!(ctl.phase(), Phase::Landing);
        assert!(ctl.active().is_none());
    }
}
