//! Testing utilities for the journey engine.
//!
//! This module provides deterministic doubles for the two external
//! collaborators:
//! - `MockRoadmap` for roadmap generation without API calls
//! - `MemoryStore` for persistence without a filesystem, with failure
//!   injection

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::model::{Milestone, SavedJourney, UserContext};
use crate::roadmap::{RoadmapError, RoadmapProvider};
use crate::store::{JourneyStore, StoreError, PAGE_SIZE};

/// A roadmap provider that returns a scripted result.
pub struct MockRoadmap {
    milestones: Option<Vec<Milestone>>,
    calls: AtomicUsize,
}

impl MockRoadmap {
    /// Always return the given milestones.
    pub fn returning(milestones: Vec<Milestone>) -> Self {
        Self {
            milestones: Some(milestones),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail as if the model returned nothing usable.
    pub fn failing() -> Self {
        Self {
            milestones: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `generate` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoadmapProvider for MockRoadmap {
    async fn generate(&self, _context: &UserContext) -> Result<Vec<Milestone>, RoadmapError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.milestones {
            Some(milestones) => Ok(milestones.clone()),
            None => Err(RoadmapError::Empty),
        }
    }
}

/// An in-memory journey store with failure injection.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, SavedJourney>>,
    failing: AtomicBool,
    upserts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail as unreachable.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// How many upserts have been performed.
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    /// Seed a record directly, bypassing the upsert counter.
    pub async fn insert(&self, journey: SavedJourney) {
        self.records
            .lock()
            .await
            .insert(journey.id.clone(), journey);
    }

    fn check_reachable(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl JourneyStore for MemoryStore {
    async fn upsert(&self, journey: &SavedJourney) -> Result<(), StoreError> {
        self.check_reachable()?;
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .await
            .insert(journey.id.clone(), journey.clone());
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<SavedJourney>, StoreError> {
        self.check_reachable()?;
        let mut journeys: Vec<SavedJourney> =
            self.records.lock().await.values().cloned().collect();
        journeys.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        journeys.truncate(PAGE_SIZE);
        Ok(journeys)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<SavedJourney>, StoreError> {
        self.check_reachable()?;
        Ok(self.records.lock().await.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.check_reachable()?;
        self.records.lock().await.remove(id);
        Ok(())
    }
}

/// A context with both required fields filled in.
pub fn sample_context() -> UserContext {
    UserContext::new(
        "Gabriel",
        "Junior developer at a small studio",
        "Lead my own game studio",
    )
}

/// A chronological milestone sequence of the given length.
pub fn sample_milestones(count: usize) -> Vec<Milestone> {
    (0..count)
        .map(|i| Milestone {
            year: 2026 + i as i32,
            title: format!("Milestone for {}", 2026 + i as i32),
            description: format!("What the year {} delivered", 2026 + i as i32),
            advice: "Trust the long road".to_string(),
            challenge: "A year of hard trade-offs".to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_roadmap_counts_calls() {
        let provider = MockRoadmap::returning(sample_milestones(10));
        assert_eq!(provider.calls(), 0);

        provider.generate(&sample_context()).await.unwrap();
        provider.generate(&sample_context()).await.unwrap();
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_memory_store_failure_injection() {
        let store = MemoryStore::new();
        let journey = SavedJourney::new(sample_context(), sample_milestones(10));

        store.upsert(&journey).await.unwrap();
        store.set_failing(true);
        assert!(store.get_all().await.is_err());

        store.set_failing(false);
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }
}
