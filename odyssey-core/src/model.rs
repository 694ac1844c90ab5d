//! Core data model for a decade journey.
//!
//! A journey is created from the user's context, carries a fixed ordered
//! sequence of generated milestones, and tracks walk progression. The whole
//! record is what gets persisted and resumed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who the traveler is and where they are headed.
///
/// Immutable once a journey starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    /// Traveler's name.
    pub name: String,

    /// Where they are today, in their own words.
    pub current_status: String,

    /// Where they want to be in ten years.
    pub ten_year_goal: String,
}

impl UserContext {
    pub fn new(
        name: impl Into<String>,
        current_status: impl Into<String>,
        ten_year_goal: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            current_status: current_status.into(),
            ten_year_goal: ten_year_goal.into(),
        }
    }
}

/// One checkpoint on the generated roadmap.
///
/// Milestones form an ordered sequence; insertion order is chronological
/// order, and the sequence length is fixed for the life of a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Calendar year this milestone belongs to.
    pub year: i32,

    /// Short headline for the milestone.
    pub title: String,

    /// What has been achieved by the end of that year.
    pub description: String,

    /// Encouragement for the stretch ahead.
    pub advice: String,

    /// A realistic obstacle on the way there.
    pub challenge: String,
}

/// Walk progression through the milestone sequence.
///
/// `current_index` is the index of the most recently revealed milestone, or
/// -1 when none has been revealed yet. It never reaches the milestone count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    /// Cumulative walked distance; never negative.
    pub distance: f64,

    /// Index of the last revealed milestone, or -1.
    pub current_index: i32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            distance: 0.0,
            current_index: -1,
        }
    }
}

/// A complete persisted journey: everything needed to resume a walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedJourney {
    /// Stable identity of this journey in the store.
    pub id: String,

    /// The traveler's context.
    pub context: UserContext,

    /// The generated roadmap, in chronological order.
    pub milestones: Vec<Milestone>,

    /// Current walk progression.
    pub progression: Progression,

    /// Unix seconds of the last write; drives most-recent-first listing.
    #[serde(default)]
    pub updated_at: u64,
}

impl SavedJourney {
    /// Create a fresh journey with a newly generated id and zero progression.
    pub fn new(context: UserContext, milestones: Vec<Milestone>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            context,
            milestones,
            progression: Progression::default(),
            updated_at: unix_now(),
        }
    }

    /// Stamp the record with the current time before a write.
    pub fn touch(&mut self) {
        self.updated_at = unix_now();
    }

    /// Whether a loaded record conforms to the data model.
    ///
    /// Used on resume: a record that fails this check is treated as corrupt
    /// rather than installed as the active journey.
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_empty()
            && !self.milestones.is_empty()
            && self.progression.distance.is_finite()
            && self.progression.distance >= 0.0
            && self.progression.current_index >= -1
            && self.progression.current_index < self.milestones.len() as i32
    }

    /// The most recently revealed milestone, if any.
    pub fn current_milestone(&self) -> Option<&Milestone> {
        usize::try_from(self.progression.current_index)
            .ok()
            .and_then(|i| self.milestones.get(i))
    }
}

/// Current unix time in seconds.
pub(crate) fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
