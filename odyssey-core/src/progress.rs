//! Walk progression engine.
//!
//! Pure, deterministic mapping from movement intent and one simulation tick
//! to updated progression state, plus the decision of whether a milestone
//! reveal or journey completion fires. No I/O lives here.
//!
//! Each tick applies exactly one of: forward milestone trigger, backward
//! index rewind, completion, or plain advance. Forward intent wins over
//! backward intent when both are asserted in the same tick, both for the
//! movement step and for event priority.

use std::time::Duration;

use crate::model::Progression;

/// Distance units between consecutive milestone thresholds.
pub const STEP: f64 = 30.0;

/// Distance units walked per simulation tick.
pub const STEP_VELOCITY: f64 = 0.15;

/// Extra distance past the last milestone before the journey completes.
pub const OVERRUN_MARGIN: f64 = 10.0;

/// Period of the simulation tick timer.
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// A discrete event produced by a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// A milestone crossed its threshold and should be revealed.
    ///
    /// Distance has been snapped to the milestone's canonical checkpoint;
    /// the caller must cancel forward intent so the walk pauses.
    Milestone(usize),

    /// The walk passed the overrun margin beyond the last milestone.
    ///
    /// State is left unchanged by the completing tick.
    Finished,
}

/// Advance the progression by one tick.
///
/// `milestone_count` bounds the trigger index: the reported milestone index
/// is always strictly below it.
pub fn tick(
    state: Progression,
    forward: bool,
    backward: bool,
    milestone_count: usize,
) -> (Progression, Option<TickEvent>) {
    if !forward && !backward {
        return (state, None);
    }

    // Forward wins when both intents are asserted.
    let move_step = if forward { STEP_VELOCITY } else { -STEP_VELOCITY };
    let next_distance = (state.distance + move_step).max(0.0);
    let trigger_index = (next_distance / STEP).floor() as i32 - 1;

    if forward && trigger_index > state.current_index && trigger_index < milestone_count as i32 {
        // Snap to the checkpoint so the milestone is met at a stable,
        // reproducible distance regardless of per-tick rounding.
        let snapped = Progression {
            distance: (trigger_index as f64 + 1.0) * STEP,
            current_index: trigger_index,
        };
        return (snapped, Some(TickEvent::Milestone(trigger_index as usize)));
    }

    if backward && trigger_index < state.current_index {
        // Retreating below a threshold un-reveals the milestone without
        // re-triggering it; distance is not snapped on the way down.
        let rewound = Progression {
            distance: next_distance,
            current_index: trigger_index,
        };
        return (rewound, None);
    }

    if next_distance >= milestone_count as f64 * STEP + OVERRUN_MARGIN {
        return (state, Some(TickEvent::Finished));
    }

    (
        Progression {
            distance: next_distance,
            ..state
        },
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 10;

    fn at(distance: f64, current_index: i32) -> Progression {
        Progression {
            distance,
            current_index,
        }
    }

    /// Walk forward until an event fires, bounded by `max_ticks`.
    fn walk_forward_until_event(
        mut state: Progression,
        max_ticks: usize,
    ) -> (Progression, Option<TickEvent>, usize) {
        for ticks in 1..=max_ticks {
            let (next, event) = tick(state, true, false, N);
            state = next;
            if event.is_some() {
                return (state, event, ticks);
            }
        }
        (state, None, max_ticks)
    }

    #[test]
    fn test_no_intent_no_change() {
        let state = at(42.0, 0);
        let (next, event) = tick(state, false, false, N);
        assert_eq!(next, state);
        assert_eq!(event, None);
    }

    #[test]
    fn test_forward_advances_by_velocity() {
        let (next, event) = tick(at(1.0, -1), true, false, N);
        assert_eq!(next.distance, 1.0 + STEP_VELOCITY);
        assert_eq!(next.current_index, -1);
        assert_eq!(event, None);
    }

    #[test]
    fn test_first_milestone_triggers_and_snaps() {
        let (state, event, ticks) = walk_forward_until_event(Progression::default(), 250);

        assert_eq!(event, Some(TickEvent::Milestone(0)));
        assert_eq!(state.current_index, 0);
        // Overshoot is discarded: the checkpoint is exact.
        assert_eq!(state.distance, STEP);
        // 30.0 / 0.15 = 200 ticks, give or take float accumulation.
        assert!((199..=201).contains(&ticks), "fired after {ticks} ticks");
    }

    #[test]
    fn test_milestone_fires_once_per_threshold() {
        // Continue from the first checkpoint; the same index must not fire
        // again, and the next event is the next index.
        let (state, event, _) = walk_forward_until_event(at(STEP, 0), 250);
        assert_eq!(event, Some(TickEvent::Milestone(1)));
        assert_eq!(state.distance, 2.0 * STEP);
    }

    #[test]
    fn test_snap_discards_overshoot() {
        let (next, event) = tick(at(29.9, -1), true, false, N);
        assert_eq!(event, Some(TickEvent::Milestone(0)));
        assert_eq!(next.distance, 30.0);
    }

    #[test]
    fn test_trigger_index_never_reaches_count() {
        // Past the last checkpoint there is nothing left to trigger; the
        // walk advances plainly until completion.
        let mut state = at(N as f64 * STEP, N as i32 - 1);
        loop {
            let (next, event) = tick(state, true, false, N);
            match event {
                Some(TickEvent::Milestone(index)) => {
                    panic!("unexpected milestone {index} beyond the last threshold")
                }
                Some(TickEvent::Finished) => break,
                None => state = next,
            }
        }
    }

    #[test]
    fn test_forward_wins_over_backward() {
        let (next, event) = tick(at(10.0, -1), true, true, N);
        assert_eq!(next.distance, 10.0 + STEP_VELOCITY);
        assert_eq!(event, None);
    }

    #[test]
    fn test_backward_clamps_at_zero() {
        let (next, event) = tick(at(0.0, -1), false, true, N);
        assert_eq!(next.distance, 0.0);
        assert_eq!(next.current_index, -1);
        assert_eq!(event, None);
    }

    #[test]
    fn test_backward_rewinds_index_without_event() {
        // From the first checkpoint, one step back drops below the
        // threshold and un-reveals milestone 0.
        let (next, event) = tick(at(30.0, 0), false, true, N);
        assert_eq!(event, None);
        assert_eq!(next.current_index, -1);
        assert!((next.distance - 29.85).abs() < 1e-9);
    }

    #[test]
    fn test_backward_index_matches_threshold_formula() {
        let mut state = at(95.0, 2);
        for _ in 0..1000 {
            let (next, event) = tick(state, false, true, N);
            assert_eq!(event, None, "backward ticks never emit events");
            let expected = (next.distance / STEP).floor() as i32 - 1;
            assert_eq!(next.current_index, expected.max(-1));
            state = next;
            if state.distance == 0.0 {
                break;
            }
        }
        assert_eq!(state.current_index, -1);
    }

    #[test]
    fn test_completion_leaves_state_unchanged() {
        let near_end = at(N as f64 * STEP + OVERRUN_MARGIN - 0.1, N as i32 - 1);
        let (next, event) = tick(near_end, true, false, N);
        assert_eq!(event, Some(TickEvent::Finished));
        assert_eq!(next, near_end);
    }

    #[test]
    fn test_completion_threshold_is_exclusive_below() {
        let state = at(N as f64 * STEP + OVERRUN_MARGIN - STEP_VELOCITY * 2.0, N as i32 - 1);
        let (next, event) = tick(state, true, false, N);
        assert_eq!(event, None);
        assert!(next.distance < N as f64 * STEP + OVERRUN_MARGIN);
    }
}
