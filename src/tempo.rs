//! Tempo adjustment
//!
//! Nudges the prompt tempo toward the walker's goal pace. The step taken
//! depends only on how far the measured pace is from the goal.

use serde::{Deserialize, Serialize};

/// Tempo the first prompt is built around.
pub const INITIAL_PROMPT_BPM: i32 = 90;

/// Lowest tempo ever requested.
pub const MIN_PROMPT_BPM: i32 = 60;

/// Measured pace versus the pace the walker is aiming for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaceRequest {
    pub user_bpm: i32,
    pub goal_bpm: i32,
}

impl Default for PaceRequest {
    fn default() -> Self {
        Self {
            user_bpm: 70,
            goal_bpm: 100,
        }
    }
}

/// Step applied to the prompt tempo for a given `goal - user` difference.
///
/// Branches are checked in order and the first match wins:
/// - within 5 BPM of the goal: +3
/// - more than 10 below the goal: -3
/// - more than 10 above the goal: -2
/// - anything else (5..=10 away either side): +5
pub fn adjustment_for(diff: i32) -> i32 {
    if diff.saturating_abs() < 5 {
        3
    } else if diff > 10 {
        -3
    } else if diff < -10 {
        -2
    } else {
        5
    }
}

/// Compute the next prompt tempo.
///
/// The result is `max(60, min(current + step, goal_bpm))`. When `goal_bpm`
/// is below 60 the lower bound wins and the result is always 60.
pub fn adjust(current: i32, user_bpm: i32, goal_bpm: i32) -> i32 {
    let diff = goal_bpm.saturating_sub(user_bpm);
    let next = current.saturating_add(adjustment_for(diff));
    MIN_PROMPT_BPM.max(next.min(goal_bpm))
}

/// The prompt tempo carried from one request to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempoState {
    current_bpm: i32,
}

impl Default for TempoState {
    fn default() -> Self {
        Self::new()
    }
}

impl TempoState {
    pub fn new() -> Self {
        Self::starting_at(INITIAL_PROMPT_BPM)
    }

    pub fn starting_at(current_bpm: i32) -> Self {
        Self { current_bpm }
    }

    pub fn current_bpm(&self) -> i32 {
        self.current_bpm
    }

    /// Apply one adjustment step and return the new tempo.
    pub fn adjust(&mut self, pace: PaceRequest) -> i32 {
        self.current_bpm = adjust(self.current_bpm, pace.user_bpm, pace.goal_bpm);
        self.current_bpm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0 => 3 ; "on target")]
    #[test_case(4 => 3 ; "just under five below")]
    #[test_case(-4 => 3 ; "just under five above")]
    #[test_case(5 => 5 ; "five below")]
    #[test_case(10 => 5 ; "ten below")]
    #[test_case(-5 => 5 ; "five above")]
    #[test_case(-10 => 5 ; "ten above")]
    #[test_case(11 => -3 ; "far below")]
    #[test_case(-11 => -2 ; "far above")]
    #[test_case(i32::MIN => -2 ; "minimum diff")]
    fn test_adjustment_for(diff: i32) -> i32 {
        adjustment_for(diff)
    }

    #[test]
    fn test_walker_well_below_goal() {
        assert_eq!(adjust(90, 70, 100), 87);
    }

    #[test]
    fn test_walker_near_goal() {
        assert_eq!(adjust(87, 98, 100), 90);
    }

    #[test]
    fn test_clamped_to_goal() {
        // +3 would overshoot the goal
        assert_eq!(adjust(99, 100, 100), 100);
    }

    #[test]
    fn test_clamped_to_floor() {
        assert_eq!(adjust(61, 70, 100), 60);
    }

    #[test]
    fn test_goal_below_floor_always_yields_floor() {
        for current in [0, 59, 60, 90, 500] {
            assert_eq!(adjust(current, 50, 40), MIN_PROMPT_BPM);
        }
    }

    #[test]
    fn test_extreme_inputs_do_not_overflow() {
        assert_eq!(adjust(i32::MAX, i32::MIN, i32::MAX), i32::MAX - 3);
        assert_eq!(adjust(i32::MIN, 0, 100), MIN_PROMPT_BPM);
    }

    #[test]
    fn test_state_seeded_and_updated() {
        let mut state = TempoState::new();
        assert_eq!(state.current_bpm(), 90);

        assert_eq!(state.adjust(PaceRequest::default()), 87);
        assert_eq!(state.current_bpm(), 87);

        let near = PaceRequest {
            user_bpm: 98,
            goal_bpm: 100,
        };
        assert_eq!(state.adjust(near), 90);
    }

    #[test]
    fn test_same_inputs_same_result() {
        let start = TempoState::starting_at(75);
        let pace = PaceRequest {
            user_bpm: 120,
            goal_bpm: 110,
        };

        let mut a = start;
        let mut b = start;
        assert_eq!(a.adjust(pace), b.adjust(pace));
    }
}
