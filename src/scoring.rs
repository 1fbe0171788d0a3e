//! Pure scoring function
//!
//! Points for a correct answer are the sum of a speed component,
//! proportional to the fraction of time remaining when the answer was
//! submitted, and a streak bonus that kicks in from the second
//! consecutive correct answer. Incorrect answers never reach this module:
//! they award zero and reset the streak at the call site.

use crate::constants::scoring::{STREAK_BONUS_CAP, STREAK_BONUS_STEP};

/// Speed component: `round(max_points * time_left / total_time)`
///
/// `time_left` is clamped to `total_time`, so a client claiming more than
/// the full time cannot exceed `max_points`.
pub fn speed_points(time_left: u32, total_time: u32, max_points: u32) -> u32 {
    if total_time == 0 {
        return max_points;
    }
    let fraction = f64::from(time_left.min(total_time)) / f64::from(total_time);
    (f64::from(max_points) * fraction).round() as u32
}

/// Streak bonus: `min((streak - 1) * 50, 500)`
///
/// The first correct answer of a run earns no bonus; each further
/// consecutive correct answer adds a step, up to the cap.
pub fn streak_bonus(streak: u32) -> u32 {
    (streak.saturating_sub(1) * STREAK_BONUS_STEP).min(STREAK_BONUS_CAP)
}

/// Total points awarded for a correct answer
///
/// `streak` is the player's streak counting this answer (so a first
/// correct answer passes `streak = 1`). Deterministic, non-negative,
/// non-increasing as `time_left` decreases and non-decreasing in
/// `streak` up to the bonus cap.
pub fn score(time_left: u32, total_time: u32, streak: u32, max_points: u32) -> u32 {
    speed_points(time_left, total_time, max_points) + streak_bonus(streak)
}
