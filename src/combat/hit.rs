//! 2d6 success probability for a to-hit target number.

/// Highest target number a 2d6 roll can make.
pub const MAX_ROLL: i32 = 12;

/// Probability that 2d6 rolls at or above `target`.
///
/// The interior uses the closed form `(13 - t) * (14 - t) / 72`, which is
/// exact from 7 upward. The ends are pinned explicitly: anything at or below
/// 2 always succeeds, 12 only succeeds on double six, above 12 never does.
/// The closed form overshoots 1 for targets 3..=5, so the result is capped.
pub fn hit_chance(target: i32) -> f64 {
    if target > MAX_ROLL {
        return 0.0;
    }
    if target <= 2 {
        return 1.0;
    }
    if target == MAX_ROLL {
        return 1.0 / 36.0;
    }
    let t = f64::from(target);
    ((13.0 - t) * (14.0 - t) / 72.0).clamp(0.0, 1.0)
}
