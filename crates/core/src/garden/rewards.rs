//! Learning rewards.

use super::model::Reward;

/// Star Seeds a new garden starts with. Enough for two common plants.
pub const STARTING_STAR_SEEDS: i32 = 100;

/// Flat XP for any completed lesson, before the per-minute part.
pub const LESSON_BASE_XP: i32 = 20;

/// Extra reward for finishing the last lesson of a course.
pub const COURSE_COMPLETION_BONUS: Reward = Reward::new(200, 100);

/// Reward for completing a lesson of `duration_minutes`.
///
/// XP is `20 + duration_minutes`, Star Seeds are 30% of the XP rounded down.
/// Negative durations count as zero.
#[must_use]
pub const fn lesson_reward(duration_minutes: i32) -> Reward {
    let minutes = if duration_minutes < 0 { 0 } else { duration_minutes };
    let xp = LESSON_BASE_XP.saturating_add(minutes);
    // floor(xp * 3 / 10) without overflowing near i32::MAX
    Reward::new(xp, xp / 10 * 3 + xp % 10 * 3 / 10)
}

#[must_use]
pub const fn course_completion_bonus() -> Reward {
    COURSE_COMPLETION_BONUS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_reward() {
        assert_eq!(lesson_reward(10), Reward::new(30, 9));
        assert_eq!(lesson_reward(0), Reward::new(20, 6));
        assert_eq!(lesson_reward(15), Reward::new(35, 10));
        assert_eq!(lesson_reward(-5), Reward::new(20, 6));
    }

    #[test]
    fn test_star_seeds_match_floor_of_thirty_percent() {
        for minutes in 0..500 {
            let reward = lesson_reward(minutes);
            assert_eq!(reward.star_seeds, reward.xp * 3 / 10);
        }
    }

    #[test]
    fn test_large_duration_does_not_overflow() {
        let reward = lesson_reward(i32::MAX);
        assert_eq!(reward.xp, i32::MAX);
        assert!(reward.star_seeds > 0);
    }

    #[test]
    fn test_course_bonus() {
        assert_eq!(course_completion_bonus(), Reward::new(200, 100));
    }
}
