//! XP thresholds and reward grants.

use super::model::{LevelUp, Reward, UserGarden};

/// XP needed to advance from `level` to `level + 1`.
#[must_use]
pub const fn xp_for_next_level(level: i32) -> i32 {
    level.saturating_mul(100)
}

/// Credit a reward and settle any level-ups it causes.
///
/// XP carries over: a garden at level 1 with 90 XP that gains 30 XP ends at
/// level 2 with 20 XP. A single grant can cross several thresholds.
/// Negative reward components are ignored.
pub fn grant(garden: &mut UserGarden, reward: Reward) -> Option<LevelUp> {
    garden.xp = garden.xp.saturating_add(reward.xp.max(0));
    garden.star_seeds = garden.star_seeds.saturating_add(reward.star_seeds.max(0));
    settle_levels(garden)
}

/// Apply every level-up the current XP allows.
pub fn settle_levels(garden: &mut UserGarden) -> Option<LevelUp> {
    garden.level = garden.level.max(1);
    let from = garden.level;
    while garden.can_level_up() {
        garden.xp -= garden.xp_for_next_level();
        garden.level += 1;
    }
    (garden.level != from).then_some(LevelUp {
        from,
        to: garden.level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;

    fn garden(level: i32, xp: i32) -> UserGarden {
        let mut g = UserGarden::new(UserId::new(1), 0);
        g.level = level;
        g.xp = xp;
        g
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(xp_for_next_level(1), 100);
        assert_eq!(xp_for_next_level(5), 500);
    }

    #[test]
    fn test_grant_below_threshold() {
        let mut g = garden(1, 10);
        assert_eq!(grant(&mut g, Reward::new(50, 15)), None);
        assert_eq!((g.level, g.xp, g.star_seeds), (1, 60, 15));
        assert!(!g.can_level_up());
    }

    #[test]
    fn test_grant_carries_xp_over() {
        let mut g = garden(1, 90);
        assert_eq!(
            grant(&mut g, Reward::new(30, 0)),
            Some(LevelUp { from: 1, to: 2 })
        );
        assert_eq!((g.level, g.xp), (2, 20));
    }

    #[test]
    fn test_grant_crosses_multiple_levels() {
        let mut g = garden(1, 0);
        // 100 (1->2) + 200 (2->3) + 50 left over
        assert_eq!(
            grant(&mut g, Reward::new(350, 0)),
            Some(LevelUp { from: 1, to: 3 })
        );
        assert_eq!((g.level, g.xp), (3, 50));
        assert!(g.xp < g.xp_for_next_level());
    }

    #[test]
    fn test_exact_threshold_levels_up() {
        let mut g = garden(2, 150);
        assert_eq!(
            grant(&mut g, Reward::new(50, 0)),
            Some(LevelUp { from: 2, to: 3 })
        );
        assert_eq!(g.xp, 0);
    }

    #[test]
    fn test_negative_components_ignored() {
        let mut g = garden(1, 10);
        grant(&mut g, Reward::new(-100, -5));
        assert_eq!((g.xp, g.star_seeds), (10, 0));
    }

    #[test]
    fn test_settle_levels_fixes_unsettled_garden() {
        let mut g = garden(1, 120);
        assert!(g.can_level_up());
        assert_eq!(settle_levels(&mut g), Some(LevelUp { from: 1, to: 2 }));
        assert!(!g.can_level_up());
    }
}
