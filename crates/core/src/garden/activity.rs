//! Garden activity feed.
//!
//! Every state change that moves XP or Star Seeds appends one entry. Entries
//! are written in the same transaction as the change and never updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{LevelUp, Reward};
use crate::types::{ActivityId, ActivityKind, UserId};

/// A stored activity entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenActivity {
    pub id: ActivityId,
    pub user_id: UserId,
    pub kind: ActivityKind,
    pub description: String,
    pub xp_delta: i32,
    pub star_seeds_delta: i32,
    pub created_at: DateTime<Utc>,
}

/// An activity entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub kind: ActivityKind,
    pub description: String,
    pub xp_delta: i32,
    pub star_seeds_delta: i32,
}

impl ActivityDraft {
    fn new(kind: ActivityKind, description: String, reward: Reward) -> Self {
        Self {
            kind,
            description,
            xp_delta: reward.xp,
            star_seeds_delta: reward.star_seeds,
        }
    }

    #[must_use]
    pub fn planted(plant_name: &str, cost: i32) -> Self {
        Self::new(
            ActivityKind::Planted,
            format!("ปลูก{plant_name}"),
            Reward::new(0, -cost),
        )
    }

    #[must_use]
    pub fn watered(plant_name: &str, reward: Reward) -> Self {
        Self::new(ActivityKind::Watered, format!("รดน้ำ{plant_name}"), reward)
    }

    #[must_use]
    pub fn garden_watered(plant_count: usize, reward: Reward) -> Self {
        Self::new(
            ActivityKind::GardenWatered,
            format!("รดน้ำทั้งสวน ({plant_count} ต้น)"),
            reward,
        )
    }

    #[must_use]
    pub fn harvested(plant_name: &str, reward: Reward) -> Self {
        Self::new(
            ActivityKind::Harvested,
            format!("เก็บเกี่ยว{plant_name}"),
            reward,
        )
    }

    #[must_use]
    pub fn lesson_completed(lesson_title: &str, reward: Reward) -> Self {
        Self::new(
            ActivityKind::LessonCompleted,
            format!("เรียนจบบทเรียน: {lesson_title}"),
            reward,
        )
    }

    #[must_use]
    pub fn course_completed(course_title: &str, reward: Reward) -> Self {
        Self::new(
            ActivityKind::CourseCompleted,
            format!("เรียนจบคอร์ส: {course_title}"),
            reward,
        )
    }

    #[must_use]
    pub fn challenge_completed(title: &str, reward: Reward) -> Self {
        Self::new(
            ActivityKind::ChallengeCompleted,
            format!("ทำภารกิจสำเร็จ: {title}"),
            reward,
        )
    }

    #[must_use]
    pub fn achievement_unlocked(name: &str, reward: Reward) -> Self {
        Self::new(
            ActivityKind::AchievementUnlocked,
            format!("ปลดล็อกความสำเร็จ: {name}"),
            reward,
        )
    }

    /// Level changes carry no deltas of their own.
    #[must_use]
    pub fn level_up(level_up: LevelUp) -> Self {
        Self::new(
            ActivityKind::LevelUp,
            format!("สวนเลื่อนเป็นระดับ {}", level_up.to),
            Reward::NONE,
        )
    }

    #[must_use]
    pub fn theme_unlocked(theme_name: &str, cost: i32) -> Self {
        Self::new(
            ActivityKind::ThemeUnlocked,
            format!("ปลดล็อกธีม{theme_name}"),
            Reward::new(0, -cost),
        )
    }

    /// Operator grant from the CLI.
    #[must_use]
    pub fn granted(reward: Reward) -> Self {
        Self::new(ActivityKind::Granted, "ได้รับรางวัลพิเศษ".to_owned(), reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planted_debits_cost() {
        let draft = ActivityDraft::planted("ต้นมะลิ", 50);
        assert_eq!(draft.kind, ActivityKind::Planted);
        assert_eq!(draft.xp_delta, 0);
        assert_eq!(draft.star_seeds_delta, -50);
        assert!(draft.description.contains("ต้นมะลิ"));
    }

    #[test]
    fn test_reward_deltas() {
        let draft = ActivityDraft::lesson_completed("หายใจลึก", Reward::new(30, 9));
        assert_eq!((draft.xp_delta, draft.star_seeds_delta), (30, 9));
    }

    #[test]
    fn test_level_up_has_no_deltas() {
        let draft = ActivityDraft::level_up(LevelUp { from: 2, to: 4 });
        assert_eq!((draft.xp_delta, draft.star_seeds_delta), (0, 0));
        assert!(draft.description.ends_with('4'));
    }
}
