//! Daily challenges.
//!
//! Each calendar day a user gets three challenges picked from the template
//! catalog. Progress is reported by the client in positive increments and is
//! capped at the target. The reward is paid on the call that reaches the
//! target and never again.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::GardenError;
use super::model::Reward;
use crate::types::{ChallengeId, UserId};

/// Number of challenges handed out per day.
pub const DAILY_CHALLENGE_COUNT: usize = 3;

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Catalog entry a daily challenge is created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeTemplate {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub target: i32,
    pub xp_reward: i32,
    pub star_seeds_reward: i32,
}

impl ChallengeTemplate {
    #[must_use]
    pub const fn reward(&self) -> Reward {
        Reward::new(self.xp_reward, self.star_seeds_reward)
    }

    /// # Errors
    ///
    /// Returns `GardenError::InvalidCatalog` for a blank key or title, a
    /// non-positive target, or a negative reward.
    pub fn validate(&self) -> Result<(), GardenError> {
        if self.key.trim().is_empty() || self.title.trim().is_empty() {
            return Err(GardenError::InvalidCatalog(
                "challenge template needs a key and a title".to_owned(),
            ));
        }
        if self.target <= 0 {
            return Err(GardenError::InvalidCatalog(format!(
                "challenge {} target must be positive",
                self.key
            )));
        }
        if self.xp_reward < 0 || self.star_seeds_reward < 0 {
            return Err(GardenError::InvalidCatalog(format!(
                "challenge {} has a negative reward",
                self.key
            )));
        }
        Ok(())
    }
}

/// A challenge assigned to one user for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub id: ChallengeId,
    pub user_id: UserId,
    pub template_key: String,
    pub title: String,
    pub description: Option<String>,
    pub challenge_date: NaiveDate,
    pub progress: i32,
    pub target: i32,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub xp_reward: i32,
    pub star_seeds_reward: i32,
}

impl DailyChallenge {
    #[must_use]
    pub const fn reward(&self) -> Reward {
        Reward::new(self.xp_reward, self.star_seeds_reward)
    }
}

/// Outcome of reporting challenge progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChallengeUpdate {
    /// Progress moved but the target is not reached yet.
    Progressed,
    /// This call reached the target. The reward is due exactly now.
    Completed { reward: Reward },
    /// The challenge was already done. Nothing changed.
    AlreadyCompleted,
}

/// Add `increment` to a challenge's progress.
///
/// # Errors
///
/// Returns `GardenError::InvalidIncrement` if `increment` is not positive and
/// `GardenError::ChallengeExpired` if the challenge is not for the UTC date of
/// `now`.
pub fn apply_challenge_progress(
    challenge: &mut DailyChallenge,
    increment: i32,
    now: DateTime<Utc>,
) -> Result<ChallengeUpdate, GardenError> {
    if increment <= 0 {
        return Err(GardenError::InvalidIncrement(increment));
    }
    if challenge.challenge_date != now.date_naive() {
        return Err(GardenError::ChallengeExpired {
            date: challenge.challenge_date,
        });
    }
    if challenge.is_completed {
        return Ok(ChallengeUpdate::AlreadyCompleted);
    }

    challenge.progress = challenge
        .progress
        .saturating_add(increment)
        .min(challenge.target);

    if challenge.progress < challenge.target {
        return Ok(ChallengeUpdate::Progressed);
    }

    challenge.is_completed = true;
    challenge.completed_at = Some(now);
    Ok(ChallengeUpdate::Completed {
        reward: challenge.reward(),
    })
}

/// Templates assigned on `date`.
///
/// Rotates through the catalog by `days_since_epoch * 3 mod n` so consecutive
/// days get different picks. Returns fewer than three when the catalog is
/// smaller than that.
#[must_use]
pub fn daily_challenge_templates_for(
    date: NaiveDate,
    templates: &[ChallengeTemplate],
) -> Vec<&ChallengeTemplate> {
    let n = templates.len();
    if n == 0 {
        return Vec::new();
    }

    let days = i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE;
    let len = i64::try_from(n).unwrap_or(i64::MAX);
    let offset = usize::try_from(days.saturating_mul(3).rem_euclid(len)).unwrap_or(0);

    templates
        .iter()
        .cycle()
        .skip(offset)
        .take(DAILY_CHALLENGE_COUNT.min(n))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn challenge(progress: i32, target: i32) -> DailyChallenge {
        DailyChallenge {
            id: ChallengeId::new(1),
            user_id: UserId::new(1),
            template_key: "drink_water".to_owned(),
            title: "ดื่มน้ำ 8 แก้ว".to_owned(),
            description: None,
            challenge_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            progress,
            target,
            is_completed: false,
            completed_at: None,
            xp_reward: 25,
            star_seeds_reward: 10,
        }
    }

    fn template(key: &str) -> ChallengeTemplate {
        ChallengeTemplate {
            key: key.to_owned(),
            title: key.to_owned(),
            description: None,
            target: 1,
            xp_reward: 10,
            star_seeds_reward: 5,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_progress_below_target() {
        let mut c = challenge(0, 8);
        assert_eq!(
            apply_challenge_progress(&mut c, 3, now()),
            Ok(ChallengeUpdate::Progressed)
        );
        assert_eq!(c.progress, 3);
        assert!(!c.is_completed);
    }

    #[test]
    fn test_completion_pays_once() {
        let mut c = challenge(6, 8);
        assert_eq!(
            apply_challenge_progress(&mut c, 5, now()),
            Ok(ChallengeUpdate::Completed {
                reward: Reward::new(25, 10)
            })
        );
        assert_eq!(c.progress, 8);
        assert_eq!(c.completed_at, Some(now()));

        assert_eq!(
            apply_challenge_progress(&mut c, 1, now()),
            Ok(ChallengeUpdate::AlreadyCompleted)
        );
        assert_eq!(c.progress, 8);
    }

    #[test]
    fn test_non_positive_increment_rejected() {
        let mut c = challenge(2, 8);
        assert_eq!(
            apply_challenge_progress(&mut c, 0, now()),
            Err(GardenError::InvalidIncrement(0))
        );
        assert_eq!(
            apply_challenge_progress(&mut c, -3, now()),
            Err(GardenError::InvalidIncrement(-3))
        );
        assert_eq!(c.progress, 2);
    }

    #[test]
    fn test_past_day_challenge_rejected() {
        let mut c = challenge(6, 8);
        let later = Utc.with_ymd_and_hms(2026, 3, 11, 12, 0, 0).unwrap();
        assert_eq!(
            apply_challenge_progress(&mut c, 5, later),
            Err(GardenError::ChallengeExpired {
                date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
            })
        );
        assert_eq!(c.progress, 6);
        assert!(!c.is_completed);
    }

    #[test]
    fn test_challenge_open_until_midnight_utc() {
        let mut c = challenge(0, 8);
        let last_second = Utc.with_ymd_and_hms(2026, 3, 1, 23, 59, 59).unwrap();
        assert_eq!(
            apply_challenge_progress(&mut c, 1, last_second),
            Ok(ChallengeUpdate::Progressed)
        );
        let next_day = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        assert!(matches!(
            apply_challenge_progress(&mut c, 1, next_day),
            Err(GardenError::ChallengeExpired { .. })
        ));
        assert_eq!(c.progress, 1);
    }

    #[test]
    fn test_daily_rotation_is_deterministic() {
        let templates: Vec<_> = ["a", "b", "c", "d", "e"].map(template).into();
        let day = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();

        // offset = 1 * 3 mod 5
        let keys: Vec<_> = daily_challenge_templates_for(day, &templates)
            .iter()
            .map(|t| t.key.as_str())
            .collect();
        assert_eq!(keys, ["d", "e", "a"]);

        let again = daily_challenge_templates_for(day, &templates);
        assert_eq!(again.len(), 3);
        assert_eq!(again.first().unwrap().key, "d");
    }

    #[test]
    fn test_small_catalog() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(daily_challenge_templates_for(day, &[]).is_empty());

        let templates = vec![template("only")];
        assert_eq!(daily_challenge_templates_for(day, &templates).len(), 1);
    }

    #[test]
    fn test_template_validation() {
        assert!(template("ok").validate().is_ok());
        let mut t = template("zero");
        t.target = 0;
        assert!(matches!(t.validate(), Err(GardenError::InvalidCatalog(_))));
    }
}
