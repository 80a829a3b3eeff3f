//! Display helpers for garden data.
//!
//! These produce the short Thai strings and emoji the client shows next to
//! garden entities. They never fail: unparseable input is passed through.

use chrono::{DateTime, Utc};

use crate::types::{PlantCategory, Rarity};

/// Thai relative time between `ts` and `now`.
///
/// Timestamps in the future read as "just now".
#[must_use]
pub fn format_time_ago(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(ts);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "เมื่อสักครู่".to_owned();
    }
    let hours = elapsed.num_hours();
    if hours < 1 {
        return format!("{minutes} นาทีที่แล้ว");
    }
    let days = elapsed.num_days();
    if days < 1 {
        return format!("{hours} ชั่วโมงที่แล้ว");
    }
    format!("{days} วันที่แล้ว")
}

/// [`format_time_ago`] for an RFC 3339 string. Returns `input` unchanged when
/// it does not parse.
#[must_use]
pub fn format_time_ago_str(input: &str, now: DateTime<Utc>) -> String {
    DateTime::parse_from_rfc3339(input).map_or_else(
        |_| input.to_owned(),
        |ts| format_time_ago(ts.with_timezone(&Utc), now),
    )
}

/// Compact XP: `999`, `1.5K`, `2.0M`.
///
/// Values that would round up to `1000.0K` are shown in millions instead.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_xp(xp: i64) -> String {
    let abs = xp.unsigned_abs();
    if abs < 1_000 {
        xp.to_string()
    } else if abs < 999_950 {
        format!("{:.1}K", xp as f64 / 1_000.0)
    } else {
        format!("{:.1}M", xp as f64 / 1_000_000.0)
    }
}

#[must_use]
pub const fn category_emoji(category: PlantCategory) -> &'static str {
    match category {
        PlantCategory::Fitness => "💪",
        PlantCategory::Nutrition => "🥗",
        PlantCategory::Mental => "🧘",
        PlantCategory::Learning => "📚",
    }
}

/// Emoji for a growth stage. Stages past 3 share the full-tree emoji.
#[must_use]
pub const fn stage_emoji(stage: i32) -> &'static str {
    match stage {
        i32::MIN..=0 => "🌱",
        1 => "🌿",
        2 => "🪴",
        3 => "🌸",
        _ => "🌳",
    }
}

#[must_use]
pub const fn rarity_label_th(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "ทั่วไป",
        Rarity::Rare => "หายาก",
        Rarity::Epic => "มหากาพย์",
        Rarity::Legendary => "ตำนาน",
    }
}

/// `value / max` as a whole percentage in `0..=100`. Zero when `max` is not
/// positive.
#[must_use]
pub fn progress_percent(value: i32, max: i32) -> i32 {
    if max <= 0 {
        return 0;
    }
    let pct = i64::from(value.max(0)) * 100 / i64::from(max);
    i32::try_from(pct.min(100)).unwrap_or(100)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_time_ago_buckets() {
        assert_eq!(format_time_ago(now() - Duration::seconds(30), now()), "เมื่อสักครู่");
        assert_eq!(format_time_ago(now() - Duration::minutes(5), now()), "5 นาทีที่แล้ว");
        assert_eq!(format_time_ago(now() - Duration::hours(3), now()), "3 ชั่วโมงที่แล้ว");
        assert_eq!(format_time_ago(now() - Duration::days(2), now()), "2 วันที่แล้ว");
    }

    #[test]
    fn test_time_ago_bucket_edges() {
        let ago = |d: Duration| format_time_ago(now() - d, now());
        assert_eq!(ago(Duration::seconds(59)), "เมื่อสักครู่");
        assert_eq!(ago(Duration::seconds(60)), "1 นาทีที่แล้ว");
        assert_eq!(ago(Duration::minutes(59)), "59 นาทีที่แล้ว");
        assert_eq!(ago(Duration::minutes(60)), "1 ชั่วโมงที่แล้ว");
        assert_eq!(ago(Duration::hours(23) + Duration::minutes(59)), "23 ชั่วโมงที่แล้ว");
        assert_eq!(ago(Duration::hours(24)), "1 วันที่แล้ว");
    }

    #[test]
    fn test_time_ago_future_is_just_now() {
        assert_eq!(format_time_ago(now() + Duration::hours(1), now()), "เมื่อสักครู่");
    }

    #[test]
    fn test_time_ago_str() {
        assert_eq!(
            format_time_ago_str("2026-03-10T11:00:00Z", now()),
            "1 ชั่วโมงที่แล้ว"
        );
        assert_eq!(
            format_time_ago_str("2026-03-10T18:00:00+07:00", now()),
            "1 ชั่วโมงที่แล้ว"
        );
        assert_eq!(format_time_ago_str("yesterday", now()), "yesterday");
    }

    #[test]
    fn test_format_xp() {
        assert_eq!(format_xp(0), "0");
        assert_eq!(format_xp(999), "999");
        assert_eq!(format_xp(1_500), "1.5K");
        assert_eq!(format_xp(2_000_000), "2.0M");
    }

    #[test]
    fn test_format_xp_rounding_rolls_into_millions() {
        assert_eq!(format_xp(999_949), "999.9K");
        assert_eq!(format_xp(999_950), "1.0M");
        assert_eq!(format_xp(999_999), "1.0M");
        assert_eq!(format_xp(1_000_000), "1.0M");
    }

    #[test]
    fn test_emoji_and_labels() {
        assert_eq!(category_emoji(PlantCategory::Fitness), "💪");
        assert_eq!(category_emoji(PlantCategory::Learning), "📚");
        assert_eq!(stage_emoji(0), "🌱");
        assert_eq!(stage_emoji(3), "🌸");
        assert_eq!(stage_emoji(7), "🌳");
        assert_eq!(rarity_label_th(Rarity::Legendary), "ตำนาน");
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(50, 200), 25);
        assert_eq!(progress_percent(300, 200), 100);
        assert_eq!(progress_percent(-5, 200), 0);
        assert_eq!(progress_percent(5, 0), 0);
    }
}
