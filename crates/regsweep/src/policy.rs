//! Keep/delete decisions for a single image.

use chrono::{Days, NaiveDate};
use regsweep_image::ImageRecord;

use crate::retention::RetentionSet;

/// Age threshold resolved against a fixed "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgePolicy {
    age_threshold_days: u32,
    cutoff: NaiveDate,
}

impl AgePolicy {
    /// Images dated strictly before `today - age_threshold_days` are eligible.
    #[must_use]
    pub fn new(today: NaiveDate, age_threshold_days: u32) -> Self {
        let cutoff = today
            .checked_sub_days(Days::new(u64::from(age_threshold_days)))
            .unwrap_or(NaiveDate::MIN);
        Self {
            age_threshold_days,
            cutoff,
        }
    }

    /// Configured threshold in days.
    #[must_use]
    pub const fn age_threshold_days(&self) -> u32 {
        self.age_threshold_days
    }

    /// Oldest date that is still kept.
    #[must_use]
    pub const fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    /// Whether an image dated `date` is past the threshold.
    #[must_use]
    pub fn is_expired(&self, date: NaiveDate) -> bool {
        date < self.cutoff
    }
}

/// Why an image is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    /// A tag mentions a released commit.
    Released,
    /// The image is within the age threshold.
    Recent,
}

/// Why an image is eligible for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteReason {
    /// Untagged by any release and missing a timestamp.
    NoTimestamp,
    /// Untagged by any release and older than the threshold.
    OlderThan {
        /// Threshold that was exceeded.
        days: u32,
    },
}

impl std::fmt::Display for DeleteReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTimestamp => write!(
                f,
                "image doesn't have timestamp property (which means it's very old) and not tagged with version"
            ),
            Self::OlderThan { days } => {
                write!(f, "is older than {days} days and not tagged with version")
            }
        }
    }
}

/// Outcome of evaluating one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Leave the image alone.
    Keep(KeepReason),
    /// The image is eligible for deletion.
    Delete(DeleteReason),
}

impl Verdict {
    /// Whether the image should be deleted.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        matches!(self, Self::Delete(_))
    }
}

/// Decide whether an image is eligible for deletion.
///
/// Release protection is checked first, so a protected image is kept even
/// when it has no timestamp.
#[must_use]
pub fn evaluate(record: &ImageRecord, retention: &RetentionSet, policy: &AgePolicy) -> Verdict {
    if retention.protects(record.tags.as_slice()) {
        return Verdict::Keep(KeepReason::Released);
    }

    match record.image_date() {
        None => Verdict::Delete(DeleteReason::NoTimestamp),
        Some(date) if policy.is_expired(date) => Verdict::Delete(DeleteReason::OlderThan {
            days: policy.age_threshold_days(),
        }),
        Some(_) => Verdict::Keep(KeepReason::Recent),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(text: &str) -> Option<DateTime<FixedOffset>> {
        Some(regsweep_image::record::parse_timestamp(text).unwrap())
    }

    fn record(tags: &[&str], timestamp: Option<DateTime<FixedOffset>>) -> ImageRecord {
        ImageRecord::new(
            "sha256:0123456789abcdef",
            tags.iter().map(ToString::to_string).collect(),
            timestamp,
        )
    }

    fn retained() -> RetentionSet {
        RetentionSet::from_commits(["abc1234ffffffffffffffffffffffffffffffff"])
    }

    #[test]
    fn old_unreleased_image_is_eligible() {
        let policy = AgePolicy::new(date(2024, 3, 1), 30);
        let image = record(&["v1.2.3"], at("2024-01-01 00:00:00+00:00"));

        assert_eq!(
            evaluate(&image, &retained(), &policy),
            Verdict::Delete(DeleteReason::OlderThan { days: 30 })
        );
    }

    #[test]
    fn released_image_kept_regardless_of_age() {
        let policy = AgePolicy::new(date(2024, 3, 1), 30);
        let image = record(&["abc1234-test"], at("2019-01-01 00:00:00+00:00"));

        assert_eq!(
            evaluate(&image, &retained(), &policy),
            Verdict::Keep(KeepReason::Released)
        );
    }

    #[test]
    fn released_image_without_timestamp_kept() {
        let policy = AgePolicy::new(date(2024, 3, 1), 30);
        let image = record(&["1.0.0-abc1234"], None);

        assert_eq!(
            evaluate(&image, &retained(), &policy),
            Verdict::Keep(KeepReason::Released)
        );
    }

    #[test]
    fn untagged_without_timestamp_is_eligible() {
        let policy = AgePolicy::new(date(2024, 3, 1), 30);
        let image = record(&[], None);

        assert_eq!(
            evaluate(&image, &retained(), &policy),
            Verdict::Delete(DeleteReason::NoTimestamp)
        );
    }

    #[test]
    fn threshold_is_strict() {
        let policy = AgePolicy::new(date(2024, 3, 1), 30);
        assert_eq!(policy.cutoff(), date(2024, 1, 31));

        // Exactly 30 days old, late in the day: kept.
        let boundary = record(&["nightly"], at("2024-01-31 23:59:59+00:00"));
        assert_eq!(
            evaluate(&boundary, &retained(), &policy),
            Verdict::Keep(KeepReason::Recent)
        );

        // 31 days old, first second of the day: eligible.
        let older = record(&["nightly"], at("2024-01-30 00:00:00+00:00"));
        assert!(evaluate(&older, &retained(), &policy).is_eligible());
    }

    #[test]
    fn zero_threshold_keeps_today() {
        let policy = AgePolicy::new(date(2024, 3, 1), 0);
        let today = record(&[], at("2024-03-01 08:00:00+00:00"));
        let yesterday = record(&[], at("2024-02-29 08:00:00+00:00"));

        assert!(!evaluate(&today, &RetentionSet::default(), &policy).is_eligible());
        assert!(evaluate(&yesterday, &RetentionSet::default(), &policy).is_eligible());
    }

    #[test]
    fn huge_threshold_never_expires() {
        let policy = AgePolicy::new(date(2024, 3, 1), u32::MAX);
        let image = record(&[], at("1970-01-01 00:00:00+00:00"));
        assert!(!evaluate(&image, &RetentionSet::default(), &policy).is_eligible());
    }

    #[test]
    fn reason_text() {
        assert_eq!(
            DeleteReason::OlderThan { days: 14 }.to_string(),
            "is older than 14 days and not tagged with version"
        );
        assert!(DeleteReason::NoTimestamp.to_string().contains("timestamp"));
    }
}
