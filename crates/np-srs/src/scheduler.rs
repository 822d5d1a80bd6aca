//! SM-2 review scheduler.
//!
//! Every flashcard review takes the card's current [`RecallState`] plus a
//! reviewer supplied [`Quality`] and produces the next state, including the
//! timestamp at which the card becomes due again.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SrsError;

/// Easiness factor given to a card on its first review.
pub const INITIAL_EASINESS: f64 = 2.5;

/// Floor below which the easiness factor never drops.
pub const MIN_EASINESS: f64 = 1.3;

/// Lowest quality that counts as a successful recall.
pub const PASSING_QUALITY: u8 = 3;

/// Success rate a card must exceed to count as mastered.
pub const MASTERY_SUCCESS_RATE: f64 = 0.8;

/// Interval (in days) a card must exceed to count as mastered.
pub const MASTERY_INTERVAL_DAYS: u32 = 30;

/// Longest interval the scheduler hands out, roughly a hundred years.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Reviewer rating of how well a card was recalled, 0 (blackout) to 5 (perfect).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Quality(u8);

impl Quality {
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// The raw rating.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether this rating counts as a successful recall.
    pub const fn is_success(self) -> bool {
        self.0 >= PASSING_QUALITY
    }
}

impl TryFrom<i64> for Quality {
    type Error = SrsError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(q) if q <= Self::MAX => Ok(Self(q)),
            _ => Err(SrsError::Validation(format!(
                "quality must be an integer between 0 and {}, got {value}",
                Self::MAX
            ))),
        }
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// A single review as submitted by the reviewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Review {
    /// How well the card was recalled.
    pub quality: Quality,
    /// Time the reviewer took to answer, in seconds.
    pub response_time: f64,
}

impl Review {
    /// Build a review, rejecting negative or non-finite response times.
    pub fn new(quality: Quality, response_time: f64) -> Result<Self, SrsError> {
        if !response_time.is_finite() || response_time < 0.0 {
            return Err(SrsError::Validation(format!(
                "response time must be a non-negative number of seconds, got {response_time}"
            )));
        }

        Ok(Self {
            quality,
            response_time,
        })
    }
}

/// Recall parameters of a flashcard.
///
/// Created with [`RecallState::default`] when a card is reviewed for the first
/// time and afterwards only ever replaced by the output of [`schedule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallState {
    /// Growth rate of the interval, never below [`MIN_EASINESS`]
    pub easiness_factor: f64,
    /// Days between `last_reviewed` and `next_review`, at least 1
    pub interval: u32,
    /// Consecutive successful reviews in the current streak
    pub repetitions: u32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
    /// Total reviews ever performed
    pub review_count: u32,
    /// Fraction of all reviews that were successful
    pub success_rate: f64,
    /// Mean response time over all reviews, in seconds
    pub average_response_time: f64,
}

impl Default for RecallState {
    fn default() -> Self {
        Self {
            easiness_factor: INITIAL_EASINESS,
            interval: 1,
            repetitions: 0,
            last_reviewed: None,
            next_review: None,
            review_count: 0,
            success_rate: 0.0,
            average_response_time: 0.0,
        }
    }
}

impl RecallState {
    /// A card is mastered once it is reliably recalled over long intervals.
    pub fn is_mastered(&self) -> bool {
        self.success_rate > MASTERY_SUCCESS_RATE && self.interval > MASTERY_INTERVAL_DAYS
    }

    /// Whether the card should be reviewed at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review.is_none_or(|next| next <= now)
    }
}

/// Compute the easiness factor after a review of the given quality.
///
/// # Arguments
///
/// * `easiness_factor` - The factor before the review
/// * `quality` - Rating of the review
///
/// # Returns
///
/// `EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))`, floored at [`MIN_EASINESS`].
/// A perfect recall adds 0.1, a 4 leaves the factor unchanged and anything
/// lower shrinks it.
pub fn next_easiness(easiness_factor: f64, quality: Quality) -> f64 {
    let lapse = f64::from(Quality::MAX - quality.value());
    let delta = 0.1 - lapse * (0.08 + lapse * 0.02);
    (easiness_factor + delta).max(MIN_EASINESS)
}

/// Apply one review to a card's recall state.
///
/// # Arguments
///
/// * `prior` - The card's state before this review (`RecallState::default()`
///   for a card that was never reviewed)
/// * `review` - Quality and response time of this review
/// * `now` - Review time; becomes `last_reviewed`
///
/// # Returns
///
/// The new state, or `SrsError::Validation` if the review is malformed or the
/// next due date cannot be represented.
///
/// # Algorithm
///
/// * Quality >= 3 (success): the interval is 1 day on the first success, 6 on
///   the second, then `round(interval * EF)`, capped at [`MAX_INTERVAL_DAYS`].
///   The multiplication uses the easiness factor the card had *before* this
///   review; the updated factor only takes effect from the next review on.
/// * Quality < 3 (failure): the interval drops back to 1 day and the streak of
///   repetitions resets to 0.
/// * The easiness factor is updated by [`next_easiness`] either way.
/// * `success_rate` and `average_response_time` are running means over every
///   review the card ever had; a failure does not reset them.
pub fn schedule(
    prior: &RecallState,
    review: Review,
    now: DateTime<Utc>,
) -> Result<RecallState, SrsError> {
    // Revalidate, the fields are public
    let review = Review::new(review.quality, review.response_time)?;
    let quality = review.quality;

    let (interval, repetitions) = if quality.is_success() {
        let interval = match prior.repetitions {
            0 => 1,
            1 => 6,
            _ => {
                let grown = (f64::from(prior.interval) * prior.easiness_factor).round();
                // ef >= 1.3 and interval >= 1 keep this >= 1
                (grown.min(f64::from(MAX_INTERVAL_DAYS)) as u32).max(1)
            }
        };
        (interval, prior.repetitions.saturating_add(1))
    } else {
        (1, 0)
    };

    let easiness_factor = next_easiness(prior.easiness_factor, quality);
    let next_review = now
        .checked_add_signed(Duration::days(i64::from(interval)))
        .ok_or_else(|| {
            SrsError::Validation(format!("review time {now} is too late to schedule from"))
        })?;

    let n = f64::from(prior.review_count);
    let hit = if quality.is_success() { 1.0 } else { 0.0 };
    let success_rate = (prior.success_rate * n + hit) / (n + 1.0);
    let average_response_time = (prior.average_response_time * n + review.response_time) / (n + 1.0);

    Ok(RecallState {
        easiness_factor,
        interval,
        repetitions,
        last_reviewed: Some(now),
        next_review: Some(next_review),
        review_count: prior.review_count.saturating_add(1),
        success_rate,
        average_response_time,
    })
}
