//! Due-card query.
//!
//! Overdue material comes first, weak material breaks ties, and short results
//! are padded with unseen and then arbitrary cards so a study session is never
//! empty while the deck has content.

use chrono::{DateTime, Utc};

use crate::{error::SrsError, scheduler::RecallState};

/// Anything that carries an (optional) recall state.
///
/// `None` means the card has never been reviewed.
pub trait Reviewable {
    fn recall(&self) -> Option<&RecallState>;
}

impl Reviewable for RecallState {
    fn recall(&self) -> Option<&RecallState> {
        Some(self)
    }
}

impl Reviewable for Option<RecallState> {
    fn recall(&self) -> Option<&RecallState> {
        self.as_ref()
    }
}

/// Whole days a card is past its due date. Never-scheduled cards count as 0.
fn days_overdue(recall: Option<&RecallState>, now: DateTime<Utc>) -> i64 {
    recall
        .and_then(|r| r.next_review)
        .map_or(0, |next| (now - next).num_days())
}

fn is_due(recall: Option<&RecallState>, now: DateTime<Utc>) -> bool {
    recall.is_none_or(|r| r.is_due(now))
}

fn review_count(recall: Option<&RecallState>) -> u32 {
    recall.map_or(0, |r| r.review_count)
}

fn success_rate(recall: Option<&RecallState>) -> f64 {
    recall.map_or(0.0, |r| r.success_rate)
}

/// Select up to `limit` cards to review at `now`.
///
/// Due cards are ordered most overdue first, then lowest success rate first.
/// If that leaves room, never-reviewed cards and then any remaining cards are
/// appended in the order they appear in `cards`.
///
/// Fails only when `cards` is empty.
pub fn select_due<T>(cards: &[T], now: DateTime<Utc>, limit: usize) -> Result<Vec<T>, SrsError>
where
    T: Reviewable + Clone,
{
    if cards.is_empty() {
        return Err(SrsError::EmptyPool("no flashcards to review".to_string()));
    }

    let mut due: Vec<usize> = (0..cards.len())
        .filter(|&i| is_due(cards[i].recall(), now))
        .collect();

    // Stable sort keeps discovery order for full ties
    due.sort_by(|&a, &b| {
        let (ra, rb) = (cards[a].recall(), cards[b].recall());
        days_overdue(rb, now)
            .cmp(&days_overdue(ra, now))
            .then_with(|| success_rate(ra).total_cmp(&success_rate(rb)))
    });
    due.truncate(limit);

    let mut chosen = vec![false; cards.len()];
    for &i in &due {
        chosen[i] = true;
    }

    let mut picked = due;
    let backfill_passes: [fn(Option<&RecallState>) -> bool; 2] =
        [|r| review_count(r) == 0, |_| true];
    for accept in backfill_passes {
        for (i, card) in cards.iter().enumerate() {
            if picked.len() >= limit {
                break;
            }
            if !chosen[i] && accept(card.recall()) {
                chosen[i] = true;
                picked.push(i);
            }
        }
    }

    Ok(picked.into_iter().map(|i| cards[i].clone()).collect())
}
