//! Adaptive question selection.
//!
//! A learner's competency picks a difficulty mix from a [`WeightTable`]; the
//! mix is turned into per-tier targets, each tier is drawn from the question
//! pool, and anything still missing is backfilled from the rest of the area.

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SrsError;

/// Competency below which the low band applies.
pub const LOW_BAND_CEILING: f64 = 0.3;

/// Competency from which the high band applies.
pub const HIGH_BAND_FLOOR: f64 = 0.7;

/// Tolerance when checking that a mix sums to one.
const MIX_TOLERANCE: f64 = 1e-6;

/// Declared difficulty tier of a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// All tiers, in the order selections are assembled.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = SrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(SrsError::Validation(format!(
                "unknown difficulty '{other}', expected easy, medium or hard"
            ))),
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = SrsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Share of a quiz drawn from each difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyMix {
    easy: f64,
    medium: f64,
    hard: f64,
}

impl DifficultyMix {
    /// Build a mix. Every weight must be in `[0, 1]` and they must sum to 1.
    pub fn new(easy: f64, medium: f64, hard: f64) -> Result<Self, SrsError> {
        for (tier, weight) in [("easy", easy), ("medium", medium), ("hard", hard)] {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(SrsError::Validation(format!(
                    "{tier} weight must be between 0 and 1, got {weight}"
                )));
            }
        }

        let total = easy + medium + hard;
        if (total - 1.0).abs() > MIX_TOLERANCE {
            return Err(SrsError::Validation(format!(
                "difficulty weights must sum to 1, got {total}"
            )));
        }

        Ok(Self { easy, medium, hard })
    }

    pub const fn weight(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

/// Difficulty mixes for the low, middle and high competency bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightTable {
    low: DifficultyMix,
    mid: DifficultyMix,
    high: DifficultyMix,
}

impl WeightTable {
    pub const fn new(low: DifficultyMix, mid: DifficultyMix, high: DifficultyMix) -> Self {
        Self { low, mid, high }
    }

    /// The default table.
    ///
    /// | competency | easy | medium | hard |
    /// |---|---|---|---|
    /// | < 0.3 | 0.7 | 0.3 | 0.0 |
    /// | 0.3 - 0.69 | 0.2 | 0.6 | 0.2 |
    /// | >= 0.7 | 0.1 | 0.3 | 0.6 |
    pub const fn standard() -> Self {
        Self {
            low: DifficultyMix {
                easy: 0.7,
                medium: 0.3,
                hard: 0.0,
            },
            mid: DifficultyMix {
                easy: 0.2,
                medium: 0.6,
                hard: 0.2,
            },
            high: DifficultyMix {
                easy: 0.1,
                medium: 0.3,
                hard: 0.6,
            },
        }
    }

    /// Mix for a competency in `[0, 1]`.
    pub fn mix_for(&self, competency: f64) -> Result<&DifficultyMix, SrsError> {
        if !competency.is_finite() || !(0.0..=1.0).contains(&competency) {
            return Err(SrsError::Validation(format!(
                "competency must be between 0 and 1, got {competency}"
            )));
        }

        Ok(if competency < LOW_BAND_CEILING {
            &self.low
        } else if competency < HIGH_BAND_FLOOR {
            &self.mid
        } else {
            &self.high
        })
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Number of questions to request from each tier for a quiz of `count`.
///
/// # Arguments
///
/// * `mix` - Difficulty mix of the learner's competency band
/// * `count` - Requested quiz length
///
/// # Returns
///
/// `(tier, target)` pairs in easy, medium, hard order. Each tier asks for
/// `max(1, floor(count * weight))`, so the targets can add up to more than
/// `count`; [`select_questions`] truncates. Tiers with a weight of exactly
/// zero are left out instead of being bumped to one.
pub fn tier_targets(mix: &DifficultyMix, count: usize) -> Vec<(Difficulty, usize)> {
    Difficulty::ALL
        .into_iter()
        .filter_map(|difficulty| {
            let weight = mix.weight(difficulty);
            (weight > 0.0).then(|| {
                let target = (count as f64 * weight).floor() as usize;
                (difficulty, target.max(1))
            })
        })
        .collect()
}

/// What the selector needs to know about a question.
pub trait PoolQuestion {
    fn id(&self) -> Uuid;
    fn area_id(&self) -> Uuid;
    fn difficulty(&self) -> Difficulty;
}

/// Source of questions for the selector.
///
/// Both methods return questions in a stable pool order; the selector keeps
/// that order.
pub trait QuestionPool {
    type Question: PoolQuestion + Clone;
    type Error: From<SrsError>;

    /// Up to `limit` questions of one area and difficulty.
    fn by_difficulty(
        &self,
        area_id: Uuid,
        difficulty: Difficulty,
        limit: usize,
    ) -> Result<Vec<Self::Question>, Self::Error>;

    /// Every question of one area.
    fn by_area(&self, area_id: Uuid) -> Result<Vec<Self::Question>, Self::Error>;
}

impl<Q> QuestionPool for [Q]
where
    Q: PoolQuestion + Clone,
{
    type Question = Q;
    type Error = SrsError;

    fn by_difficulty(
        &self,
        area_id: Uuid,
        difficulty: Difficulty,
        limit: usize,
    ) -> Result<Vec<Q>, SrsError> {
        Ok(self
            .iter()
            .filter(|q| q.area_id() == area_id && q.difficulty() == difficulty)
            .take(limit)
            .cloned()
            .collect())
    }

    fn by_area(&self, area_id: Uuid) -> Result<Vec<Q>, SrsError> {
        Ok(self.iter().filter(|q| q.area_id() == area_id).cloned().collect())
    }
}

/// Pick `count` questions from an area, stratified by difficulty for the given
/// competency.
///
/// # Arguments
///
/// * `pool` - Where questions come from
/// * `area_id` - Study area to draw from
/// * `competency` - Learner competency in `[0, 1]`, see [`crate::estimate_competency`]
/// * `count` - Quiz length, at least 1
/// * `table` - Competency band to difficulty mix mapping
///
/// # Returns
///
/// At most `count` distinct questions. `SrsError::EmptyPool` if the area has
/// no questions at all, `SrsError::Validation` for a zero count or an
/// out-of-range competency.
///
/// # Algorithm
///
/// * Look up the band's mix and turn it into per-tier targets ([`tier_targets`]).
/// * Fetch up to the target from each tier and concatenate easy, medium, hard.
/// * If the tiers come up short, backfill with the area's other questions in
///   pool order, skipping any already picked.
/// * Truncate to `count`. The result is only shorter when the area runs out.
pub fn select_questions<P>(
    pool: &P,
    area_id: Uuid,
    competency: f64,
    count: usize,
    table: &WeightTable,
) -> Result<Vec<P::Question>, P::Error>
where
    P: QuestionPool + ?Sized,
{
    if count == 0 {
        return Err(SrsError::Validation("question count must be at least 1".to_string()).into());
    }
    let mix = table.mix_for(competency)?;

    let area = pool.by_area(area_id)?;
    if area.is_empty() {
        return Err(SrsError::EmptyPool(format!("no questions in study area {area_id}")).into());
    }

    let mut seen = HashSet::new();
    let mut selected = Vec::with_capacity(count);

    for (difficulty, target) in tier_targets(mix, count) {
        for question in pool.by_difficulty(area_id, difficulty, target)? {
            if seen.insert(question.id()) {
                selected.push(question);
            }
        }
    }

    for question in area {
        if selected.len() >= count {
            break;
        }
        if seen.insert(question.id()) {
            selected.push(question);
        }
    }

    selected.truncate(count);
    Ok(selected)
}
