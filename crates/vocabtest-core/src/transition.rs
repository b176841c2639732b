//! Progress transitions driven by quiz outcomes.
//!
//! Rules:
//! - A new word answered correctly is considered known and jumps straight
//!   to `Mastered`; answered incorrectly it starts `Learning`.
//! - Otherwise a correct answer extends the streak, promoting one level
//!   (streak back to 0) once the streak reaches the threshold. `Mastered`
//!   words keep accumulating streak.
//! - An incorrect answer demotes one level (streak back to 0), except at
//!   `Learning` where nothing changes.

use crate::category::{Category, WordProgress};

/// Consecutive correct answers needed to move up one category.
pub const DEFAULT_PROMOTION_THRESHOLD: u32 = 3;

/// Apply one quiz outcome to `progress`.
pub fn advance(progress: WordProgress, correct: bool, threshold: u32) -> WordProgress {
    if progress.category == Category::New {
        let category = if correct {
            Category::Mastered
        } else {
            Category::Learning
        };
        return WordProgress::new(category, 0);
    }

    if correct {
        let streak = progress.streak.saturating_add(1);
        match progress.category.promoted() {
            Some(next) if streak >= threshold => WordProgress::new(next, 0),
            _ => WordProgress::new(progress.category, streak),
        }
    } else {
        match progress.category.demoted() {
            Some(previous) => WordProgress::new(previous, 0),
            None => progress,
        }
    }
}

/// Direction of a category change, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Promoted,
    Demoted,
    Unchanged,
}

impl Movement {
    pub fn between(before: WordProgress, after: WordProgress) -> Self {
        match after.category.cmp(&before.category) {
            std::cmp::Ordering::Greater => Movement::Promoted,
            std::cmp::Ordering::Less => Movement::Demoted,
            std::cmp::Ordering::Equal => Movement::Unchanged,
        }
    }
}
