//! Pure scoring helpers shared by the mode rules.

use super::entities::{Answer, GameSettings, Points};

/// Points for a card in Standard and Three Lives.
///
/// A correct card is always worth one point. Skipping or running out of time
/// costs a point only when the matching penalty is enabled.
#[must_use]
pub fn points_for(answer: Answer, settings: &GameSettings) -> Points {
    match answer {
        Answer::Correct => 1,
        Answer::Skip if settings.give_up_penalty => -1,
        Answer::TimeUp if settings.time_up_penalty => -1,
        Answer::Skip | Answer::TimeUp => 0,
    }
}

/// Points for a card in Hot Potato, where penalties are fixed.
#[must_use]
pub fn hot_potato_points(answer: Answer) -> Points {
    match answer {
        Answer::Correct => 1,
        Answer::Skip => 0,
        Answer::TimeUp => -1,
    }
}

/// Whether an answer uses up one of the team's skips (Hot Potato) or one of
/// the player's lives (Three Lives).
#[must_use]
pub fn is_miss(answer: Answer) -> bool {
    !matches!(answer, Answer::Correct)
}
