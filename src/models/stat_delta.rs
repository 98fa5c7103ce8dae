//! Increment of a card's "shown" / "correct" counters, as posted to `/api/stats`.
use super::CardId;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatDelta {
    pub id: CardId,
    pub shown_delta: u8,
    pub correct_delta: u8,
}

impl StatDelta {
    /// The card was put on screen.
    pub fn shown(id: CardId) -> Self {
        Self {
            id,
            shown_delta: 1,
            correct_delta: 0,
        }
    }

    /// The user answered "knew it".
    pub fn correct(id: CardId) -> Self {
        Self {
            id,
            shown_delta: 0,
            correct_delta: 1,
        }
    }
}
