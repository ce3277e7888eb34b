use serde::Serialize;

use crate::*;

/// One face of the board. Two cards in a deck share each `value`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub value: &'static str,
    pub is_flipped: bool,
    pub is_matched: bool,
}

impl Card {
    pub const fn new(id: CardId, value: &'static str) -> Self {
        Self {
            id,
            value,
            is_flipped: false,
            is_matched: false,
        }
    }

    /// Face up for any reason: selected, hinted or already matched.
    pub const fn is_face_up(&self) -> bool {
        self.is_flipped || self.is_matched
    }

    pub const fn is_selectable(&self) -> bool {
        !self.is_flipped && !self.is_matched
    }
}
