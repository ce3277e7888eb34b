use core::fmt;
use serde::{Deserialize, Serialize};

/// Identifier of a card, unique within one deck.
pub type CardId = u16;

/// Count type used for moves, seconds, pairs and the other session counters.
pub type Count = u32;

/// Points awarded for a finished game.
pub type Score = u32;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn pair_count(self) -> Count {
        use Difficulty::*;
        match self {
            Easy => 6,
            Medium => 8,
            Hard => 12,
        }
    }

    pub const fn column_count(self) -> Count {
        use Difficulty::*;
        match self {
            Easy => 3,
            Medium | Hard => 4,
        }
    }

    pub const fn card_count(self) -> Count {
        self.pair_count() * 2
    }

    /// Largest pair count over every difficulty, the minimum size of a catalog.
    pub const fn max_pair_count() -> Count {
        Self::Hard.pair_count()
    }

    pub const fn key(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Only affects the score multiplier, there are no mode specific rules.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    #[default]
    Classic,
    Timed,
    LimitedMoves,
}

impl GameMode {
    pub const ALL: [Self; 3] = [Self::Classic, Self::Timed, Self::LimitedMoves];

    pub const fn key(self) -> &'static str {
        use GameMode::*;
        match self {
            Classic => "classic",
            Timed => "timed",
            LimitedMoves => "limitedMoves",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    #[default]
    Purple,
    Ocean,
    Sunset,
    Forest,
    Galaxy,
}

impl Theme {
    pub const ALL: [Self; 5] = [
        Self::Purple,
        Self::Ocean,
        Self::Sunset,
        Self::Forest,
        Self::Galaxy,
    ];

    pub const fn key(self) -> &'static str {
        use Theme::*;
        match self {
            Purple => "purple",
            Ocean => "ocean",
            Sunset => "sunset",
            Forest => "forest",
            Galaxy => "galaxy",
        }
    }

    pub const fn display_name(self) -> &'static str {
        use Theme::*;
        match self {
            Purple => "Purple Dream",
            Ocean => "Ocean Breeze",
            Sunset => "Sunset Glow",
            Forest => "Forest Fresh",
            Galaxy => "Cosmic Galaxy",
        }
    }
}

/// Named events a host may turn into sound effects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cue {
    Flip,
    Match,
    Win,
    Hint,
}

/// Formats seconds as `MM:SS`, minutes keep growing past 99.
pub fn format_time(seconds: Count) -> alloc::string::String {
    alloc::format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
