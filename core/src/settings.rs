use serde::{Deserialize, Serialize};

use crate::*;

pub const DIFFICULTY_KEY: &str = "difficulty";
pub const THEME_KEY: &str = "theme";
pub const SOUND_ENABLED_KEY: &str = "soundEnabled";
pub const GAME_MODE_KEY: &str = "gameMode";

/// Player preferences, each field is stored under its own key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub difficulty: Difficulty,
    pub theme: Theme,
    pub sound_enabled: bool,
    pub mode: GameMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            theme: Theme::default(),
            sound_enabled: true,
            mode: GameMode::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingChange {
    Difficulty(Difficulty),
    Theme(Theme),
    SoundEnabled(bool),
    Mode(GameMode),
}

impl SettingChange {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Difficulty(_) => DIFFICULTY_KEY,
            Self::Theme(_) => THEME_KEY,
            Self::SoundEnabled(_) => SOUND_ENABLED_KEY,
            Self::Mode(_) => GAME_MODE_KEY,
        }
    }

    /// Changes that deal a new board.
    pub const fn restarts_session(self) -> bool {
        matches!(self, Self::Difficulty(_) | Self::Mode(_))
    }
}

impl Settings {
    /// Each missing or malformed key falls back to its own default.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let defaults = Self::default();
        Self {
            difficulty: load_json(store, DIFFICULTY_KEY).unwrap_or(defaults.difficulty),
            theme: load_json(store, THEME_KEY).unwrap_or(defaults.theme),
            sound_enabled: load_json(store, SOUND_ENABLED_KEY).unwrap_or(defaults.sound_enabled),
            mode: load_json(store, GAME_MODE_KEY).unwrap_or(defaults.mode),
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        save_json(store, DIFFICULTY_KEY, &self.difficulty);
        save_json(store, THEME_KEY, &self.theme);
        save_json(store, SOUND_ENABLED_KEY, &self.sound_enabled);
        save_json(store, GAME_MODE_KEY, &self.mode);
    }

    /// Applies `change`, returning whether any value changed.
    pub fn apply(&mut self, change: SettingChange) -> bool {
        let before = *self;
        match change {
            SettingChange::Difficulty(difficulty) => self.difficulty = difficulty,
            SettingChange::Theme(theme) => self.theme = theme,
            SettingChange::SoundEnabled(enabled) => self.sound_enabled = enabled,
            SettingChange::Mode(mode) => self.mode = mode,
        }
        before != *self
    }

    /// Applies `change` and persists the affected key when it changed.
    pub fn apply_and_save(&mut self, change: SettingChange, store: &mut impl KeyValueStore) -> bool {
        if !self.apply(change) {
            return false;
        }

        let key = change.key();
        match change {
            SettingChange::Difficulty(difficulty) => save_json(store, key, &difficulty),
            SettingChange::Theme(theme) => save_json(store, key, &theme),
            SettingChange::SoundEnabled(enabled) => save_json(store, key, &enabled),
            SettingChange::Mode(mode) => save_json(store, key, &mode),
        }
        log::debug!("setting {} changed", key);
        true
    }
}
