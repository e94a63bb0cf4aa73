//! The shared game settings record
//!
//! [GameSettings] is the value the singleton holders are usually
//! demonstrated with. On its own, it's a plain type: every call to
//! [GameSettings::new] builds a fresh, independent record.

use core::fmt;
use core::str::FromStr;
use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

use thiserror::Error;

/// Game difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Difficulty {
    Easy = 0,
    #[default]
    Medium = 1,
    Hard = 2,
}

impl Difficulty {
    const fn from_repr(n: u8) -> Self {
        match n {
            0 => Self::Easy,
            2 => Self::Hard,
            _ => Self::Medium,
        }
    }

    /// Upper case name of the level
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The string is not a difficulty level
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty level, expected one of EASY, MEDIUM or HARD")]
pub struct ParseDifficultyError;

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Easy, Self::Medium, Self::Hard]
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(ParseDifficultyError)
    }
}

/// A copy of every field of a [GameSettings], taken at one moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettingsSnapshot {
    pub volume: u32,
    pub brightness: u32,
    pub difficulty: Difficulty,
}

/// Audio, video and gameplay settings.
///
/// Each field can be read and written through a shared reference, so
/// a single instance can be handed out to many threads. Every field is
/// synchronized on its own: a reader may see a new volume next to an
/// old brightness while a writer is halfway through updating both.
///
/// # Example
/// ```
/// use singletonrs::GameSettings;
///
/// let menu = GameSettings::new();
/// menu.set_volume(80);
///
/// let gameplay = GameSettings::new();
/// assert_eq!(menu.volume(), 80);
/// assert_eq!(gameplay.volume(), 50);
/// ```
pub struct GameSettings {
    volume: AtomicU32,
    brightness: AtomicU32,
    difficulty: AtomicU8,
}

impl GameSettings {
    pub const DEFAULT_VOLUME: u32 = 50;
    pub const DEFAULT_BRIGHTNESS: u32 = 70;

    /// Creates settings with the default values
    pub const fn new() -> Self {
        Self::with_values(Self::DEFAULT_VOLUME, Self::DEFAULT_BRIGHTNESS, Difficulty::Medium)
    }

    pub const fn with_values(volume: u32, brightness: u32, difficulty: Difficulty) -> Self {
        Self {
            volume: AtomicU32::new(volume),
            brightness: AtomicU32::new(brightness),
            difficulty: AtomicU8::new(difficulty as u8),
        }
    }

    pub fn volume(&self) -> u32 {
        self.volume.load(Ordering::Acquire)
    }

    pub fn set_volume(&self, volume: u32) {
        self.volume.store(volume, Ordering::Release);
    }

    pub fn brightness(&self) -> u32 {
        self.brightness.load(Ordering::Acquire)
    }

    pub fn set_brightness(&self, brightness: u32) {
        self.brightness.store(brightness, Ordering::Release);
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_repr(self.difficulty.load(Ordering::Acquire))
    }

    pub fn set_difficulty(&self, difficulty: Difficulty) {
        self.difficulty.store(difficulty as u8, Ordering::Release);
    }

    /// Reads every field
    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            volume: self.volume(),
            brightness: self.brightness(),
            difficulty: self.difficulty(),
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let SettingsSnapshot { volume, brightness, difficulty } = self.snapshot();
        f.debug_struct("GameSettings")
            .field("volume", &volume)
            .field("brightness", &brightness)
            .field("difficulty", &difficulty)
            .finish()
    }
}
