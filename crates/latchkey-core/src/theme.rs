// ── Theme ──
//
// Light/dark preference. A stored choice wins; otherwise the terminal's
// reported background decides.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::CoreError;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette {
                accent: (128, 255, 234),
                success: (80, 250, 123),
                error: (255, 99, 99),
                info: (130, 170, 255),
                muted: (140, 140, 160),
            },
            Self::Light => Palette {
                accent: (0, 110, 160),
                success: (0, 128, 60),
                error: (190, 20, 40),
                info: (40, 80, 190),
                muted: (100, 100, 110),
            },
        }
    }
}

/// RGB colors used for terminal output under a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: (u8, u8, u8),
    pub success: (u8, u8, u8),
    pub error: (u8, u8, u8),
    pub info: (u8, u8, u8),
    pub muted: (u8, u8, u8),
}

/// Guess the system preference from a `COLORFGBG` value (`"fg;bg"`).
///
/// Background colors 0-6 and 8 are dark. Without a value, dark is assumed.
pub fn prefers_dark(colorfgbg: Option<&str>) -> bool {
    let Some(bg) = colorfgbg.and_then(|v| v.rsplit(';').next()) else {
        return true;
    };
    match bg.trim().parse::<u8>() {
        Ok(code) => code <= 6 || code == 8,
        Err(_) => true,
    }
}

/// Read the system preference from the environment.
pub fn system_prefers_dark() -> bool {
    prefers_dark(std::env::var("COLORFGBG").ok().as_deref())
}

/// Where the chosen theme is persisted.
pub trait ThemeStore {
    fn load_theme(&self) -> Result<Option<Theme>, CoreError>;
    fn save_theme(&self, theme: Theme) -> Result<(), CoreError>;
}

/// The active theme, written through to its store on every change.
#[derive(Debug)]
pub struct ThemePreference<S> {
    store: S,
    theme: Theme,
}

impl<S: ThemeStore> ThemePreference<S> {
    pub fn load(store: S, system_dark: bool) -> Result<Self, CoreError> {
        let theme = store.load_theme()?.unwrap_or(if system_dark {
            Theme::Dark
        } else {
            Theme::Light
        });
        Ok(Self { store, theme })
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme.is_dark()
    }

    pub fn set(&mut self, theme: Theme) -> Result<(), CoreError> {
        self.store.save_theme(theme)?;
        self.theme = theme;
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<Theme, CoreError> {
        let next = self.theme.toggled();
        self.set(next)?;
        Ok(next)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[derive(Default)]
    struct CellStore(Cell<Option<Theme>>);

    impl ThemeStore for &CellStore {
        fn load_theme(&self) -> Result<Option<Theme>, CoreError> {
            Ok(self.0.get())
        }

        fn save_theme(&self, theme: Theme) -> Result<(), CoreError> {
            self.0.set(Some(theme));
            Ok(())
        }
    }

    #[test]
    fn stored_choice_wins_over_system() {
        let store = CellStore(Cell::new(Some(Theme::Light)));
        let pref = ThemePreference::load(&store, true).unwrap();
        assert_eq!(pref.theme(), Theme::Light);
    }

    #[test]
    fn falls_back_to_system() {
        let store = CellStore::default();
        assert!(ThemePreference::load(&store, true).unwrap().is_dark());
        assert!(!ThemePreference::load(&store, false).unwrap().is_dark());
    }

    #[test]
    fn toggle_persists() {
        let store = CellStore::default();
        let mut pref = ThemePreference::load(&store, false).unwrap();
        assert_eq!(pref.toggle().unwrap(), Theme::Dark);
        assert_eq!(store.0.get(), Some(Theme::Dark));
        assert_eq!(pref.toggle().unwrap(), Theme::Light);
    }

    #[test]
    fn colorfgbg_detection() {
        assert!(prefers_dark(Some("15;0")));
        assert!(!prefers_dark(Some("0;15")));
        assert!(prefers_dark(Some("12;default;8")));
        assert!(prefers_dark(None));
        assert!(prefers_dark(Some("garbage")));
    }
}
