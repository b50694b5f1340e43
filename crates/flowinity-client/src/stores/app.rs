//! Application-wide view state: title, navigation rail badges, active locale
//! and window focus.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use flowinity_shared::constants::{
    APP_NAME, BADGE_OVERFLOW, BADGE_OVERFLOW_THRESHOLD, DEFAULT_LANGUAGE,
};

/// Sections of the navigation rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RailMode {
    Home,
    Gallery,
    Chat,
    Workspaces,
    Mail,
    Social,
}

/// Value shown on a rail entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Badge {
    Count(u64),
    Overflow,
}

impl Badge {
    /// Badge for an unread total. Totals of 1000 and above collapse to `1k+`.
    pub fn for_unread(total: u64) -> Self {
        if total >= BADGE_OVERFLOW_THRESHOLD {
            Badge::Overflow
        } else {
            Badge::Count(total)
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Badge::Count(n) => write!(f, "{n}"),
            Badge::Overflow => f.write_str(BADGE_OVERFLOW),
        }
    }
}

#[derive(Debug)]
struct AppState {
    title: String,
    locale: String,
    focused: bool,
    badges: HashMap<RailMode, Badge>,
}

#[derive(Debug)]
pub struct AppStore {
    state: Mutex<AppState>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStore {
    /// A focused window titled with the product name and the default locale.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(AppState {
                title: APP_NAME.to_string(),
                locale: DEFAULT_LANGUAGE.to_string(),
                focused: true,
                badges: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn title(&self) -> String {
        self.lock().title.clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        tracing::debug!(%title, "title changed");
        self.lock().title = title;
    }

    pub fn locale(&self) -> String {
        self.lock().locale.clone()
    }

    pub fn set_locale(&self, locale: impl Into<String>) {
        self.lock().locale = locale.into();
    }

    pub fn has_focus(&self) -> bool {
        self.lock().focused
    }

    pub fn set_focus(&self, focused: bool) {
        self.lock().focused = focused;
    }

    pub fn badge(&self, mode: RailMode) -> Option<Badge> {
        self.lock().badges.get(&mode).cloned()
    }

    pub fn set_badge(&self, mode: RailMode, badge: Badge) {
        self.lock().badges.insert(mode, badge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_overflow() {
        assert_eq!(Badge::for_unread(0), Badge::Count(0));
        assert_eq!(Badge::for_unread(999), Badge::Count(999));
        assert_eq!(Badge::for_unread(1000), Badge::Overflow);
        assert_eq!(Badge::for_unread(1000).to_string(), "1k+");
        assert_eq!(Badge::for_unread(42).to_string(), "42");
    }

    #[test]
    fn test_defaults_and_setters() {
        let app = AppStore::new();
        assert_eq!(app.title(), "Flowinity");
        assert_eq!(app.locale(), "en");
        assert!(app.has_focus());
        assert!(app.badge(RailMode::Chat).is_none());

        app.set_title("General");
        app.set_locale("de");
        app.set_focus(false);
        app.set_badge(RailMode::Chat, Badge::Count(3));

        assert_eq!(app.title(), "General");
        assert_eq!(app.locale(), "de");
        assert!(!app.has_focus());
        assert_eq!(app.badge(RailMode::Chat), Some(Badge::Count(3)));
    }
}
