//! Application state for the statistics dashboard.
//!
//! All six period pages are fetched and aggregated once when the dashboard
//! opens; navigation only changes which precomputed page is drawn. The
//! state machine is the active tab index plus a per-page scroll offset, fed
//! by key events and consumed by the pure renderer in `ui.rs`.

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use punchcard_core::{Database, Period, PeriodStats};

/// Items a single Up/Down keypress scrolls the session list by.
const LIST_PAGE: usize = 10;

/// One precomputed dashboard page.
pub struct Page {
    /// Aggregated statistics for this page's period
    pub stats: PeriodStats,
    /// Scroll offset into the session list, in items. Only meaningful on
    /// list-bearing pages.
    pub scroll: usize,
}

impl Page {
    fn max_scroll(&self) -> usize {
        self.stats.sessions.len().saturating_sub(LIST_PAGE)
    }
}

/// Main application state.
pub struct App {
    /// Pages in tab order, one per [`Period::ALL`] entry
    pub pages: Vec<Page>,
    /// Index of the active tab
    pub active_tab: usize,
    /// Whether the app should exit
    pub should_quit: bool,
}

impl App {
    /// Fetch and aggregate every period eagerly, starting on `initial`.
    pub fn load(db: &Database, initial: Period) -> Result<Self> {
        let now = Utc::now();
        let pages = Period::ALL
            .iter()
            .map(|&period| {
                PeriodStats::collect(db, period, now).map(|stats| Page { stats, scroll: 0 })
            })
            .collect::<punchcard_core::Result<Vec<_>>>()?;
        Ok(Self::from_pages(pages, initial))
    }

    /// Build the app from already-aggregated pages.
    pub fn from_pages(pages: Vec<Page>, initial: Period) -> Self {
        let active_tab = Period::ALL
            .iter()
            .position(|&p| p == initial)
            .unwrap_or(0);
        Self {
            pages,
            active_tab,
            should_quit: false,
        }
    }

    /// The currently displayed page.
    pub fn active_page(&self) -> &Page {
        &self.pages[self.active_tab]
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.prev_tab();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.next_tab();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_down();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_up();
            }
            _ => {}
        }
    }

    fn next_tab(&mut self) {
        self.active_tab = (self.active_tab + 1) % self.pages.len();
    }

    fn prev_tab(&mut self) {
        self.active_tab = (self.active_tab + self.pages.len() - 1) % self.pages.len();
    }

    /// Scroll the session list down one page of items. Ignored on pages
    /// without a session list.
    fn scroll_down(&mut self) {
        let page = &mut self.pages[self.active_tab];
        if !page.stats.period.has_list() {
            return;
        }
        page.scroll = (page.scroll + LIST_PAGE).min(page.max_scroll());
    }

    /// Scroll the session list up one page of items.
    fn scroll_up(&mut self) {
        let page = &mut self.pages[self.active_tab];
        if !page.stats.period.has_list() {
            return;
        }
        page.scroll = page.scroll.saturating_sub(LIST_PAGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use punchcard_core::Session;

    fn sessions(n: usize) -> Vec<Session> {
        let now = Utc::now();
        (0..n)
            .map(|i| Session {
                id: i as i64 + 1,
                name: format!("task-{i}"),
                start: now - Duration::minutes(30),
                finish: Some(now),
            })
            .collect()
    }

    fn app_with_list_len(n: usize) -> App {
        let now = Utc::now();
        let pages = Period::ALL
            .iter()
            .map(|&period| Page {
                stats: PeriodStats::from_sessions(period, sessions(n), now),
                scroll: 0,
            })
            .collect();
        App::from_pages(pages, Period::All)
    }

    #[test]
    fn test_tab_cycling_is_circular() {
        let mut app = app_with_list_len(0);
        assert_eq!(app.active_tab, 0);

        app.handle_key(KeyEvent::from(KeyCode::Left));
        assert_eq!(app.active_tab, 5);

        for _ in 0..6 {
            app.handle_key(KeyEvent::from(KeyCode::Right));
        }
        assert_eq!(app.active_tab, 5);
    }

    #[test]
    fn test_initial_tab_from_period() {
        let app = app_with_list_len(0);
        assert_eq!(app.active_tab, 0);
        let pages = app.pages;
        let app = App::from_pages(pages, Period::Month);
        assert_eq!(app.active_tab, 4);
        assert_eq!(app.active_page().stats.period, Period::Month);
    }

    #[test]
    fn test_scroll_only_on_list_pages() {
        let mut app = app_with_list_len(30);

        // "All" has no list; scrolling is a no-op
        app.handle_key(KeyEvent::from(KeyCode::Down));
        assert_eq!(app.active_page().scroll, 0);

        // Move to "Today", which has one
        app.handle_key(KeyEvent::from(KeyCode::Right));
        app.handle_key(KeyEvent::from(KeyCode::Down));
        assert_eq!(app.active_page().scroll, LIST_PAGE);
    }

    #[test]
    fn test_scroll_clamps_at_both_ends() {
        let mut app = app_with_list_len(15);
        app.handle_key(KeyEvent::from(KeyCode::Right)); // Today

        app.handle_key(KeyEvent::from(KeyCode::Up));
        assert_eq!(app.active_page().scroll, 0);

        for _ in 0..10 {
            app.handle_key(KeyEvent::from(KeyCode::Down));
        }
        // 15 items, one page of 10 visible: offset stops at 5
        assert_eq!(app.active_page().scroll, 5);
    }

    #[test]
    fn test_quit_keys() {
        for key in [
            KeyEvent::from(KeyCode::Char('q')),
            KeyEvent::from(KeyCode::Esc),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut app = app_with_list_len(0);
            assert!(!app.should_quit);
            app.handle_key(key);
            assert!(app.should_quit);
        }
    }
}
