//! Search session
//!
//! Ties the scanner, highlighter, navigator and replace engine to one
//! `EditingEngine`. Each operation dispatches its transactions and returns
//! once they are applied, so follow-up scans always see the new document.

use crate::{
    apply_highlights, clear_highlights, highlight_current, replace_all_transaction,
    replace_current_transaction, scan, EditingEngine, MatchNavigator, Result, ScrollRequest,
    SearchSettings,
};
use doc_model::{HighlightColor, Transaction};
use serde::{Deserialize, Serialize};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// No query
    #[default]
    Idle,
    /// Matches computed for the current query
    Searching,
    /// The user has moved between matches
    Navigating,
    /// The last action replaced text. Holds until the next search, move or clear.
    Replacing,
}

/// Search state for one document
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    query: String,
    navigator: MatchNavigator,
    state: SessionState,
    /// Text version the matches were computed against
    text_version: u64,
    settings: SearchSettings,
    pending_scroll: Option<ScrollRequest>,
}

impl SearchSession {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn navigator(&self) -> &MatchNavigator {
        &self.navigator
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Counter text such as `1 / 3`
    pub fn label(&self) -> String {
        self.navigator.label()
    }

    /// Take the scroll request left by the last move, if any
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.pending_scroll.take()
    }

    /// Search for `query`, highlighting every match and making the first current.
    ///
    /// Returns the number of matches. A blank query clears the session.
    pub fn search(&mut self, engine: &mut EditingEngine, query: &str) -> Result<usize> {
        self.dispatch_clear(engine)?;
        self.pending_scroll = None;
        self.query = query.to_string();

        if query.trim().is_empty() {
            self.reset(engine);
            self.state = SessionState::Idle;
            return Ok(0);
        }

        self.navigator = MatchNavigator::new(scan(engine.tree(), query));
        self.text_version = engine.tree().text_version();
        self.state = SessionState::Searching;
        self.show_current(engine)?;

        tracing::debug!(
            "Search for {:?} found {} matches",
            self.query,
            self.navigator.len()
        );
        Ok(self.navigator.len())
    }

    /// Move to the next match
    pub fn next(&mut self, engine: &mut EditingEngine) -> Result<Option<usize>> {
        self.sync(engine)?;
        let index = self.navigator.next();
        self.after_move(engine, index)
    }

    /// Move to the previous match
    pub fn prev(&mut self, engine: &mut EditingEngine) -> Result<Option<usize>> {
        self.sync(engine)?;
        let index = self.navigator.prev();
        self.after_move(engine, index)
    }

    fn after_move(&mut self, engine: &mut EditingEngine, index: Option<usize>) -> Result<Option<usize>> {
        if index.is_some() {
            self.state = SessionState::Navigating;
            self.show_current(engine)?;
        }
        Ok(index)
    }

    /// Drop matches computed against text that has since changed.
    ///
    /// Returns true when the matches were invalidated.
    pub fn sync(&mut self, engine: &mut EditingEngine) -> Result<bool> {
        if engine.tree().text_version() == self.text_version {
            return Ok(false);
        }

        tracing::debug!("Document text changed, dropping {} matches", self.navigator.len());
        self.dispatch_clear(engine)?;
        self.reset(engine);
        if !self.query.trim().is_empty() {
            self.state = SessionState::Searching;
        }
        Ok(true)
    }

    /// Replace every occurrence of the query with `replacement`.
    ///
    /// Positions are recomputed first, so stale matches are never used. The
    /// match list is cleared afterwards. Returns the number of replacements.
    /// A blank replacement does nothing.
    pub fn replace_all(&mut self, engine: &mut EditingEngine, replacement: &str) -> Result<usize> {
        if self.query.trim().is_empty() || replacement.trim().is_empty() {
            return Ok(0);
        }

        self.dispatch_clear(engine)?;
        let matches = scan(engine.tree(), &self.query);

        let mut replaced = 0;
        if let Some(tr) = replace_all_transaction(&matches, replacement) {
            replaced = tr.steps().len();
            engine.dispatch(tr)?;
            tracing::info!(
                "Replaced {} occurrences of {:?} with {:?}",
                replaced,
                self.query,
                replacement
            );
        }

        self.reset(engine);
        if replaced > 0 {
            let mut tr = Transaction::new().add_to_history(false);
            self.mark_replacements(engine, &mut tr, replacement);
            engine.dispatch(tr)?;
        }
        if replaced > 0 {
            self.state = SessionState::Replacing;
        }
        Ok(replaced)
    }

    /// Replace the current match with `replacement` and re-run the search.
    ///
    /// The cursor stays on the same index when a match remains there,
    /// otherwise it moves to the first match. Returns false when there was
    /// no current match.
    pub fn replace_current(&mut self, engine: &mut EditingEngine, replacement: &str) -> Result<bool> {
        self.sync(engine)?;
        let Some(index) = self.navigator.cursor() else {
            return Ok(false);
        };
        let Some(tr) = replace_current_transaction(self.navigator.matches(), index, replacement)
        else {
            return Ok(false);
        };

        engine.dispatch(tr)?;
        tracing::info!("Replaced match {} of {:?} with {:?}", index + 1, self.query, replacement);

        self.dispatch_clear(engine)?;
        let matches = scan(engine.tree(), &self.query);
        self.navigator.replace_matches(matches, Some(index));
        self.text_version = engine.tree().text_version();

        let mut tr = Transaction::new().add_to_history(false);
        if let Some(current) = self.navigator.cursor() {
            highlight_current(&mut tr, self.navigator.matches(), current);
        }
        self.mark_replacements(engine, &mut tr, replacement);
        engine.dispatch(tr)?;

        self.queue_scroll();
        self.state = SessionState::Replacing;
        Ok(true)
    }

    /// Forget the query and remove every search highlight
    pub fn clear(&mut self, engine: &mut EditingEngine) -> Result<()> {
        self.dispatch_clear(engine)?;
        self.query.clear();
        self.reset(engine);
        self.state = SessionState::Idle;
        Ok(())
    }

    fn reset(&mut self, engine: &EditingEngine) {
        self.navigator.clear();
        self.pending_scroll = None;
        self.text_version = engine.tree().text_version();
    }

    fn dispatch_clear(&self, engine: &mut EditingEngine) -> Result<()> {
        match clear_highlights(engine.tree()) {
            Some(tr) => engine.dispatch(tr),
            None => Ok(()),
        }
    }

    /// Highlight all matches with the current one set apart
    fn show_current(&mut self, engine: &mut EditingEngine) -> Result<()> {
        if let Some(tr) = self.navigator.current_highlight() {
            engine.dispatch(tr)?;
            self.queue_scroll();
        }
        Ok(())
    }

    fn queue_scroll(&mut self) {
        if self.settings.center_on_navigate {
            self.pending_scroll = self.navigator.current().map(|m| ScrollRequest::new(m.from));
        }
    }

    /// Mark occurrences of the replacement text. Unrelated text that happens
    /// to equal the replacement is marked too.
    fn mark_replacements(&self, engine: &EditingEngine, tr: &mut Transaction, replacement: &str) {
        if self.settings.highlight_replacements {
            let occurrences = scan(engine.tree(), replacement);
            apply_highlights(tr, &occurrences, HighlightColor::Replace);
        }
    }
}
