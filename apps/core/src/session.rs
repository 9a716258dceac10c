//! One open search window: the index built when it opened, the query
//! typed so far, the visible results and the selection.

use std::rc::Rc;

use crate::activation::{self, Host, HostError};
use crate::collation::Collation;
use crate::directory::{collect_sources, unread_entries, Directory, SourceOptions};
use crate::index::{build_index, Index};
use crate::model::Entry;
use crate::query::ParsedQuery;
use crate::search::search;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no entry selected")]
    NothingSelected,
    #[error(transparent)]
    Host(#[from] HostError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Empty search prefix; the default list is shown.
    Idle,
    Querying { search: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub static_actions: bool,
    pub unread_on_open: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            static_actions: true,
            unread_on_open: true,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    index: Index<Entry>,
    default_list: Vec<Rc<Entry>>,
    results: Vec<Rc<Entry>>,
    selected: usize,
    query: ParsedQuery,
    state: SessionState,
}

impl Session {
    /// Builds a fresh index from `directory` and shows the default list.
    pub fn open<D: Directory + ?Sized>(
        directory: &D,
        collation: Rc<Collation>,
        options: SessionOptions,
    ) -> Self {
        let sources = collect_sources(
            directory,
            SourceOptions {
                static_actions: options.static_actions,
            },
        );
        let index = build_index(collation, sources);
        let default_list = if options.unread_on_open {
            unread_entries(directory)
        } else {
            Vec::new()
        };

        tracing::info!(
            associations = index.len(),
            unread = default_list.len(),
            "search session opened"
        );

        Self {
            results: default_list.clone(),
            index,
            default_list,
            selected: 0,
            query: ParsedQuery::default(),
            state: SessionState::Idle,
        }
    }

    pub fn index(&self) -> &Index<Entry> {
        &self.index
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn query(&self) -> &ParsedQuery {
        &self.query
    }

    pub fn results(&self) -> &[Rc<Entry>] {
        &self.results
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Rc<Entry>> {
        self.results.get(self.selected)
    }

    /// Re-runs the whole query for the new field contents and resets the
    /// selection to the first row.
    pub fn on_query_changed(&mut self, text: &str) -> &[Rc<Entry>] {
        self.query = ParsedQuery::parse(text);
        if self.query.is_idle() {
            self.state = SessionState::Idle;
            self.results = self.default_list.clone();
        } else {
            self.results = search(&self.index, &self.query.search);
            self.state = SessionState::Querying {
                search: self.query.search.clone(),
            };
        }
        self.selected = 0;
        &self.results
    }

    /// Moves the selection up (`direction < 0`) or down (`direction > 0`),
    /// clamped to the result list.
    pub fn move_selection(&mut self, direction: i32) -> usize {
        self.selected = next_selection_index(self.selected, self.results.len(), direction);
        self.selected
    }

    /// Activates the selected entry with the query's parameter.
    pub fn activate_selected<H: Host + ?Sized>(&self, host: &mut H) -> Result<(), SessionError> {
        let entry = self.selected().ok_or(SessionError::NothingSelected)?;
        self.activate(host, entry, self.query.parameter())
    }

    /// Activates any entry, not only the selected row.
    pub fn activate<H: Host + ?Sized>(
        &self,
        host: &mut H,
        entry: &Entry,
        parameter: Option<&str>,
    ) -> Result<(), SessionError> {
        activation::activate(host, entry, parameter)?;
        Ok(())
    }

    /// Closes the session, releasing the index. Returns the number of
    /// associations released.
    pub fn close(self) -> usize {
        let Self {
            index,
            default_list,
            results,
            ..
        } = self;
        drop(results);
        drop(default_list);
        let released = index.release();
        tracing::info!(released, "search session closed");
        released
    }
}

fn next_selection_index(current: usize, len: usize, direction: i32) -> usize {
    if len == 0 {
        return 0;
    }

    let max = len - 1;
    if direction < 0 {
        current.saturating_sub(1)
    } else if direction > 0 {
        (current + 1).min(max)
    } else {
        current.min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::next_selection_index;

    #[test]
    fn selection_index_bounds_are_stable() {
        assert_eq!(next_selection_index(0, 0, 1), 0);
        assert_eq!(next_selection_index(0, 3, -1), 0);
        assert_eq!(next_selection_index(1, 3, -1), 0);
        assert_eq!(next_selection_index(1, 3, 1), 2);
        assert_eq!(next_selection_index(2, 3, 1), 2);
        assert_eq!(next_selection_index(1, 3, 0), 1);
        assert_eq!(next_selection_index(5, 3, 0), 2);
    }
}
