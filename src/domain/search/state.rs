//! Search box state: app-owned, driver-agnostic.
//!
//! `SearchState` tracks the input text, what the result panel shows, and a
//! monotonically increasing request generation. Every input change and every issued
//! request bumps the generation; a response is applied only if it carries the current
//! one, so a slow response for `"A"` can never overwrite the results for `"AA"`.

use super::SearchMatch;

/// What the result panel contains.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PanelContent {
    #[default]
    Empty,
    Loading {
        query: String,
    },
    Results {
        query: String,
        matches: Vec<SearchMatch>,
    },
    NoResults {
        query: String,
    },
    Failed {
        query: String,
        message: String,
    },
}

/// The dismissible result panel under the search input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPanel {
    pub visible: bool,
    pub content: PanelContent,
}

impl SearchPanel {
    pub fn matches(&self) -> &[SearchMatch] {
        match &self.content {
            PanelContent::Results { matches, .. } => matches,
            _ => &[],
        }
    }

    pub fn query(&self) -> Option<&str> {
        match &self.content {
            PanelContent::Empty => None,
            PanelContent::Loading { query }
            | PanelContent::Results { query, .. }
            | PanelContent::NoResults { query }
            | PanelContent::Failed { query, .. } => Some(query),
        }
    }
}

/// Identifies one issued search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What the driver should do after an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Input is blank: cancel any pending debounce, panel is hidden.
    Hide,
    /// Restart the debounce window for this query.
    Debounce(String),
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    input: String,
    panel: SearchPanel,
    generation: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn panel(&self) -> &SearchPanel {
        &self.panel
    }

    /// Text changed. Invalidates anything in flight.
    pub fn on_input(&mut self, raw: &str) -> InputAction {
        self.generation += 1;
        self.input = raw.trim().to_string();

        if self.input.is_empty() {
            self.panel.visible = false;
            return InputAction::Hide;
        }

        self.panel = SearchPanel {
            visible: true,
            content: PanelContent::Loading {
                query: self.input.clone(),
            },
        };
        InputAction::Debounce(self.input.clone())
    }

    /// The debounce window elapsed (or focus asked for a refresh): issue a request.
    pub fn begin_search(&mut self, query: &str) -> SearchTicket {
        self.generation += 1;
        tracing::debug!(query, generation = self.generation, "Issuing search");
        SearchTicket {
            generation: self.generation,
            query: query.to_string(),
        }
    }

    /// Focusing a non-empty input re-runs its search immediately.
    pub fn on_focus(&mut self) -> Option<SearchTicket> {
        if self.input.is_empty() {
            return None;
        }
        let query = self.input.clone();
        self.panel = SearchPanel {
            visible: true,
            content: PanelContent::Loading {
                query: query.clone(),
            },
        };
        Some(self.begin_search(&query))
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a response. Returns `false` (and changes nothing) for stale tickets.
    pub fn on_response(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<SearchMatch>, String>,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                query = ticket.query.as_str(),
                generation = ticket.generation,
                current = self.generation,
                "Dropping stale search response"
            );
            return false;
        }

        let query = ticket.query.clone();
        self.panel.content = match result {
            Ok(matches) if matches.is_empty() => PanelContent::NoResults { query },
            Ok(matches) => PanelContent::Results { query, matches },
            Err(message) => {
                tracing::warn!(query = query.as_str(), error = message.as_str(), "Search failed");
                PanelContent::Failed { query, message }
            }
        };
        true
    }

    /// Enter pressed: navigate to the first listed result, if any.
    pub fn on_enter(&self) -> Option<String> {
        if self.input.is_empty() {
            return None;
        }
        self.panel.matches().first().map(SearchMatch::detail_path)
    }

    /// Click landed outside the input and the panel.
    pub fn dismiss(&mut self) {
        self.panel.visible = false;
    }
}
