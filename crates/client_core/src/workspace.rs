//! Root composition: owns the active citation and wires it into both panels.

use shared::domain::Citation;

use crate::{
    reading::{run_fetch, FetchResult, FetchTicket, ReadingController},
    session::SessionController,
    settings::ClientSettings,
    transport::VachanamrutApi,
};

/// Reading panel visibility. The only cross-panel state in the app.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveSelection {
    #[default]
    Closed,
    Open(Citation),
}

impl ActiveSelection {
    pub fn citation(&self) -> Option<&Citation> {
        match self {
            ActiveSelection::Closed => None,
            ActiveSelection::Open(citation) => Some(citation),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelLayout {
    ChatOnly,
    Split,
}

impl PanelLayout {
    pub fn chat_width_fraction(self) -> f32 {
        match self {
            PanelLayout::ChatOnly => 1.0,
            PanelLayout::Split => 0.5,
        }
    }
}

#[derive(Debug)]
pub struct Workspace {
    session: SessionController,
    reading: ReadingController,
    selection: ActiveSelection,
}

impl Workspace {
    pub fn new(session: SessionController) -> Self {
        Self {
            session,
            reading: ReadingController::new(),
            selection: ActiveSelection::Closed,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(SessionController::from_settings(settings))
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionController {
        &mut self.session
    }

    pub fn reading(&self) -> &ReadingController {
        &self.reading
    }

    pub fn selection(&self) -> &ActiveSelection {
        &self.selection
    }

    pub fn layout(&self) -> PanelLayout {
        match self.selection {
            ActiveSelection::Closed => PanelLayout::ChatOnly,
            ActiveSelection::Open(_) => PanelLayout::Split,
        }
    }

    /// Opens (or re-opens) the reading panel on `citation`. Always re-fetches.
    pub fn on_citation_click(&mut self, citation: Citation) -> FetchTicket {
        let ticket = self.reading.select(&citation);
        self.selection = ActiveSelection::Open(citation);
        ticket
    }

    pub fn on_close(&mut self) {
        self.selection = ActiveSelection::Closed;
        self.reading.close();
    }

    pub fn apply_document(&mut self, result: FetchResult) -> bool {
        self.reading.apply(result)
    }

    /// Selects `citation` and awaits its document inline.
    pub async fn open_citation_with(&mut self, api: &dyn VachanamrutApi, citation: Citation) -> bool {
        let ticket = self.on_citation_click(citation);
        let result = run_fetch(api, ticket).await;
        self.apply_document(result)
    }
}

#[cfg(test)]
#[path = "tests/workspace_tests.rs"]
mod tests;
