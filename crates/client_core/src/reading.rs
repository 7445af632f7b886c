//! Reading panel controller: fetches the document behind the active citation.
//!
//! Every fetch is tagged with a [`FetchGeneration`] taken when the selection
//! changed. Results whose generation is no longer current are discarded, so a
//! slow response for an earlier selection never overwrites a newer one.

use shared::{
    domain::{Citation, DocumentRecord},
    protocol::VachanamrutQuery,
};
use tracing::{debug, info, warn};

use crate::{error::ClientError, transport::VachanamrutApi, LOOKUP_FAILURE_MESSAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchGeneration(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: FetchGeneration,
    pub query: VachanamrutQuery,
}

#[derive(Debug)]
pub struct FetchResult {
    pub generation: FetchGeneration,
    pub outcome: Result<DocumentRecord, ClientError>,
}

pub async fn run_fetch(api: &dyn VachanamrutApi, ticket: FetchTicket) -> FetchResult {
    let outcome = api.fetch_vachanamrut(&ticket.query).await;
    FetchResult {
        generation: ticket.generation,
        outcome,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadingState {
    /// No citation selected; the panel is not shown.
    Hidden,
    Loading {
        citation: Citation,
        generation: FetchGeneration,
    },
    Loaded {
        citation: Citation,
        generation: FetchGeneration,
        document: DocumentRecord,
    },
    Failed {
        citation: Citation,
        generation: FetchGeneration,
        message: String,
    },
}

#[derive(Debug)]
pub struct ReadingController {
    state: ReadingState,
    last_generation: u64,
}

impl Default for ReadingController {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingController {
    pub fn new() -> Self {
        Self {
            state: ReadingState::Hidden,
            last_generation: 0,
        }
    }

    pub fn state(&self) -> &ReadingState {
        &self.state
    }

    pub fn citation(&self) -> Option<&Citation> {
        match &self.state {
            ReadingState::Hidden => None,
            ReadingState::Loading { citation, .. }
            | ReadingState::Loaded { citation, .. }
            | ReadingState::Failed { citation, .. } => Some(citation),
        }
    }

    pub fn current_generation(&self) -> Option<FetchGeneration> {
        match &self.state {
            ReadingState::Hidden => None,
            ReadingState::Loading { generation, .. }
            | ReadingState::Loaded { generation, .. }
            | ReadingState::Failed { generation, .. } => Some(*generation),
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.state, ReadingState::Hidden)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ReadingState::Loading { .. })
    }

    pub fn document(&self) -> Option<&DocumentRecord> {
        match &self.state {
            ReadingState::Loaded { document, .. } => Some(document),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ReadingState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Reacts to a new selection value.
    ///
    /// `None` tears the panel down. Any citation, including the one already
    /// shown, drops prior data and starts a fresh fetch.
    pub fn on_selection_change(&mut self, selection: Option<&Citation>) -> Option<FetchTicket> {
        match selection {
            Some(citation) => Some(self.select(citation)),
            None => {
                self.close();
                None
            }
        }
    }

    pub fn select(&mut self, citation: &Citation) -> FetchTicket {
        self.last_generation += 1;
        let generation = FetchGeneration(self.last_generation);
        let query = VachanamrutQuery::from(citation);
        info!(
            generation = generation.0,
            chapter = %query.chapter,
            section = %query.section,
            number = query.number,
            "reading: fetching passage"
        );
        self.state = ReadingState::Loading {
            citation: citation.clone(),
            generation,
        };
        FetchTicket { generation, query }
    }

    pub fn close(&mut self) {
        if let Some(generation) = self.current_generation() {
            debug!(generation = generation.0, "reading: panel closed");
        }
        self.state = ReadingState::Hidden;
    }

    /// Stores a fetch outcome if it belongs to the current selection.
    ///
    /// Returns `false` when the result was stale and discarded.
    pub fn resolve(
        &mut self,
        generation: FetchGeneration,
        outcome: Result<DocumentRecord, ClientError>,
    ) -> bool {
        let citation = match &self.state {
            ReadingState::Loading {
                citation,
                generation: current,
            } if *current == generation => citation.clone(),
            _ => {
                debug!(generation = generation.0, "reading: discarding stale document response");
                return false;
            }
        };

        self.state = match outcome {
            Ok(document) => ReadingState::Loaded {
                citation,
                generation,
                document,
            },
            Err(err) => {
                warn!(
                    generation = generation.0,
                    passage = %citation.label(),
                    "reading: lookup failed: {err}"
                );
                ReadingState::Failed {
                    citation,
                    generation,
                    message: LOOKUP_FAILURE_MESSAGE.to_string(),
                }
            }
        };
        true
    }

    pub fn apply(&mut self, result: FetchResult) -> bool {
        self.resolve(result.generation, result.outcome)
    }
}

#[cfg(test)]
#[path = "tests/reading_tests.rs"]
mod tests;
