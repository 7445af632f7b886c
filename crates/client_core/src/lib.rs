//! Client core for the Vachanamrut assistant: settings, backend transport,
//! the chat session controller and the reading panel controller.

pub mod error;
pub mod reading;
pub mod session;
pub mod settings;
pub mod transport;
pub mod workspace;

pub use error::ClientError;
pub use reading::{
    run_fetch, FetchGeneration, FetchResult, FetchTicket, ReadingController, ReadingState,
};
pub use session::{
    history_payload, run_ask, AskId, AskResult, ChatTurn, PendingAsk, SessionController,
    SubmitOutcome,
};
pub use settings::{ClientSettings, SettingsError};
pub use transport::{HttpVachanamrutApi, VachanamrutApi};
pub use workspace::{ActiveSelection, PanelLayout, Workspace};

/// First assistant turn of every session.
pub const GREETING: &str = "Jay Swaminarayan. Ask me a spiritual question.";
/// Assistant turn appended when `/ask` fails for any reason.
pub const ASK_FAILURE_MESSAGE: &str = "I encountered an error connecting to the Vachanamrut.";
/// Reading panel text when `/vachanamrut` fails for any reason.
pub const LOOKUP_FAILURE_MESSAGE: &str = "Could not load scripture text.";

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
