use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use reqwest::StatusCode;
use shared::{
    domain::DocumentRecord,
    protocol::{AskRequest, AskResponse, HealthStatus, VachanamrutQuery},
};
use tokio::sync::{oneshot, Mutex};

use crate::{error::ClientError, transport::VachanamrutApi};

pub(crate) fn backend_down(endpoint: &'static str) -> ClientError {
    ClientError::Status {
        endpoint,
        status: StatusCode::BAD_GATEWAY,
        detail: Some("upstream unavailable".to_string()),
    }
}

pub(crate) fn document(number: u32) -> DocumentRecord {
    DocumentRecord {
        title_en: format!("Vachanamrut {number}"),
        text_en: format!("English text of passage {number}."),
        title_gu: format!("વચનામૃત {number}"),
        text_gu: "સ્વામિનારાયણ ભગવાન".to_string(),
    }
}

/// In-memory backend with scripted answers and optional per-passage gates.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    pub asks: Mutex<Vec<AskRequest>>,
    pub fetches: Mutex<Vec<VachanamrutQuery>>,
    ask_replies: Mutex<VecDeque<Result<AskResponse, ClientError>>>,
    documents: Mutex<HashMap<u32, DocumentRecord>>,
    gates: Mutex<HashMap<u32, oneshot::Receiver<()>>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reply(&self, reply: Result<AskResponse, ClientError>) {
        self.ask_replies.lock().await.push_back(reply);
    }

    pub async fn answer(&self, answer: &str) {
        self.reply(Ok(AskResponse {
            answer: answer.to_string(),
            citations: Vec::new(),
        }))
        .await;
    }

    pub async fn with_document(&self, number: u32, record: DocumentRecord) {
        self.documents.lock().await.insert(number, record);
    }

    /// Holds fetches for passage `number` until the returned sender fires.
    pub async fn gate(&self, number: u32) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().await.insert(number, rx);
        tx
    }
}

#[async_trait]
impl VachanamrutApi for ScriptedApi {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ClientError> {
        self.asks.lock().await.push(request.clone());
        self.ask_replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(backend_down("/ask")))
    }

    async fn fetch_vachanamrut(
        &self,
        query: &VachanamrutQuery,
    ) -> Result<DocumentRecord, ClientError> {
        self.fetches.lock().await.push(query.clone());
        let gate = self.gates.lock().await.remove(&query.number);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.documents
            .lock()
            .await
            .get(&query.number)
            .cloned()
            .ok_or(ClientError::Status {
                endpoint: "/vachanamrut",
                status: StatusCode::NOT_FOUND,
                detail: Some("Vachanamrut not found".to_string()),
            })
    }

    async fn health(&self) -> Result<HealthStatus, ClientError> {
        Ok(HealthStatus {
            status: "ok".to_string(),
            modules: vec!["Brain".to_string(), "Librarian".to_string()],
        })
    }
}
