use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{Citation, Role},
    error::CitationError,
};

/// Filter value meaning "no restriction" for text filters.
pub const UNRESTRICTED: &str = "All";

/// One prior turn as sent to `/ask`. Citations never travel back to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub chapter: String,
    pub section: String,
    /// `0` searches every passage.
    pub vachanamrut_no: u32,
}

impl SearchFilters {
    pub fn unrestricted() -> Self {
        Self {
            chapter: UNRESTRICTED.to_string(),
            section: UNRESTRICTED.to_string(),
            vachanamrut_no: 0,
        }
    }
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self::unrestricted()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub history: Vec<HistoryMessage>,
    #[serde(flatten)]
    pub filters: SearchFilters,
}

/// `/ask` response as it arrives on the wire, before citation validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponseBody {
    pub answer: String,
    #[serde(default)]
    pub citations: Vec<CitationEnvelope>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub metadata: CitationMetadata,
}

/// Loosely typed metadata map attached to each citation by the backend.
///
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitationMetadata {
    #[serde(default)]
    pub chapter: Option<Value>,
    #[serde(default)]
    pub section: Option<Value>,
    #[serde(default)]
    pub vachanamrut_no: Option<Value>,
}

impl TryFrom<CitationEnvelope> for Citation {
    type Error = CitationError;

    fn try_from(envelope: CitationEnvelope) -> Result<Self, Self::Error> {
        let metadata = envelope.metadata;
        let chapter = match metadata.chapter {
            None | Some(Value::Null) => return Err(CitationError::MissingField("chapter")),
            Some(value) => identifier_text("chapter", value)?,
        };
        if chapter.is_empty() {
            return Err(CitationError::EmptyChapter);
        }

        let section = match metadata.section {
            None | Some(Value::Null) => String::new(),
            Some(value) => identifier_text("section", value)?,
        };
        // The backend stores unsectioned chapters with a literal "None".
        let section = if section == "None" {
            String::new()
        } else {
            section
        };

        let vachanamrut_no = match metadata.vachanamrut_no {
            None | Some(Value::Null) => return Err(CitationError::MissingField("vachanamrut_no")),
            Some(value) => passage_number(value)?,
        };

        Ok(Citation {
            chapter,
            section,
            vachanamrut_no,
            excerpt: envelope.text.filter(|text| !text.trim().is_empty()),
        })
    }
}

fn identifier_text(field: &'static str, value: Value) -> Result<String, CitationError> {
    match value {
        Value::String(text) => Ok(text.trim().to_string()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(CitationError::InvalidValue {
            field,
            value: other.to_string(),
        }),
    }
}

fn passage_number(value: Value) -> Result<u32, CitationError> {
    let parsed = match &value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|float| float.fract() == 0.0)
                    .map(|float| float as i64)
            }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    let Some(parsed) = parsed else {
        return Err(CitationError::InvalidValue {
            field: "vachanamrut_no",
            value: value.to_string(),
        });
    };
    if parsed <= 0 {
        return Err(CitationError::NonPositiveNumber(parsed.to_string()));
    }
    u32::try_from(parsed).map_err(|_| CitationError::InvalidValue {
        field: "vachanamrut_no",
        value: parsed.to_string(),
    })
}

/// Validated `/ask` answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskResponse {
    pub answer: String,
    pub citations: Vec<Citation>,
}

impl AskResponseBody {
    /// Validates every citation, keeping the valid ones in order and returning
    /// the rejected ones alongside.
    pub fn into_validated(self) -> (AskResponse, Vec<CitationError>) {
        let mut citations = Vec::with_capacity(self.citations.len());
        let mut rejected = Vec::new();
        for envelope in self.citations {
            match Citation::try_from(envelope) {
                Ok(citation) => citations.push(citation),
                Err(err) => rejected.push(err),
            }
        }
        (
            AskResponse {
                answer: self.answer,
                citations,
            },
            rejected,
        )
    }
}

/// Query string for `GET /vachanamrut`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VachanamrutQuery {
    pub chapter: String,
    pub section: String,
    pub number: u32,
}

impl From<&Citation> for VachanamrutQuery {
    fn from(citation: &Citation) -> Self {
        Self {
            chapter: citation.chapter.clone(),
            section: citation.section.clone(),
            number: citation.vachanamrut_no,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub modules: Vec<String>,
}
