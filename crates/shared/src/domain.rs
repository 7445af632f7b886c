use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// Address of one passage in the corpus.
///
/// `chapter` and `vachanamrut_no` are always present; `section` is empty for
/// chapters that are not split into sections. Instances are only built through
/// [`crate::protocol::CitationEnvelope`] validation or [`Citation::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    pub chapter: String,
    #[serde(default)]
    pub section: String,
    pub vachanamrut_no: u32,
    /// Excerpt the backend matched on, when it sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

impl Citation {
    pub fn new(chapter: impl Into<String>, section: impl Into<String>, vachanamrut_no: u32) -> Self {
        Self {
            chapter: chapter.into(),
            section: section.into(),
            vachanamrut_no,
            excerpt: None,
        }
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Human label such as `Gadhada I 16` or `Sarangpur 5`.
    pub fn label(&self) -> String {
        if self.section.trim().is_empty() {
            format!("{} {}", self.chapter, self.vachanamrut_no)
        } else {
            format!("{} {} {}", self.chapter, self.section, self.vachanamrut_no)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub title_en: String,
    pub text_en: String,
    pub title_gu: String,
    pub text_gu: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_collapses_empty_section() {
        assert_eq!(Citation::new("Sarangpur", "", 5).label(), "Sarangpur 5");
        assert_eq!(Citation::new("Gadhada", "I", 16).label(), "Gadhada I 16");
    }
}
