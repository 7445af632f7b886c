use shared::domain::{Citation, DocumentRecord};

use super::*;
use crate::test_support::{document, ScriptedApi};

fn chapter_two_record() -> DocumentRecord {
    DocumentRecord {
        title_en: "Gadhada II-5: The Constant Presence".to_string(),
        text_en: "On Fagan sud 5, Samvat 1880 ...".to_string(),
        title_gu: "ગઢડા મધ્ય ૫".to_string(),
        text_gu: "સંવત ૧૮૮૦ના ફાગણ સુદિ ૫".to_string(),
    }
}

#[test]
fn starts_closed_with_full_width_chat() {
    let workspace = Workspace::from_settings(&ClientSettings::default());
    assert_eq!(workspace.selection(), &ActiveSelection::Closed);
    assert_eq!(workspace.layout(), PanelLayout::ChatOnly);
    assert_eq!(workspace.layout().chat_width_fraction(), 1.0);
    assert!(!workspace.reading().is_visible());
}

#[test]
fn click_opens_split_layout_and_close_restores() {
    let mut workspace = Workspace::from_settings(&ClientSettings::default());
    let citation = Citation::new("Gadhada", "I", 16);

    let ticket = workspace.on_citation_click(citation.clone());
    assert_eq!(ticket.query.number, 16);
    assert_eq!(workspace.selection().citation(), Some(&citation));
    assert_eq!(workspace.layout(), PanelLayout::Split);
    assert!(workspace.reading().is_loading());

    workspace.on_close();
    assert_eq!(workspace.selection(), &ActiveSelection::Closed);
    assert_eq!(workspace.layout(), PanelLayout::ChatOnly);
    assert!(!workspace.reading().is_visible());
}

#[test]
fn selecting_another_citation_while_open_refetches() {
    let mut workspace = Workspace::from_settings(&ClientSettings::default());
    let first = workspace.on_citation_click(Citation::new("Loya", "", 1));
    let second = workspace.on_citation_click(Citation::new("Loya", "", 2));

    assert_ne!(first.generation, second.generation);
    assert_eq!(
        workspace.selection().citation().map(|c| c.vachanamrut_no),
        Some(2)
    );
}

#[tokio::test]
async fn close_then_same_click_reopens_and_refetches() {
    let api = ScriptedApi::new();
    api.with_document(5, chapter_two_record()).await;

    let mut workspace = Workspace::from_settings(&ClientSettings::default());
    let citation = Citation::new("II", "", 5);

    assert!(workspace.open_citation_with(&api, citation.clone()).await);
    assert_eq!(workspace.reading().document(), Some(&chapter_two_record()));

    workspace.on_close();
    assert!(!workspace.reading().is_visible());

    assert!(workspace.open_citation_with(&api, citation).await);
    let record = workspace.reading().document().expect("document");
    assert_eq!(record.title_en, "Gadhada II-5: The Constant Presence");
    assert_eq!(record.text_en, "On Fagan sud 5, Samvat 1880 ...");
    assert_eq!(record.title_gu, "ગઢડા મધ્ય ૫");
    assert_eq!(record.text_gu, "સંવત ૧૮૮૦ના ફાગણ સુદિ ૫");

    let fetches = api.fetches.lock().await;
    assert_eq!(fetches.len(), 2);
    for query in fetches.iter() {
        assert_eq!(query.chapter, "II");
        assert_eq!(query.section, "");
        assert_eq!(query.number, 5);
    }
}

#[tokio::test]
async fn lookup_failure_leaves_chat_untouched() {
    let api = ScriptedApi::new();
    let mut workspace = Workspace::from_settings(&ClientSettings::default());
    let turns_before = workspace.session().turns().len();

    assert!(workspace.open_citation_with(&api, Citation::new("Amdavad", "", 9)).await);
    assert_eq!(workspace.reading().error(), Some(crate::LOOKUP_FAILURE_MESSAGE));
    assert_eq!(workspace.session().turns().len(), turns_before);
    assert!(!workspace.session().is_in_flight());
}

#[tokio::test]
async fn document_for_closed_panel_is_dropped() {
    let api = ScriptedApi::new();
    api.with_document(3, document(3)).await;
    let mut workspace = Workspace::from_settings(&ClientSettings::default());

    let ticket = workspace.on_citation_click(Citation::new("Jetalpur", "", 3));
    workspace.on_close();
    let result = crate::reading::run_fetch(&api, ticket).await;

    assert!(!workspace.apply_document(result));
    assert_eq!(workspace.layout(), PanelLayout::ChatOnly);
}
