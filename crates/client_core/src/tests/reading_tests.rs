use std::sync::Arc;

use shared::domain::Citation;

use super::*;
use crate::test_support::{backend_down, document, ScriptedApi};

#[test]
fn starts_hidden() {
    let reading = ReadingController::new();
    assert!(!reading.is_visible());
    assert_eq!(reading.state(), &ReadingState::Hidden);
}

#[test]
fn selecting_builds_query_with_empty_section() {
    let mut reading = ReadingController::new();
    let ticket = reading
        .on_selection_change(Some(&Citation::new("Sarangpur", "", 5)))
        .expect("ticket");

    assert_eq!(
        ticket.query,
        VachanamrutQuery {
            chapter: "Sarangpur".to_string(),
            section: String::new(),
            number: 5,
        }
    );
    assert!(reading.is_loading());
    assert!(reading.document().is_none());
    assert!(reading.error().is_none());
}

#[test]
fn success_and_failure_transitions() {
    let mut reading = ReadingController::new();
    let ticket = reading.select(&Citation::new("Loya", "", 1));
    assert!(reading.resolve(ticket.generation, Ok(document(1))));
    assert_eq!(reading.document(), Some(&document(1)));
    assert!(!reading.is_loading());

    let ticket = reading.select(&Citation::new("Loya", "", 2));
    assert!(reading.document().is_none(), "prior data cleared on new selection");
    assert!(reading.resolve(ticket.generation, Err(backend_down("/vachanamrut"))));
    assert_eq!(reading.error(), Some(LOOKUP_FAILURE_MESSAGE));
    assert!(reading.document().is_none());
    assert!(!reading.is_loading());
}

#[test]
fn stale_result_is_discarded() {
    let mut reading = ReadingController::new();
    let first = reading.select(&Citation::new("Gadhada", "I", 1));
    let second = reading.select(&Citation::new("Gadhada", "I", 2));

    assert!(reading.resolve(second.generation, Ok(document(2))));
    assert!(!reading.resolve(first.generation, Ok(document(1))));
    assert_eq!(reading.document(), Some(&document(2)));
    assert_eq!(reading.citation().map(|c| c.vachanamrut_no), Some(2));
}

#[test]
fn stale_failure_does_not_replace_loading_state() {
    let mut reading = ReadingController::new();
    let first = reading.select(&Citation::new("Vartal", "", 4));
    let second = reading.select(&Citation::new("Vartal", "", 5));

    assert!(!reading.resolve(first.generation, Err(backend_down("/vachanamrut"))));
    assert!(reading.is_loading());
    assert_eq!(reading.current_generation(), Some(second.generation));
}

#[test]
fn result_after_close_is_discarded() {
    let mut reading = ReadingController::new();
    let ticket = reading.select(&Citation::new("Kariyani", "", 3));
    assert!(reading.on_selection_change(None).is_none());

    assert!(!reading.resolve(ticket.generation, Ok(document(3))));
    assert_eq!(reading.state(), &ReadingState::Hidden);
}

#[test]
fn reselecting_same_citation_issues_new_generation() {
    let mut reading = ReadingController::new();
    let citation = Citation::new("Panchala", "", 2);
    let first = reading.select(&citation);
    assert!(reading.resolve(first.generation, Ok(document(2))));

    let second = reading.select(&citation);
    assert!(second.generation > first.generation);
    assert_eq!(second.query, first.query);
    assert!(reading.is_loading());
}

#[tokio::test]
async fn slower_earlier_fetch_never_overwrites_newer_selection() {
    let api = Arc::new(ScriptedApi::new());
    api.with_document(1, document(1)).await;
    api.with_document(2, document(2)).await;
    let release_first = api.gate(1).await;

    let mut reading = ReadingController::new();
    let first = reading.select(&Citation::new("Gadhada", "I", 1));
    let second = reading.select(&Citation::new("Gadhada", "I", 2));

    let slow = tokio::spawn({
        let api = Arc::clone(&api);
        async move { run_fetch(api.as_ref(), first).await }
    });
    let fast = tokio::spawn({
        let api = Arc::clone(&api);
        async move { run_fetch(api.as_ref(), second).await }
    });

    let fast = fast.await.expect("fast fetch");
    assert!(reading.apply(fast));

    release_first.send(()).expect("release gate");
    let slow = slow.await.expect("slow fetch");
    assert!(slow.outcome.is_ok());
    assert!(!reading.apply(slow));

    assert_eq!(reading.document(), Some(&document(2)));
    assert_eq!(api.fetches.lock().await.len(), 2);
}
