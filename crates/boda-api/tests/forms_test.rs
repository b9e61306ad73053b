//! Integration tests for the pre-wedding and music forms.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use boda_core::store::MemoryStore;
use boda_core::submission::{FormSubmitter, SubmitResponse};
use boda_test_support::{FailingSubmitter, RecordingSubmitter};
use serde_json::json;

#[tokio::test]
async fn test_preboda_attending_guest_is_recorded() {
    // Arrange
    let submitter = Arc::new(RecordingSubmitter::new(SubmitResponse::ok()));
    let app = common::build_test_app(
        Arc::clone(&submitter) as Arc<dyn FormSubmitter>,
        Arc::new(MemoryStore::new()),
    );

    // Act
    let (status, json) = common::post_json(
        app,
        "/api/v1/preboda",
        &json!({ "name": "Luis", "attending": "sí", "companions": "Marta" }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "recorded");
    assert_eq!(json["state"]["submitted"], true);

    let sent = submitter.submissions();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1["tipo"], "preboda");
    assert_eq!(sent[0].1["asistira"], "sí");
    assert_eq!(sent[0].1["acompanantes"], "Marta");
    assert_eq!(sent[0].1["fecha"], "2026-05-01T10:00:00.000Z");
}

#[tokio::test]
async fn test_preboda_without_answer_returns_422() {
    let submitter = Arc::new(RecordingSubmitter::new(SubmitResponse::ok()));
    let app = common::build_test_app(
        Arc::clone(&submitter) as Arc<dyn FormSubmitter>,
        Arc::new(MemoryStore::new()),
    );

    let (status, json) =
        common::post_json(app, "/api/v1/preboda", &json!({ "name": "Luis" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["outcome"].is_null());
    assert_eq!(
        json["state"]["notice"]["message"],
        "Por favor, completa los campos obligatorios"
    );
    assert!(submitter.submissions().is_empty());
}

#[tokio::test]
async fn test_preboda_unreachable_endpoint_is_assumed_recorded() {
    let app = common::build_test_app(Arc::new(FailingSubmitter::new()), Arc::new(MemoryStore::new()));

    let (status, json) = common::post_json(
        app,
        "/api/v1/preboda",
        &json!({ "name": "Luis", "attending": "no" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "assumed_recorded");
    assert_eq!(json["state"]["submitted"], true);
}

#[tokio::test]
async fn test_music_suggestion_is_sent_and_form_cleared() {
    // Arrange
    let submitter = Arc::new(RecordingSubmitter::new(SubmitResponse::ok()));
    let app = common::build_test_app(
        Arc::clone(&submitter) as Arc<dyn FormSubmitter>,
        Arc::new(MemoryStore::new()),
    );

    // Act
    let (status, json) = common::post_json(
        app,
        "/api/v1/music",
        &json!({ "song": "Bailando", "artist": "Enrique Iglesias", "name": "Ana" }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["confirmation_visible"], true);
    assert_eq!(json["form"]["song"], "");

    let sent = submitter.submissions();
    assert_eq!(sent[0].1["tipo"], "sugerencia_musica");
    assert_eq!(sent[0].1["cancion"], "Bailando");
    assert_eq!(sent[0].1["artista"], "Enrique Iglesias");
}

#[tokio::test]
async fn test_music_without_song_returns_422() {
    let app = common::build_test_app(
        Arc::new(RecordingSubmitter::new(SubmitResponse::ok())),
        Arc::new(MemoryStore::new()),
    );

    let (status, json) =
        common::post_json(app, "/api/v1/music", &json!({ "artist": "Queen" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["form"]["artist"], "Queen");
    assert_eq!(
        json["notice"]["message"],
        "Por favor, escribe el nombre de la canción"
    );
}

#[tokio::test]
async fn test_music_unreachable_endpoint_returns_502() {
    let app = common::build_test_app(Arc::new(FailingSubmitter::new()), Arc::new(MemoryStore::new()));

    let (status, json) =
        common::post_json(app, "/api/v1/music", &json!({ "song": "Bailando" })).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "transport_error");
}
