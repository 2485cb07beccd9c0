use crate::e2e::helpers;

use helpers::assertions::{
    assert_audio_headers, assert_lesson_response, assert_timeline_layout, timeline_windows,
};
use helpers::fakes::{total_ms, ScriptedTts};
use helpers::{default_tts, TestContext};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

fn two_sentence_lesson() -> serde_json::Value {
    json!({
        "title": "Saludos",
        "language": "es",
        "sentences": [
            { "text": "Hola", "translation": "Hello" },
            { "text": "Adiós", "translation": "Goodbye" }
        ]
    })
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_lesson_with_timeline(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/lessons", &two_sentence_lesson())
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let lesson = response.body.as_ref().unwrap();
    assert_lesson_response(lesson, "Saludos", 2);
    assert_eq!(lesson.get("language").and_then(|v| v.as_str()), Some("es"));
    assert_eq!(lesson.get("voice_locale").and_then(|v| v.as_str()), Some("es-ES"));

    // 4 x 1s silence + 3 clips, then a 2s gap between drills
    assert_eq!(timeline_windows(lesson), vec![(0.0, 5.8), (7.8, 14.2)]);
    assert_timeline_layout(lesson, 2.0);
    assert_eq!(
        lesson.get("duration_seconds").and_then(|v| v.as_f64()),
        Some(14.2)
    );

    let sentences = lesson.get("sentences").and_then(|v| v.as_array()).unwrap();
    assert_eq!(sentences[0].get("translation").and_then(|v| v.as_str()), Some("Hello"));
    assert_eq!(sentences[1].get("text").and_then(|v| v.as_str()), Some("Adiós"));

    assert_eq!(
        ctx.tts.calls(),
        vec![
            ("Hola".to_string(), "es-ES".to_string()),
            ("Adiós".to_string(), "es-ES".to_string()),
        ]
    );
    assert_eq!(ctx.lesson_repo.len(), 1);
    assert_eq!(ctx.work_dir_entries(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_stored_lesson(ctx: &TestContext) {
    let created = ctx
        .client
        .post("/api/lessons", &two_sentence_lesson())
        .await
        .unwrap();
    created.assert_status(StatusCode::CREATED);
    let id = created
        .body
        .as_ref()
        .and_then(|b| b.get("id"))
        .and_then(|v| v.as_str())
        .unwrap()
        .to_string();

    let response = ctx.client.get(&format!("/api/lessons/{}", id)).await.unwrap();

    response.assert_status(StatusCode::OK);
    let lesson = response.body.as_ref().unwrap();
    assert_lesson_response(lesson, "Saludos", 2);
    assert_eq!(timeline_windows(lesson), vec![(0.0, 5.8), (7.8, 14.2)]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_lesson_audio(ctx: &TestContext) {
    let created = ctx
        .client
        .post("/api/lessons", &two_sentence_lesson())
        .await
        .unwrap();
    let audio_url = created
        .body
        .as_ref()
        .and_then(|b| b.get("audio_url"))
        .and_then(|v| v.as_str())
        .unwrap()
        .to_string();

    let response = ctx.client.get(&audio_url).await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_audio_headers(&response.headers);
    response.assert_header("x-duration-seconds", "14.200");
    response.assert_header("x-sentence-count", "2");
    // the served track is as long as the timeline says
    assert_eq!(total_ms(&response.body_bytes), Some(14_200));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_404_for_unknown_lesson(ctx: &TestContext) {
    let id = uuid::Uuid::new_v4();

    let response = ctx.client.get(&format!("/api/lessons/{}", id)).await.unwrap();
    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Lesson not found");

    let response = ctx
        .client
        .get(&format!("/api/lessons/{}/audio", id))
        .await
        .unwrap();
    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_lesson_without_sentences(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/lessons",
            &json!({ "title": "Empty", "language": "es", "sentences": [] }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("No valid sentence pairs");
    response.assert_header_exists("x-request-id");
    assert!(ctx.tts.calls().is_empty());
    assert_eq!(ctx.lesson_repo.len(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_blank_title(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/lessons",
            &json!({ "title": "   ", "sentences": [{ "text": "Hola" }] }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Title cannot be empty");
    assert!(ctx.tts.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_drop_pairs_without_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/lessons",
            &json!({
                "title": "Saludos",
                "language": "es",
                "sentences": [
                    { "text": "   ", "translation": "nothing" },
                    { "text": "<p>Hola</p>", "translation": "Hello" }
                ]
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let lesson = response.body.as_ref().unwrap();
    assert_lesson_response(lesson, "Saludos", 1);
    assert_eq!(timeline_windows(lesson), vec![(0.0, 5.8)]);
    assert_eq!(ctx.tts.calls(), vec![("Hola".to_string(), "es-ES".to_string())]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_lessons_over_the_sentence_limit(ctx: &TestContext) {
    let sentences: Vec<_> = (0..6)
        .map(|i| json!({ "text": format!("Frase {}", i), "translation": "" }))
        .collect();

    let response = ctx
        .client
        .post(
            "/api/lessons",
            &json!({ "title": "Long", "language": "es", "sentences": sentences }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("the limit is 5");
    assert!(ctx.tts.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_payloads(ctx: &TestContext) {
    let response = ctx.client.post_raw("/api/lessons", "{not json").await.unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = ctx
        .client
        .post("/api/lessons", &json!({ "title": "Missing sentences" }))
        .await
        .unwrap();
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_pass_unmapped_language_through_as_voice_locale(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/lessons",
            &json!({
                "title": "Kaixo",
                "language": "EU",
                "sentences": [{ "text": "Kaixo", "translation": "Hello" }]
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let lesson = response.body.as_ref().unwrap();
    assert_eq!(lesson.get("voice_locale").and_then(|v| v.as_str()), Some("eu"));
    assert_eq!(ctx.tts.calls(), vec![("Kaixo".to_string(), "eu".to_string())]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_detect_language_when_missing(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/lessons",
            &json!({
                "title": "Estación",
                "sentences": [
                    {
                        "text": "¿Dónde está la estación de tren? Necesito comprar un billete para Madrid.",
                        "translation": "Where is the train station? I need to buy a ticket to Madrid."
                    }
                ]
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let lesson = response.body.as_ref().unwrap();
    assert_eq!(lesson.get("language").and_then(|v| v.as_str()), Some("es"));
    assert_eq!(lesson.get("voice_locale").and_then(|v| v.as_str()), Some("es-ES"));
}

#[tokio::test]
async fn it_should_fail_whole_lesson_when_provider_fails() {
    let ctx = TestContext::start(default_tts().failing_on("Adiós")).await;

    let response = ctx
        .client
        .post("/api/lessons", &two_sentence_lesson())
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("throttled");
    assert_eq!(ctx.lesson_repo.len(), 0);
    assert_eq!(ctx.stored_audio_files(), 0);
    assert_eq!(ctx.work_dir_entries(), 0);

    ctx.cleanup();
}

#[tokio::test]
async fn it_should_report_provider_misconfiguration_before_synthesis() {
    let ctx = TestContext::start(ScriptedTts::new(&[]).misconfigured()).await;

    let response = ctx
        .client
        .post("/api/lessons", &two_sentence_lesson())
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("missing credentials");
    assert!(ctx.tts.calls().is_empty());
    assert_eq!(ctx.lesson_repo.len(), 0);

    ctx.cleanup();
}
