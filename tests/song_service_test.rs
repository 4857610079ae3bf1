mod helpers;

use std::sync::Arc;

use moodtune::application::services::{
    FETCH_FAILED_MESSAGE, MISSING_MOOD_MESSAGE, SongService, song_prompt,
};

use helpers::MockLlmClient;

#[tokio::test]
async fn given_mood_when_recommending_then_parses_numbered_reply() {
    let llm = Arc::new(MockLlmClient::replying(
        "\n1. Happy - Pharrell Williams\n2. Walking on Sunshine - Katrina and the Waves\n\n",
    ));
    let service = SongService::new(llm.clone());

    let recommendation = service.recommend("Joy").await;

    assert_eq!(recommendation.mood, "Joy");
    assert!(recommendation.error.is_none());
    assert_eq!(
        recommendation.songs.into_vec(),
        vec![
            "Happy - Pharrell Williams".to_string(),
            "Walking on Sunshine - Katrina and the Waves".to_string(),
        ]
    );
    assert_eq!(llm.last_prompt().unwrap(), song_prompt("Joy"));
}

#[tokio::test]
async fn given_bulleted_reply_with_header_when_recommending_then_strips_markers() {
    let llm = Arc::new(MockLlmClient::replying(
        "Songs:\n* Clair de Lune - Debussy\n- Weightless - Marconi Union\n10. Holocene - Bon Iver",
    ));
    let service = SongService::new(llm);

    let recommendation = service.recommend("Calm").await;

    assert_eq!(
        recommendation.songs.into_vec(),
        vec![
            "Clair de Lune - Debussy".to_string(),
            "Weightless - Marconi Union".to_string(),
            "Holocene - Bon Iver".to_string(),
        ]
    );
}

#[tokio::test]
async fn given_padded_mood_when_recommending_then_prompt_uses_trimmed_mood() {
    let llm = Arc::new(MockLlmClient::replying("1. A - B"));
    let service = SongService::new(llm.clone());

    let recommendation = service.recommend("  Sad ").await;

    assert_eq!(recommendation.mood, "Sad");
    assert_eq!(llm.last_prompt().unwrap(), song_prompt("Sad"));
}

#[tokio::test]
async fn given_blank_mood_when_recommending_then_reports_missing_mood_without_call() {
    let llm = Arc::new(MockLlmClient::replying("1. A - B"));
    let service = SongService::new(llm.clone());

    let recommendation = service.recommend("   ").await;

    assert_eq!(recommendation.mood, "Unknown");
    assert!(recommendation.songs.is_empty());
    assert_eq!(recommendation.error.as_deref(), Some(MISSING_MOOD_MESSAGE));
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn given_model_failure_when_recommending_then_reports_fetch_error() {
    let service = SongService::new(Arc::new(MockLlmClient::failing()));

    let recommendation = service.recommend("Angry").await;

    assert_eq!(recommendation.mood, "Angry");
    assert!(recommendation.songs.is_empty());
    assert_eq!(recommendation.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
}

#[tokio::test]
async fn given_blank_reply_when_recommending_then_reports_fetch_error() {
    let service = SongService::new(Arc::new(MockLlmClient::replying(" \n ")));

    let recommendation = service.recommend("Angry").await;

    assert_eq!(recommendation.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
}

#[test]
fn given_mood_when_building_prompt_then_asks_for_five_fresh_songs() {
    let prompt = song_prompt("Nostalgic");

    assert!(prompt.contains("Recommend 5 popular songs"));
    assert!(prompt.contains("mood: Nostalgic"));
    assert!(prompt.contains("do not repeat"));
}
