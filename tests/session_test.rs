mod common;

use std::time::Duration;

use common::{FakeGenerator, FakeSpotify, Reply, TOKEN, song, songs, suggestion_json};
use promptlist::{
    error::{AuthError, GenerationError, PlaylistCreationError, SessionError},
    management::{MemorySessionStore, Session, SessionState, SessionStore},
};

type TestSession<'a> = Session<&'a MemorySessionStore, FakeSpotify, &'a FakeGenerator>;

// Helper function to start an authenticated session
async fn logged_in<'a>(
    store: &'a MemorySessionStore,
    spotify: FakeSpotify,
    generator: &'a FakeGenerator,
) -> TestSession<'a> {
    let session = Session::restore(store, spotify, generator).await.unwrap();
    assert_eq!(session.state(), SessionState::Idle);
    session
}

fn ten_song_generator() -> FakeGenerator {
    FakeGenerator::answering(format!(
        "```json\n{}\n```",
        suggestion_json("Upbeat Workout", &songs(10))
    ))
}

#[tokio::test]
async fn test_restore_without_token() {
    let store = MemorySessionStore::default();
    let generator = ten_song_generator();

    let session = Session::restore(&store, FakeSpotify::with_catalog(10), &generator)
        .await
        .unwrap();

    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(session.token(), None);
}

#[tokio::test]
async fn test_prompt_to_playlist() {
    let store = MemorySessionStore::with_token(TOKEN);
    let generator = ten_song_generator();
    let mut session = logged_in(&store, FakeSpotify::with_catalog(10), &generator).await;

    let review = session
        .submit_prompt("upbeat workout songs")
        .await
        .unwrap()
        .clone();
    assert_eq!(session.state(), SessionState::Reviewing);
    assert_eq!(session.prompt(), "upbeat workout songs");
    assert_eq!(review.name, "Upbeat Workout");
    assert_eq!(review.songs.len(), 10);
    assert!(review.unmatched.is_empty());

    let removed = review.songs[3].id.clone();
    session.remove_song(&removed).unwrap();
    assert_eq!(session.review().map(|r| r.songs.len()), Some(9));

    let created = session.confirm().await.unwrap().clone();
    assert_eq!(session.state(), SessionState::Created);
    assert!(created.playlist_url.starts_with("https://open.spotify.com/playlist/"));
    assert_eq!(created.name, "Upbeat Workout");
    assert_eq!(created.tracks.len(), 9);
    assert!(created.tracks.iter().all(|t| t.name != "Song 4"));

    // Exactly the nine kept tracks were appended, in review order
    let added = session.api().added.lock().unwrap().clone();
    assert_eq!(added.len(), 1);
    let expected: Vec<String> = (1..=10)
        .filter(|n| *n != 4)
        .map(|n| format!("spotify:track:id-{n}"))
        .collect();
    assert_eq!(added[0].1, expected);

    // Review and prompt are cleared once the playlist exists
    assert!(session.review().is_none());
    assert_eq!(session.prompt(), "");
    assert_eq!(session.created(), Some(&created));

    session.create_another().unwrap();
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.created().is_none());
}

#[tokio::test]
async fn test_remove_song_is_idempotent() {
    let store = MemorySessionStore::with_token(TOKEN);
    let generator = ten_song_generator();
    let mut session = logged_in(&store, FakeSpotify::with_catalog(10), &generator).await;
    session.submit_prompt("anything").await.unwrap();

    session.remove_song("id-2").unwrap();
    session.remove_song("id-2").unwrap();
    session.remove_song("not-in-list").unwrap();

    let review = session.review().unwrap();
    assert_eq!(review.songs.len(), 9);
    assert!(review.songs.iter().all(|s| s.id != "id-2"));
}

#[tokio::test]
async fn test_unmatched_songs_are_dropped() {
    let store = MemorySessionStore::with_token(TOKEN);
    let generator = ten_song_generator();
    // Only the first seven suggestions exist in the catalog
    let mut session = logged_in(&store, FakeSpotify::with_catalog(7), &generator).await;

    let review = session.submit_prompt("anything").await.unwrap().clone();

    assert_eq!(review.songs.len(), 7);
    assert_eq!(review.unmatched, vec![song(8), song(9), song(10)]);
}

#[tokio::test]
async fn test_concurrent_resolution_keeps_order() {
    let store = MemorySessionStore::with_token(TOKEN);
    let generator = ten_song_generator();
    let spotify = FakeSpotify::with_catalog(10).with_descending_latency(Duration::from_millis(5));
    let mut session = logged_in(&store, spotify, &generator)
        .await
        .with_resolve_concurrency(4);

    let review = session.submit_prompt("anything").await.unwrap().clone();

    let ids: Vec<String> = review.songs.iter().map(|s| s.id.clone()).collect();
    let expected: Vec<String> = (1..=10).map(|n| format!("id-{n}")).collect();
    assert_eq!(ids, expected);

    // Later songs answered first, yet the review keeps the suggestion order
    let completed = session.api().completed_searches.lock().unwrap().clone();
    assert_eq!(completed.len(), 10);
    assert_ne!(completed, songs(10));
}

#[tokio::test]
async fn test_empty_prompt_is_rejected() {
    let store = MemorySessionStore::with_token(TOKEN);
    let generator = ten_song_generator();
    let mut session = logged_in(&store, FakeSpotify::with_catalog(10), &generator).await;

    let result = session.submit_prompt("  ").await;

    assert!(matches!(
        result,
        Err(SessionError::Generation(GenerationError::EmptyPrompt))
    ));
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_generation_failure_keeps_prompt() {
    let store = MemorySessionStore::with_token(TOKEN);
    let generator = FakeGenerator::new(Reply::Network);
    let mut session = logged_in(&store, FakeSpotify::with_catalog(10), &generator).await;

    let err = session.submit_prompt("top hits of 2020").await.unwrap_err();

    assert_eq!(err.user_message(), "Failed to generate playlist. Please try again.");
    assert!(!err.is_auth());
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.prompt(), "top hits of 2020");
    assert!(session.review().is_none());
    // Nothing was searched
    assert!(session.api().searches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_blocked_generation_message() {
    let store = MemorySessionStore::with_token(TOKEN);
    let generator = FakeGenerator::new(Reply::Blocked);
    let mut session = logged_in(&store, FakeSpotify::with_catalog(10), &generator).await;

    let err = session.submit_prompt("something edgy").await.unwrap_err();

    assert!(err.user_message().contains("content restrictions"));
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_malformed_generation_returns_to_idle() {
    let store = MemorySessionStore::with_token(TOKEN);
    let generator = FakeGenerator::answering("I'd love to help! Here are some songs...");
    let mut session = logged_in(&store, FakeSpotify::with_catalog(10), &generator).await;

    let result = session.submit_prompt("anything").await;

    assert!(matches!(
        result,
        Err(SessionError::Generation(GenerationError::Malformed(_)))
    ));
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_retry_after_failure() {
    let store = MemorySessionStore::with_token(TOKEN);
    let generator = ten_song_generator();
    let mut session = logged_in(
        &store,
        FakeSpotify::with_catalog(10).failing_at("add"),
        &generator,
    )
    .await;
    session.submit_prompt("anything").await.unwrap();

    let err = session.confirm().await.unwrap_err();
    assert_eq!(err.user_message(), "Failed to create playlist. Please try again.");
    assert!(matches!(err, SessionError::Creation(PlaylistCreationError::Step { .. })));

    // Back to the same review, ready for another attempt
    assert_eq!(session.state(), SessionState::Reviewing);
    assert_eq!(session.review().map(|r| r.songs.len()), Some(10));
    assert_eq!(session.prompt(), "anything");
}

#[tokio::test]
async fn test_new_prompt_while_reviewing() {
    let store = MemorySessionStore::with_token(TOKEN);
    let generator = ten_song_generator();
    let mut session = logged_in(&store, FakeSpotify::with_catalog(10), &generator).await;

    session.submit_prompt("first").await.unwrap();
    session.remove_song("id-1").unwrap();

    let review = session.submit_prompt("second").await.unwrap().clone();
    assert_eq!(review.songs.len(), 10);
    assert_eq!(session.prompt(), "second");
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn test_invalid_transitions() {
    let store = MemorySessionStore::with_token(TOKEN);
    let generator = ten_song_generator();
    let mut session = logged_in(&store, FakeSpotify::with_catalog(10), &generator).await;

    // Nothing under review yet
    assert!(matches!(
        session.confirm().await,
        Err(SessionError::InvalidState(_))
    ));
    assert!(matches!(
        session.remove_song("id-1"),
        Err(SessionError::InvalidState(_))
    ));
    assert!(matches!(
        session.create_another(),
        Err(SessionError::InvalidState(_))
    ));

    session.submit_prompt("anything").await.unwrap();
    session.confirm().await.unwrap();

    // A created playlist must be acknowledged before the next prompt
    assert!(matches!(
        session.submit_prompt("again").await,
        Err(SessionError::InvalidState(_))
    ));
    assert_eq!(session.state(), SessionState::Created);
}

#[tokio::test]
async fn test_logout_requires_new_login() {
    let store = MemorySessionStore::with_token(TOKEN);
    let generator = ten_song_generator();
    let mut session = logged_in(&store, FakeSpotify::with_catalog(10), &generator).await;
    session.submit_prompt("anything").await.unwrap();

    session.logout().await.unwrap();

    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(session.review().is_none());
    assert_eq!(store.get().await.unwrap(), None);

    let err = session.submit_prompt("anything").await.unwrap_err();
    assert!(matches!(err, SessionError::Auth(AuthError::MissingToken)));
    assert!(err.is_auth());
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_complete_login_enables_prompts() {
    let store = MemorySessionStore::default();
    let generator = ten_song_generator();
    let mut session = Session::restore(&store, FakeSpotify::with_catalog(10), &generator)
        .await
        .unwrap();

    let stored = session.complete_login("#error=access_denied").await.unwrap();
    assert!(!stored);
    assert_eq!(session.state(), SessionState::Unauthenticated);

    let stored = session
        .complete_login(&format!("#access_token={}&token_type=Bearer", TOKEN))
        .await
        .unwrap();
    assert!(stored);
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(store.get().await.unwrap().as_deref(), Some(TOKEN));

    assert!(session.submit_prompt("anything").await.is_ok());
}

#[tokio::test]
async fn test_expired_token_during_resolution() {
    let store = MemorySessionStore::with_token("expired");
    let generator = ten_song_generator();
    let mut session = logged_in(&store, FakeSpotify::with_catalog(10), &generator).await;

    let err = session.submit_prompt("anything").await.unwrap_err();

    assert!(matches!(err, SessionError::Auth(AuthError::Unauthorized)));
    assert!(err.is_auth());
    assert_eq!(session.state(), SessionState::Idle);
}
