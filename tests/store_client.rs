// Hosted store REST client tests against a mock server

use founder_match::models::{Swipe, SwipeAction, YesNo};
use founder_match::services::{StoreClient, StoreError, StoreTables};
use mockito::Matcher;
use tokio_test::{assert_err, assert_ok};

fn client_for(server: &mockito::ServerGuard) -> StoreClient {
    StoreClient::new(
        server.url(),
        "service-key".to_string(),
        StoreTables {
            profiles: "profiles".to_string(),
            likes: "likes".to_string(),
            skips: "skips".to_string(),
        },
    )
    .unwrap()
}

#[tokio::test]
async fn test_get_profile() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::UrlEncoded("user_id".into(), "eq.viewer".into()))
        .match_header("apikey", "service-key")
        .match_header("authorization", "Bearer service-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"user_id":"viewer","is_technical":"yes","city":"Austin","priority_areas":["AI"]}]"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let profile = assert_ok!(client.get_profile("viewer").await);

    assert_eq!(profile.user_id, "viewer");
    assert_eq!(profile.is_technical, Some(YesNo::Yes));
    assert_eq!(profile.priority_areas, vec!["AI"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_profile_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = assert_err!(client.get_profile("ghost").await);

    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::Any)
        .with_status(401)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = assert_err!(client.get_profile("viewer").await);

    assert!(matches!(err, StoreError::Unauthorized));
}

#[tokio::test]
async fn test_query_candidates_filters_rows() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("is_active".into(), "eq.true".into()),
            Matcher::UrlEncoded("limit".into(), "50".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"user_id":"a","city":"Austin"},
                {"user_id":"viewer"},
                {"user_id":"skipped"},
                {"city":"no id"},
                {"user_id":"b","has_startup":"no"}
            ]"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let exclude = vec!["skipped".to_string()];
    let candidates = assert_ok!(client.query_candidates("viewer", &exclude, 50).await);

    let ids: Vec<&str> = candidates.iter().map(|p| p.user_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_query_candidates_filters_with_many_exclusions() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"user_id":"seen-7"},{"user_id":"fresh"},{"user_id":"seen-199"}]"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let exclude: Vec<String> = (0..200).map(|i| format!("seen-{}", i)).collect();
    let candidates = assert_ok!(client.query_candidates("viewer", &exclude, 10).await);

    let ids: Vec<&str> = candidates.iter().map(|p| p.user_id.as_str()).collect();
    assert_eq!(ids, vec!["fresh"]);
}

#[tokio::test]
async fn test_get_profiles_empty_skips_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let profiles = assert_ok!(client.get_profiles(&[]).await);

    assert!(profiles.is_empty());
    mock.assert_async().await;
}

fn swipe(action: SwipeAction) -> Swipe {
    Swipe {
        user_id: "viewer".to_string(),
        target_user_id: "candidate".to_string(),
        action,
        created_at: chrono::Utc::now(),
    }
}

fn pair_query() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("user_id".into(), "eq.viewer".into()),
        Matcher::UrlEncoded("target_user_id".into(), "eq.candidate".into()),
    ])
}

#[tokio::test]
async fn test_record_swipe_posts_to_action_table() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", "/rest/v1/skips")
        .match_query(pair_query())
        .with_status(204)
        .create_async()
        .await;
    let mock = server
        .mock("POST", "/rest/v1/likes")
        .match_header("prefer", Matcher::Regex("merge-duplicates".into()))
        .match_body(Matcher::PartialJsonString(
            r#"{"user_id":"viewer","target_user_id":"candidate"}"#.to_string(),
        ))
        .with_status(201)
        .create_async()
        .await;

    let client = client_for(&server);

    assert_ok!(client.record_swipe(&swipe(SwipeAction::Like)).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_skip_after_like_moves_row_between_tables() {
    let mut server = mockito::Server::new_async().await;
    let delete_like = server
        .mock("DELETE", "/rest/v1/likes")
        .match_query(pair_query())
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let post_skip = server
        .mock("POST", "/rest/v1/skips")
        .match_body(Matcher::PartialJsonString(
            r#"{"user_id":"viewer","target_user_id":"candidate"}"#.to_string(),
        ))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;
    let post_like = server
        .mock("POST", "/rest/v1/likes")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    assert_ok!(client.record_swipe(&swipe(SwipeAction::Skip)).await);

    delete_like.assert_async().await;
    post_skip.assert_async().await;
    post_like.assert_async().await;
}

#[tokio::test]
async fn test_remove_swipe_deletes_from_both_tables() {
    let mut server = mockito::Server::new_async().await;
    let likes = server
        .mock("DELETE", "/rest/v1/likes")
        .match_query(pair_query())
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let skips = server
        .mock("DELETE", "/rest/v1/skips")
        .match_query(pair_query())
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    assert_ok!(client.remove_swipe("viewer", "candidate").await);

    likes.assert_async().await;
    skips.assert_async().await;
}

#[tokio::test]
async fn test_clear_swipes_deletes_all_user_rows() {
    let mut server = mockito::Server::new_async().await;
    let mut mocks = Vec::new();
    for table in ["likes", "skips"] {
        mocks.push(
            server
                .mock("DELETE", format!("/rest/v1/{}", table).as_str())
                .match_query(Matcher::UrlEncoded("user_id".into(), "eq.viewer".into()))
                .with_status(204)
                .expect(1)
                .create_async()
                .await,
        );
    }

    let client = client_for(&server);
    assert_ok!(client.clear_swipes("viewer").await);

    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_api_error_surfaces_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", "/rest/v1/likes")
        .match_query(Matcher::Any)
        .with_status(204)
        .create_async()
        .await;
    server
        .mock("POST", "/rest/v1/skips")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = client_for(&server);

    let err = assert_err!(client.record_swipe(&swipe(SwipeAction::Skip)).await);
    assert!(matches!(err, StoreError::ApiError(ref m) if m.contains("boom")));
}
