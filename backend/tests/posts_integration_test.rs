//! Integration tests for post endpoints and author-only edits

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_post_uses_token_identity_as_author() {
    let app = common::TestApp::new().await;
    let author = app.create_user().await;

    let body = json!({ "title": "  Hello  ", "content": "First post" });
    let (status, response) = app.post("/posts", Some(&author.token), &body.to_string()).await;

    assert_eq!(status, StatusCode::CREATED);
    let post: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(post["author_id"].as_u64(), Some(author.id));
    assert_eq!(post["author_nick"], author.nick.as_str());
    assert_eq!(post["title"], "Hello");
    assert_eq!(post["likes"], 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_post_requires_title() {
    let app = common::TestApp::new().await;
    let author = app.create_user().await;

    let body = json!({ "title": "", "content": "No title" });
    let (status, _) = app.post("/posts", Some(&author.token), &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_only_author_may_edit_or_delete() {
    let app = common::TestApp::new().await;
    let author = app.create_user().await;
    let other = app.create_user().await;
    let post_id = app.create_post(&author, "Mine").await;
    let path = format!("/posts/{}", post_id);

    let body = json!({ "title": "Stolen", "content": "Not yours" });
    let (status, _) = app.put(&path, Some(&other.token), &body.to_string()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&path, Some(&other.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let body = json!({ "title": "Edited", "content": "Still mine" });
    let (status, _) = app.put(&path, Some(&author.token), &body.to_string()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, response) = app.get(&path, Some(&other.token)).await;
    let post: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(post["title"], "Edited");

    let (status, _) = app.delete(&path, Some(&author.token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&path, Some(&author.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_editing_missing_post_is_404() {
    let app = common::TestApp::new().await;
    let user = app.create_user().await;

    let body = json!({ "title": "Ghost", "content": "Nothing here" });
    let (status, _) = app.put(&format!("/posts/{}", i64::MAX), Some(&user.token), &body.to_string()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_like_and_unlike_never_go_negative() {
    let app = common::TestApp::new().await;
    let author = app.create_user().await;
    let reader = app.create_user().await;
    let post_id = app.create_post(&author, "Likeable").await;

    let (status, _) = app.post(&format!("/posts/{}/like", post_id), Some(&reader.token), "{}").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for _ in 0..3 {
        let (status, _) = app.post(&format!("/posts/{}/unlike", post_id), Some(&reader.token), "{}").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (_, response) = app.get(&format!("/posts/{}", post_id), Some(&reader.token)).await;
    let post: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(post["likes"], 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_feed_contains_own_and_followed_posts() {
    let app = common::TestApp::new().await;
    let reader = app.create_user().await;
    let followed = app.create_user().await;
    let stranger = app.create_user().await;

    let own = app.create_post(&reader, "Own").await;
    let from_followed = app.create_post(&followed, "Followed").await;
    let from_stranger = app.create_post(&stranger, "Stranger").await;

    let (status, _) = app.post(&format!("/users/{}/follow", followed.id), Some(&reader.token), "{}").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, response) = app.get("/posts", Some(&reader.token)).await;
    assert_eq!(status, StatusCode::OK);
    let feed: Vec<serde_json::Value> = serde_json::from_str(&response).unwrap();
    let ids: Vec<u64> = feed.iter().filter_map(|p| p["id"].as_u64()).collect();

    assert!(ids.contains(&own));
    assert!(ids.contains(&from_followed));
    assert!(!ids.contains(&from_stranger));
    // Newest first
    assert!(ids.windows(2).all(|w| w[0] > w[1]));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_posts_by_user() {
    let app = common::TestApp::new().await;
    let author = app.create_user().await;
    let reader = app.create_user().await;
    let first = app.create_post(&author, "One").await;
    let second = app.create_post(&author, "Two").await;

    let (status, response) = app.get(&format!("/users/{}/posts", author.id), Some(&reader.token)).await;
    assert_eq!(status, StatusCode::OK);
    let posts: Vec<serde_json::Value> = serde_json::from_str(&response).unwrap();
    let ids: Vec<u64> = posts.iter().filter_map(|p| p["id"].as_u64()).collect();
    assert_eq!(ids, vec![second, first]);
}
