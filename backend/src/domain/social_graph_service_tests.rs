//! Tests for the social graph service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::User;
use crate::domain::enrichment::DEFAULT_IDENTITY_BATCH_SIZE;
use crate::domain::ports::{MockFollowerRepository, MockIdentityProvider};

type TestService = SocialGraphService<MockFollowerRepository, MockIdentityProvider>;

fn id(raw: &str) -> UserId {
    UserId::new(raw).expect("fixture id")
}

fn name(raw: &str) -> Username {
    Username::new(raw).expect("fixture username")
}

fn user(raw: &str) -> User {
    User {
        id: id(&format!("user_{raw}")),
        username: Some(name(raw)),
        first_name: None,
        last_name: None,
        profile_image_url: format!("https://images.invalid/{raw}.png"),
    }
}

/// Identity provider that knows `users` by id and by username.
fn directory_of(users: Vec<User>) -> MockIdentityProvider {
    let by_id = users.clone();
    let mut provider = MockIdentityProvider::new();
    provider
        .expect_users_by_ids()
        .returning(move |ids: &[UserId], _| {
            Ok(by_id
                .iter()
                .filter(|user| ids.contains(&user.id))
                .cloned()
                .collect())
        });
    provider
        .expect_user_by_username()
        .returning(move |username: &Username| {
            Ok(users
                .iter()
                .find(|user| user.username.as_ref() == Some(username))
                .cloned())
        });
    provider
}

fn service(followers: MockFollowerRepository, provider: MockIdentityProvider) -> TestService {
    SocialGraphService::new(
        Arc::new(followers),
        UserDirectory::new(Arc::new(provider), DEFAULT_IDENTITY_BATCH_SIZE),
    )
}

fn edge_is(edge: &FollowEdge, follower: &str, following: &str) -> bool {
    edge.follower_id.as_str() == follower && edge.following_id.as_str() == following
}

#[rstest]
#[tokio::test]
async fn is_following_checks_the_viewer_target_edge() {
    let mut followers = MockFollowerRepository::new();
    followers
        .expect_edge_exists()
        .withf(|edge| edge_is(edge, "user_bob", "user_alice"))
        .times(1)
        .return_once(|_| Ok(true));

    let following = service(followers, MockIdentityProvider::new())
        .is_following(&id("user_bob"), &id("user_alice"))
        .await
        .expect("edge lookup");

    assert!(following);
}

#[rstest]
#[tokio::test]
async fn is_following_ignores_the_targets_own_follower_list() {
    // Membership in the target's follower list must never stand in for the
    // viewer's own edge.
    let mut followers = MockFollowerRepository::new();
    followers.expect_follower_ids().times(0);
    followers
        .expect_edge_exists()
        .withf(|edge| edge_is(edge, "user_bob", "user_alice"))
        .times(1)
        .return_once(|_| Ok(false));

    let following = service(followers, MockIdentityProvider::new())
        .is_following(&id("user_bob"), &id("user_alice"))
        .await
        .expect("edge lookup");

    assert!(!following);
}

#[rstest]
#[tokio::test]
async fn is_following_self_is_false_without_an_edge() {
    let mut followers = MockFollowerRepository::new();
    followers
        .expect_edge_exists()
        .withf(|edge| edge_is(edge, "user_alice", "user_alice"))
        .return_once(|_| Ok(false));

    let following = service(followers, MockIdentityProvider::new())
        .is_following(&id("user_alice"), &id("user_alice"))
        .await
        .expect("edge lookup");

    assert!(!following);
}

#[rstest]
#[tokio::test]
async fn follow_upserts_the_edge_and_returns_the_target() {
    let mut followers = MockFollowerRepository::new();
    followers
        .expect_insert_edge()
        .withf(|edge| edge_is(edge, "user_bob", "user_alice"))
        .times(1)
        .return_once(|_| Ok(true));

    let target = service(followers, directory_of(vec![user("alice")]))
        .follow_user(&id("user_bob"), &name("alice"))
        .await
        .expect("follow");

    assert_eq!(target.id, id("user_alice"));
    assert_eq!(target.username, "alice");
}

#[rstest]
#[tokio::test]
async fn repeated_follow_is_not_an_error() {
    let mut followers = MockFollowerRepository::new();
    followers.expect_insert_edge().times(1).return_once(|_| Ok(false));

    let result = service(followers, directory_of(vec![user("alice")]))
        .follow_user(&id("user_bob"), &name("alice"))
        .await;

    assert!(result.is_ok());
}

#[rstest]
#[tokio::test]
async fn following_yourself_is_rejected() {
    let mut followers = MockFollowerRepository::new();
    followers.expect_insert_edge().times(0);

    let error = service(followers, directory_of(vec![user("alice")]))
        .follow_user(&id("user_alice"), &name("alice"))
        .await
        .expect_err("self follow");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case::follow(true)]
#[case::unfollow(false)]
#[tokio::test]
async fn unknown_target_is_not_found(#[case] follow: bool) {
    let mut followers = MockFollowerRepository::new();
    followers.expect_insert_edge().times(0);
    followers.expect_delete_edge().times(0);
    let service = service(followers, directory_of(Vec::new()));

    let result = if follow {
        service.follow_user(&id("user_bob"), &name("ghost")).await
    } else {
        service.unfollow_user(&id("user_bob"), &name("ghost")).await
    };

    assert_eq!(result.expect_err("unknown").code(), ErrorCode::NotFound);
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn unfollow_succeeds_whether_or_not_an_edge_existed(#[case] existed: bool) {
    let mut followers = MockFollowerRepository::new();
    followers
        .expect_delete_edge()
        .withf(|edge| edge_is(edge, "user_bob", "user_alice"))
        .times(1)
        .return_once(move |_| Ok(existed));

    let target = service(followers, directory_of(vec![user("alice")]))
        .unfollow_user(&id("user_bob"), &name("alice"))
        .await
        .expect("unfollow");

    assert_eq!(target.id, id("user_alice"));
}

#[rstest]
#[case(FollowerRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(FollowerRepositoryError::query("constraint"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_failures_are_mapped(
    #[case] failure: FollowerRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut followers = MockFollowerRepository::new();
    followers
        .expect_insert_edge()
        .return_once(move |_| Err(failure));

    let error = service(followers, directory_of(vec![user("alice")]))
        .follow_user(&id("user_bob"), &name("alice"))
        .await
        .expect_err("repository failure");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn fresh_profile_has_no_graph_and_no_relationship() {
    let mut followers = MockFollowerRepository::new();
    followers.expect_follower_ids().return_once(|_| Ok(Vec::new()));
    followers.expect_following_ids().return_once(|_| Ok(Vec::new()));
    followers.expect_edge_exists().times(2).returning(|_| Ok(false));

    let profile = service(followers, directory_of(vec![user("alice"), user("bob")]))
        .get_user_profile(Some(&id("user_bob")), &name("alice"))
        .await
        .expect("profile");

    assert_eq!(profile.user.username, "alice");
    assert_eq!(profile.num_followers, 0);
    assert_eq!(profile.num_following, 0);
    assert!(!profile.is_following);
    assert!(!profile.is_followed_by);
    assert!(profile.followers_preview.is_empty());
    assert!(profile.following_preview.is_empty());
}

#[rstest]
#[tokio::test]
async fn profile_counts_everyone_but_previews_five() {
    let names = ["b", "c", "d", "e", "f", "g", "h"];
    let mut everyone: Vec<User> = names.iter().map(|n| user(n)).collect();
    everyone.push(user("alice"));
    let follower_ids: Vec<UserId> = names.iter().map(|n| id(&format!("user_{n}"))).collect();
    let mut followers = MockFollowerRepository::new();
    followers
        .expect_follower_ids()
        .return_once(move |_| Ok(follower_ids));
    followers
        .expect_following_ids()
        .return_once(|_| Ok(vec![id("user_b")]));
    followers.expect_edge_exists().times(0);

    let profile = service(followers, directory_of(everyone))
        .get_user_profile(None, &name("alice"))
        .await
        .expect("profile");

    assert_eq!(profile.num_followers, 7);
    assert_eq!(profile.num_following, 1);
    let previewed: Vec<&str> = profile
        .followers_preview
        .iter()
        .map(|u| u.username.as_str())
        .collect();
    assert_eq!(previewed, vec!["b", "c", "d", "e", "f"]);
    assert_eq!(profile.following_preview.len(), 1);
}

#[rstest]
#[tokio::test]
async fn profile_reports_both_directions() {
    let mut followers = MockFollowerRepository::new();
    followers
        .expect_follower_ids()
        .return_once(|_| Ok(vec![id("user_bob")]));
    followers.expect_following_ids().return_once(|_| Ok(Vec::new()));
    followers
        .expect_edge_exists()
        .withf(|edge| edge_is(edge, "user_bob", "user_alice"))
        .return_once(|_| Ok(true));
    followers
        .expect_edge_exists()
        .withf(|edge| edge_is(edge, "user_alice", "user_bob"))
        .return_once(|_| Ok(false));

    let profile = service(followers, directory_of(vec![user("alice"), user("bob")]))
        .get_user_profile(Some(&id("user_bob")), &name("alice"))
        .await
        .expect("profile");

    assert!(profile.is_following);
    assert!(!profile.is_followed_by);
    assert_eq!(profile.followers_preview[0].username, "bob");
}

#[rstest]
#[tokio::test]
async fn profile_of_unknown_user_is_not_found() {
    let mut followers = MockFollowerRepository::new();
    followers.expect_follower_ids().times(0);

    let error = service(followers, directory_of(Vec::new()))
        .get_user_profile(None, &name("ghost"))
        .await
        .expect_err("unknown user");

    assert_eq!(error.code(), ErrorCode::NotFound);
}
