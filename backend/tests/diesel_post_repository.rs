//! Integration tests for `DieselPostRepository` against embedded PostgreSQL.
//!
//! Each test runs in its own database cloned from a migrated template.

use chrono::{DateTime, Utc};
use murmur::domain::ports::{PostRepository, PostRepositoryError};
use murmur::domain::{Post, PostContent, PostId, UserId};
use murmur::outbound::persistence::{DbPool, DieselPostRepository, PoolConfig};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use postgres::{Client, NoTls};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use uuid::Uuid;

mod support;

use support::embedded_postgres::{
    format_postgres_error, handle_cluster_setup_failure, provision_template_database,
    shared_cluster,
};

struct TestContext {
    runtime: Runtime,
    repository: DieselPostRepository,
    database_url: String,
    _database: TemporaryDatabase,
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster().map_err(|err| format!("{err:?}"))?;
    let temp_db = provision_template_database(cluster)?;
    let database_url = temp_db.url().to_string();

    let config = PoolConfig::new(database_url.as_str())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        repository: DieselPostRepository::new(pool),
        database_url,
        _database: temp_db,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn at(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_767_225_600 + seconds, 0).expect("valid timestamp")
}

fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

fn post(author: &str, content: &str, seconds: i64) -> Post {
    Post::new(
        user(author),
        PostContent::new(content).expect("valid content"),
        at(seconds),
    )
}

fn post_with_id(id: u128, author: &str, content: &str, seconds: i64) -> Post {
    Post {
        id: PostId::from_uuid(Uuid::from_u128(id)),
        ..post(author, content, seconds)
    }
}

fn raw_insert(url: &str, content: &str) -> Result<u64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .execute(
            "INSERT INTO posts (id, author_id, content, created_at) VALUES ($1, $2, $3, now())",
            &[&Uuid::new_v4(), &"user_raw", &content],
        )
        .map_err(|err| format_postgres_error(&err))
}

fn contents(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|post| post.content.as_str()).collect()
}

#[rstest]
fn inserted_post_reads_back_unchanged(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: inserted_post_reads_back_unchanged skipped");
        return;
    };
    let repository = context.repository.clone();
    let written = post("user_alice", "héllo wörld", 0);

    context
        .runtime
        .block_on(async { repository.insert(&written).await })
        .expect("insert post");
    let fetched = context
        .runtime
        .block_on(async { repository.find_by_id(&written.id).await })
        .expect("find post");

    assert_eq!(fetched, Some(written));
}

#[rstest]
fn unknown_id_is_absent(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_id_is_absent skipped");
        return;
    };
    let repository = context.repository.clone();

    let fetched = context
        .runtime
        .block_on(async { repository.find_by_id(&PostId::random()).await })
        .expect("find post");

    assert!(fetched.is_none());
}

#[rstest]
fn recent_posts_are_newest_first_with_id_tiebreak(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: recent_posts_are_newest_first_with_id_tiebreak skipped");
        return;
    };
    let repository = context.repository.clone();
    let written = [
        post_with_id(1, "user_alice", "oldest", 0),
        post_with_id(2, "user_bob", "tie low id", 10),
        post_with_id(3, "user_alice", "tie high id", 10),
        post_with_id(4, "user_bob", "newest", 20),
    ];

    let listed = context
        .runtime
        .block_on(async {
            for item in &written {
                repository.insert(item).await?;
            }
            repository.list_recent(10).await
        })
        .expect("list recent");

    assert_eq!(
        contents(&listed),
        vec!["newest", "tie high id", "tie low id", "oldest"]
    );
}

#[rstest]
#[case(0, 0)]
#[case(2, 2)]
#[case(50, 3)]
fn recent_posts_honour_the_limit(
    repo_context: Option<TestContext>,
    #[case] limit: usize,
    #[case] expected: usize,
) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: recent_posts_honour_the_limit skipped");
        return;
    };
    let repository = context.repository.clone();

    let listed = context
        .runtime
        .block_on(async {
            for n in 0..3 {
                repository
                    .insert(&post("user_alice", &format!("post {n}"), n))
                    .await?;
            }
            repository.list_recent(limit).await
        })
        .expect("list recent");

    assert_eq!(listed.len(), expected);
    if let Some(first) = listed.first() {
        assert_eq!(first.content.as_str(), "post 2");
    }
}

#[rstest]
fn author_listing_filters_to_that_author(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: author_listing_filters_to_that_author skipped");
        return;
    };
    let repository = context.repository.clone();
    let alice = user("user_alice");

    let listed = context
        .runtime
        .block_on(async {
            repository.insert(&post("user_alice", "a1", 0)).await?;
            repository.insert(&post("user_bob", "b1", 1)).await?;
            repository.insert(&post("user_alice", "a2", 2)).await?;
            repository.list_by_author(&alice).await
        })
        .expect("list by author");

    assert_eq!(contents(&listed), vec!["a2", "a1"]);
    assert!(listed.iter().all(|item| item.author_id == alice));
}

#[rstest]
fn duplicate_post_id_is_a_query_error(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: duplicate_post_id_is_a_query_error skipped");
        return;
    };
    let repository = context.repository.clone();
    let first = post_with_id(7, "user_alice", "first", 0);
    let clash = post_with_id(7, "user_bob", "clash", 1);

    let result = context.runtime.block_on(async {
        repository.insert(&first).await?;
        repository.insert(&clash).await
    });

    assert!(
        matches!(result, Err(PostRepositoryError::Query { .. })),
        "expected query error, got {result:?}"
    );
}

#[rstest]
#[case::empty(String::new())]
#[case::too_long("x".repeat(281))]
fn table_rejects_content_outside_bounds(
    repo_context: Option<TestContext>,
    #[case] content: String,
) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: table_rejects_content_outside_bounds skipped");
        return;
    };

    let error = raw_insert(&context.database_url, &content).expect_err("check violation");

    assert!(error.contains("23514"), "unexpected error: {error}");
}

#[rstest]
fn table_counts_characters_not_bytes(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: table_counts_characters_not_bytes skipped");
        return;
    };

    let inserted = raw_insert(&context.database_url, &"é".repeat(280)).expect("280 characters");

    assert_eq!(inserted, 1);
}
