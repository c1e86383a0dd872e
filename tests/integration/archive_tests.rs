//! Integration tests for the archive pipeline
//!
//! These tests use wiremock to stand in for the VK API and the photo CDN
//! and run the full fetch-then-materialize cycle end-to-end.

use std::collections::HashSet;
use std::path::Path;
use tempfile::TempDir;
use vk_wall_archive::api::{ApiError, Post, WallPage};
use vk_wall_archive::config::{Config, RunTarget};
use vk_wall_archive::pipeline::{run_archive, Orchestrator};
use vk_wall_archive::ArchiveError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server and a temp root
fn create_test_config(server_uri: &str, root: &Path) -> Config {
    let mut config = Config::default();
    config.api.base_url = format!("{}/method", server_uri);
    config.output.cache_dir = root.join("tmp").to_string_lossy().into_owned();
    config.output.result_dir = root.join("result").to_string_lossy().into_owned();
    config.output.max_open_files = 8;
    config
}

fn target(author_ids: Vec<i64>) -> RunTarget {
    RunTarget {
        group_id: -100,
        author_ids,
    }
}

/// A legacy wall body with posts `ids`, all original and on 2015-03-04
fn wall_body(total: u64, ids: impl IntoIterator<Item = i64>) -> String {
    let posts: Vec<String> = ids
        .into_iter()
        .map(|id| {
            format!(
                r#"{{"id":{},"post_type":"post","text":"post {}","date":1425427200,"from_id":-100}}"#,
                id, id
            )
        })
        .collect();

    if posts.is_empty() {
        format!(r#"{{"response":[{}]}}"#, total)
    } else {
        format!(r#"{{"response":[{},{}]}}"#, total, posts.join(","))
    }
}

async fn mount_wall_page(server: &MockServer, offset: u64, count: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/method/wall.get"))
        .and(query_param("owner_id", "-100"))
        .and(query_param("filter", "owner"))
        .and(query_param("offset", offset.to_string().as_str()))
        .and(query_param("count", count.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

fn write_cached_batch(root: &Path, name: &str, body: &str) {
    let cache = root.join("tmp");
    std::fs::create_dir_all(&cache).expect("Failed to create cache dir");
    std::fs::write(cache.join(name), body).expect("Failed to write batch");
}

#[tokio::test]
async fn test_end_to_end_single_post_with_link() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_wall_page(
        &mock_server,
        0,
        1,
        r#"{"response":[1,{"id":7,"post_type":"post","signer_id":42,"text":"hi","date":1425427200,"from_id":-100,"attachments":[{"type":"link","link":{"url":"http://e.com"}}]}]}"#
            .to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/method/getProfiles"))
        .and(query_param("user_ids", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"response":[{"uid":42,"first_name":"A","last_name":"B"}]}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let summary = run_archive(config, target(vec![42]))
        .await
        .expect("Archive failed");

    let post_dir = dir.path().join("result/A B/2015-03-04_7");
    let text = std::fs::read_to_string(post_dir.join("text.txt")).expect("Missing text.txt");
    assert_eq!(text, "hi\n Автор: A B\nVk link: https://vk.com/wall-100_7");

    let link = std::fs::read_to_string(post_dir.join("attachments/link_0.txt"))
        .expect("Missing link_0.txt");
    assert_eq!(link, r#"{"url":"http://e.com"}"#);

    // The cache is published and the staging directory is gone
    assert!(dir.path().join("tmp/batch_0.txt").is_file());
    assert!(!dir.path().join("tmp.partial").exists());

    assert_eq!(summary.batches_fetched, 1);
    assert_eq!(summary.posts_written, 1);
    assert_eq!(summary.links_written, 1);
}

#[tokio::test]
async fn test_pagination_fetches_every_post_once() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // 250 posts: one discovery call, then pages of 100 at offsets 1, 101, 201
    mount_wall_page(&mock_server, 0, 1, wall_body(250, 1..=1)).await;
    mount_wall_page(&mock_server, 1, 100, wall_body(250, 2..=101)).await;
    mount_wall_page(&mock_server, 101, 100, wall_body(250, 102..=201)).await;
    mount_wall_page(&mock_server, 201, 100, wall_body(250, 202..=250)).await;

    Mock::given(method("GET"))
        .and(path("/method/getProfiles"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let summary = run_archive(config, target(vec![]))
        .await
        .expect("Archive failed");
    assert_eq!(summary.batches_fetched, 4);

    let cache = dir.path().join("tmp");
    let mut files: Vec<String> = std::fs::read_dir(&cache)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(
        files,
        vec!["batch_0.txt", "batch_1.txt", "batch_101.txt", "batch_201.txt"]
    );

    let mut ids = HashSet::new();
    let mut total = 0;
    for name in &files {
        let body = std::fs::read_to_string(cache.join(name)).unwrap();
        let page = WallPage::parse(&body).unwrap();
        for item in page.items {
            total += 1;
            ids.insert(Post::from_value(item).unwrap().id);
        }
    }
    assert_eq!(total, 250);
    assert_eq!(ids.len(), 250);

    let written = std::fs::read_dir(dir.path().join("result/Anonymous"))
        .unwrap()
        .count();
    assert_eq!(written, 250);
    assert_eq!(summary.posts_written, 250);
}

#[tokio::test]
async fn test_undecodable_post_does_not_abort_pagination() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_wall_page(&mock_server, 0, 1, wall_body(3, [1])).await;
    mount_wall_page(
        &mock_server,
        1,
        100,
        r#"{"response":[3,{"id":2,"post_type":"post","text":"no date","from_id":-100},{"id":3,"post_type":"post","text":"ok","date":1425427200,"from_id":-100}]}"#
            .to_string(),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let summary = run_archive(config, target(vec![]))
        .await
        .expect("Archive failed");

    assert_eq!(summary.batches_fetched, 2);
    assert_eq!(summary.batches_read, 2);
    assert_eq!(summary.posts_written, 2);
    assert_eq!(summary.posts_failed, 1);

    assert!(dir.path().join("tmp/batch_1.txt").is_file());
    let anonymous = dir.path().join("result/Anonymous");
    assert!(anonymous.join("2015-03-04_1/text.txt").is_file());
    assert!(anonymous.join("2015-03-04_3/text.txt").is_file());
    assert_eq!(std::fs::read_dir(&anonymous).unwrap().count(), 2);
}

#[tokio::test]
async fn test_empty_wall_makes_single_call() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_wall_page(&mock_server, 0, 1, wall_body(0, [])).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let summary = run_archive(config, target(vec![]))
        .await
        .expect("Archive failed");

    assert_eq!(summary.batches_fetched, 1);
    assert_eq!(summary.posts_written, 0);
    assert!(dir.path().join("result").is_dir());
}

#[tokio::test]
async fn test_existing_cache_skips_download() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/method/wall.get"))
        .respond_with(ResponseTemplate::new(200).set_body_string(wall_body(0, [])))
        .expect(0)
        .mount(&mock_server)
        .await;

    write_cached_batch(dir.path(), "batch_0.txt", &wall_body(2, [11, 12]));

    let config = create_test_config(&mock_server.uri(), dir.path());
    let orchestrator = Orchestrator::new(config, target(vec![])).unwrap();
    assert!(orchestrator.store().exists());

    let summary = orchestrator.run().await.expect("Archive failed");
    assert_eq!(summary.batches_fetched, 0);
    assert_eq!(summary.batches_read, 1);
    assert!(dir
        .path()
        .join("result/Anonymous/2015-03-04_11/text.txt")
        .is_file());
    assert!(dir
        .path()
        .join("result/Anonymous/2015-03-04_12/text.txt")
        .is_file());
}

#[tokio::test]
async fn test_malformed_batch_is_skipped() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    write_cached_batch(dir.path(), "batch_0.txt", "{not json");
    write_cached_batch(dir.path(), "batch_1.txt", &wall_body(1, [21]));

    let config = create_test_config(&mock_server.uri(), dir.path());
    let summary = run_archive(config, target(vec![]))
        .await
        .expect("Archive failed");

    assert_eq!(summary.batches_skipped, 1);
    assert_eq!(summary.batches_read, 1);
    assert_eq!(summary.posts_written, 1);
    assert!(dir
        .path()
        .join("result/Anonymous/2015-03-04_21/text.txt")
        .is_file());
}

#[tokio::test]
async fn test_photo_and_mixed_attachments() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let base = mock_server.uri();

    Mock::given(method("HEAD"))
        .and(path("/img/z.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/img/z.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/z.gif"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"GIF89a".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let batch = format!(
        r#"{{"response":[1,{{"id":30,"post_type":"post","text":"pics","date":1425427200,"from_id":-100,"attachments":[
            {{"type":"photo","photo":{{"pid":5,"src":"{base}/img/z.jpg","text":"first"}}}},
            {{"type":"video","video":{{"vid":1}}}},
            {{"type":"link","link":{{"url":"http://e.com","title":"E"}}}},
            {{"type":"photo","photo":{{"pid":6,"src":"{base}/img/z.gif","text":"second"}}}},
            {{"type":"photo","photo":{{"pid":7,"src":"{base}/img/missing.jpg","text":"gone"}}}}
        ]}}]}}"#,
        base = base
    );
    write_cached_batch(dir.path(), "batch_0.txt", &batch);

    let config = create_test_config(&base, dir.path());
    let summary = run_archive(config, target(vec![]))
        .await
        .expect("Archive failed");

    let attachments = dir.path().join("result/Anonymous/2015-03-04_30/attachments");
    assert_eq!(
        std::fs::read(attachments.join("5.jpg")).unwrap(),
        vec![0xFF, 0xD8, 0xFF, 0xE0]
    );
    assert_eq!(
        std::fs::read_to_string(attachments.join("5.txt")).unwrap(),
        "first"
    );
    assert_eq!(std::fs::read(attachments.join("6.png")).unwrap(), b"GIF89a");
    assert_eq!(
        std::fs::read_to_string(attachments.join("6.txt")).unwrap(),
        "second"
    );
    assert_eq!(
        std::fs::read_to_string(attachments.join("link_2.txt")).unwrap(),
        r#"{"url":"http://e.com","title":"E"}"#
    );

    // The failed download leaves neither image nor caption behind
    assert!(!attachments.join("7.jpg").exists());
    assert!(!attachments.join("7.txt").exists());

    assert_eq!(summary.photos_downloaded, 2);
    assert_eq!(summary.links_written, 1);
    assert_eq!(summary.attachments_failed, 1);
    assert_eq!(summary.attachments_ignored, 1);
}

#[tokio::test]
async fn test_photo_download_without_probe() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let base = mock_server.uri();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/p.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let batch = format!(
        r#"{{"response":[1,{{"id":31,"post_type":"post","text":"pic","date":1425427200,"from_id":-100,"attachments":[{{"type":"photo","photo":{{"id":9,"src":"{}/img/p.jpg","text":"cap"}}}}]}}]}}"#,
        base
    );
    write_cached_batch(dir.path(), "batch_0.txt", &batch);

    let mut config = create_test_config(&base, dir.path());
    config.api.probe_before_download = false;
    let summary = run_archive(config, target(vec![]))
        .await
        .expect("Archive failed");

    let attachments = dir.path().join("result/Anonymous/2015-03-04_31/attachments");
    assert_eq!(std::fs::read(attachments.join("9.jpg")).unwrap(), vec![1, 2, 3]);
    assert_eq!(
        std::fs::read_to_string(attachments.join("9.txt")).unwrap(),
        "cap"
    );
    assert_eq!(summary.photos_downloaded, 1);
}

#[tokio::test]
async fn test_repost_produces_no_output() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    write_cached_batch(
        dir.path(),
        "batch_0.txt",
        r#"{"response":[1,{"id":40,"post_type":"copy","signer_id":42,"text":"shared","date":1425427200,"from_id":-100}]}"#,
    );

    let config = create_test_config(&mock_server.uri(), dir.path());
    let summary = run_archive(config, target(vec![]))
        .await
        .expect("Archive failed");

    assert_eq!(summary.reposts_skipped, 1);
    assert_eq!(std::fs::read_dir(dir.path().join("result")).unwrap().count(), 0);
}

#[tokio::test]
async fn test_author_resolution_failure_falls_back_to_anonymous() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/method/getProfiles"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    write_cached_batch(
        dir.path(),
        "batch_0.txt",
        r#"{"response":[1,{"id":50,"post_type":"post","signer_id":42,"text":"x","date":1425427200,"from_id":-100}]}"#,
    );

    let config = create_test_config(&mock_server.uri(), dir.path());
    run_archive(config, target(vec![42]))
        .await
        .expect("Archive failed");

    assert!(dir
        .path()
        .join("result/Anonymous/2015-03-04_50/text.txt")
        .is_file());
}

#[tokio::test]
async fn test_failed_pagination_is_resumed_not_published() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_wall_page(&mock_server, 0, 1, wall_body(150, [1])).await;
    Mock::given(method("GET"))
        .and(path("/method/wall.get"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let err = run_archive(config.clone(), target(vec![]))
        .await
        .expect_err("Archive should fail");

    match err {
        ArchiveError::Pagination { offset, source } => {
            assert_eq!(offset, 1);
            assert!(matches!(
                *source,
                ArchiveError::Api(ApiError::Status { status: 500, .. })
            ));
        }
        other => panic!("expected pagination error, got {:?}", other),
    }

    // Nothing is published, so the next run downloads again
    assert!(!dir.path().join("tmp").exists());
    assert!(dir.path().join("tmp.partial/batch_0.txt").is_file());

    mock_server.reset().await;
    mount_wall_page(&mock_server, 0, 1, wall_body(150, [1])).await;
    mount_wall_page(&mock_server, 1, 100, wall_body(150, 2..=101)).await;
    mount_wall_page(&mock_server, 101, 100, wall_body(150, 102..=150)).await;

    let summary = run_archive(config, target(vec![]))
        .await
        .expect("Archive failed");
    assert_eq!(summary.batches_fetched, 3);
    assert_eq!(summary.posts_written, 150);
    assert!(dir.path().join("tmp/batch_101.txt").is_file());
    assert!(!dir.path().join("tmp.partial").exists());
}

#[tokio::test]
async fn test_remote_error_aborts_pagination() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_wall_page(
        &mock_server,
        0,
        1,
        r#"{"error":{"error_code":15,"error_msg":"Access denied: wall is disabled"}}"#.to_string(),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let err = run_archive(config, target(vec![]))
        .await
        .expect_err("Archive should fail");

    match err {
        ArchiveError::Pagination { offset, source } => {
            assert_eq!(offset, 0);
            assert!(matches!(
                *source,
                ArchiveError::Api(ApiError::Remote { code: 15, .. })
            ));
        }
        other => panic!("expected pagination error, got {:?}", other),
    }
    assert!(!dir.path().join("tmp").exists());
}
