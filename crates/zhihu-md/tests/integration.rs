//! Integration tests for zhihu-md using wiremock

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zhihu_md::{Answer, Article, Config, ZhihuClient, EQUATION_URL_PREFIX};

fn article_body(content: &str) -> serde_json::Value {
    json!({
        "id": 19550517,
        "title": "On Writing",
        "created": 1514764800,
        "updated": 1546300800,
        "content": content,
    })
}

async fn mount_article(server: &MockServer, content: &str) {
    Mock::given(method("GET"))
        .and(path("/articles/19550517"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_body(content)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_article() {
    let server = MockServer::start().await;
    mount_article(&server, "<h2>Intro</h2><p>Hello <strong>world</strong></p>").await;

    let config = Config::default();
    let client = ZhihuClient::with_api_base(&config, server.uri()).unwrap();
    let article = Article::fetch(&client, &config, 19550517).await.unwrap();

    assert_eq!(article.id, 19550517);
    assert_eq!(article.title, "On Writing");
    assert_eq!(article.created, 1514764800);
    assert_eq!(article.updated, 1546300800);
    assert!(article.markdown.contains("## Intro"));
    assert!(article.markdown.contains("**world**"));
    assert_eq!(article.json["title"], "On Writing");
    assert!(article.text.contains("On Writing"));
}

#[tokio::test]
async fn test_configured_user_agent_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles/19550517"))
        .and(header("user-agent", "CustomBot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_body("<p>ok</p>")))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config::builder().user_agent("CustomBot/1.0").build();
    let client = ZhihuClient::with_api_base(&config, server.uri()).unwrap();
    Article::fetch(&client, &config, 19550517).await.unwrap();
}

#[tokio::test]
async fn test_latex_unwrapped_in_article() {
    let server = MockServer::start().await;
    let content = format!(
        r#"<p>Euler: <img src="{}e%5E%7Bi%5Cpi%7D%2B1%3D0" alt="e^{{i\pi}}+1=0" eeimg="1"/></p>"#,
        EQUATION_URL_PREFIX
    );
    mount_article(&server, &content).await;

    let config = Config::default();
    let client = ZhihuClient::with_api_base(&config, server.uri()).unwrap();
    let article = Article::fetch(&client, &config, 19550517).await.unwrap();

    assert!(article.content.contains(r#"$e^{i\pi}+1=0$"#));
    assert!(!article.content.contains("<img"));
    assert!(article.markdown.contains(r#"$e^{i\pi}+1=0$"#));
}

#[tokio::test]
async fn test_non_200_aborts_assembly() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles/19550517"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let config = Config::default();
    let client = ZhihuClient::with_api_base(&config, server.uri()).unwrap();
    let err = Article::fetch(&client, &config, 19550517).await.unwrap_err();

    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_fetch_answer_with_include() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/answers/42"))
        .and(query_param("include", "content"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 42, "content": "<p>An answer</p>"})),
        )
        .mount(&server)
        .await;

    let config = Config::default();
    let client = ZhihuClient::with_api_base(&config, server.uri()).unwrap();
    let answer = Answer::fetch(&client, &config, 42, &["content"]).await.unwrap();

    assert_eq!(answer.id, 42);
    assert_eq!(answer.content.as_deref(), Some("<p>An answer</p>"));
    assert_eq!(answer.markdown.as_deref(), Some("An answer"));
}

#[tokio::test]
async fn test_fetch_answer_without_content() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/answers/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
        .mount(&server)
        .await;

    let config = Config::default();
    let client = ZhihuClient::with_api_base(&config, server.uri()).unwrap();
    let answer = Answer::fetch(&client, &config, 42, &[]).await.unwrap();

    assert_eq!(answer.id, 42);
    assert!(answer.content.is_none());
    assert!(answer.markdown.is_none());
}

#[tokio::test]
async fn test_image_downloaded_to_asset_dir() {
    let server = MockServer::start().await;
    let assets = tempfile::tempdir().unwrap();

    let png = vec![0x89, 0x50, 0x4E, 0x47];
    Mock::given(method("GET"))
        .and(path("/img/pic.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(png.clone())
                .insert_header("content-type", "image/png"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let content = format!(
        r#"<p>Look: <img src="{}/img/pic.png" alt="a cat" width="640"/></p>"#,
        server.uri()
    );
    mount_article(&server, &content).await;

    let config = Config::builder()
        .download_image(true)
        .asset_path(assets.path())
        .build();
    let client = ZhihuClient::with_api_base(&config, server.uri()).unwrap();
    let article = Article::fetch(&client, &config, 19550517).await.unwrap();

    let local = assets.path().join("pic.png");
    assert_eq!(std::fs::read(&local).unwrap(), png);
    assert!(article
        .content
        .contains(&format!("<img src=\"{}\">", local.display())));
    // Original attributes are dropped
    assert!(!article.content.contains("width"));
    // Markdown points at the local copy
    assert!(article.markdown.contains(&format!("![]({})", local.display())));
}

#[tokio::test]
async fn test_existing_image_not_refetched() {
    let server = MockServer::start().await;
    let assets = tempfile::tempdir().unwrap();

    let local = assets.path().join("pic.png");
    std::fs::write(&local, b"already here").unwrap();

    // Any hit on the image endpoint is a failure
    Mock::given(method("GET"))
        .and(path("/img/pic.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fresh".to_vec()))
        .expect(0)
        .mount(&server)
        .await;

    let content = format!(r#"<img src="{}/img/pic.png"/>"#, server.uri());
    mount_article(&server, &content).await;

    let config = Config::builder()
        .download_image(true)
        .asset_path(assets.path())
        .build();
    let client = ZhihuClient::with_api_base(&config, server.uri()).unwrap();
    let article = Article::fetch(&client, &config, 19550517).await.unwrap();

    // File content untouched, tag rewritten to the local path
    assert_eq!(std::fs::read(&local).unwrap(), b"already here");
    assert!(article
        .content
        .contains(&format!("<img src=\"{}\">", local.display())));
}

#[tokio::test]
async fn test_images_untouched_when_download_disabled() {
    let server = MockServer::start().await;
    let content = r#"<p><img src="https://example.com/img/pic.png" alt="x"/></p>"#;
    mount_article(&server, content).await;

    let config = Config::default();
    let client = ZhihuClient::with_api_base(&config, server.uri()).unwrap();
    let article = Article::fetch(&client, &config, 19550517).await.unwrap();

    assert_eq!(article.content, content);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let server = MockServer::start().await;
    let assets = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/img/pic.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bits".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let content = format!(r#"<img src="{}/img/pic.png"/>"#, server.uri());
    mount_article(&server, &content).await;

    let config = Config::builder()
        .download_image(true)
        .asset_path(assets.path())
        .build();
    let client = ZhihuClient::with_api_base(&config, server.uri()).unwrap();

    let first = Article::fetch(&client, &config, 19550517).await.unwrap();
    let second = Article::fetch(&client, &config, 19550517).await.unwrap();

    assert_eq!(first.content, second.content);
    assert_eq!(std::fs::read_dir(assets.path()).unwrap().count(), 1);
    assert_eq!(
        std::fs::read(assets.path().join("pic.png")).unwrap(),
        b"bits"
    );
}

#[tokio::test]
async fn test_missing_field_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles/19550517"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 19550517})))
        .mount(&server)
        .await;

    let config = Config::default();
    let client = ZhihuClient::with_api_base(&config, server.uri()).unwrap();
    let err = Article::fetch(&client, &config, 19550517).await.unwrap_err();

    assert!(err.to_string().contains("content"));
}
