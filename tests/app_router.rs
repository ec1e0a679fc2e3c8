mod support;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt as _;
use obs_populate::app::{AJAX_PATH, AppState, router};
use obs_populate::config::Config;
use obs_populate::pipeline::Pipeline;
use tower::ServiceExt as _;

use support::{FixtureDataset, RecordingVcs};

fn app(pages: &std::path::Path) -> axum::Router {
    let config = Config {
        pages_dir: pages.to_path_buf(),
        regen_script: None,
        ..Config::default()
    };
    let pipeline = Pipeline::new(
        config,
        FixtureDataset::new(),
        Arc::new(RecordingVcs::default()),
    );
    router(AppState { pipeline })
}

fn form_post(host: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(AJAX_PATH)
        .header(header::HOST, host)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn create_obs_now_on_dev_host_echoes_git_output() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let pages = support::pages_fixture(temp.path())?;

    let response = app(&pages)
        .oneshot(form_post(
            "localhost:8080",
            "call=create_obs_now&sourceLang=en&destinationLang=Fran%C3%A7ais+%28fr%29",
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );

    let body = body_text(response).await;
    assert!(body.contains("Git Response: ok: commit -am Initial import of OBS"));
    assert!(body.contains("color: #005500;"));
    assert!(pages.join("fr/obs/01.txt").is_file());
    Ok(())
}

#[tokio::test]
async fn production_host_hides_git_output() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let pages = support::pages_fixture(temp.path())?;

    let response = app(&pages)
        .oneshot(form_post(
            "door43.org",
            "call=create_obs_now&sourceLang=en&destinationLang=fr",
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(!body.contains("Git Response"));
    assert!(body.contains("created for fr"));
    Ok(())
}

#[tokio::test]
async fn gate_failure_is_still_200() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let pages = support::pages_fixture(temp.path())?;

    let request = Request::builder()
        .uri(format!(
            "{AJAX_PATH}?call=create_obs_now&sourceLang=en&destinationLang=de"
        ))
        .body(Body::empty())?;
    let response = app(&pages).oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("color: #990000;"));
    Ok(())
}

#[tokio::test]
async fn unknown_call_and_missing_fields_are_bad_requests() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let pages = support::pages_fixture(temp.path())?;
    let app = app(&pages);

    let response = app
        .clone()
        .oneshot(form_post("localhost", "call=something_else"))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "unknown call: something_else");

    let response = app
        .oneshot(form_post("localhost", "call=create_obs_now&sourceLang=en"))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "missing parameter: destinationLang");
    Ok(())
}

#[tokio::test]
async fn healthz() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let response = app(temp.path())
        .oneshot(Request::builder().uri("/healthz").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok\n");
    Ok(())
}
