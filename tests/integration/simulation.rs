//! End-to-end runs through the loaded context, the page view and the
//! dashboard router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use aerial_demo::config::{DefaultsConfig, SliderConfig};
use aerial_demo::dashboard::{build_router, routes::DashboardState};
use aerial_demo::engine::{DemoView, FormInput};
use aerial_demo::fixture::load_context;
use aerial_demo::render::render_document;
use aerial_demo::types::{DemoError, TrafficType};

use crate::fixture_source::StaticSource;

fn form(profile: &str, traffic: &str, concurrency: &str) -> FormInput {
    FormInput {
        profile: profile.into(),
        traffic_type: traffic.into(),
        concurrency: concurrency.into(),
    }
}

#[tokio::test]
async fn test_load_then_initial_render() {
    let source = StaticSource::reference();
    let ctx = load_context(&source).await.unwrap();
    assert_eq!(source.fetch_count(), 1);

    let mut view = DemoView::new(&DefaultsConfig::default(), SliderConfig::default());
    view.initialize(&ctx).unwrap();

    let html = render_document(&view, Some(&ctx)).to_html().unwrap();
    assert_eq!(html.matches("<li>").count(), 3);
    assert_eq!(html.matches("<tr><td>").count(), 8);
    assert!(html.contains(r#"<option value="edge" selected>edge (20 scenarios)</option>"#));
    assert!(html.contains(r#"<option value="voice" selected>"#));
}

#[tokio::test]
async fn test_reference_scenario_through_view() {
    let ctx = load_context(&StaticSource::reference()).await.unwrap();
    let mut view = DemoView::new(&DefaultsConfig::default(), SliderConfig::default());

    let result = view.submit(&ctx, form("edge", "voice", "100")).unwrap();

    assert_eq!(result.sessions.len(), 8);
    assert_eq!(result.sessions[0].session_id, "EDGE-001");
    assert_eq!(result.sessions[0].prbs, 17);
    assert!((result.sessions[0].latency_ms - 2.834).abs() < 1e-3);
    assert!((result.metrics.throughput_gbps - 1.19).abs() < 1e-9);
}

#[tokio::test]
async fn test_every_profile_and_traffic_type() {
    let ctx = load_context(&StaticSource::reference()).await.unwrap();
    for profile in &ctx.data.perf_profiles {
        for t in TrafficType::ALL {
            let (_, r) = ctx
                .run_simulation(&form(&profile.name, t.key(), "250"), &SliderConfig::default())
                .unwrap();
            assert_eq!(r.sessions.len(), 8);
            assert!(r.sessions.iter().all(|s| s.slice == t.tuning().slice));
            assert!(r.sessions.iter().all(|s| s.prbs >= 8));
            assert!(r.metrics.gpu_load >= 8.0 && r.metrics.gpu_load <= 100.0);
        }
    }
}

#[tokio::test]
async fn test_fetch_failure_leaves_preload_page() {
    let source = StaticSource::reference();
    source.set_error(DemoError::Fetch {
        source_desc: "static://reference".into(),
        message: "503 Service Unavailable".into(),
    });

    let loaded = load_context(&source).await;
    assert!(loaded.is_err());

    let state = Arc::new(DashboardState::from_load(
        loaded,
        &DefaultsConfig::default(),
        SliderConfig::default(),
    ));
    let resp = build_router(state)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), 200_000).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains(r#"<ul id="overview-list"></ul>"#));
    assert!(html.contains(r#"<select id="profile-select" name="profile"></select>"#));
    assert!(html.contains("503 Service Unavailable"));
}

#[tokio::test]
async fn test_slider_then_submit_via_router() {
    let ctx = load_context(&StaticSource::reference()).await.unwrap();
    let state = Arc::new(DashboardState::from_load(
        Ok(ctx),
        &DefaultsConfig::default(),
        SliderConfig::default(),
    ));

    // Slider movement alone: label changes, tables do not.
    let before = state.view.read().await.rendered.clone();
    state.view.write().await.set_concurrency_input(480.0);
    {
        let view = state.view.read().await;
        assert_eq!(view.rendered, before);
        assert_eq!(view.concurrency_label, 480.0);
    }

    let resp = build_router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("profile=edge&traffic_type=voice&concurrency=480"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let view = state.view.read().await;
    assert_ne!(view.rendered, before);
    assert_eq!(view.runs, 2);
    let throughput = view.rendered.as_ref().unwrap().metrics.throughput_gbps;
    assert!((throughput - 480.0 * 17.0 * 0.0007).abs() < 1e-9);
}
