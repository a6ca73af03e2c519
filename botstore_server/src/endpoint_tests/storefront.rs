use actix_web::{http::StatusCode, test::TestRequest, web};
use botstore_engine::{order_objects::NewOrderRequest, DocumentStore, FallbackPolicy};

use super::{
    helpers::{init_app, send, test_api},
    mocks::{idle_panel, working_gateway},
};
use crate::{config::ServerConfig, server::build_api};

#[actix_web::test]
async fn package_catalog() {
    let api = web::Data::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api);
    let (status, body) = send(&app, TestRequest::get().uri("/packages")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let packages = body["packages"].as_array().unwrap();
    let ids = packages.iter().map(|p| p["id"].as_str().unwrap()).collect::<Vec<_>>();
    assert_eq!(ids, ["basic", "standard", "premium", "enterprise"]);
    assert_eq!(packages[1]["price"], 750);
    assert_eq!(packages[1]["ram"], "2GB");
    assert_eq!(packages[1]["cpu"], "100%");
    assert_eq!(packages[1]["memory_mb"], 2048);
}

#[actix_web::test]
async fn health_reports_volatile_storage() {
    let api = web::Data::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api);
    api.create_order(NewOrderRequest::new("basic", "alice")).await.unwrap();
    let (status, body) = send(&app, TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
    assert_eq!(body["storage"]["medium"], "volatile");
    assert_eq!(body["storage"]["orders_count"], 1);
    assert_eq!(body["storage"]["users_count"], 0);
}

#[actix_web::test]
async fn health_reports_json_storage() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = DocumentStore::open(dir.path()).await?;
    let api = web::Data::new(build_api(store, working_gateway(), idle_panel(), &ServerConfig::default()));
    let app = init_app!(api);
    let (status, body) = send(&app, TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage"]["medium"], "json_files");
    assert_eq!(body["storage"]["orders_count"], 0);
    assert!(dir.path().join("orders.json").exists());
    Ok(())
}
