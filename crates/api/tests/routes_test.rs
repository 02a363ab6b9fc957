//! Router tests against the in-memory backend.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono_tz::Tz;
use http_body_util::BodyExt;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt;
use warehouse_api::{AppState, create_router};
use warehouse_db::MemoryBackend;

fn app() -> Router {
    create_router(AppState::new(Arc::new(MemoryBackend::new()), Tz::UTC))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_component(app: &Router, sku: &str, stock: i32, reorder: i32) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/components",
        Some(json!({
            "sku": sku,
            "name": format!("Part {sku}"),
            "current_stock": stock,
            "reorder_level": reorder,
            "unit_cost": "10.00",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "reachable");
}

#[tokio::test]
async fn test_create_fills_id_and_timestamps() {
    let app = app();
    let (status, company) = send(
        &app,
        Method::POST,
        "/api/v1/companies",
        Some(json!({"name": "TechCorp Inc.", "contact_person": "John Smith"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(company["id"].is_string());
    assert!(company["created_at"].is_string());
    assert!(company["updated_at"].is_string());

    let uri = format!("/api/v1/companies/{}", company["id"].as_str().unwrap());
    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "TechCorp Inc.");
}

#[tokio::test]
async fn test_stock_out_records_negative_movement() {
    let app = app();
    let motor = create_component(&app, "PWH-MOT-001", 45, 15).await;
    let id = motor["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        Method::POST,
        &format!("/api/v1/components/{id}/stock"),
        Some(json!({"quantity": 5, "movement_type": "out"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["current_stock"], 40);

    let (_, fetched) = send(&app, Method::GET, &format!("/api/v1/components/{id}"), None).await;
    assert_eq!(fetched["current_stock"], 40);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/stock-movements?component_id={id}&movement_type=out"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let movements = body["movements"].as_array().unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0]["quantity"], -5);
    assert_eq!(movements[0]["components"]["sku"], "PWH-MOT-001");
}

#[tokio::test]
async fn test_overdraw_is_rejected() {
    let app = app();
    let board = create_component(&app, "PWH-PCB-001", 5, 8).await;
    let id = board["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/components/{id}/stock"),
        Some(json!({"quantity": 6, "movement_type": "out"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATION");

    let (_, fetched) = send(&app, Method::GET, &format!("/api/v1/components/{id}"), None).await;
    assert_eq!(fetched["current_stock"], 5);
}

#[tokio::test]
async fn test_low_stock_is_ordered_by_stock() {
    let app = app();
    create_component(&app, "PWH-SEN-001", 8, 12).await;
    create_component(&app, "PWH-CAB-001", 156, 25).await;
    create_component(&app, "PWH-PCB-001", 5, 8).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/components/low-stock", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["components"].as_array().unwrap();
    let skus: Vec<&str> = items.iter().map(|c| c["sku"].as_str().unwrap()).collect();
    assert_eq!(skus, ["PWH-PCB-001", "PWH-SEN-001"]);
    assert_eq!(items[0]["shortfall"], 3);
    assert_eq!(items[1]["shortfall"], 4);
}

#[tokio::test]
async fn test_component_lookup_by_sku() {
    let app = app();
    create_component(&app, "PWH-CAB-001", 156, 25).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/components/sku/PWH-CAB-001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_stock"], 156);

    let (status, _) = send(&app, Method::GET, "/api/v1/components/sku/NOPE", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_sku_conflicts() {
    let app = app();
    create_component(&app, "PWH-MOT-001", 0, 0).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/components",
        Some(json!({"sku": "PWH-MOT-001", "name": "Another motor"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_return_status_update_touches_one_row() {
    let app = app();
    let mut ids = Vec::new();
    for (code, day) in [("RET-2025-001", "2025-08-04"), ("RET-2025-002", "2025-08-05")] {
        let (status, created) = send(
            &app,
            Method::POST,
            "/api/v1/returns",
            Some(json!({"return_id": code, "return_date": day, "total_items": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{created}");
        ids.push(created["id"].as_str().unwrap().to_string());
    }

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/returns/{}/status", ids[0]),
        Some(json!({"status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");

    let (_, body) = send(&app, Method::GET, "/api/v1/returns", None).await;
    let returns = body["returns"].as_array().unwrap();
    assert_eq!(returns.len(), 2);
    for row in returns {
        let expected = if row["id"] == ids[0].as_str() { "completed" } else { "pending" };
        assert_eq!(row["status"], expected);
    }

    let (_, body) = send(&app, Method::GET, "/api/v1/returns?status=completed", None).await;
    assert_eq!(body["returns"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_repair_lines() {
    let app = app();
    let board = create_component(&app, "PWH-PCB-001", 5, 8).await;
    let (status, repair) = send(
        &app,
        Method::POST,
        "/api/v1/repairs",
        Some(json!({
            "repair_id": "SRV-001",
            "issue_description": "Motor not starting",
            "priority": "high",
            "labor_cost": "150.00",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{repair}");
    let repair_id = repair["id"].as_str().unwrap();

    let (status, line) = send(
        &app,
        Method::POST,
        &format!("/api/v1/repairs/{repair_id}/components"),
        Some(json!({
            "component_id": board["id"],
            "quantity_needed": 2,
            "quantity_used": 2,
            "cost_per_unit": "89.99",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{line}");
    assert_eq!(decimal(&line["total_cost"]), dec!(179.98));

    let (status, fetched) = send(&app, Method::GET, &format!("/api/v1/repairs/{repair_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["repair_components"][0]["components"]["sku"], "PWH-PCB-001");

    let line_id = line["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/repair-components/{line_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/repairs/{repair_id}/components"),
        None,
    )
    .await;
    assert!(body["components"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_dashboard_metrics_on_empty_store() {
    let (status, body) = send(&app(), Method::GET, "/api/v1/dashboard/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["incoming_shipments"], 0);
    assert_eq!(body["outgoing_shipments"], 0);
    assert_eq!(decimal(&body["total_budget"]), Decimal::ZERO);
    assert_eq!(decimal(&body["budget_remaining"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_weekly_summary() {
    let app = app();
    for (category, budgeted, actual) in [
        ("Labor Costs", "25000", "18250.50"),
        ("Shipping & Logistics", "15000", "12100.25"),
    ] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/budget-entries",
            Some(json!({
                "week_start": "2025-08-03",
                "week_end": "2025-08-09",
                "category": category,
                "budgeted_amount": budgeted,
                "actual_amount": actual,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/analytics/budget/weekly-summary?week_start=2025-08-03",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["total_budgeted"]), dec!(40000));
    assert_eq!(decimal(&body["total_actual"]), dec!(30350.75));

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/analytics/budget/weekly-summary?week_start=2025-08-10",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[rstest]
#[case("overview")]
#[case("returns")]
#[case("repairs")]
#[case("shipments")]
#[case("inventory")]
#[case("budget")]
#[tokio::test]
async fn test_every_tab_loads(#[case] tab: &str) {
    let (status, body) = send(&app(), Method::GET, &format!("/api/v1/views/{tab}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tab"], tab);
    assert_eq!(body["view"]["state"], "loaded");
}

#[tokio::test]
async fn test_unknown_tab() {
    let (status, body) = send(&app(), Method::GET, "/api/v1/views/settings", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_missing_rows_are_not_found() {
    let app = app();
    let id = "0190f0a4-0000-7000-8000-000000000000";
    for uri in [
        format!("/api/v1/components/{id}"),
        format!("/api/v1/shipments/{id}"),
        format!("/api/v1/budget-entries/{id}"),
    ] {
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/components/{id}/stock"),
        Some(json!({"quantity": 1, "movement_type": "in"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
