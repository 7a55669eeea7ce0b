//! HTTP 端到端测试
//!
//! 通过 tower::ServiceExt::oneshot 直接调用完整路由 (含认证中间件)。

use axum::body::Body;
use booking_server::auth::permissions::get_default_permissions;
use booking_server::auth::{JwtConfig, JwtService};
use booking_server::core::build_router;
use booking_server::inventory::FloorPlan;
use booking_server::utils::FixedClock;
use booking_server::{Config, ServerState};
use chrono::NaiveDate;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::Zone;
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "http-test-secret-0123456789abcdef";

struct TestApp {
    router: axum::Router,
    jwt: JwtService,
    _dir: tempfile::TempDir,
}

impl TestApp {
    fn new() -> Self {
        Self::build(None)
    }

    /// Start with `plan` written to `{work_dir}/floor_plan.json`
    fn with_floor_plan(plan: FloorPlan) -> Self {
        Self::build(Some(plan))
    }

    fn build(plan: Option<FloorPlan>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        if let Some(plan) = plan {
            let raw = serde_json::to_string(&plan).unwrap();
            std::fs::write(dir.path().join("floor_plan.json"), raw).unwrap();
        }
        let config = Config::with_overrides(dir.path().to_string_lossy(), 0, JwtConfig::new(SECRET));
        let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
        let state = ServerState::initialize_with_clock(&config, clock).unwrap();
        Self {
            router: build_router(state),
            jwt: JwtService::with_config(JwtConfig::new(SECRET)),
            _dir: dir,
        }
    }

    fn token(&self, user_id: i64, role: &str) -> String {
        self.jwt
            .generate_token(user_id, "staff", role, &get_default_permissions(role))
            .unwrap()
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

fn ana() -> Value {
    json!({
        "customer_name": "Ana",
        "phone": "+34 600 000 000",
        "party_count": 2,
        "zone": "Terraza",
        "table_id": 1,
        "date": "2025-03-10",
        "time": "19:00"
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["tables"], 6);
    assert_eq!(body["zones"], 2);
}

#[tokio::test]
async fn test_detailed_health_reports_ledger() {
    let app = TestApp::new();
    let (status, _) = app.call(Method::POST, "/api/reservations", None, Some(ana())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.call(Method::GET, "/health/detailed", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["business_date"], "2025-03-01");
    assert_eq!(body["timezone"], "Europe/Madrid");
    assert_eq!(body["ledger"]["status"], "ok");
    assert_eq!(body["ledger"]["reservations"], 1);
    assert_eq!(body["ledger"]["active_slots"], 1);
    assert_eq!(body["ledger"]["last_id"], 1);
}

#[tokio::test]
async fn test_catalog_reads() {
    let app = TestApp::new();

    let (status, zones) = app.call(Method::GET, "/api/zones", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(zones.as_array().unwrap().len(), 2);

    let (_, tables) = app.call(Method::GET, "/api/tables?zone=Terraza", None, None).await;
    let ids: Vec<i64> = tables
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let (status, table) = app.call(Method::GET, "/api/tables/1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table["capacity"], 4);

    let (status, _) = app.call(Method::GET, "/api/tables/99", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_availability_queries() {
    let app = TestApp::new();

    let (status, body) = app
        .call(Method::GET, "/api/availability/slots?date=2025-03-10", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slots"][0], "13:00");
    assert_eq!(body["slots"].as_array().unwrap().len(), 14);

    let (_, body) = app
        .call(Method::GET, "/api/availability/slots?date=2025-02-01", None, None)
        .await;
    assert!(body["slots"].as_array().unwrap().is_empty());

    let (status, body) = app
        .call(
            Method::GET,
            "/api/availability/tables?date=2025-03-10&time=19:00&zone=Terraza&party_count=3",
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["table_ids"], json!([1, 3]));

    // Outside operating hours and beyond the booking horizon
    let (status, body) = app
        .call(
            Method::GET,
            "/api/availability/tables?date=2025-03-10&time=03:00&zone=Terraza",
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["table_ids"], json!([]));

    let (_, body) = app
        .call(Method::GET, "/api/availability/slots?date=2025-12-31", None, None)
        .await;
    assert!(body["slots"].as_array().unwrap().is_empty());

    let (status, body) = app
        .call(Method::GET, "/api/availability/slots?date=10-03-2025", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, _) = app
        .call(
            Method::GET,
            "/api/availability/tables?date=2025-03-10&time=19:00&zone=Jardin",
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_zone_without_tables_is_empty_not_missing() {
    let mut plan = FloorPlan::default();
    plan.zones.push(Zone {
        name: "Barra".to_string(),
        description: None,
    });
    let app = TestApp::with_floor_plan(plan);

    let (status, body) = app
        .call(
            Method::GET,
            "/api/availability/tables?date=2025-03-10&time=19:00&zone=Barra",
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["table_ids"], json!([]));

    let (status, body) = app
        .call(Method::GET, "/api/availability/slots?date=2025-03-10&zone=Barra", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slots"], json!([]));

    // An undeclared zone is a lookup failure
    let (status, body) = app
        .call(
            Method::GET,
            "/api/availability/tables?date=2025-03-10&time=19:00&zone=Jardin",
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!(shared::error::ErrorCode::ZoneNotFound as u16));
}

#[tokio::test]
async fn test_terraza_scenario() {
    let app = TestApp::new();
    let host = app.token(2, "host");

    // 1. Customer books table 1
    let (status, created) = app.call(Method::POST, "/api/reservations", None, Some(ana())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["time"], "19:00");
    let id = created["id"].as_i64().unwrap();

    // 2. Same slot again
    let (status, body) = app.call(Method::POST, "/api/reservations", None, Some(ana())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"]["reason"], "slot_taken");

    let (_, body) = app
        .call(
            Method::GET,
            "/api/availability/tables?date=2025-03-10&time=19:00&zone=Terraza",
            None,
            None,
        )
        .await;
    assert_eq!(body["table_ids"], json!([2, 3]));

    // 3. Host confirms
    let uri = format!("/api/reservations/{id}/status");
    let (status, confirmed) = app
        .call(Method::PUT, &uri, Some(host.as_str()), Some(json!({"status": "confirmed"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "confirmed");
    assert_eq!(confirmed["confirmed_by"], 2);

    // Confirming twice is not a legal transition
    let (status, body) = app
        .call(Method::PUT, &uri, Some(host.as_str()), Some(json!({"status": "confirmed"})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"]["reason"], "invalid_transition");

    // 4. Host cancels, table 1 is free again
    let (status, cancelled) = app
        .call(Method::PUT, &uri, Some(host.as_str()), Some(json!({"status": "cancelled"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (_, body) = app
        .call(
            Method::GET,
            "/api/availability/tables?date=2025-03-10&time=19:00&zone=Terraza",
            None,
            None,
        )
        .await;
    assert_eq!(body["table_ids"], json!([1, 2, 3]));
}

#[tokio::test]
async fn test_validation_rejections() {
    let app = TestApp::new();

    let mut too_big = ana();
    too_big["party_count"] = json!(5);
    let (status, body) = app.call(Method::POST, "/api/reservations", None, Some(too_big)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["reason"], "capacity_exceeded");

    let mut wrong_zone = ana();
    wrong_zone["zone"] = json!("Salón");
    let (_, body) = app.call(Method::POST, "/api/reservations", None, Some(wrong_zone)).await;
    assert_eq!(body["details"]["reason"], "zone_mismatch");

    let mut closed = ana();
    closed["time"] = json!("17:00");
    let (_, body) = app.call(Method::POST, "/api/reservations", None, Some(closed)).await;
    assert_eq!(body["details"]["reason"], "outside_operating_hours");

    let mut unknown = ana();
    unknown["table_id"] = json!(99);
    let (status, body) = app.call(Method::POST, "/api/reservations", None, Some(unknown)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"]["reason"], "table_not_found");
}

#[tokio::test]
async fn test_staff_routes_require_auth() {
    let app = TestApp::new();
    let (_, created) = app.call(Method::POST, "/api/reservations", None, Some(ana())).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = app.call(Method::GET, "/api/reservations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(Method::GET, "/api/reservations", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Read-only staff can list but not manage
    let staff = app.token(5, "staff");
    let (status, list) = app
        .call(Method::GET, "/api/reservations?date=2025-03-10", Some(staff.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/api/reservations/{id}/status"),
            Some(staff.as_str()),
            Some(json!({"status": "confirmed"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_and_delete() {
    let app = TestApp::new();
    let admin = app.token(1, "admin");
    let (_, created) = app.call(Method::POST, "/api/reservations", None, Some(ana())).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/reservations/{id}");

    let (status, fetched) = app.call(Method::GET, &uri, Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["customer_name"], "Ana");

    let (status, _) = app.call(Method::DELETE, &uri, Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.call(Method::GET, &uri, Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"]["reason"], "reservation_not_found");

    let (status, _) = app.call(Method::DELETE, &uri, Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call(Method::GET, "/api/reservations?status=archived", Some(admin.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
