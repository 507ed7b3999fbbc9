use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use joycycles_tracker::{
    clock::FixedClock,
    models::{Notification, NotificationType},
    routes::{router, AppState},
    store::MemoryStore,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()
}

fn today() -> NaiveDate {
    now().date_naive()
}

fn app_with(store: Arc<MemoryStore>) -> Router {
    router(AppState::new(store, Arc::new(FixedClock(now()))))
}

fn app() -> Router {
    app_with(Arc::new(MemoryStore::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, text) = send(app, method, uri, body).await;
    (status, serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

async fn start_cycle(app: &Router, user: &str, start: NaiveDate) -> Value {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/cycle",
        Some(json!({ "user_id": user, "start_date": start })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn health_check_responds() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Backend up"));
}

#[tokio::test]
async fn phase_without_history_is_mid_cycle() {
    let (status, body) = send_json(&app(), Method::GET, "/cycle/phase?user_id=alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "phase": "follicular",
            "day_in_cycle": 14,
            "days_until_next_period": 14,
            "is_fertile_window": false
        })
    );
}

#[tokio::test]
async fn phase_follows_most_recent_cycle() {
    let app = app();
    start_cycle(&app, "alice", today() - Duration::days(40)).await;
    start_cycle(&app, "alice", today() - Duration::days(14)).await;

    let (_, body) = send_json(&app, Method::GET, "/cycle/phase?user_id=alice", None).await;
    assert_eq!(body["phase"], "ovulation");
    assert_eq!(body["day_in_cycle"], 15);
    assert_eq!(body["days_until_next_period"], 14);
    assert_eq!(body["is_fertile_window"], true);
}

#[tokio::test]
async fn phase_requires_user_id() {
    let (status, _) = send(&app(), Method::GET, "/cycle/phase", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn predictions_use_saved_cycle_length() {
    let app = app();
    let (status, _) = send_json(
        &app,
        Method::PUT,
        "/preferences",
        Some(json!({ "user_id": "alice", "average_cycle_length": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let start = today() - Duration::days(15);
    start_cycle(&app, "alice", start).await;

    let (status, body) =
        send_json(&app, Method::GET, "/cycle/predictions?user_id=alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["next_period_date"], json!(start + Duration::days(30)));
    assert_eq!(body["next_ovulation_date"], json!(start + Duration::days(16)));
    assert_eq!(body["fertile_window_start"], json!(start + Duration::days(11)));
    assert_eq!(body["fertile_window_end"], json!(start + Duration::days(17)));
}

#[tokio::test]
async fn calendar_export_is_served_as_ics() {
    let app = app();
    start_cycle(&app, "alice", NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()).await;

    let request = Request::builder()
        .uri("/cycle/calendar.ics?user_id=alice")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/calendar; charset=utf-8"
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let ics = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(ics.contains("UID:alice-period-20240629"));
    assert!(ics.contains("UID:alice-ovulation-20240615"));
    assert!(ics.contains("UID:alice-fertile-start-20240610"));
    assert!(ics.contains("DTEND;VALUE=DATE:20240616"));
    assert_eq!(ics.matches("DTSTAMP:20240615T093000Z").count(), 3);
}

#[tokio::test]
async fn far_future_start_still_predicts() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/cycle",
        Some(json!({ "user_id": "zed", "start_date": NaiveDate::MAX - Duration::days(11) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(&app, Method::GET, "/cycle/predictions?user_id=zed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["next_period_date"], json!(NaiveDate::MAX));

    let (status, ics) = send(&app, Method::GET, "/cycle/calendar.ics?user_id=zed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 3);

    let (status, _) = send(&app, Method::GET, "/cycle/phase?user_id=zed", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn cycle_entries_can_be_updated_listed_and_deleted() {
    let app = app();
    let created = start_cycle(&app, "alice", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["period_length"], Value::Null);

    let (status, updated) = send_json(
        &app,
        Method::PATCH,
        &format!("/cycle/{id}"),
        Some(json!({ "end_date": "2024-05-05", "notes": "heavy first day" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["end_date"], "2024-05-05");
    assert_eq!(updated["period_length"], 5);
    assert_eq!(updated["notes"], "heavy first day");

    start_cycle(&app, "alice", NaiveDate::from_ymd_opt(2024, 5, 29).unwrap()).await;
    let (_, listed) = send_json(&app, Method::GET, "/cycles?user_id=alice", None).await;
    let starts: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["start_date"].as_str().unwrap())
        .collect();
    assert_eq!(starts, vec!["2024-05-29", "2024-05-01"]);

    let (status, deleted) = send_json(&app, Method::DELETE, &format!("/cycle/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["id"], id.as_str());

    let (status, _) = send(&app, Method::DELETE, &format!("/cycle/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inverted_dates_are_rejected() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/cycle",
        Some(json!({ "user_id": "alice", "start_date": "2024-05-10", "end_date": "2024-05-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let created = start_cycle(&app, "alice", NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()).await;
    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/cycle/{}", created["id"].as_str().unwrap()),
        Some(json!({ "end_date": "2024-05-09" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn updating_unknown_cycle_is_not_found() {
    let (status, _) = send(
        &app(),
        Method::PATCH,
        &format!("/cycle/{}", Uuid::new_v4()),
        Some(json!({ "notes": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn preferences_default_until_saved() {
    let app = app();
    let (status, body) = send_json(&app, Method::GET, "/preferences?user_id=bob", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["average_cycle_length"], 28);
    assert_eq!(body["average_period_length"], 5);
    assert_eq!(body["reminder_days_before"], 2);
    assert_eq!(body["notification_enabled"], true);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/preferences",
        Some(json!({ "user_id": "bob", "average_cycle_length": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, saved) = send_json(
        &app,
        Method::PUT,
        "/preferences",
        Some(json!({ "user_id": "bob", "average_period_length": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["average_period_length"], 7);
    assert_eq!(saved["average_cycle_length"], 28);
}

#[tokio::test]
async fn daily_tracking_round_trips() {
    let app = app();
    let (status, created) = send_json(
        &app,
        Method::POST,
        "/tracking",
        Some(json!({
            "user_id": "alice",
            "date": "2024-06-14",
            "flow_intensity": "medium",
            "symptoms": ["cramps", "fatigue"],
            "mood": "okay"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["flow_intensity"], "medium");

    let (status, listed) = send_json(&app, Method::GET, "/tracking?user_id=alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["symptoms"], json!(["cramps", "fatigue"]));

    let (status, _) = send(
        &app,
        Method::POST,
        "/tracking",
        Some(json!({ "user_id": "alice", "date": "2024-06-14", "mood": "ecstatic" })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn upcoming_notifications_are_filtered_by_clock() {
    let store = Arc::new(MemoryStore::new());
    for (days, title) in [(-2, "missed"), (3, "period soon")] {
        store
            .insert_notification(Notification {
                id: Uuid::new_v4(),
                user_id: "alice".into(),
                notification_type: NotificationType::PeriodStart,
                title: title.into(),
                message: "Your period is expected soon".into(),
                scheduled_date: now() + Duration::days(days),
                is_sent: false,
                created_at: now(),
            })
            .await;
    }

    let app = app_with(store);
    let (status, body) =
        send_json(&app, Method::GET, "/notifications/upcoming?user_id=alice", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "period soon");
    assert_eq!(items[0]["notification_type"], "period_start");
}

#[tokio::test]
async fn cycle_stats_average_completed_cycles() {
    let app = app();
    for start in ["2024-03-01", "2024-03-29", "2024-04-28"] {
        send(
            &app,
            Method::POST,
            "/cycle",
            Some(json!({ "user_id": "alice", "start_date": start })),
        )
        .await;
    }

    let (status, body) = send_json(&app, Method::GET, "/cycle-stats?user_id=alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["average_cycle_length"], 29.0);
    assert_eq!(body["cycle_stats"].as_array().unwrap().len(), 3);
    assert_eq!(body["cycle_stats"][2]["cycle_length"], Value::Null);
}
