//! API integration tests
//!
//! Run against a live server and its database:
//! `cargo test --test api_tests -- --ignored`

use chrono::{Duration, Local};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::{postgres::PgPoolOptions, PgPool};

use visitrack_server::{
    config::AppConfig,
    models::{enums::Role, user::UserClaims},
};

const BASE_URL: &str = "http://localhost:8080/api/v1";

struct Fixture {
    client: Client,
    config: AppConfig,
    pool: PgPool,
    employee_id: i32,
    nurse_id: i32,
    purpose_id: i32,
}

impl Fixture {
    async fn new() -> Self {
        let config = AppConfig::load().expect("Failed to load configuration");
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&config.database.url)
            .await
            .expect("Failed to connect to database");

        let tag = uuid::Uuid::new_v4().simple().to_string();
        let employee_id = insert_person(&pool, "employees", &tag).await;
        let nurse_id = insert_person(&pool, "nurses", &tag).await;
        let purpose_id: i32 = sqlx::query_scalar("SELECT id FROM visit_purposes ORDER BY id LIMIT 1")
            .fetch_one(&pool)
            .await
            .expect("No visit purpose seeded");

        Self {
            client: Client::new(),
            config,
            pool,
            employee_id,
            nurse_id,
            purpose_id,
        }
    }

    fn token(&self, role: Role, user_id: i32) -> String {
        UserClaims::new(user_id, role, "integration", self.config.auth.jwt_expiration_hours)
            .create_token(&self.config.auth.jwt_secret)
            .expect("Failed to sign token")
    }

    async fn create_slot(&self, date: &str, start: &str, end: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/timeslots", BASE_URL))
            .bearer_auth(self.token(Role::Hr, 1))
            .json(&json!({
                "employeeId": self.employee_id,
                "date": date,
                "startTime": start,
                "endTime": end
            }))
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn book(&self, slot_id: i64) -> Value {
        let response = self
            .client
            .post(format!("{}/visits", BASE_URL))
            .json(&json!({
                "firstName": "A",
                "lastName": "B",
                "email": format!("{}@example.com", uuid::Uuid::new_v4().simple()),
                "visitedEmployeeId": self.employee_id,
                "visitPurposeId": self.purpose_id,
                "selectedTimeSlot": slot_id
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    async fn available_slot_ids(&self) -> Vec<i64> {
        let body: Value = self
            .client
            .get(format!("{}/employees/{}/available-timeslots", BASE_URL, self.employee_id))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");
        body.as_array()
            .expect("Expected an array")
            .iter()
            .filter_map(|slot| slot["id"].as_i64())
            .collect()
    }

    async fn set_approval(&self, visit_id: i64, status: &str) -> reqwest::Response {
        self.client
            .put(format!("{}/visits/{}/approval", BASE_URL, visit_id))
            .bearer_auth(self.token(Role::Security, 1))
            .json(&json!({ "statusName": status }))
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn set_check_in(&self, visit_id: i64, status: &str) -> reqwest::Response {
        self.client
            .put(format!("{}/visits/{}/check-in", BASE_URL, visit_id))
            .bearer_auth(self.token(Role::Security, 1))
            .json(&json!({ "status": status }))
            .send()
            .await
            .expect("Failed to send request")
    }
}

async fn insert_person(pool: &PgPool, table: &str, tag: &str) -> i32 {
    let sql = format!(
        "INSERT INTO {} (first_name, last_name, email) VALUES ('Test', $1, $2) RETURNING id",
        table
    );
    sqlx::query_scalar(&sql)
        .bind(tag)
        .bind(format!("{}.{}@example.com", table, tag))
        .fetch_one(pool)
        .await
        .expect("Failed to insert fixture")
}

fn tomorrow() -> String {
    (Local::now().date_naive() + Duration::days(1)).to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_booking_blocks_and_releases_slot() {
    let fx = Fixture::new().await;

    let slot: Value = fx
        .create_slot(&tomorrow(), "08:00", "10:00")
        .await
        .json()
        .await
        .expect("Failed to parse response");
    let slot_id = slot["id"].as_i64().expect("No slot id");
    assert!(fx.available_slot_ids().await.contains(&slot_id));

    let created = fx.book(slot_id).await;
    assert_eq!(created["visit"]["approvalStatus"], "Waiting For Approval");
    assert_eq!(created["visit"]["expectedTime"], "8:00 AM - 10:00 AM");
    let visit_id = created["visitId"].as_i64().expect("No visit id");
    assert!(!fx.available_slot_ids().await.contains(&slot_id));

    let response = fx.set_approval(visit_id, "Blocked").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["visit"]["timeSlotId"].is_null());
    assert!(fx.available_slot_ids().await.contains(&slot_id));

    // Blocked is terminal
    let response = fx.set_approval(visit_id, "Approved").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_slot_is_a_conflict() {
    let fx = Fixture::new().await;
    let date = tomorrow();

    assert_eq!(fx.create_slot(&date, "13:00", "14:00").await.status(), StatusCode::CREATED);
    assert_eq!(fx.create_slot(&date, "1:00 PM", "2:00 PM").await.status(), StatusCode::CONFLICT);
    assert_eq!(fx.create_slot(&date, "14:00", "15:00").await.status(), StatusCode::CREATED);
}

#[tokio::test]
#[ignore]
async fn test_double_booking_is_rejected() {
    let fx = Fixture::new().await;
    let slot: Value = fx
        .create_slot(&tomorrow(), "09:00", "09:30")
        .await
        .json()
        .await
        .expect("Failed to parse response");
    let slot_id = slot["id"].as_i64().expect("No slot id");
    fx.book(slot_id).await;

    let response = fx
        .client
        .post(format!("{}/visits", BASE_URL))
        .json(&json!({
            "firstName": "C",
            "lastName": "D",
            "email": "c@d.com",
            "visitedEmployeeId": fx.employee_id,
            "visitPurposeId": fx.purpose_id,
            "selectedTimeSlot": slot_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_check_in_only_moves_forward() {
    let fx = Fixture::new().await;
    let today = Local::now().date_naive().to_string();
    let slot: Value = fx
        .create_slot(&today, "00:00", "23:59")
        .await
        .json()
        .await
        .expect("Failed to parse response");
    let visit_id = fx.book(slot["id"].as_i64().expect("No slot id")).await["visitId"]
        .as_i64()
        .expect("No visit id");

    // Not yet approved
    assert_eq!(fx.set_check_in(visit_id, "checked in").await.status(), StatusCode::CONFLICT);

    assert_eq!(fx.set_approval(visit_id, "Approved").await.status(), StatusCode::OK);
    assert_eq!(fx.set_check_in(visit_id, "checked in").await.status(), StatusCode::OK);
    assert_eq!(fx.set_check_in(visit_id, "ongoing").await.status(), StatusCode::OK);

    let response = fx.set_check_in(visit_id, "checked out").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["visit"]["checkInStatus"], "Checked Out");
    assert!(body["visit"]["timeOut"].is_string());
    assert!(body["visit"]["timeSlotId"].is_null());

    assert_eq!(fx.set_check_in(visit_id, "checked in").await.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_high_care_flow() {
    let fx = Fixture::new().await;
    let slot: Value = fx
        .create_slot(&tomorrow(), "10:00", "11:00")
        .await
        .json()
        .await
        .expect("Failed to parse response");
    let visit_id = fx.book(slot["id"].as_i64().expect("No slot id")).await["visitId"]
        .as_i64()
        .expect("No visit id");
    assert_eq!(fx.set_approval(visit_id, "Partial Approved").await.status(), StatusCode::OK);

    let nurse = fx.token(Role::Nurse, fx.nurse_id);

    // No clearance yet
    let declaration = json!({
        "symptoms": [{ "question": "Fever in the last 14 days?", "answer": false }],
        "prohibitedItems": [{ "question": "Carrying jewelry?", "answer": false }]
    });
    let response = fx
        .client
        .post(format!("{}/health/{}/submit", BASE_URL, visit_id))
        .bearer_auth(&nurse)
        .json(&declaration)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = fx
        .client
        .post(format!("{}/highcare/{}/request", BASE_URL, visit_id))
        .bearer_auth(&nurse)
        .json(&json!({
            "areas": ["DC", " dc "],
            "equipment": ["Gloves"],
            "permissionType": "CLEAR WITH RECTAL",
            "comments": "",
            "nurseId": fx.nurse_id + 1
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["request"]["approved"], true);
    assert_eq!(body["request"]["areas"], json!(["DC"]));
    assert_eq!(body["request"]["nurseId"].as_i64(), Some(fx.nurse_id as i64));

    for expected in [StatusCode::OK, StatusCode::CONFLICT] {
        let response = fx
            .client
            .post(format!("{}/health/{}/submit", BASE_URL, visit_id))
            .bearer_auth(&nurse)
            .json(&declaration)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), expected);
    }

    for table in ["high_care_symptom_declarations", "high_care_prohibited_items"] {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} d JOIN high_care_requests r ON r.id = d.request_id WHERE r.visit_id = $1",
            table
        ))
        .bind(visit_id as i32)
        .fetch_one(&fx.pool)
        .await
        .expect("Failed to count declaration rows");
        assert_eq!(count, 1, "{} should hold exactly one row", table);
    }

    let response = fx
        .client
        .put(format!("{}/nurse/{}/approval", BASE_URL, visit_id))
        .bearer_auth(&nurse)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["visit"]["approvalStatus"], "Nurse Approved");

    let response = fx
        .client
        .get(format!(
            "{}/nurse/high-care-visits?date={}&employeeId={}",
            BASE_URL,
            tomorrow(),
            fx.employee_id
        ))
        .bearer_auth(&nurse)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let listed = body
        .as_array()
        .expect("Expected an array")
        .iter()
        .find(|v| v["visitId"].as_i64() == Some(visit_id))
        .expect("Visit missing from the worklist");
    assert_eq!(listed["hasDeclaration"], true);
}

#[tokio::test]
#[ignore]
async fn test_create_visit_missing_slot() {
    let client = Client::new();
    let response = client
        .post(format!("{}/visits", BASE_URL))
        .json(&json!({
            "firstName": "A",
            "lastName": "B",
            "email": "a@b.com",
            "visitedEmployeeId": 1,
            "visitPurposeId": 1
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
