//! High-care requests and their declarations

use chrono::NaiveDate;
use sqlx::{types::Json, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::high_care::{
        DeclarationAnswer, HighCareRequest, HighCareVisit, NewHighCareRequest,
        ProhibitedItemsDeclaration, SymptomDeclaration,
    },
};

const DECLARATION_ALREADY_SUBMITTED: &str = "Health declaration already submitted for this visit";

#[derive(Clone)]
pub struct HighCareRepository {
    pool: Pool<Postgres>,
}

impl HighCareRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a clearance, approved on creation
    pub async fn create_request(&self, data: &NewHighCareRequest) -> AppResult<HighCareRequest> {
        let row = sqlx::query_as::<_, HighCareRequest>(
            r#"
            INSERT INTO high_care_requests (
                visit_id, nurse_id, approved, areas, equipment, permission_type, comments, approved_at
            )
            VALUES ($1, $2, TRUE, $3, $4, $5, $6, NOW())
            RETURNING *
            "#,
        )
        .bind(data.visit_id)
        .bind(data.nurse_id)
        .bind(&data.areas)
        .bind(&data.equipment)
        .bind(&data.permission_type)
        .bind(&data.comments)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// The authoritative (most recent) request for a visit
    pub async fn latest_request(&self, visit_id: i32) -> AppResult<Option<HighCareRequest>> {
        let row = sqlx::query_as::<_, HighCareRequest>(
            "SELECT * FROM high_care_requests WHERE visit_id = $1 ORDER BY id DESC LIMIT 1",
        )
        .bind(visit_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Whether either declaration exists for the request
    pub async fn has_declaration(&self, request_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM high_care_symptom_declarations WHERE request_id = $1)
                OR EXISTS(SELECT 1 FROM high_care_prohibited_items WHERE request_id = $1)
            "#,
        )
        .bind(request_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Store both declarations for a request in one transaction
    pub async fn insert_declarations(
        &self,
        request_id: i32,
        nurse_id: i32,
        symptoms: &[DeclarationAnswer],
        prohibited_items: &[DeclarationAnswer],
    ) -> AppResult<(SymptomDeclaration, ProhibitedItemsDeclaration)> {
        let mut tx = self.pool.begin().await?;

        let symptom_row = sqlx::query_as::<_, SymptomDeclaration>(
            r#"
            INSERT INTO high_care_symptom_declarations (request_id, nurse_id, answers)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(nurse_id)
        .bind(Json(symptoms.to_vec()))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DECLARATION_ALREADY_SUBMITTED))?;

        let items_row = sqlx::query_as::<_, ProhibitedItemsDeclaration>(
            r#"
            INSERT INTO high_care_prohibited_items (request_id, nurse_id, answers)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(nurse_id)
        .bind(Json(prohibited_items.to_vec()))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DECLARATION_ALREADY_SUBMITTED))?;

        tx.commit().await?;
        Ok((symptom_row, items_row))
    }

    /// Visits on `date` routed through the clinic (partially or nurse approved,
    /// or holding a clearance), joined with their latest request
    pub async fn list_visits(
        &self,
        date: NaiveDate,
        employee_id: Option<i32>,
    ) -> AppResult<Vec<HighCareVisit>> {
        let rows = sqlx::query_as::<_, HighCareVisit>(
            r#"
            SELECT v.id AS visit_id, v.visit_date, v.expected_time,
                   s.name AS approval_status, v.check_in_status,
                   vi.id AS visitor_id, vi.first_name || ' ' || vi.last_name AS visitor_name,
                   e.id AS employee_id, e.first_name || ' ' || e.last_name AS employee_name,
                   d.name AS department_name, p.name AS purpose_name,
                   hc.id AS request_id, hc.nurse_id, hc.approved, hc.areas, hc.equipment,
                   hc.permission_type, hc.approved_at,
                   COALESCE(EXISTS(
                       SELECT 1 FROM high_care_symptom_declarations sd WHERE sd.request_id = hc.id
                   ), FALSE) AS has_declaration
            FROM visits v
            JOIN approval_statuses s ON s.id = v.approval_status_id
            JOIN visitors vi ON vi.id = v.visitor_id
            JOIN employees e ON e.id = v.employee_id
            LEFT JOIN departments d ON d.id = e.department_id
            JOIN visit_purposes p ON p.id = v.purpose_id
            LEFT JOIN LATERAL (
                SELECT * FROM high_care_requests r
                WHERE r.visit_id = v.id
                ORDER BY r.id DESC
                LIMIT 1
            ) hc ON TRUE
            WHERE v.visit_date = $1
              AND ($2::int IS NULL OR v.employee_id = $2)
              AND (hc.id IS NOT NULL OR s.name IN ('Partial Approved', 'Nurse Approved'))
            ORDER BY v.visit_date, v.id DESC
            "#,
        )
        .bind(date)
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
