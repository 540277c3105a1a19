//! Visits repository

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{ApprovalStatus, CheckInStatus, Role},
        visit::{NewVisit, Visit, VisitComment, VisitDetails},
    },
    workflow::{CheckInChange, Stamp},
};

const VISIT_SELECT: &str = r#"
    SELECT v.id, v.visitor_id, v.employee_id, v.purpose_id, v.visit_date, v.time_slot_id,
           v.expected_time, v.time_in, v.time_out, s.name AS approval_status,
           v.check_in_status, v.valid_id_type_id, v.comment_id, v.device_type,
           v.device_brand, v.crea_date, v.modif_date
    FROM visits v
    JOIN approval_statuses s ON s.id = v.approval_status_id
"#;

const DETAILS_SELECT: &str = r#"
    SELECT v.id, v.visit_date, v.expected_time, v.time_slot_id, v.time_in, v.time_out,
           s.name AS approval_status, v.check_in_status,
           vi.id AS visitor_id, vi.first_name AS visitor_first_name,
           vi.last_name AS visitor_last_name, vi.email AS visitor_email,
           vi.contact_number AS visitor_contact_number,
           e.id AS employee_id, e.first_name || ' ' || e.last_name AS employee_name,
           d.name AS department_name,
           p.id AS purpose_id, p.name AS purpose_name,
           idt.name AS valid_id_type_name,
           c.body AS comment,
           v.device_type, v.device_brand
    FROM visits v
    JOIN approval_statuses s ON s.id = v.approval_status_id
    JOIN visitors vi ON vi.id = v.visitor_id
    JOIN employees e ON e.id = v.employee_id
    LEFT JOIN departments d ON d.id = e.department_id
    JOIN visit_purposes p ON p.id = v.purpose_id
    LEFT JOIN valid_id_types idt ON idt.id = v.valid_id_type_id
    LEFT JOIN visit_comments c ON c.id = v.comment_id
"#;

/// Filters for visit listings
#[derive(Debug, Default, Clone)]
pub struct VisitFilter {
    pub date: Option<NaiveDate>,
    pub employee_id: Option<i32>,
    pub approval_status: Option<ApprovalStatus>,
}

#[derive(Clone)]
pub struct VisitsRepository {
    pool: Pool<Postgres>,
}

impl VisitsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get visit by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Visit> {
        let query = format!("{} WHERE v.id = $1", VISIT_SELECT);
        sqlx::query_as::<_, Visit>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visit {} not found", id)))
    }

    /// Most recent visit of a visitor
    pub async fn latest_for_visitor(&self, visitor_id: i32) -> AppResult<Visit> {
        let query = format!(
            "{} WHERE v.visitor_id = $1 ORDER BY v.id DESC LIMIT 1",
            VISIT_SELECT
        );
        sqlx::query_as::<_, Visit>(&query)
            .bind(visitor_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No visit found for visitor {}", visitor_id)))
    }

    /// Get one visit with its joined details
    pub async fn get_details(&self, id: i32) -> AppResult<VisitDetails> {
        let query = format!("{} WHERE v.id = $1", DETAILS_SELECT);
        sqlx::query_as::<_, VisitDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visit {} not found", id)))
    }

    /// List visits with optional filters, newest first
    pub async fn list(&self, filter: &VisitFilter) -> AppResult<Vec<VisitDetails>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if filter.date.is_some() {
            conditions.push(format!("v.visit_date = ${}", idx));
            idx += 1;
        }
        if filter.employee_id.is_some() {
            conditions.push(format!("v.employee_id = ${}", idx));
            idx += 1;
        }
        if filter.approval_status.is_some() {
            conditions.push(format!("s.name = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "{} {} ORDER BY v.visit_date DESC, v.id DESC",
            DETAILS_SELECT, where_clause
        );

        let mut builder = sqlx::query_as::<_, VisitDetails>(&query);
        if let Some(date) = filter.date {
            builder = builder.bind(date);
        }
        if let Some(employee_id) = filter.employee_id {
            builder = builder.bind(employee_id);
        }
        if let Some(status) = filter.approval_status {
            builder = builder.bind(status);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Insert a visit. A slot held by another visit is reported as a conflict.
    pub async fn create(&self, visit: &NewVisit, approval_status_id: i32) -> AppResult<Visit> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO visits (
                visitor_id, employee_id, purpose_id, visit_date, time_slot_id,
                expected_time, approval_status_id, device_type, device_brand
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(visit.visitor_id)
        .bind(visit.employee_id)
        .bind(visit.purpose_id)
        .bind(visit.visit_date)
        .bind(visit.time_slot_id)
        .bind(&visit.expected_time)
        .bind(approval_status_id)
        .bind(&visit.device_type)
        .bind(&visit.device_brand)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Time slot is already booked"))?;

        self.get_by_id(id).await
    }

    /// Move a visit from `from` to the status row `to_id`, clearing the slot
    /// binding when `release_slot` is set. Fails with `Conflict` when the
    /// visit left `from` in the meantime.
    pub async fn set_approval(
        &self,
        id: i32,
        from: ApprovalStatus,
        to_id: i32,
        release_slot: bool,
    ) -> AppResult<Visit> {
        let result = sqlx::query(
            r#"
            UPDATE visits
            SET approval_status_id = $2,
                time_slot_id = CASE WHEN $3 THEN NULL ELSE time_slot_id END,
                modif_date = NOW()
            WHERE id = $1
              AND approval_status_id = (SELECT id FROM approval_statuses WHERE name = $4)
            "#,
        )
        .bind(id)
        .bind(to_id)
        .bind(release_slot)
        .bind(from)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish a missing visit from a concurrent change
            self.get_by_id(id).await?;
            return Err(AppError::Conflict(format!(
                "Visit {} was modified concurrently, reload and retry",
                id
            )));
        }
        self.get_by_id(id).await
    }

    /// Apply a validated check-in change. Fails with `Conflict` when the
    /// visit's check-in status is no longer `from`.
    pub async fn set_check_in(
        &self,
        id: i32,
        from: Option<CheckInStatus>,
        change: &CheckInChange,
        at: NaiveTime,
        valid_id_type_id: Option<i32>,
    ) -> AppResult<Visit> {
        let result = sqlx::query(
            r#"
            UPDATE visits
            SET check_in_status = $2,
                time_in = CASE WHEN $3 THEN COALESCE(time_in, $4) ELSE time_in END,
                time_out = CASE WHEN $3 THEN time_out ELSE $4 END,
                valid_id_type_id = COALESCE($5, valid_id_type_id),
                time_slot_id = CASE WHEN $6 THEN NULL ELSE time_slot_id END,
                modif_date = NOW()
            WHERE id = $1 AND check_in_status IS NOT DISTINCT FROM $7
            "#,
        )
        .bind(id)
        .bind(change.status)
        .bind(change.stamp == Stamp::TimeIn)
        .bind(at)
        .bind(valid_id_type_id)
        .bind(change.release_slot)
        .bind(from)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            self.get_by_id(id).await?;
            return Err(AppError::Conflict(format!(
                "Visit {} was modified concurrently, reload and retry",
                id
            )));
        }
        self.get_by_id(id).await
    }

    /// Create or replace the visit's comment.
    ///
    /// Runs as one transaction: lock the visit row, check for an existing
    /// comment, insert or update it, then bind it to the visit.
    pub async fn upsert_comment(
        &self,
        visit_id: i32,
        body: &str,
        author_role: Role,
        author_id: i32,
    ) -> AppResult<VisitComment> {
        // Dropping `tx` without commit rolls everything back
        let mut tx = self.pool.begin().await?;

        let locked: Option<i32> = sqlx::query_scalar("SELECT id FROM visits WHERE id = $1 FOR UPDATE")
            .bind(visit_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!("Visit {} not found", visit_id)));
        }

        let existing: Option<i32> =
            sqlx::query_scalar("SELECT id FROM visit_comments WHERE visit_id = $1")
                .bind(visit_id)
                .fetch_optional(&mut *tx)
                .await?;

        let comment = match existing {
            Some(comment_id) => {
                sqlx::query_as::<_, VisitComment>(
                    r#"
                    UPDATE visit_comments
                    SET body = $2, author_role = $3, author_id = $4, modif_date = NOW()
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(comment_id)
                .bind(body)
                .bind(author_role)
                .bind(author_id)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, VisitComment>(
                    r#"
                    INSERT INTO visit_comments (visit_id, body, author_role, author_id)
                    VALUES ($1, $2, $3, $4)
                    RETURNING *
                    "#,
                )
                .bind(visit_id)
                .bind(body)
                .bind(author_role)
                .bind(author_id)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        sqlx::query("UPDATE visits SET comment_id = $2, modif_date = NOW() WHERE id = $1")
            .bind(visit_id)
            .bind(comment.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(comment)
    }
}
