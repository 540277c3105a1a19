//! Time slots repository

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::time_slot::{SlotValues, TimeSlot, TimeSlotWithBooking},
};

#[derive(Clone)]
pub struct TimeSlotsRepository {
    pool: Pool<Postgres>,
}

impl TimeSlotsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a slot by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<TimeSlot> {
        sqlx::query_as::<_, TimeSlot>("SELECT * FROM time_slots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Time slot {} not found", id)))
    }

    /// Whether the employee already has any slot on `date`
    pub async fn exists_for_date(&self, employee_id: i32, date: NaiveDate) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM time_slots WHERE employee_id = $1 AND slot_date = $2)",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Whether another slot has the same employee, date and hours
    pub async fn has_duplicate(&self, values: &SlotValues, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM time_slots
                WHERE employee_id = $1 AND slot_date = $2
                  AND start_time = $3 AND end_time = $4
                  AND ($5::int IS NULL OR id <> $5)
            )
            "#,
        )
        .bind(values.employee_id)
        .bind(values.date)
        .bind(&values.start_time)
        .bind(&values.end_time)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Whether a visit currently holds the slot
    pub async fn is_booked(&self, id: i32) -> AppResult<bool> {
        let booked: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM visits WHERE time_slot_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(booked)
    }

    /// Insert a slot
    pub async fn create(&self, values: &SlotValues) -> AppResult<TimeSlot> {
        sqlx::query_as::<_, TimeSlot>(
            r#"
            INSERT INTO time_slots (employee_id, slot_date, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(values.employee_id)
        .bind(values.date)
        .bind(&values.start_time)
        .bind(&values.end_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Time slot already exists"))
    }

    /// Overwrite a slot's date and hours
    pub async fn update(&self, id: i32, values: &SlotValues) -> AppResult<TimeSlot> {
        sqlx::query_as::<_, TimeSlot>(
            r#"
            UPDATE time_slots
            SET employee_id = $2, slot_date = $3, start_time = $4, end_time = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(values.employee_id)
        .bind(values.date)
        .bind(&values.start_time)
        .bind(&values.end_time)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Time slot already exists"))?
        .ok_or_else(|| AppError::NotFound(format!("Time slot {} not found", id)))
    }

    /// Delete a slot. Visits holding it get their binding cleared by the FK.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM time_slots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Time slot {} not found", id)));
        }
        Ok(())
    }

    /// Every slot of an employee, with booking state
    pub async fn list_for_employee(&self, employee_id: i32) -> AppResult<Vec<TimeSlotWithBooking>> {
        let rows = sqlx::query_as::<_, TimeSlotWithBooking>(
            r#"
            SELECT ts.id, ts.employee_id, ts.slot_date, ts.start_time, ts.end_time,
                   EXISTS(SELECT 1 FROM visits v WHERE v.time_slot_id = ts.id) AS is_booked
            FROM time_slots ts
            WHERE ts.employee_id = $1
            ORDER BY ts.slot_date, ts.start_time
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Slots on or after `today` that no visit holds
    pub async fn list_available(&self, employee_id: i32, today: NaiveDate) -> AppResult<Vec<TimeSlot>> {
        let rows = sqlx::query_as::<_, TimeSlot>(
            r#"
            SELECT ts.*
            FROM time_slots ts
            WHERE ts.employee_id = $1
              AND ts.slot_date >= $2
              AND NOT EXISTS (SELECT 1 FROM visits v WHERE v.time_slot_id = ts.id)
            ORDER BY ts.slot_date ASC, ts.start_time ASC
            "#,
        )
        .bind(employee_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
