//! Visitors repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::visitor::{Visitor, VisitorIdentity},
};

const VISITOR_COLUMNS: &str =
    "id, first_name, last_name, email, contact_number, address, crea_date";

#[derive(Clone)]
pub struct VisitorsRepository {
    pool: Pool<Postgres>,
}

impl VisitorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get visitor by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Visitor> {
        let query = format!("SELECT {} FROM visitors WHERE id = $1", VISITOR_COLUMNS);
        sqlx::query_as::<_, Visitor>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visitor {} not found", id)))
    }

    /// Find a visitor by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Visitor>> {
        let query = format!(
            "SELECT {} FROM visitors WHERE LOWER(email) = LOWER($1)",
            VISITOR_COLUMNS
        );
        let row = sqlx::query_as::<_, Visitor>(&query)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Reuse the visitor with this email, or register a walk-in visitor
    /// (empty password) if none exists.
    pub async fn find_or_create(&self, identity: &VisitorIdentity) -> AppResult<Visitor> {
        if let Some(visitor) = self.find_by_email(&identity.email).await? {
            return Ok(visitor);
        }

        let query = format!(
            r#"
            INSERT INTO visitors (first_name, last_name, email, contact_number, address, password)
            VALUES ($1, $2, $3, $4, $5, '')
            RETURNING {}
            "#,
            VISITOR_COLUMNS
        );
        let inserted = sqlx::query_as::<_, Visitor>(&query)
            .bind(&identity.first_name)
            .bind(&identity.last_name)
            .bind(identity.email.trim())
            .bind(&identity.contact_number)
            .bind(&identity.address)
            .fetch_one(&self.pool)
            .await;

        match inserted {
            Ok(visitor) => Ok(visitor),
            // Lost a race with a concurrent registration for the same email
            Err(e) => match AppError::conflict_on_unique(e, "visitor exists") {
                AppError::Conflict(_) => self
                    .find_by_email(&identity.email)
                    .await?
                    .ok_or_else(|| AppError::Internal("Visitor vanished after conflict".to_string())),
                other => Err(other),
            },
        }
    }
}
