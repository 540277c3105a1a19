//! Lookup tables: approval statuses, visit purposes, valid ID types

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        directory::{ValidIdType, VisitPurpose},
        enums::ApprovalStatus,
    },
};

#[derive(Clone)]
pub struct LookupsRepository {
    pool: Pool<Postgres>,
}

impl LookupsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Row id of an approval status. A missing row means the lookup table was
    /// not seeded, which is a deployment problem rather than a client error.
    pub async fn approval_status_id(&self, status: ApprovalStatus) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>("SELECT id FROM approval_statuses WHERE name = $1")
            .bind(status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "approval_statuses has no row named '{}'",
                    status
                ))
            })
    }

    pub async fn list_purposes(&self) -> AppResult<Vec<VisitPurpose>> {
        let rows = sqlx::query_as::<_, VisitPurpose>("SELECT id, name FROM visit_purposes ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn purpose_exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM visit_purposes WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn list_valid_id_types(&self) -> AppResult<Vec<ValidIdType>> {
        let rows = sqlx::query_as::<_, ValidIdType>("SELECT id, name FROM valid_id_types ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn valid_id_type_exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM valid_id_types WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
