//! Authenticated staff claims and profiles

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::Role;
use crate::error::AppError;

/// JWT Claims for authenticated staff members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    /// Row id in the table backing `role`
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Build claims valid for `hours` from now
    pub fn new(user_id: i32, role: Role, sub: impl Into<String>, hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: sub.into(),
            user_id,
            role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(hours as i64)).timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require one of the given roles. Admins always pass.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if self.is_admin() || allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Role '{}' is not allowed to perform this action",
                self.role
            )))
        }
    }

    /// Employees may only act on their own records; other roles pass through
    pub fn require_self_or_staff(&self, employee_id: i32, staff: &[Role]) -> Result<(), AppError> {
        if self.role == Role::Employee && self.user_id == employee_id {
            return Ok(());
        }
        self.require_role(staff)
    }
}

/// Profile of the authenticated staff member, whatever their role
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StaffProfile {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    /// Department name (employees only)
    pub department: Option<String>,
    #[sqlx(skip)]
    pub role: Option<Role>,
}
