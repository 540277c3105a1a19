//! Read-only directory: employees, lookup tables and staff profiles

use chrono::Local;

use crate::{
    error::AppResult,
    models::{
        directory::{EmployeeListItem, EmployeeQuery, ValidIdType, VisitPurpose},
        user::{StaffProfile, UserClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct DirectoryService {
    repository: Repository,
}

impl DirectoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_employees(&self, query: &EmployeeQuery) -> AppResult<Vec<EmployeeListItem>> {
        let today = Local::now().date_naive();
        self.repository.staff.list_employees(query, today).await
    }

    pub async fn list_purposes(&self) -> AppResult<Vec<VisitPurpose>> {
        self.repository.lookups.list_purposes().await
    }

    pub async fn list_valid_id_types(&self) -> AppResult<Vec<ValidIdType>> {
        self.repository.lookups.list_valid_id_types().await
    }

    /// Profile of the caller, looked up in the table of their role
    pub async fn profile(&self, claims: &UserClaims) -> AppResult<StaffProfile> {
        self.repository
            .staff
            .get_profile(claims.role, claims.user_id)
            .await
    }
}
