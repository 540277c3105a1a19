//! Staff directory: employees (visit hosts) and role profiles

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        directory::{EmployeeListItem, EmployeeQuery},
        enums::Role,
        user::StaffProfile,
    },
};

#[derive(Clone)]
pub struct StaffRepository {
    pool: Pool<Postgres>,
}

impl StaffRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Employee directory with the number of open slots from `today` on
    pub async fn list_employees(
        &self,
        query: &EmployeeQuery,
        today: NaiveDate,
    ) -> AppResult<Vec<EmployeeListItem>> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let mut conditions = Vec::new();
        let mut idx = 2;

        if search.is_some() {
            conditions.push(format!(
                "(e.first_name ILIKE ${0} OR e.last_name ILIKE ${0})",
                idx
            ));
            idx += 1;
        }
        if query.department_id.is_some() {
            conditions.push(format!("e.department_id = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let having = if query.only_available {
            "WHERE available_slots > 0"
        } else {
            ""
        };

        let sql = format!(
            r#"
            SELECT * FROM (
                SELECT e.id, e.first_name, e.last_name, e.email,
                       e.department_id, d.name AS department_name,
                       (SELECT COUNT(*) FROM time_slots ts
                        WHERE ts.employee_id = e.id
                          AND ts.slot_date >= $1
                          AND NOT EXISTS (SELECT 1 FROM visits v WHERE v.time_slot_id = ts.id)
                       ) AS available_slots
                FROM employees e
                LEFT JOIN departments d ON d.id = e.department_id
                {}
            ) directory
            {}
            ORDER BY last_name, first_name
            "#,
            where_clause, having
        );

        let mut builder = sqlx::query_as::<_, EmployeeListItem>(&sql).bind(today);
        if let Some(ref pattern) = search {
            builder = builder.bind(pattern);
        }
        if let Some(department_id) = query.department_id {
            builder = builder.bind(department_id);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn employee_exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn nurse_exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM nurses WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Profile of a staff member in the table backing their role
    pub async fn get_profile(&self, role: Role, id: i32) -> AppResult<StaffProfile> {
        let sql = match role {
            Role::Employee => {
                r#"SELECT e.id, e.first_name, e.last_name, e.email, d.name AS department
                   FROM employees e LEFT JOIN departments d ON d.id = e.department_id
                   WHERE e.id = $1"#
            }
            Role::Security => {
                "SELECT id, first_name, last_name, email, NULL::text AS department FROM security_guards WHERE id = $1"
            }
            Role::Nurse => {
                "SELECT id, first_name, last_name, email, NULL::text AS department FROM nurses WHERE id = $1"
            }
            Role::Hr => {
                "SELECT id, first_name, last_name, email, NULL::text AS department FROM hr_staff WHERE id = $1"
            }
            Role::Admin => {
                "SELECT id, first_name, last_name, email, NULL::text AS department FROM administrators WHERE id = $1"
            }
        };

        let mut profile = sqlx::query_as::<_, StaffProfile>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No {} profile with id {}", role, id)))?;
        profile.role = Some(role);
        Ok(profile)
    }
}
