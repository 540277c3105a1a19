//! Repository layer for database operations

pub mod high_care;
pub mod lookups;
pub mod staff;
pub mod time_slots;
pub mod visitors;
pub mod visits;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub time_slots: time_slots::TimeSlotsRepository,
    pub visits: visits::VisitsRepository,
    pub visitors: visitors::VisitorsRepository,
    pub high_care: high_care::HighCareRepository,
    pub lookups: lookups::LookupsRepository,
    pub staff: staff::StaffRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            time_slots: time_slots::TimeSlotsRepository::new(pool.clone()),
            visits: visits::VisitsRepository::new(pool.clone()),
            visitors: visitors::VisitorsRepository::new(pool.clone()),
            high_care: high_care::HighCareRepository::new(pool.clone()),
            lookups: lookups::LookupsRepository::new(pool.clone()),
            staff: staff::StaffRepository::new(pool.clone()),
            pool,
        }
    }
}
