//! Business logic services

pub mod directory;
pub mod high_care;
pub mod notifications;
pub mod time_slots;
pub mod visits;

use crate::{config::VisitsConfig, repository::Repository};

use notifications::NotificationHub;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub time_slots: time_slots::TimeSlotsService,
    pub visits: visits::VisitsService,
    pub high_care: high_care::HighCareService,
    pub directory: directory::DirectoryService,
    pub notifications: NotificationHub,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, visits_config: VisitsConfig, hub: NotificationHub) -> Self {
        let visits = visits::VisitsService::new(repository.clone(), visits_config.clone(), hub.clone());
        Self {
            time_slots: time_slots::TimeSlotsService::new(repository.clone(), hub.clone()),
            high_care: high_care::HighCareService::new(
                repository.clone(),
                visits_config,
                visits.clone(),
                hub.clone(),
            ),
            directory: directory::DirectoryService::new(repository.clone()),
            visits,
            notifications: hub,
            repository,
        }
    }

    /// Round-trip to the database
    pub async fn ping_database(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.repository.pool)
            .await
            .is_ok()
    }
}
