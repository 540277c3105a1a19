//! Time-slot manager: employee availability and double-booking checks

use chrono::Local;

use super::notifications::NotificationHub;
use crate::{
    error::{AppError, AppResult},
    models::time_slot::{
        CreateDatePlaceholder, SlotValues, TimeSlot, TimeSlotWithBooking, UpsertTimeSlot,
    },
    repository::Repository,
    workflow::slot_time::{normalize_slot_times, parse_slot_date},
};

#[derive(Clone)]
pub struct TimeSlotsService {
    repository: Repository,
    hub: NotificationHub,
}

impl TimeSlotsService {
    pub fn new(repository: Repository, hub: NotificationHub) -> Self {
        Self { repository, hub }
    }

    pub async fn get(&self, id: i32) -> AppResult<TimeSlot> {
        self.repository.time_slots.get_by_id(id).await
    }

    async fn ensure_employee(&self, employee_id: i32) -> AppResult<()> {
        if !self.repository.staff.employee_exists(employee_id).await? {
            return Err(AppError::InvalidReference(format!(
                "Employee {} does not exist",
                employee_id
            )));
        }
        Ok(())
    }

    /// Reserve a date for an employee before the hours are known.
    /// Only one slot of any kind may exist on that date beforehand.
    pub async fn create_date_placeholder(&self, data: &CreateDatePlaceholder) -> AppResult<TimeSlot> {
        let employee_id = data
            .employee_id
            .ok_or_else(|| AppError::Validation("employeeId is required".to_string()))?;
        let date = parse_slot_date(data.date.as_deref().unwrap_or_default())?;
        self.ensure_employee(employee_id).await?;

        if self.repository.time_slots.exists_for_date(employee_id, date).await? {
            return Err(AppError::Conflict(format!(
                "A time slot already exists for employee {} on {}",
                employee_id, date
            )));
        }

        let slot = self
            .repository
            .time_slots
            .create(&SlotValues {
                employee_id,
                date,
                start_time: String::new(),
                end_time: String::new(),
            })
            .await?;

        tracing::info!(slot_id = slot.id, employee_id, %date, "Date placeholder created");
        self.hub.notify_update("Date added");
        Ok(slot)
    }

    /// Insert a slot, or update `slot_id` when given
    pub async fn create_or_update_slot(
        &self,
        slot_id: Option<i32>,
        data: &UpsertTimeSlot,
    ) -> AppResult<TimeSlot> {
        let employee_id = data
            .employee_id
            .ok_or_else(|| AppError::Validation("employeeId is required".to_string()))?;
        let date = parse_slot_date(data.date.as_deref().unwrap_or_default())?;
        let (start_time, end_time) = normalize_slot_times(&data.start_time, &data.end_time)?;
        self.ensure_employee(employee_id).await?;

        let values = SlotValues {
            employee_id,
            date,
            start_time,
            end_time,
        };

        if self.repository.time_slots.has_duplicate(&values, slot_id).await? {
            return Err(AppError::Conflict(
                "Time slot already exists for this employee, date and hours".to_string(),
            ));
        }

        let slot = match slot_id {
            Some(id) => {
                // A booked slot's hours are already quoted on its visit
                if self.repository.time_slots.is_booked(id).await? {
                    return Err(AppError::Conflict(format!(
                        "Time slot {} is booked and cannot be changed",
                        id
                    )));
                }
                let slot = self.repository.time_slots.update(id, &values).await?;
                tracing::info!(slot_id = slot.id, employee_id, %date, "Time slot updated");
                self.hub.notify_update("Time slot updated");
                slot
            }
            None => {
                let slot = self.repository.time_slots.create(&values).await?;
                tracing::info!(slot_id = slot.id, employee_id, %date, "Time slot created");
                self.hub.notify_update("Time slot created");
                slot
            }
        };
        Ok(slot)
    }

    /// Open slots of an employee from today on
    pub async fn list_available(&self, employee_id: i32) -> AppResult<Vec<TimeSlot>> {
        let today = Local::now().date_naive();
        self.repository
            .time_slots
            .list_available(employee_id, today)
            .await
    }

    pub async fn list_for_employee(&self, employee_id: i32) -> AppResult<Vec<TimeSlotWithBooking>> {
        self.repository.time_slots.list_for_employee(employee_id).await
    }

    pub async fn delete_slot(&self, id: i32) -> AppResult<()> {
        self.repository.time_slots.delete(id).await?;
        tracing::info!(slot_id = id, "Time slot deleted");
        self.hub.notify_update("Time slot deleted");
        Ok(())
    }
}
