use crate::core::slots::AvailableSlots;
use crate::core::status::{DonorStatusController, StatusTrigger};
use crate::domain::model::{Donor, DonorId, Period, SlotOffer, Visit, VisitId};
use crate::domain::ports::{ActiveVisitProbe, SlotOccupancy};
use crate::utils::error::{Result, ShelterError};
use crate::utils::validation::{validate_date, validate_required_field};
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_SLOT_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    pub slot_capacity: usize,
    /// Reschedule moves a visit without checking the target slot when true.
    pub legacy_reschedule_skips_capacity: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            slot_capacity: DEFAULT_SLOT_CAPACITY,
            legacy_reschedule_skips_capacity: true,
        }
    }
}

/// Booking input as it arrives from a caller that may not have every field.
#[derive(Debug, Clone, Default)]
pub struct BookingRequest {
    pub donor: Option<Arc<Donor>>,
    pub date: String,
    pub period: Option<Period>,
}

#[derive(Debug, Default)]
struct RegistryState {
    visits: Vec<Visit>,
    index: HashMap<VisitId, usize>,
    last_id: u64,
}

impl RegistryState {
    fn count_active(&self, date: NaiveDate, period: Period) -> usize {
        self.visits.iter().filter(|v| v.occupies(date, period)).count()
    }

    fn position(&self, id: VisitId) -> Result<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(ShelterError::VisitNotFoundError { id: id.value() })
    }

    fn allocate_id(&mut self) -> VisitId {
        self.last_id += 1;
        VisitId::new(self.last_id)
    }
}

/// Owns every visit ever booked. Visits are deactivated, never removed.
#[derive(Debug)]
pub struct VisitRegistry {
    state: Mutex<RegistryState>,
    status: DonorStatusController,
    options: RegistryOptions,
}

impl Default for VisitRegistry {
    fn default() -> Self {
        Self::new(DonorStatusController::default(), RegistryOptions::default())
    }
}

impl VisitRegistry {
    /// A slot capacity of zero is raised to one.
    pub fn new(status: DonorStatusController, options: RegistryOptions) -> Self {
        if options.slot_capacity == 0 {
            tracing::warn!("Slot capacity 0 is not usable, raising it to 1");
        }
        Self {
            state: Mutex::new(RegistryState::default()),
            status,
            options: RegistryOptions {
                slot_capacity: options.slot_capacity.max(1),
                ..options
            },
        }
    }

    pub fn options(&self) -> RegistryOptions {
        self.options
    }

    pub fn book(&self, request: BookingRequest) -> Result<Visit> {
        let donor = validate_required_field("donor", &request.donor)?;
        let period = validate_required_field("period", &request.period)?;
        self.book_visit(donor, &request.date, *period)
    }

    pub fn book_visit(&self, donor: &Arc<Donor>, date: &str, period: Period) -> Result<Visit> {
        let date = validate_date("date", date)?;

        let mut state = self.state.lock();
        let booked = state.count_active(date, period);
        if booked >= self.options.slot_capacity {
            tracing::warn!(
                "Booking refused for {}: {} {} is full ({}/{})",
                donor.full_name(),
                date,
                period,
                booked,
                self.options.slot_capacity
            );
            return Err(ShelterError::CapacityExceededError {
                date: date.to_string(),
                period: period.to_string(),
                capacity: self.options.slot_capacity,
            });
        }

        let id = state.allocate_id();
        let visit = Visit {
            id,
            donor: Arc::clone(donor),
            date,
            period,
            active: true,
        };
        let position = state.visits.len();
        state.visits.push(visit.clone());
        state.index.insert(id, position);
        self.status.apply(donor, StatusTrigger::VisitBooked);

        tracing::info!(
            "Visit booked successfully: ID {} for {} on {} {}",
            id,
            donor.full_name(),
            date,
            period
        );
        Ok(visit)
    }

    pub fn reschedule_visit(&self, id: VisitId, new_date: &str, new_period: Period) -> Result<()> {
        let mut state = self.state.lock();
        let position = state.position(id)?;
        let new_date = validate_date("date", new_date)?;

        let (active, same_slot) = {
            let visit = &state.visits[position];
            (visit.active, visit.date == new_date && visit.period == new_period)
        };
        if !active {
            return Err(ShelterError::InactiveVisitError { id: id.value() });
        }

        if !self.options.legacy_reschedule_skips_capacity && !same_slot {
            let booked = state.count_active(new_date, new_period);
            if booked >= self.options.slot_capacity {
                return Err(ShelterError::CapacityExceededError {
                    date: new_date.to_string(),
                    period: new_period.to_string(),
                    capacity: self.options.slot_capacity,
                });
            }
        }

        let visit = &mut state.visits[position];
        visit.date = new_date;
        visit.period = new_period;
        tracing::info!("Visit {} rescheduled to {} {}", id, new_date, new_period);
        Ok(())
    }

    pub fn cancel_visit(&self, id: VisitId) -> Result<()> {
        let mut state = self.state.lock();
        let position = state.position(id)?;
        let visit = &mut state.visits[position];
        if !visit.active {
            return Err(ShelterError::InactiveVisitError { id: id.value() });
        }

        visit.active = false;
        self.status.apply(&visit.donor, StatusTrigger::VisitCancelled);
        tracing::info!("Visit {} has been cancelled", id);
        Ok(())
    }

    pub fn find_visit(&self, id: VisitId) -> Result<Visit> {
        let state = self.state.lock();
        let position = state.position(id)?;
        Ok(state.visits[position].clone())
    }

    /// Looks up a visit from a caller-supplied id string.
    pub fn find_visit_by_text(&self, raw: &str) -> Result<Visit> {
        self.find_visit(raw.parse()?)
    }

    pub fn count_active(&self, date: NaiveDate, period: Period) -> usize {
        self.state.lock().count_active(date, period)
    }

    pub fn visits_for_donor(&self, donor: DonorId) -> Vec<Visit> {
        self.snapshot(|v| v.donor.id() == donor)
    }

    pub fn active_visits(&self) -> Vec<Visit> {
        self.snapshot(Visit::is_active)
    }

    pub fn visits_for_date(&self, date: NaiveDate) -> Vec<Visit> {
        self.snapshot(|v| v.date == date)
    }

    pub fn all_visits(&self) -> Vec<Visit> {
        self.snapshot(|_| true)
    }

    fn snapshot(&self, keep: impl Fn(&Visit) -> bool) -> Vec<Visit> {
        let state = self.state.lock();
        state.visits.iter().filter(|&v| keep(v)).cloned().collect()
    }

    /// Fresh scanner over tomorrow ..= today + `max_days_ahead`.
    pub fn available_slots(&self, today: NaiveDate, max_days_ahead: u32) -> AvailableSlots<'_, Self> {
        AvailableSlots::new(self, today, max_days_ahead)
    }

    pub fn next_available_slots(
        &self,
        count: usize,
        today: NaiveDate,
        max_days_ahead: u32,
    ) -> Vec<SlotOffer> {
        self.available_slots(today, max_days_ahead).take(count).collect()
    }

    pub fn has_availability(&self, today: NaiveDate, max_days_ahead: u32) -> bool {
        self.available_slots(today, max_days_ahead).next().is_some()
    }
}

impl SlotOccupancy for VisitRegistry {
    fn count_active(&self, date: NaiveDate, period: Period) -> usize {
        VisitRegistry::count_active(self, date, period)
    }

    fn slot_capacity(&self) -> usize {
        self.options.slot_capacity
    }
}

impl ActiveVisitProbe for VisitRegistry {
    fn has_active_visit(&self, donor: DonorId) -> bool {
        self.state
            .lock()
            .visits
            .iter()
            .any(|v| v.active && v.donor.id() == donor)
    }
}
