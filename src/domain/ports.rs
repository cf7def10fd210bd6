use crate::domain::model::{DonorId, Period};
use chrono::NaiveDate;

/// Read access to per-slot occupancy, used by the availability scanner.
pub trait SlotOccupancy: Send + Sync {
    fn count_active(&self, date: NaiveDate, period: Period) -> usize;
    fn slot_capacity(&self) -> usize;
}

/// Lets the adoption ledger ask whether a donor still holds an active visit
/// without depending on the visit registry directly.
pub trait ActiveVisitProbe: Send + Sync {
    fn has_active_visit(&self, donor: DonorId) -> bool;
}
