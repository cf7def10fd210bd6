//! Donor status transitions shared by the visit and adoption workflows.
//!
//! | Trigger            | From               | To        |
//! |--------------------|--------------------|-----------|
//! | visit booked       | None               | Visitor   |
//! | visit booked       | Visitor / Adopter  | unchanged |
//! | visit cancelled    | Visitor            | None      |
//! | visit cancelled    | Adopter / None     | unchanged |
//! | adoption completed | any                | Adopter   |
//! | adoption cancelled | any                | None      |
//!
//! With `legacy_adoption_cancel_reset` turned off, a cancelled adoption leaves
//! the donor as `Visitor` when an active visit is still booked.

use crate::domain::model::{Donor, DonorStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTrigger {
    VisitBooked,
    VisitCancelled,
    AdoptionCompleted,
    AdoptionCancelled { has_active_visit: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPolicy {
    pub legacy_adoption_cancel_reset: bool,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            legacy_adoption_cancel_reset: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DonorStatusController {
    policy: StatusPolicy,
}

impl DonorStatusController {
    pub fn new(policy: StatusPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    pub fn next_status(&self, current: DonorStatus, trigger: StatusTrigger) -> DonorStatus {
        match (trigger, current) {
            (StatusTrigger::VisitBooked, DonorStatus::None) => DonorStatus::Visitor,
            (StatusTrigger::VisitBooked, other) => other,
            (StatusTrigger::VisitCancelled, DonorStatus::Visitor) => DonorStatus::None,
            (StatusTrigger::VisitCancelled, other) => other,
            (StatusTrigger::AdoptionCompleted, _) => DonorStatus::Adopter,
            (StatusTrigger::AdoptionCancelled { has_active_visit }, _) => {
                if !self.policy.legacy_adoption_cancel_reset && has_active_visit {
                    DonorStatus::Visitor
                } else {
                    DonorStatus::None
                }
            }
        }
    }

    /// Applies `trigger` to the donor atomically and returns the new status.
    pub fn apply(&self, donor: &Donor, trigger: StatusTrigger) -> DonorStatus {
        let mut status = donor.status_cell().lock();
        let previous = *status;
        let next = self.next_status(previous, trigger);
        if next != previous {
            tracing::debug!(
                "Status of {} updated: {} -> {} ({:?})",
                donor.full_name(),
                previous,
                next,
                trigger
            );
        }
        *status = next;
        next
    }
}
