use crate::adapters::roster::Roster;
use crate::config::ShelterConfig;
use crate::core::adoption::AdoptionLedger;
use crate::core::status::DonorStatusController;
use crate::core::visits::VisitRegistry;
use crate::domain::model::{Admin, Animal, Donor, Person, SlotOffer};
use crate::domain::ports::ActiveVisitProbe;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShelterSummary {
    pub adoptable: usize,
    pub adopted: usize,
    pub authorized_donors: usize,
    pub active_visits: usize,
    pub total_visits: usize,
}

/// One visit registry and one adoption ledger sharing a status controller.
#[derive(Debug)]
pub struct Shelter {
    visits: Arc<VisitRegistry>,
    adoptions: AdoptionLedger,
    staff: Vec<Admin>,
    max_days_ahead: u32,
}

impl Shelter {
    pub fn new(config: &ShelterConfig, pool: Vec<Animal>, people: &[Person]) -> Self {
        let status = DonorStatusController::new(config.status_policy());
        let visits = Arc::new(VisitRegistry::new(status, config.registry_options()));
        let probe: Arc<dyn ActiveVisitProbe> = visits.clone();
        let adoptions = AdoptionLedger::from_roster(pool, people, status).with_visit_probe(probe);
        let staff = people.iter().filter_map(Person::as_admin).cloned().collect();

        Self {
            visits,
            adoptions,
            staff,
            max_days_ahead: config.booking.max_days_ahead,
        }
    }

    pub fn from_roster(config: &ShelterConfig, roster: Roster) -> Self {
        Self::new(config, roster.animals, &roster.people)
    }

    pub fn visits(&self) -> &VisitRegistry {
        &self.visits
    }

    pub fn adoptions(&self) -> &AdoptionLedger {
        &self.adoptions
    }

    pub fn staff(&self) -> &[Admin] {
        &self.staff
    }

    pub fn veterinarians(&self) -> impl Iterator<Item = &Admin> {
        self.staff.iter().filter(|a| a.is_veterinarian())
    }

    /// Finds a roster donor by name, the way front desks look people up.
    pub fn find_donor(&self, name: &str, surname: &str) -> Option<Arc<Donor>> {
        self.adoptions
            .authorized_donors()
            .into_iter()
            .find(|d| d.matches_name(name, surname))
    }

    /// Next `count` open slots within the configured horizon.
    pub fn next_open_slots(&self, today: NaiveDate, count: usize) -> Vec<SlotOffer> {
        self.visits
            .next_available_slots(count, today, self.max_days_ahead)
    }

    pub fn summary(&self) -> ShelterSummary {
        ShelterSummary {
            adoptable: self.adoptions.adoptable_animals().len(),
            adopted: self.adoptions.adoption_matches().len(),
            authorized_donors: self.adoptions.authorized_donors().len(),
            active_visits: self.visits.active_visits().len(),
            total_visits: self.visits.all_visits().len(),
        }
    }
}
