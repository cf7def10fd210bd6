use crate::core::status::{DonorStatusController, StatusTrigger};
use crate::domain::model::{AdoptionRecord, Animal, Donor, DonorId, Person};
use crate::domain::ports::ActiveVisitProbe;
use crate::utils::error::{Result, ShelterError};
use crate::utils::validation::validate_non_empty_string;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Default)]
struct LedgerState {
    pool: Vec<Animal>,
    authorized: Vec<Arc<Donor>>,
    adopted_by_name: HashMap<String, Animal>,
    matches: HashMap<DonorId, AdoptionRecord>,
}

impl LedgerState {
    fn is_authorized(&self, donor: &Donor) -> bool {
        self.authorized
            .iter()
            .any(|a| a.id() == donor.id() || a.matches_name(donor.name(), donor.surname()))
    }
}

/// Adoptable pool plus the one-to-one donor → animal matches.
///
/// An animal is either in the pool or in exactly one match, never both.
pub struct AdoptionLedger {
    state: Mutex<LedgerState>,
    status: DonorStatusController,
    visits: Option<Arc<dyn ActiveVisitProbe>>,
}

impl fmt::Debug for AdoptionLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("AdoptionLedger");
        match self.state.try_lock() {
            Some(state) => d
                .field("pool", &state.pool.len())
                .field("authorized", &state.authorized.len())
                .field("matches", &state.matches.len()),
            None => d.field("state", &format_args!("<locked>")),
        };
        d.finish_non_exhaustive()
    }
}

impl AdoptionLedger {
    pub fn new(pool: Vec<Animal>, authorized: Vec<Arc<Donor>>, status: DonorStatusController) -> Self {
        tracing::info!(
            "Adoption system initialized with {} animals and {} authorized donors",
            pool.len(),
            authorized.len()
        );
        Self {
            state: Mutex::new(LedgerState {
                pool,
                authorized,
                ..LedgerState::default()
            }),
            status,
            visits: None,
        }
    }

    /// Keeps only donors from a loaded roster as the authorized set.
    pub fn from_roster(pool: Vec<Animal>, people: &[Person], status: DonorStatusController) -> Self {
        let donors = people.iter().filter_map(Person::as_donor).cloned().collect();
        Self::new(pool, donors, status)
    }

    pub fn with_visit_probe(mut self, probe: Arc<dyn ActiveVisitProbe>) -> Self {
        self.visits = Some(probe);
        self
    }

    /// Assigns the first pool animal of `species` (case-insensitive) to `donor`.
    pub fn adopt(&self, donor: &Arc<Donor>, species: &str) -> Result<Animal> {
        validate_non_empty_string("species", species)?;
        let mut state = self.state.lock();

        if state.pool.is_empty() {
            tracing::warn!("Adoption refused for {}: no animals available", donor.full_name());
            return Err(ShelterError::NoAnimalsAvailableError);
        }
        if !state.is_authorized(donor) {
            tracing::warn!("Adoption refused: {} is not an authorized donor", donor.full_name());
            return Err(ShelterError::AuthorizationError {
                name: donor.name().to_string(),
                surname: donor.surname().to_string(),
            });
        }
        if let Some(existing) = state.matches.get(&donor.id()) {
            return Err(ShelterError::AlreadyAdoptedError {
                donor: donor.full_name(),
                animal: existing.animal.name().to_string(),
            });
        }

        let position = state
            .pool
            .iter()
            .position(|a| a.is_species(species))
            .ok_or_else(|| ShelterError::SpeciesUnavailableError {
                species: species.trim().to_string(),
            })?;

        let animal = state.pool.remove(position);
        state
            .adopted_by_name
            .insert(animal.name().to_string(), animal.clone());
        state.matches.insert(
            donor.id(),
            AdoptionRecord {
                donor: Arc::clone(donor),
                animal: animal.clone(),
            },
        );
        self.status.apply(donor, StatusTrigger::AdoptionCompleted);

        tracing::info!(
            "Adoption completed successfully: {} adopted {}",
            donor.full_name(),
            animal
        );
        Ok(animal)
    }

    /// Returns `animal` to the pool if it is the one matched to `donor`.
    pub fn cancel_adoption(&self, animal: &str, donor: &Arc<Donor>) -> Result<()> {
        let mut state = self.state.lock();

        let mismatch = || ShelterError::AdoptionMismatchError {
            animal: animal.to_string(),
            donor: donor.full_name(),
        };
        let matched = state
            .matches
            .get(&donor.id())
            .is_some_and(|record| record.animal.name() == animal.trim());
        if !matched {
            return Err(mismatch());
        }

        let record = state.matches.remove(&donor.id()).ok_or_else(mismatch)?;
        state.adopted_by_name.remove(record.animal.name());
        state.pool.push(record.animal);

        let has_active_visit = self
            .visits
            .as_ref()
            .is_some_and(|probe| probe.has_active_visit(donor.id()));
        self.status
            .apply(donor, StatusTrigger::AdoptionCancelled { has_active_visit });

        tracing::info!("Adoption successfully cancelled for {}", animal);
        Ok(())
    }

    pub fn add_animal(&self, animal: Animal) {
        tracing::info!("Animal {} added to the adoptable pool", animal);
        self.state.lock().pool.push(animal);
    }

    pub fn authorize(&self, donor: Arc<Donor>) {
        let mut state = self.state.lock();
        if !state.authorized.iter().any(|d| d.id() == donor.id()) {
            state.authorized.push(donor);
        }
    }

    pub fn is_authorized(&self, donor: &Donor) -> bool {
        self.state.lock().is_authorized(donor)
    }

    pub fn adoptable_animals(&self) -> Vec<Animal> {
        self.state.lock().pool.clone()
    }

    pub fn available_species(&self) -> BTreeSet<String> {
        self.state
            .lock()
            .pool
            .iter()
            .map(|a| a.species().to_string())
            .collect()
    }

    pub fn adopted_animals(&self) -> HashMap<String, Animal> {
        self.state.lock().adopted_by_name.clone()
    }

    pub fn adoption_matches(&self) -> Vec<AdoptionRecord> {
        self.state.lock().matches.values().cloned().collect()
    }

    pub fn adopted_by(&self, donor: DonorId) -> Option<Animal> {
        self.state
            .lock()
            .matches
            .get(&donor)
            .map(|record| record.animal.clone())
    }

    pub fn authorized_donors(&self) -> Vec<Arc<Donor>> {
        self.state.lock().authorized.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DonorStatus, Sex};

    fn donor(name: &str, surname: &str) -> Arc<Donor> {
        Arc::new(Donor::new(Sex::F, name, surname, "1992-02-14").unwrap())
    }

    fn animal(name: &str, species: &str) -> Animal {
        Animal::new(Sex::M, name, species).unwrap()
    }

    fn ledger_with(pool: Vec<Animal>, authorized: &[Arc<Donor>]) -> AdoptionLedger {
        AdoptionLedger::new(pool, authorized.to_vec(), DonorStatusController::default())
    }

    #[test]
    fn test_adopt_takes_first_match_in_insertion_order() {
        let d = donor("Elena", "Moro");
        let ledger = ledger_with(
            vec![animal("Fido", "cane"), animal("Tom", "gatto"), animal("Kira", "gatto")],
            &[Arc::clone(&d)],
        );

        let adopted = ledger.adopt(&d, "GATTO").unwrap();
        assert_eq!(adopted.name(), "Tom");
        assert_eq!(d.status(), DonorStatus::Adopter);

        let pool: Vec<_> = ledger.adoptable_animals().iter().map(|a| a.name().to_string()).collect();
        assert_eq!(pool, vec!["Fido", "Kira"]);
        assert!(ledger.adopted_animals().contains_key("Tom"));
        assert_eq!(ledger.adopted_by(d.id()).unwrap().name(), "Tom");
    }

    #[test]
    fn test_empty_pool_checked_before_authorization() {
        let stranger = donor("Ugo", "Nessuno");
        let ledger = ledger_with(vec![], &[]);
        assert!(matches!(
            ledger.adopt(&stranger, "cane"),
            Err(ShelterError::NoAnimalsAvailableError)
        ));
    }

    #[test]
    fn test_authorization_is_case_insensitive_on_names() {
        let roster_entry = donor("Elena", "Moro");
        let ledger = ledger_with(vec![animal("Fido", "cane")], &[roster_entry]);

        let same_person = donor("ELENA", "moro");
        assert!(ledger.is_authorized(&same_person));
        assert!(ledger.adopt(&same_person, "cane").is_ok());
    }

    #[test]
    fn test_unknown_species() {
        let d = donor("Elena", "Moro");
        let ledger = ledger_with(vec![animal("Fido", "cane")], &[Arc::clone(&d)]);
        assert!(matches!(
            ledger.adopt(&d, "coniglio"),
            Err(ShelterError::SpeciesUnavailableError { ref species }) if species == "coniglio"
        ));
        assert_eq!(ledger.adoptable_animals().len(), 1);
        assert_eq!(d.status(), DonorStatus::None);
    }

    #[test]
    fn test_second_adoption_by_same_donor_is_refused() {
        let d = donor("Elena", "Moro");
        let ledger = ledger_with(
            vec![animal("Fido", "cane"), animal("Rex", "cane")],
            &[Arc::clone(&d)],
        );
        ledger.adopt(&d, "cane").unwrap();
        assert!(matches!(
            ledger.adopt(&d, "cane"),
            Err(ShelterError::AlreadyAdoptedError { .. })
        ));
        assert_eq!(ledger.adoptable_animals().len(), 1);
        assert_eq!(ledger.adoption_matches().len(), 1);
    }

    #[test]
    fn test_cancel_returns_animal_and_resets_status() {
        let d = donor("Elena", "Moro");
        let ledger = ledger_with(vec![animal("Fido", "cane")], &[Arc::clone(&d)]);
        ledger.adopt(&d, "cane").unwrap();

        ledger.cancel_adoption("Fido", &d).unwrap();
        assert_eq!(d.status(), DonorStatus::None);
        assert_eq!(ledger.adoptable_animals().len(), 1);
        assert!(ledger.adopted_animals().is_empty());
        assert!(ledger.adoption_matches().is_empty());
    }

    #[test]
    fn test_cancel_without_match_fails() {
        let d = donor("Elena", "Moro");
        let ledger = ledger_with(vec![animal("Fido", "cane")], &[Arc::clone(&d)]);
        assert!(matches!(
            ledger.cancel_adoption("Fido", &d),
            Err(ShelterError::AdoptionMismatchError { .. })
        ));
    }

    struct AlwaysVisiting;

    impl ActiveVisitProbe for AlwaysVisiting {
        fn has_active_visit(&self, _donor: DonorId) -> bool {
            true
        }
    }

    #[test]
    fn test_active_visit_check_only_matters_outside_legacy_mode() {
        let legacy_donor = donor("Elena", "Moro");
        let legacy = ledger_with(vec![animal("Fido", "cane")], &[Arc::clone(&legacy_donor)])
            .with_visit_probe(Arc::new(AlwaysVisiting));
        legacy.adopt(&legacy_donor, "cane").unwrap();
        legacy.cancel_adoption("Fido", &legacy_donor).unwrap();
        assert_eq!(legacy_donor.status(), DonorStatus::None);

        let strict_donor = donor("Elena", "Moro");
        let strict = AdoptionLedger::new(
            vec![animal("Fido", "cane")],
            vec![Arc::clone(&strict_donor)],
            DonorStatusController::new(crate::core::status::StatusPolicy {
                legacy_adoption_cancel_reset: false,
            }),
        )
        .with_visit_probe(Arc::new(AlwaysVisiting));
        strict.adopt(&strict_donor, "cane").unwrap();
        strict.cancel_adoption("Fido", &strict_donor).unwrap();
        assert_eq!(strict_donor.status(), DonorStatus::Visitor);
    }

    #[test]
    fn test_available_species_is_deduplicated() {
        let ledger = ledger_with(
            vec![animal("Fido", "cane"), animal("Rex", "Cane"), animal("Tom", "gatto")],
            &[],
        );
        let species: Vec<_> = ledger.available_species().into_iter().collect();
        assert_eq!(species, vec!["cane", "gatto"]);
    }

    #[test]
    fn test_debug_does_not_block_while_state_is_locked() {
        let ledger = ledger_with(vec![animal("Fido", "cane")], &[]);
        assert!(format!("{:?}", ledger).contains("pool: 1"));

        let _guard = ledger.state.lock();
        assert!(format!("{:?}", ledger).contains("<locked>"));
    }
}
