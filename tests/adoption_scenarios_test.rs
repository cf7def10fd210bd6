use shelter_booking::domain::model::{Animal, Donor, DonorStatus, Sex};
use shelter_booking::{AdoptionLedger, DonorStatusController, ShelterError};
use std::sync::Arc;

fn donor(name: &str, surname: &str) -> Arc<Donor> {
    Arc::new(Donor::new(Sex::M, name, surname, "1979-10-03").unwrap())
}

fn animal(name: &str, species: &str) -> Animal {
    Animal::new(Sex::F, name, species).unwrap()
}

fn pool_names(ledger: &AdoptionLedger) -> Vec<String> {
    ledger
        .adoptable_animals()
        .iter()
        .map(|a| a.name().to_string())
        .collect()
}

/// Every known animal sits in exactly one place: the pool or a match.
fn assert_partitioned(ledger: &AdoptionLedger, all: &[&str]) {
    let pool = pool_names(ledger);
    let matched: Vec<String> = ledger
        .adoption_matches()
        .iter()
        .map(|m| m.animal.name().to_string())
        .collect();
    for name in all {
        let in_pool = pool.iter().any(|n| n == name);
        let in_matches = matched.iter().any(|n| n == name);
        assert!(in_pool ^ in_matches, "{name} must be in exactly one place");
    }
    assert_eq!(pool.len() + matched.len(), all.len());
}

#[test]
fn test_only_cat_can_be_adopted_once() {
    let first = donor("Luca", "Bruni");
    let second = donor("Pietro", "Gallo");
    let ledger = AdoptionLedger::new(
        vec![animal("Fido", "cane"), animal("Micia", "gatto")],
        vec![Arc::clone(&first), Arc::clone(&second)],
        DonorStatusController::default(),
    );

    let adopted = ledger.adopt(&first, "gatto").unwrap();
    assert_eq!(adopted.name(), "Micia");
    assert_eq!(pool_names(&ledger), vec!["Fido"]);

    let err = ledger.adopt(&second, "gatto").unwrap_err();
    assert!(matches!(err, ShelterError::SpeciesUnavailableError { .. }));
    assert_eq!(second.status(), DonorStatus::None);
    assert_partitioned(&ledger, &["Fido", "Micia"]);
}

#[test]
fn test_last_animal_gone_reports_empty_pool() {
    let first = donor("Luca", "Bruni");
    let second = donor("Pietro", "Gallo");
    let ledger = AdoptionLedger::new(
        vec![animal("Micia", "gatto")],
        vec![Arc::clone(&first), Arc::clone(&second)],
        DonorStatusController::default(),
    );

    ledger.adopt(&first, "gatto").unwrap();
    assert!(matches!(
        ledger.adopt(&second, "gatto"),
        Err(ShelterError::NoAnimalsAvailableError)
    ));
}

#[test]
fn test_unauthorized_donor_changes_nothing() {
    let member = donor("Luca", "Bruni");
    let outsider = donor("Mario", "Esposito");
    let ledger = AdoptionLedger::new(
        vec![animal("Fido", "cane")],
        vec![member],
        DonorStatusController::default(),
    );

    let err = ledger.adopt(&outsider, "cane").unwrap_err();
    assert!(matches!(
        err,
        ShelterError::AuthorizationError { ref name, ref surname } if name == "Mario" && surname == "Esposito"
    ));
    assert_eq!(pool_names(&ledger), vec!["Fido"]);
    assert!(ledger.adoption_matches().is_empty());
    assert!(ledger.adopted_animals().is_empty());
    assert_eq!(outsider.status(), DonorStatus::None);
}

#[test]
fn test_cancel_with_wrong_animal_is_a_mismatch() {
    let d = donor("Luca", "Bruni");
    let ledger = AdoptionLedger::new(
        vec![animal("Fido", "cane"), animal("Micia", "gatto")],
        vec![Arc::clone(&d)],
        DonorStatusController::default(),
    );
    ledger.adopt(&d, "cane").unwrap();

    let err = ledger.cancel_adoption("Micia", &d).unwrap_err();
    assert!(matches!(err, ShelterError::AdoptionMismatchError { .. }));
    assert_eq!(d.status(), DonorStatus::Adopter);
    assert_eq!(pool_names(&ledger), vec!["Micia"]);
    assert_eq!(ledger.adopted_by(d.id()).unwrap().name(), "Fido");
    assert_partitioned(&ledger, &["Fido", "Micia"]);
}

#[test]
fn test_cancel_by_other_donor_is_a_mismatch() {
    let owner = donor("Luca", "Bruni");
    let other = donor("Pietro", "Gallo");
    let ledger = AdoptionLedger::new(
        vec![animal("Fido", "cane")],
        vec![Arc::clone(&owner), Arc::clone(&other)],
        DonorStatusController::default(),
    );
    ledger.adopt(&owner, "cane").unwrap();

    assert!(ledger.cancel_adoption("Fido", &other).is_err());
    assert_eq!(ledger.adoption_matches().len(), 1);
}

#[test]
fn test_adopt_cancel_cycle_keeps_partition() {
    let d = donor("Luca", "Bruni");
    let all = ["Fido", "Rex", "Micia"];
    let ledger = AdoptionLedger::new(
        vec![animal("Fido", "cane"), animal("Rex", "cane"), animal("Micia", "gatto")],
        vec![Arc::clone(&d)],
        DonorStatusController::default(),
    );

    for _ in 0..3 {
        let adopted = ledger.adopt(&d, "cane").unwrap();
        assert_partitioned(&ledger, &all);
        assert_eq!(d.status(), DonorStatus::Adopter);

        ledger.cancel_adoption(adopted.name(), &d).unwrap();
        assert_partitioned(&ledger, &all);
        assert_eq!(d.status(), DonorStatus::None);
    }
    // Returned animals go to the back of the queue.
    assert_eq!(pool_names(&ledger), vec!["Micia", "Rex", "Fido"]);
}

#[test]
fn test_same_name_donors_keep_separate_matches() {
    let a = donor("Luca", "Bruni");
    let b = donor("Luca", "Bruni");
    let ledger = AdoptionLedger::new(
        vec![animal("Fido", "cane"), animal("Rex", "cane")],
        vec![Arc::clone(&a)],
        DonorStatusController::default(),
    );

    ledger.adopt(&a, "cane").unwrap();
    // b passes the name check but has its own identity in the ledger.
    ledger.adopt(&b, "cane").unwrap();
    assert_eq!(ledger.adoption_matches().len(), 2);
    assert_eq!(ledger.adopted_by(a.id()).unwrap().name(), "Fido");
    assert_eq!(ledger.adopted_by(b.id()).unwrap().name(), "Rex");
}
