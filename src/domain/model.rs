use crate::utils::error::{Result, ShelterError};
use crate::utils::validation::{validate_date, validate_name};
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Stable opaque identity of a donor. Names are not unique; this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DonorId(Uuid);

impl DonorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DonorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DonorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    F,
    M,
}

impl FromStr for Sex {
    type Err = ShelterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "F" | "f" => Ok(Sex::F),
            "M" | "m" => Ok(Sex::M),
            other => Err(ShelterError::validation(
                "sex",
                other,
                "Sex must be F or M",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DonorStatus {
    #[default]
    None,
    Visitor,
    Adopter,
}

impl fmt::Display for DonorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DonorStatus::None => "None",
            DonorStatus::Visitor => "Visitor",
            DonorStatus::Adopter => "Adopter",
        };
        f.write_str(label)
    }
}

/// A person holding the donor role.
///
/// Status can be read by anyone but only
/// [`DonorStatusController`](crate::core::status::DonorStatusController) writes it.
#[derive(Debug)]
pub struct Donor {
    id: DonorId,
    sex: Sex,
    name: String,
    surname: String,
    birth_date: NaiveDate,
    status: Mutex<DonorStatus>,
}

impl Donor {
    pub fn new(sex: Sex, name: &str, surname: &str, birth_date: &str) -> Result<Self> {
        Ok(Self {
            id: DonorId::new(),
            sex,
            name: validate_name("name", name)?,
            surname: validate_name("surname", surname)?,
            birth_date: validate_date("birth_date", birth_date)?,
            status: Mutex::new(DonorStatus::None),
        })
    }

    pub fn id(&self) -> DonorId {
        self.id
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn status(&self) -> DonorStatus {
        *self.status.lock()
    }

    /// Case-insensitive name and surname comparison used for roster authorization.
    pub fn matches_name(&self, name: &str, surname: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
            && self.surname.eq_ignore_ascii_case(surname.trim())
    }

    pub(crate) fn status_cell(&self) -> &Mutex<DonorStatus> {
        &self.status
    }
}

impl fmt::Display for Donor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (status: {})", self.full_name(), self.status())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Admin,
    Veterinarian,
}

impl FromStr for StaffRole {
    type Err = ShelterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "ADMIN" => Ok(StaffRole::Admin),
            "VETERINARIAN" => Ok(StaffRole::Veterinarian),
            other => Err(ShelterError::validation(
                "role",
                other,
                "Staff can only have ADMIN or VETERINARIAN role",
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Admin {
    pub sex: Sex,
    pub name: String,
    pub surname: String,
    pub birth_date: NaiveDate,
    pub profession: String,
    pub role: StaffRole,
}

impl Admin {
    pub fn new(
        sex: Sex,
        name: &str,
        surname: &str,
        birth_date: &str,
        profession: &str,
        role: StaffRole,
    ) -> Result<Self> {
        Ok(Self {
            sex,
            name: validate_name("name", name)?,
            surname: validate_name("surname", surname)?,
            birth_date: validate_date("birth_date", birth_date)?,
            profession: profession.trim().to_lowercase(),
            role,
        })
    }

    pub fn is_veterinarian(&self) -> bool {
        self.role == StaffRole::Veterinarian
    }

    pub fn display_name(&self) -> String {
        format!("Dr. {} {}", self.name, self.surname)
    }
}

/// Anyone produced by roster loading.
#[derive(Debug, Clone)]
pub enum Person {
    Donor(Arc<Donor>),
    Admin(Admin),
}

impl Person {
    pub fn as_donor(&self) -> Option<&Arc<Donor>> {
        match self {
            Person::Donor(d) => Some(d),
            Person::Admin(_) => None,
        }
    }

    pub fn as_admin(&self) -> Option<&Admin> {
        match self {
            Person::Admin(a) => Some(a),
            Person::Donor(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthRecord {
    pub vaccinated: bool,
    pub sterilized: bool,
    pub under_medical_care: bool,
    pub last_vaccination: Option<NaiveDate>,
    pub sterilization_date: Option<NaiveDate>,
    pub condition: Option<String>,
    pub veterinarian: Option<String>,
    pub history: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Animal {
    name: String,
    sex: Sex,
    species: String,
    health: HealthRecord,
}

impl Animal {
    pub fn new(sex: Sex, name: &str, species: &str) -> Result<Self> {
        Ok(Self {
            name: validate_name("name", name)?,
            sex,
            species: validate_name("species", species)?.to_lowercase(),
            health: HealthRecord::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn health(&self) -> &HealthRecord {
        &self.health
    }

    pub fn is_species(&self, species: &str) -> bool {
        self.species.eq_ignore_ascii_case(species.trim())
    }

    pub fn vaccinate(&mut self, vaccine: &str, date: NaiveDate, vet: &str) {
        self.health.vaccinated = true;
        self.health.last_vaccination = Some(date);
        self.add_medical_note(&format!("Vaccine: {}", vaccine), date, vet);
    }

    pub fn sterilize(&mut self, date: NaiveDate, vet: &str) {
        self.health.sterilized = true;
        self.health.sterilization_date = Some(date);
        self.add_medical_note("Sterilization performed", date, vet);
    }

    pub fn set_medical_care(&mut self, under_care: bool, condition: &str, date: NaiveDate, vet: &str) {
        self.health.under_medical_care = under_care;
        if under_care {
            self.health.condition = Some(condition.to_string());
            self.health.veterinarian = Some(vet.to_string());
            self.add_medical_note(&format!("Under care: {}", condition), date, vet);
        } else {
            self.health.condition = None;
            self.health.veterinarian = None;
            self.add_medical_note(&format!("Discharged: {}", condition), date, vet);
        }
    }

    pub fn add_medical_note(&mut self, note: &str, date: NaiveDate, vet: &str) {
        self.health
            .history
            .push(format!("{} - {}: {}", date.format("%Y-%m-%d"), vet, note));
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.species)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Morning,
    Afternoon,
}

impl Period {
    /// Scan order within a day.
    pub const ALL: [Period; 2] = [Period::Morning, Period::Afternoon];
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Morning => f.write_str("Morning"),
            Period::Afternoon => f.write_str("Afternoon"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisitId(u64);

impl VisitId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for VisitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VisitId {
    type Err = ShelterError;

    /// Accepts ASCII digits only: no sign, no surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ShelterError::InvalidVisitIdError { raw: s.to_string() };
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        s.parse::<u64>().map(VisitId).map_err(|_| invalid())
    }
}

/// Snapshot of a booked visit. Only the visit registry creates these.
#[derive(Debug, Clone)]
pub struct Visit {
    pub(crate) id: VisitId,
    pub(crate) donor: Arc<Donor>,
    pub(crate) date: NaiveDate,
    pub(crate) period: Period,
    pub(crate) active: bool,
}

impl Visit {
    pub fn id(&self) -> VisitId {
        self.id
    }

    pub fn donor(&self) -> &Arc<Donor> {
        &self.donor
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn occupies(&self, date: NaiveDate, period: Period) -> bool {
        self.active && self.date == date && self.period == period
    }
}

impl fmt::Display for Visit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {} [{}]",
            self.id,
            self.date.format("%Y-%m-%d"),
            self.period,
            self.donor.full_name(),
            if self.active { "active" } else { "cancelled" }
        )
    }
}

/// An open slot yielded by the availability scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotOffer {
    pub date: NaiveDate,
    pub period: Period,
    pub remaining: usize,
}

impl fmt::Display for SlotOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} spaces available)",
            self.date.format("%Y-%m-%d"),
            self.period,
            self.remaining
        )
    }
}

/// Snapshot of one donor → animal match.
#[derive(Debug, Clone)]
pub struct AdoptionRecord {
    pub donor: Arc<Donor>,
    pub animal: Animal,
}
