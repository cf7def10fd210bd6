//! CSV roster loading: the adoptable pool and the people file.
//!
//! Rows that fail to parse or validate are skipped and reported, the way the
//! shelter staff expect a partially broken export to still load.

use crate::config::toml_config::RosterConfig;
use crate::domain::model::{Admin, Animal, Donor, Person, Sex};
use crate::utils::error::{Result, ShelterError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct AnimalRow {
    sex: String,
    name: String,
    species: String,
}

#[derive(Debug, Deserialize)]
struct PersonRow {
    kind: String,
    sex: String,
    name: String,
    surname: String,
    birth_date: String,
    profession: String,
    role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RosterReport {
    pub source: String,
    pub loaded: usize,
    pub skipped: Vec<String>,
}

impl RosterReport {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            ..Self::default()
        }
    }

    /// Records a rejected row as a `RosterError` and moves on.
    fn skip(&mut self, line: u64, reason: impl std::fmt::Display) {
        let err = ShelterError::RosterError {
            path: self.source.clone(),
            line,
            reason: reason.to_string(),
        };
        tracing::warn!("Invalid row ignored: {}", err);
        self.skipped.push(err.to_string());
    }
}

#[derive(Debug, Clone)]
pub struct Roster {
    pub animals: Vec<Animal>,
    pub people: Vec<Person>,
    pub reports: Vec<RosterReport>,
}

impl Roster {
    pub fn donors(&self) -> Vec<Arc<Donor>> {
        self.people.iter().filter_map(Person::as_donor).cloned().collect()
    }

    pub fn staff(&self) -> Vec<&Admin> {
        self.people.iter().filter_map(Person::as_admin).collect()
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader)
}

/// Physical line of the row whose read started at `pos`.
///
/// The csv reader swallows comment and blank lines together with the row that
/// follows them, so its start position can sit a few lines early.
fn row_line(content: &str, pos: &csv::Position) -> u64 {
    let rest = content.get(pos.byte() as usize..).unwrap_or_default();
    let mut line = pos.line();
    for text in rest.split('\n') {
        let text = text.strip_suffix('\r').unwrap_or(text);
        if !(text.is_empty() || text.starts_with('#')) {
            break;
        }
        line += 1;
    }
    line
}

/// Reads every data row, converting each with `convert`.
///
/// I/O errors abort the load; any row that fails to parse or convert is
/// skipped and reported with its physical line number.
fn read_rows<R, T, U>(
    mut reader: R,
    source: &str,
    convert: impl Fn(T) -> Result<U>,
) -> Result<(Vec<U>, RosterReport)>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    let mut report = RosterReport::new(source);
    let mut rows = Vec::new();
    let mut csv = csv_reader(content.as_bytes());
    let headers = csv.headers()?.clone();

    for record in csv.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| row_line(&content, p)).unwrap_or_default();
                report.skip(line, e);
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| row_line(&content, p))
            .unwrap_or_default();

        match record
            .deserialize::<T>(Some(&headers))
            .map_err(ShelterError::from)
            .and_then(&convert)
        {
            Ok(row) => rows.push(row),
            Err(e) => report.skip(line, e),
        }
    }

    report.loaded = rows.len();
    Ok((rows, report))
}

pub fn read_animals<R: Read>(reader: R, source: &str) -> Result<(Vec<Animal>, RosterReport)> {
    let (animals, report) = read_rows(reader, source, |row: AnimalRow| {
        let sex: Sex = row.sex.parse()?;
        Animal::new(sex, &row.name, &row.species)
    })?;
    tracing::info!("Successfully loaded {} animals from {}", report.loaded, source);
    Ok((animals, report))
}

pub fn read_people<R: Read>(reader: R, source: &str) -> Result<(Vec<Person>, RosterReport)> {
    let (people, report) = read_rows(reader, source, |row: PersonRow| person_from_row(&row))?;
    tracing::info!("Successfully loaded {} people from {}", report.loaded, source);
    Ok((people, report))
}

fn person_from_row(row: &PersonRow) -> Result<Person> {
    let sex: Sex = row.sex.parse()?;
    match (row.kind.as_str(), row.role.as_str()) {
        ("Donor", "DONOR") => Ok(Person::Donor(Arc::new(Donor::new(
            sex,
            &row.name,
            &row.surname,
            &row.birth_date,
        )?))),
        ("Donor", other) => Err(ShelterError::validation(
            "role",
            other,
            "Donor must have DONOR role",
        )),
        ("Admin", role) => Ok(Person::Admin(Admin::new(
            sex,
            &row.name,
            &row.surname,
            &row.birth_date,
            &row.profession,
            role.parse()?,
        )?)),
        (other, _) => Err(ShelterError::validation(
            "kind",
            other,
            "Expected Admin or Donor",
        )),
    }
}

pub fn load_animals<P: AsRef<Path>>(path: P) -> Result<(Vec<Animal>, RosterReport)> {
    let path = path.as_ref();
    read_animals(File::open(path)?, &path.display().to_string())
}

pub fn load_people<P: AsRef<Path>>(path: P) -> Result<(Vec<Person>, RosterReport)> {
    let path = path.as_ref();
    read_people(File::open(path)?, &path.display().to_string())
}

/// Loads both roster files, resolving relative paths against `base_dir`.
pub fn load_roster(config: &RosterConfig, base_dir: &Path) -> Result<Roster> {
    let (animals, animal_report) = load_animals(base_dir.join(&config.animals))?;
    let (people, people_report) = load_people(base_dir.join(&config.people))?;
    Ok(Roster {
        animals,
        people,
        reports: vec![animal_report, people_report],
    })
}
