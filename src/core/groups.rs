//! Clinical operations over a tree of animals.
//!
//! A group is either a single animal or a named node with ordered children.
//! Every operation is one recursive walk that skips excluded animal names.

use crate::domain::model::{Admin, Animal};
use crate::utils::error::{Result, ShelterError};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClinicalOperation {
    Vaccination { vaccine: String },
    Sterilization,
    MedicalCare { under_care: bool, condition: String },
    MedicalNote { note: String },
}

impl fmt::Display for ClinicalOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClinicalOperation::Vaccination { vaccine } => write!(f, "vaccination ({})", vaccine),
            ClinicalOperation::Sterilization => f.write_str("sterilization"),
            ClinicalOperation::MedicalCare { under_care: true, .. } => {
                f.write_str("medical care assignment")
            }
            ClinicalOperation::MedicalCare { under_care: false, .. } => {
                f.write_str("medical care discharge")
            }
            ClinicalOperation::MedicalNote { .. } => f.write_str("medical note"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    pub treated: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HealthSummary {
    pub total: usize,
    pub vaccinated: usize,
    pub sterilized: usize,
    pub under_care: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnimalGroup {
    Leaf(Animal),
    Node {
        name: String,
        kind: String,
        children: Vec<AnimalGroup>,
    },
}

impl AnimalGroup {
    pub fn group(name: &str, kind: &str) -> Self {
        AnimalGroup::Node {
            name: name.to_string(),
            kind: kind.to_string(),
            children: Vec::new(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            AnimalGroup::Leaf(animal) => animal.name().to_string(),
            AnimalGroup::Node { name, kind, .. } => format!("{} ({})", name, kind),
        }
    }

    pub fn add(&mut self, child: AnimalGroup) -> Result<()> {
        match self {
            AnimalGroup::Node { children, .. } => {
                children.push(child);
                Ok(())
            }
            AnimalGroup::Leaf(animal) => Err(ShelterError::validation(
                "group",
                animal.name(),
                "Cannot add children to a single animal",
            )),
        }
    }

    /// Removes the direct child with the given label.
    pub fn remove(&mut self, label: &str) -> Option<AnimalGroup> {
        let AnimalGroup::Node { children, .. } = self else {
            return None;
        };
        let position = children.iter().position(|c| c.label() == label)?;
        Some(children.remove(position))
    }

    pub fn child(&self, index: usize) -> Result<&AnimalGroup> {
        let children: &[AnimalGroup] = match self {
            AnimalGroup::Node { children, .. } => children,
            AnimalGroup::Leaf(_) => &[],
        };
        children.get(index).ok_or_else(|| {
            ShelterError::validation(
                "index",
                &index.to_string(),
                format!("Invalid index (group size: {})", children.len()),
            )
        })
    }

    pub fn count(&self) -> usize {
        match self {
            AnimalGroup::Leaf(_) => 1,
            AnimalGroup::Node { children, .. } => children.iter().map(AnimalGroup::count).sum(),
        }
    }

    pub fn animals(&self) -> Vec<&Animal> {
        let mut out = Vec::new();
        self.collect_animals(&mut out);
        out
    }

    fn collect_animals<'a>(&'a self, out: &mut Vec<&'a Animal>) {
        match self {
            AnimalGroup::Leaf(animal) => out.push(animal),
            AnimalGroup::Node { children, .. } => {
                for child in children {
                    child.collect_animals(out);
                }
            }
        }
    }

    pub fn health_summary(&self) -> HealthSummary {
        self.animals()
            .into_iter()
            .fold(HealthSummary::default(), |mut summary, animal| {
                let health = animal.health();
                summary.total += 1;
                summary.vaccinated += usize::from(health.vaccinated);
                summary.sterilized += usize::from(health.sterilized);
                summary.under_care += usize::from(health.under_medical_care);
                summary
            })
    }

    /// Applies `operation` to every animal in the tree except those named in `exclude`.
    ///
    /// Only veterinarians may operate, and every excluded name must be a
    /// direct member of this group.
    pub fn perform(
        &mut self,
        operation: &ClinicalOperation,
        vet: &Admin,
        date: NaiveDate,
        exclude: &[String],
    ) -> Result<GroupReport> {
        if !vet.is_veterinarian() {
            return Err(ShelterError::PermissionDeniedError {
                who: format!("{} {}", vet.name, vet.surname),
                operation: operation.to_string(),
            });
        }
        self.validate_exclusions(exclude)?;

        let mut report = GroupReport::default();
        let vet_name = vet.display_name();
        self.apply(operation, &vet_name, date, exclude, &mut report);

        tracing::info!(
            "Group {} completed on {} by {}: {} treated, {} skipped",
            operation,
            self.label(),
            vet_name,
            report.treated.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn apply(
        &mut self,
        operation: &ClinicalOperation,
        vet: &str,
        date: NaiveDate,
        exclude: &[String],
        report: &mut GroupReport,
    ) {
        match self {
            AnimalGroup::Leaf(animal) => {
                if exclude.iter().any(|name| name == animal.name()) {
                    report.skipped.push(animal.name().to_string());
                    return;
                }
                match operation {
                    ClinicalOperation::Vaccination { vaccine } => animal.vaccinate(vaccine, date, vet),
                    ClinicalOperation::Sterilization => animal.sterilize(date, vet),
                    ClinicalOperation::MedicalCare {
                        under_care,
                        condition,
                    } => animal.set_medical_care(*under_care, condition, date, vet),
                    ClinicalOperation::MedicalNote { note } => {
                        animal.add_medical_note(note, date, vet)
                    }
                }
                report.treated.push(animal.name().to_string());
            }
            AnimalGroup::Node { children, .. } => {
                for child in children {
                    child.apply(operation, vet, date, exclude, report);
                }
            }
        }
    }

    fn validate_exclusions(&self, exclude: &[String]) -> Result<()> {
        if exclude.is_empty() {
            return Ok(());
        }
        let members: Vec<&str> = match self {
            AnimalGroup::Leaf(animal) => vec![animal.name()],
            AnimalGroup::Node { children, .. } => children
                .iter()
                .filter_map(|c| match c {
                    AnimalGroup::Leaf(animal) => Some(animal.name()),
                    AnimalGroup::Node { .. } => None,
                })
                .collect(),
        };
        let missing: Vec<&str> = exclude
            .iter()
            .map(String::as_str)
            .filter(|name| !members.contains(name))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ShelterError::validation(
                "exclude",
                &missing.join(", "),
                format!(
                    "Animals not found in group '{}'. Available animals: {}",
                    self.label(),
                    members.join(", ")
                ),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Sex, StaffRole};

    fn vet() -> Admin {
        Admin::new(Sex::F, "Anna", "Verdi", "1979-04-02", "veterinarian", StaffRole::Veterinarian)
            .unwrap()
    }

    fn leaf(name: &str, species: &str) -> AnimalGroup {
        AnimalGroup::Leaf(Animal::new(Sex::M, name, species).unwrap())
    }

    fn kennel() -> AnimalGroup {
        let mut cats = AnimalGroup::group("Cattery", "gatto");
        cats.add(leaf("Tom", "gatto")).unwrap();
        cats.add(leaf("Kira", "gatto")).unwrap();

        let mut root = AnimalGroup::group("Shelter", "building A");
        root.add(leaf("Fido", "cane")).unwrap();
        root.add(leaf("Rex", "cane")).unwrap();
        root.add(cats).unwrap();
        root
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_count_is_recursive() {
        let root = kennel();
        assert_eq!(root.count(), 4);
        assert_eq!(root.child(2).unwrap().count(), 2);
        assert!(root.child(3).is_err());
    }

    #[test]
    fn test_vaccination_reaches_nested_animals() {
        let mut root = kennel();
        let op = ClinicalOperation::Vaccination {
            vaccine: "rabies".to_string(),
        };
        let report = root.perform(&op, &vet(), today(), &[]).unwrap();
        assert_eq!(report.treated, vec!["Fido", "Rex", "Tom", "Kira"]);
        assert_eq!(root.health_summary().vaccinated, 4);
    }

    #[test]
    fn test_exclusions_are_skipped() {
        let mut root = kennel();
        let report = root
            .perform(&ClinicalOperation::Sterilization, &vet(), today(), &["Rex".to_string()])
            .unwrap();
        assert_eq!(report.skipped, vec!["Rex"]);
        assert_eq!(root.health_summary().sterilized, 3);
    }

    #[test]
    fn test_unknown_exclusion_is_rejected() {
        let mut root = kennel();
        let err = root
            .perform(&ClinicalOperation::Sterilization, &vet(), today(), &["Ghost".to_string()])
            .unwrap_err();
        assert!(matches!(err, ShelterError::ValidationError { .. }));
        assert_eq!(root.health_summary().sterilized, 0);
    }

    #[test]
    fn test_only_veterinarians_operate() {
        let admin =
            Admin::new(Sex::M, "Bruno", "Sala", "1970-09-09", "manager", StaffRole::Admin).unwrap();
        let mut root = kennel();
        let err = root
            .perform(&ClinicalOperation::Sterilization, &admin, today(), &[])
            .unwrap_err();
        assert!(matches!(err, ShelterError::PermissionDeniedError { .. }));
    }

    #[test]
    fn test_medical_care_and_discharge() {
        let mut root = kennel();
        let assign = ClinicalOperation::MedicalCare {
            under_care: true,
            condition: "flu".to_string(),
        };
        root.perform(&assign, &vet(), today(), &[]).unwrap();
        assert_eq!(root.health_summary().under_care, 4);

        let discharge = ClinicalOperation::MedicalCare {
            under_care: false,
            condition: "flu".to_string(),
        };
        root.perform(&discharge, &vet(), today(), &[]).unwrap();
        assert_eq!(root.health_summary().under_care, 0);
    }

    #[test]
    fn test_remove_child_by_label() {
        let mut root = kennel();
        let removed = root.remove("Fido").unwrap();
        assert_eq!(removed.label(), "Fido");
        assert_eq!(root.count(), 3);
        assert!(root.remove("Fido").is_none());
        assert!(root.remove("Cattery (gatto)").is_some());
        assert_eq!(root.count(), 1);
    }
}
