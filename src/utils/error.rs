use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelterError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingFieldError { field: String },

    #[error("Slot {date} {period} is full (capacity {capacity})")]
    CapacityExceededError {
        date: String,
        period: String,
        capacity: usize,
    },

    #[error("Invalid visit ID format: '{raw}'")]
    InvalidVisitIdError { raw: String },

    #[error("Visit not found with ID: {id}")]
    VisitNotFoundError { id: u64 },

    #[error("Visit {id} is not active")]
    InactiveVisitError { id: u64 },

    #[error("Donor {name} {surname} is not authorized to adopt")]
    AuthorizationError { name: String, surname: String },

    #[error("No animals available for adoption")]
    NoAnimalsAvailableError,

    #[error("No animal of species '{species}' available for adoption")]
    SpeciesUnavailableError { species: String },

    #[error("Donor {donor} already adopted '{animal}'")]
    AlreadyAdoptedError { donor: String, animal: String },

    #[error("Animal '{animal}' not found in adoption records for donor {donor}")]
    AdoptionMismatchError { animal: String, donor: String },

    #[error("{who} is not allowed to perform {operation}")]
    PermissionDeniedError { who: String, operation: String },

    #[error("Roster error in {path} line {line}: {reason}")]
    RosterError {
        path: String,
        line: u64,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Capacity,
    Lookup,
    State,
    Authorization,
    Availability,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ShelterError {
    pub fn validation(field: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. }
            | Self::MissingFieldError { .. }
            | Self::InvalidVisitIdError { .. } => ErrorCategory::Input,
            Self::CapacityExceededError { .. } => ErrorCategory::Capacity,
            Self::VisitNotFoundError { .. } | Self::AdoptionMismatchError { .. } => {
                ErrorCategory::Lookup
            }
            Self::InactiveVisitError { .. } | Self::AlreadyAdoptedError { .. } => {
                ErrorCategory::State
            }
            Self::AuthorizationError { .. } | Self::PermissionDeniedError { .. } => {
                ErrorCategory::Authorization
            }
            Self::NoAnimalsAvailableError | Self::SpeciesUnavailableError { .. } => {
                ErrorCategory::Availability
            }
            Self::ConfigError { .. } | Self::TomlError(_) | Self::RosterError { .. } => {
                ErrorCategory::Configuration
            }
            Self::IoError(_) | Self::CsvError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Lookup | ErrorCategory::State => {
                ErrorSeverity::Low
            }
            ErrorCategory::Capacity | ErrorCategory::Availability => ErrorSeverity::Medium,
            ErrorCategory::Authorization | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Domain errors never poison the registry or ledger; the caller may retry
    /// with corrected input.
    pub fn is_recoverable(&self) -> bool {
        self.category() != ErrorCategory::System
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ValidationError { field, .. } => {
                format!("Check the value of '{}' and try again", field)
            }
            Self::MissingFieldError { field } => format!("Provide a value for '{}'", field),
            Self::CapacityExceededError { .. } => {
                "Pick another date or period; list open slots with `shelter slots`".to_string()
            }
            Self::InvalidVisitIdError { .. } => "Visit IDs are positive integers".to_string(),
            Self::VisitNotFoundError { .. } => {
                "Use the ID returned when the visit was booked".to_string()
            }
            Self::InactiveVisitError { .. } => "Book a new visit instead".to_string(),
            Self::AlreadyAdoptedError { .. } => {
                "Cancel the current adoption before adopting again".to_string()
            }
            Self::AuthorizationError { .. } => {
                "Only donors listed in the roster can adopt".to_string()
            }
            Self::NoAnimalsAvailableError => "Try again once animals are back in the pool".to_string(),
            Self::SpeciesUnavailableError { .. } => {
                "Ask for a different species".to_string()
            }
            Self::AdoptionMismatchError { .. } => {
                "Check which animal this donor actually adopted".to_string()
            }
            Self::PermissionDeniedError { .. } => {
                "Ask a veterinarian to perform the operation".to_string()
            }
            Self::ConfigError { .. } | Self::TomlError(_) => {
                "Fix the configuration file and restart".to_string()
            }
            Self::RosterError { path, .. } => format!("Fix the malformed row in {}", path),
            Self::IoError(_) | Self::CsvError(_) => {
                "Check that the file exists and is readable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Invalid input: {}", self),
            ErrorCategory::Capacity => format!("Booking refused: {}", self),
            ErrorCategory::Lookup => format!("Not found: {}", self),
            ErrorCategory::State => format!("Operation not allowed: {}", self),
            ErrorCategory::Authorization => format!("Access denied: {}", self),
            ErrorCategory::Availability => format!("Adoption unavailable: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("File system error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShelterError>;
