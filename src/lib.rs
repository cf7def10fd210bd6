pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::ShelterConfig;
pub use core::{
    adoption::AdoptionLedger, shelter::Shelter, status::DonorStatusController,
    visits::VisitRegistry,
};
pub use utils::error::{Result, ShelterError};
