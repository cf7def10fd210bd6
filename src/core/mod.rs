pub mod adoption;
pub mod groups;
pub mod shelter;
pub mod slots;
pub mod status;
pub mod visits;

pub use crate::domain::model::{Animal, Donor, DonorStatus, Period, SlotOffer, Visit, VisitId};
pub use crate::domain::ports::{ActiveVisitProbe, SlotOccupancy};
pub use crate::utils::error::Result;
