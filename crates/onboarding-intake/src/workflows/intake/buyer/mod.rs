//! Buyer (affiliate) intake: twelve sections across two phases.

mod blueprint;
pub mod records;
mod status;

pub use blueprint::BuyerSection;
pub use records::{
    BuyerIntakeRecords, BuyerSectionData, EscalationConfig, LabNetwork, Location,
    LocationCapacity, ProgramProfile, Provider, RadiologyNetwork, ServiceOffering, SubService,
};
pub use status::{evaluate_buyer, RADIOLOGY_COMPATIBILITY_OVERRIDE};
