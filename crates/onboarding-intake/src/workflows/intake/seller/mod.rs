//! Seller intake: seven sections in a single phase.

mod blueprint;
pub mod records;
mod status;

pub use blueprint::SellerSection;
pub use records::{
    CareLocation, Clinician, EscalationContacts, SellerIntakeRecords, SellerOrganization,
    SellerSectionData, SellerServiceOffering,
};
pub use status::evaluate_seller;
