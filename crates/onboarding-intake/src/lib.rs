//! Completion tracking and phase gating for buyer and seller onboarding intake.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
