//! Stylist Desk: client for the salon stylist onboarding workflow.

pub mod api;
pub mod config;
pub mod error;
pub mod invitation;
pub mod stylists;
