//! Service module - control of the remote dust bot
//!
//! `client` speaks the backend's JSON API; `controller` runs the lifecycle
//! actions and turns their results into presentation events.

pub mod types;
pub mod client;
pub mod controller;

pub use types::{
    ServiceStatusSnapshot, RunBotResponse, BurnResponse, ActionRequest, ServiceError,
    NO_LOGS_SENTINEL, DEFAULT_USER_ID,
};
pub use client::{ServiceBackend, HttpServiceClient};
pub use controller::ServiceController;
