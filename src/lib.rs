#![forbid(unsafe_code)]

//! Menstrual cycle tracking backend.
//!
//! The core is [`engine`] (phase and prediction) and [`calendar`] (iCalendar
//! export). Both are pure; [`routes`] wires them to a [`store::CycleStore`]
//! and a [`clock::Clock`].

pub mod calendar;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod store;

pub use calendar::export_ics;
pub use engine::{compute_phase, compute_prediction, PhaseRules};
pub use error::{ApiError, StoreError, ValidationError};
