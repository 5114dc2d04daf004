//! MediPulse - Conversational Health Intake Backend
//!
//! This crate implements a staged health-intake conversation: a fixed
//! questionnaire followed by an open-ended, AI-assisted assessment.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
