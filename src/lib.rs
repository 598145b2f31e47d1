//! Course Selection Client
//!
//! Client-side logic for a university course-selection system: a typed
//! REST client, the persisted login identity, role-gated navigation and
//! the course-definition form with its 12-hour time-range rendering.

pub mod access;
pub mod api;
pub mod app;
pub mod config;
pub mod course;
pub mod identity;
pub mod platform;
pub mod time_range;
