//! Network layer - remote calls for the app layer
//!
//! The Network actor receives commands, runs the matching service wrapper
//! on the runtime and sends back responses.

pub mod actor;
pub mod client;
pub mod services;

pub use actor::NetworkActor;
