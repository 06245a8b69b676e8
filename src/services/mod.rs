//! External collaborator services consumed by transactions.
//!
//! The core interacts with authentication, flight search and booking
//! creation only through the traits in this module. Transactions perform
//! their side-effecting calls exclusively on the transition toward
//! completion, so an abandoned conversation leaves no partial state behind
//! these seams.
//!
//! In-memory reference implementations are provided for the CLI and tests;
//! a real relational store would live behind the same traits.

pub mod auth;
pub mod booking;
pub mod flight;

use std::sync::Arc;

pub use auth::{AuthService, InMemoryAuthService, UserInfo};
pub use booking::{BookingInfo, BookingService, InMemoryBookingService};
pub use flight::{FlightInfo, FlightService, InMemoryFlightService, TravelClass, Trip, TripType};

/// Bundle of collaborator services passed into transaction steps.
#[derive(Clone)]
pub struct Services {
    /// Authentication collaborator.
    pub auth: Arc<dyn AuthService>,
    /// Flight search collaborator.
    pub flight: Arc<dyn FlightService>,
    /// Booking creation collaborator.
    pub booking: Arc<dyn BookingService>,
}

impl Services {
    /// Build the in-memory service bundle with sample flights.
    pub fn in_memory() -> Self {
        Services {
            auth: Arc::new(InMemoryAuthService::new()),
            flight: Arc::new(InMemoryFlightService::with_sample_flights()),
            booking: Arc::new(InMemoryBookingService::new()),
        }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
