//! Booking status lookup state machine.
//!
//! ```text
//! Init → AwaitingReference → Completed / Failed
//! ```
//!
//! A short flow: collect a reference code, look it up, report. Lookup needs
//! no authentication since a reference code is the bearer credential.

use log::debug;

use crate::services::Services;
use crate::transaction::RetryBudget;

/// States of the status lookup flow, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusState {
    /// Acknowledging the request.
    Init,
    /// Waiting for the booking reference.
    AwaitingReference,
    /// Terminal: booking found and reported.
    Completed,
    /// Terminal: retry budget exhausted.
    Failed,
}

/// Booking status lookup flow.
#[derive(Debug)]
pub struct StatusFlow {
    state: StatusState,
    retries: RetryBudget,
}

impl StatusFlow {
    /// Create a fresh flow with the given retry bound.
    pub fn new(max_retries: usize) -> Self {
        StatusFlow {
            state: StatusState::Init,
            retries: RetryBudget::new(max_retries),
        }
    }

    /// Current state.
    pub fn state(&self) -> StatusState {
        self.state
    }

    /// Consume one message.
    pub fn step(&mut self, input: &str, services: &Services) -> String {
        match self.state {
            StatusState::Init => {
                debug!("status flow: Init -> AwaitingReference");
                self.state = StatusState::AwaitingReference;
                "Please enter your booking reference (6 characters):".to_string()
            }
            StatusState::AwaitingReference => self.handle_reference(input, services),
            StatusState::Completed | StatusState::Failed => {
                "This status check is already finished.".to_string()
            }
        }
    }

    fn handle_reference(&mut self, input: &str, services: &Services) -> String {
        let reference = input.trim();
        match services.booking.find_by_reference(reference) {
            Some(booking) => {
                debug!("status flow: AwaitingReference -> Completed");
                self.state = StatusState::Completed;
                format!(
                    "Booking {} is confirmed: {} trip in {} class, booked on {}. Total paid: £{:.2}",
                    booking.reference,
                    booking.trip_type,
                    booking.travel_class,
                    booking.created_at.format("%Y-%m-%d"),
                    booking.total_amount,
                )
            }
            None => {
                if self.retries.record_failure() {
                    self.state = StatusState::Failed;
                    "I couldn't find a booking under any of those references. Please double-check your confirmation email.".to_string()
                } else {
                    format!(
                        "I couldn't find a booking with reference \"{reference}\". Please check and enter it again:"
                    )
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Days, NaiveTime};

    use super::*;
    use crate::services::flight::FlightInfo;
    use crate::services::{
        BookingService, InMemoryAuthService, InMemoryBookingService, InMemoryFlightService,
        TravelClass, Trip, TripType,
    };

    fn services_with_booking() -> (Services, String) {
        let booking = Arc::new(InMemoryBookingService::new());
        let trip = Trip {
            trip_type: TripType::OneWay,
            outbound: FlightInfo {
                id: 1,
                origin_location: "London".into(),
                origin_code: "LHR".into(),
                destination_location: "Paris".into(),
                destination_code: "CDG".into(),
                departure_date: chrono::Local::now().date_naive() + Days::new(10),
                departure_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
                base_price: 100.0,
            },
            return_flight: None,
        };
        let reference = booking
            .create_booking(1, &trip, TravelClass::Economy)
            .unwrap()
            .reference;

        let services = Services {
            auth: Arc::new(InMemoryAuthService::new()),
            flight: Arc::new(InMemoryFlightService::with_sample_flights()),
            booking,
        };
        (services, reference)
    }

    #[test]
    fn test_lookup_happy_path() {
        let (services, reference) = services_with_booking();
        let mut flow = StatusFlow::new(3);

        let reply = flow.step("what's the status of my booking", &services);
        assert_eq!(flow.state(), StatusState::AwaitingReference);
        assert!(reply.contains("reference"));

        let reply = flow.step(&reference, &services);
        assert_eq!(flow.state(), StatusState::Completed);
        assert!(reply.contains(&reference));
        assert!(reply.contains("confirmed"));
    }

    #[test]
    fn test_unknown_reference_retries_then_fails() {
        let (services, _) = services_with_booking();
        let mut flow = StatusFlow::new(2);

        flow.step("status please", &services);
        flow.step("AAAAAA", &services);
        flow.step("BBBBBB", &services);
        assert_eq!(flow.state(), StatusState::AwaitingReference);

        flow.step("CCCCCC", &services);
        assert_eq!(flow.state(), StatusState::Failed);

        // Terminal states accept no further transitions
        flow.step("DDDDDD", &services);
        assert_eq!(flow.state(), StatusState::Failed);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let (services, reference) = services_with_booking();
        let mut flow = StatusFlow::new(3);

        flow.step("check my booking", &services);
        flow.step(&reference.to_lowercase(), &services);
        assert_eq!(flow.state(), StatusState::Completed);
    }
}
