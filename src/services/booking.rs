//! Booking collaborator: creation and reference lookup.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::services::flight::{TravelClass, Trip, TripType};

/// Length of the generated booking reference.
const REFERENCE_LENGTH: usize = 6;

/// Characters a booking reference is drawn from.
const REFERENCE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A confirmed booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingInfo {
    /// Booking id.
    pub id: u64,
    /// Six-character reference code.
    pub reference: String,
    /// One-way or round trip.
    pub trip_type: TripType,
    /// Outbound flight id.
    pub outbound_flight_id: u64,
    /// Return flight id, for round trips.
    pub return_flight_id: Option<u64>,
    /// Booked travel class.
    pub travel_class: TravelClass,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Owning user id.
    pub user_id: u64,
    /// Total charged amount.
    pub total_amount: f64,
}

/// Booking collaborator contract.
pub trait BookingService: Send + Sync {
    /// Create a booking for the given user, trip and class.
    fn create_booking(&self, user_id: u64, trip: &Trip, class: TravelClass)
    -> Result<BookingInfo>;

    /// Look up a booking by reference code.
    fn find_by_reference(&self, reference: &str) -> Option<BookingInfo>;
}

/// In-memory booking store.
pub struct InMemoryBookingService {
    bookings: Mutex<Vec<BookingInfo>>,
}

impl InMemoryBookingService {
    /// Create an empty booking store.
    pub fn new() -> Self {
        InMemoryBookingService {
            bookings: Mutex::new(Vec::new()),
        }
    }

    /// Number of bookings created so far.
    pub fn len(&self) -> usize {
        self.bookings.lock().expect("booking store poisoned").len()
    }

    /// Check whether any bookings exist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn generate_reference(existing: &[BookingInfo]) -> String {
        let mut rng = rand::rng();
        loop {
            let reference: String = (0..REFERENCE_LENGTH)
                .map(|_| REFERENCE_CHARS[rng.random_range(0..REFERENCE_CHARS.len())] as char)
                .collect();
            if !existing.iter().any(|b| b.reference == reference) {
                return reference;
            }
        }
    }
}

impl Default for InMemoryBookingService {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingService for InMemoryBookingService {
    fn create_booking(
        &self,
        user_id: u64,
        trip: &Trip,
        class: TravelClass,
    ) -> Result<BookingInfo> {
        let mut bookings = self.bookings.lock().expect("booking store poisoned");

        let booking = BookingInfo {
            id: bookings.len() as u64 + 1,
            reference: Self::generate_reference(&bookings),
            trip_type: trip.trip_type,
            outbound_flight_id: trip.outbound.id,
            return_flight_id: trip.return_flight.as_ref().map(|f| f.id),
            travel_class: class,
            created_at: Utc::now(),
            user_id,
            total_amount: trip.price(class),
        };

        bookings.push(booking.clone());
        Ok(booking)
    }

    fn find_by_reference(&self, reference: &str) -> Option<BookingInfo> {
        let query = reference.trim().to_uppercase();
        self.bookings
            .lock()
            .expect("booking store poisoned")
            .iter()
            .find(|b| b.reference == query)
            .cloned()
    }
}
