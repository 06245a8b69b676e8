//! Flight booking state machine.
//!
//! ```text
//! Init → Origin → Destination → OutboundDate → [ReturnDate] → TravelClass
//!      → FlightSelection → Confirmation → Completed / Failed
//! ```
//!
//! `ReturnDate` is visited only for round trips; the order is still strictly
//! forward. Flight search runs once, after the travel class is chosen, and
//! booking creation runs once, on a confirmed selection. Booking requires an
//! authenticated session at confirmation: an unauthenticated user is routed
//! through a nested [`AuthFlow`] before the summary is confirmed.

use chrono::NaiveDate;
use log::debug;

use crate::services::{Services, TravelClass, Trip, TripType};
use crate::session::Session;
use crate::transaction::auth_flow::{AuthFlow, AuthState};
use crate::transaction::{Answer, RetryBudget, parse_answer};

/// Most flight options offered for selection.
const MAX_OFFERS: usize = 5;

/// States of the booking flow, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    /// Reading the trip type from the triggering utterance.
    Init,
    /// Waiting for the departure city.
    Origin,
    /// Waiting for the destination city.
    Destination,
    /// Waiting for the outbound date.
    OutboundDate,
    /// Waiting for the return date (round trips only).
    ReturnDate,
    /// Waiting for the travel class.
    TravelClass,
    /// Waiting for a selection from the offered flights.
    FlightSelection,
    /// Waiting for the final yes/no.
    Confirmation,
    /// Terminal: booked.
    Completed,
    /// Terminal: cancelled, retry budget exhausted or collaborator failure.
    Failed,
}

/// Flight booking flow.
#[derive(Debug)]
pub struct BookingFlow {
    state: BookingState,
    trip_type: TripType,
    origin: Option<String>,
    destination: Option<String>,
    outbound_date: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
    travel_class: Option<TravelClass>,
    offers: Vec<Trip>,
    selected: Option<Trip>,
    /// Nested sign-in flow, present while confirmation waits on auth.
    auth: Option<AuthFlow>,
    retries: RetryBudget,
    max_retries: usize,
}

impl BookingFlow {
    /// Create a fresh flow with the given retry bound.
    pub fn new(max_retries: usize) -> Self {
        BookingFlow {
            state: BookingState::Init,
            trip_type: TripType::OneWay,
            origin: None,
            destination: None,
            outbound_date: None,
            return_date: None,
            travel_class: None,
            offers: Vec::new(),
            selected: None,
            auth: None,
            retries: RetryBudget::new(max_retries),
            max_retries,
        }
    }

    /// Current state.
    pub fn state(&self) -> BookingState {
        self.state
    }

    /// The chosen origin city, once collected.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// The chosen destination city, once collected.
    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    fn advance(&mut self, state: BookingState) {
        debug!("booking flow: {:?} -> {:?}", self.state, state);
        self.state = state;
        self.retries.reset();
    }

    fn retry_or_fail(&mut self, reprompt: String) -> String {
        if self.retries.record_failure() {
            self.state = BookingState::Failed;
            "I couldn't make sense of that. I've stopped this booking; start a new one whenever you're ready.".to_string()
        } else {
            reprompt
        }
    }

    /// Consume one message.
    pub fn step(&mut self, input: &str, session: &mut Session, services: &Services) -> String {
        // Confirmation requires a signed-in user; run the nested auth flow
        // until the session is authenticated.
        if self.state == BookingState::Confirmation && session.user.is_none() {
            return self.handle_auth_gate(input, session, services);
        }

        match self.state {
            BookingState::Init => self.handle_init(input),
            BookingState::Origin => self.handle_origin(input, services),
            BookingState::Destination => self.handle_destination(input, services),
            BookingState::OutboundDate => self.handle_outbound_date(input),
            BookingState::ReturnDate => self.handle_return_date(input),
            BookingState::TravelClass => self.handle_travel_class(input, services),
            BookingState::FlightSelection => self.handle_flight_selection(input),
            BookingState::Confirmation => self.handle_confirmation(input, session, services),
            BookingState::Completed | BookingState::Failed => {
                "This booking is already finished.".to_string()
            }
        }
    }

    fn handle_auth_gate(
        &mut self,
        input: &str,
        session: &mut Session,
        services: &Services,
    ) -> String {
        let Some(auth) = self.auth.as_mut() else {
            self.auth = Some(AuthFlow::new(self.max_retries));
            return "You need to be logged in first. Would you like to login or register?"
                .to_string();
        };

        let reply = auth.step(input, session, services);
        match auth.state() {
            AuthState::Completed => {
                self.auth = None;
                format!("{reply}\n\n{}", self.booking_summary())
            }
            AuthState::Failed => {
                self.state = BookingState::Failed;
                format!("{reply}\nI can't complete the booking without a signed-in account.")
            }
            _ => reply,
        }
    }

    fn handle_init(&mut self, input: &str) -> String {
        self.trip_type = if input.to_lowercase().contains("round") {
            TripType::RoundTrip
        } else {
            TripType::OneWay
        };
        self.advance(BookingState::Origin);
        "Please enter your departure city:".to_string()
    }

    fn handle_origin(&mut self, input: &str, services: &Services) -> String {
        match services.flight.resolve_location(input) {
            Some(city) => {
                self.origin = Some(city);
                self.advance(BookingState::Destination);
                "Please enter your destination city:".to_string()
            }
            None => self.retry_or_fail(format!(
                "I don't know any airport at \"{}\". Please enter your departure city:",
                input.trim()
            )),
        }
    }

    fn handle_destination(&mut self, input: &str, services: &Services) -> String {
        match services.flight.resolve_location(input) {
            Some(city) => {
                self.destination = Some(city);
                self.advance(BookingState::OutboundDate);
                "Please enter your outbound date (YYYY-MM-DD):".to_string()
            }
            None => self.retry_or_fail(format!(
                "I don't know any airport at \"{}\". Please enter your destination city:",
                input.trim()
            )),
        }
    }

    fn handle_outbound_date(&mut self, input: &str) -> String {
        let date = match NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                return self.retry_or_fail(
                    "Invalid date format. Please use YYYY-MM-DD format:".to_string(),
                );
            }
        };

        if date < chrono::Local::now().date_naive() {
            return self.retry_or_fail(
                "Date cannot be in the past. Please enter a future date (YYYY-MM-DD):".to_string(),
            );
        }

        self.outbound_date = Some(date);
        if self.trip_type == TripType::RoundTrip {
            self.advance(BookingState::ReturnDate);
            "Please enter your return date (YYYY-MM-DD):".to_string()
        } else {
            self.advance(BookingState::TravelClass);
            "Please select your travel class (ECONOMY/BUSINESS/FIRST):".to_string()
        }
    }

    fn handle_return_date(&mut self, input: &str) -> String {
        let date = match NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                return self.retry_or_fail(
                    "Invalid date format. Please use YYYY-MM-DD format:".to_string(),
                );
            }
        };

        if Some(date) < self.outbound_date {
            return self.retry_or_fail(
                "Return date must be after outbound date. Please enter a valid date (YYYY-MM-DD):"
                    .to_string(),
            );
        }

        self.return_date = Some(date);
        self.advance(BookingState::TravelClass);
        "Please select your travel class (ECONOMY/BUSINESS/FIRST):".to_string()
    }

    fn handle_travel_class(&mut self, input: &str, services: &Services) -> String {
        let class: TravelClass = match input.parse() {
            Ok(class) => class,
            Err(_) => {
                return self.retry_or_fail(
                    "Invalid travel class. Please select ECONOMY, BUSINESS, or FIRST:".to_string(),
                );
            }
        };

        let origin = self.origin.as_deref().unwrap_or_default();
        let destination = self.destination.as_deref().unwrap_or_default();
        let outbound = self.outbound_date.expect("date collected before class");

        let offers = match services
            .flight
            .search(origin, destination, outbound, self.return_date, MAX_OFFERS)
        {
            Ok(offers) => offers,
            Err(e) => {
                self.state = BookingState::Failed;
                return format!("Sorry, the flight search failed: {e}. Please start a new booking.");
            }
        };

        if offers.is_empty() {
            self.state = BookingState::Failed;
            return "Sorry, no flights found for your criteria. Please start a new booking."
                .to_string();
        }

        self.travel_class = Some(class);
        let table = format_offers(&offers, class);
        let count = offers.len();
        self.offers = offers;
        self.advance(BookingState::FlightSelection);
        format!(
            "Here are the available flights:\n\n{table}\n\nPlease select a flight by entering its number (1-{count}):"
        )
    }

    fn handle_flight_selection(&mut self, input: &str) -> String {
        let selection: usize = match input.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                return self.retry_or_fail(
                    "Please enter a valid number for your flight selection:".to_string(),
                );
            }
        };

        if selection < 1 || selection > self.offers.len() {
            return self.retry_or_fail(format!(
                "Invalid selection. Please choose a number between 1 and {}:",
                self.offers.len()
            ));
        }

        self.selected = Some(self.offers[selection - 1].clone());
        self.advance(BookingState::Confirmation);
        self.booking_summary()
    }

    fn handle_confirmation(
        &mut self,
        input: &str,
        session: &mut Session,
        services: &Services,
    ) -> String {
        match parse_answer(input) {
            Answer::Affirmative => {
                let trip = self.selected.as_ref().expect("selection made before confirmation");
                let class = self.travel_class.expect("class chosen before confirmation");
                let user_id = session.user.as_ref().expect("auth gate ran").id;

                match services.booking.create_booking(user_id, trip, class) {
                    Ok(booking) => {
                        self.advance(BookingState::Completed);
                        format!(
                            "Great! Your booking is confirmed. Your reference number is: {}",
                            booking.reference
                        )
                    }
                    Err(e) => {
                        self.state = BookingState::Failed;
                        format!("I apologize, but I couldn't complete your booking: {e}")
                    }
                }
            }
            Answer::Negative => {
                self.state = BookingState::Failed;
                "I've cancelled your booking request. Feel free to start a new booking when you're ready."
                    .to_string()
            }
            Answer::Unclear => self.retry_or_fail(
                "I'm not sure if you want to confirm or cancel. Would you like to proceed with this booking?"
                    .to_string(),
            ),
        }
    }

    fn booking_summary(&self) -> String {
        let trip = self.selected.as_ref().expect("selection made before summary");
        let class = self.travel_class.expect("class chosen before summary");

        let mut lines = vec![
            "Here's a summary of your booking:".to_string(),
            format!("From: {}", self.origin.as_deref().unwrap_or_default()),
            format!("To: {}", self.destination.as_deref().unwrap_or_default()),
            format!("Date: {}", trip.outbound.departure_date),
        ];
        if let Some(ret) = &trip.return_flight {
            lines.push(format!("Return: {}", ret.departure_date));
        }
        lines.push(format!("Class: {class}"));
        lines.push(format!("Total Price: £{:.2}", trip.price(class)));
        lines.push(String::new());
        lines.push("Would you like to proceed with this booking?".to_string());

        lines.join("\n")
    }
}

/// Format offered trips as a numbered table.
fn format_offers(offers: &[Trip], class: TravelClass) -> String {
    offers
        .iter()
        .enumerate()
        .map(|(idx, trip)| {
            let out = &trip.outbound;
            match &trip.return_flight {
                None => format!(
                    "#{} {} -> {}  {} {}  £{:.2}",
                    idx + 1,
                    out.origin_code,
                    out.destination_code,
                    out.departure_date,
                    out.departure_time.format("%H:%M"),
                    trip.price(class),
                ),
                Some(ret) => format!(
                    "#{} {} -> {}  out {}  back {}  £{:.2}",
                    idx + 1,
                    out.origin_code,
                    out.destination_code,
                    out.departure_date,
                    ret.departure_date,
                    trip.price(class),
                ),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
