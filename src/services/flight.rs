//! Flight search collaborator: trip model, pricing and the search contract.

use std::str::FromStr;

use chrono::{Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SkylarkError};

/// Round prices to whole pennies.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Travel class with its price multiplier over the base fare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelClass {
    /// Base price.
    Economy,
    /// 1.8x of base price.
    Business,
    /// 2.5x of base price.
    First,
}

impl TravelClass {
    /// Price multiplier for this class.
    pub fn rate(&self) -> f64 {
        match self {
            TravelClass::Economy => 1.0,
            TravelClass::Business => 1.8,
            TravelClass::First => 2.5,
        }
    }

}

impl FromStr for TravelClass {
    type Err = SkylarkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "ECONOMY" => Ok(TravelClass::Economy),
            "BUSINESS" => Ok(TravelClass::Business),
            "FIRST" => Ok(TravelClass::First),
            other => Err(SkylarkError::invalid_operation(format!(
                "invalid travel class: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for TravelClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TravelClass::Economy => "ECONOMY",
            TravelClass::Business => "BUSINESS",
            TravelClass::First => "FIRST",
        };
        write!(f, "{name}")
    }
}

/// Trip type with its rate over the summed base fares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripType {
    /// Base rate.
    OneWay,
    /// 10% discount on the total.
    RoundTrip,
}

impl TripType {
    /// Price multiplier for this trip type.
    pub fn rate(&self) -> f64 {
        match self {
            TripType::OneWay => 1.0,
            TripType::RoundTrip => 0.9,
        }
    }
}

impl std::fmt::Display for TripType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TripType::OneWay => "ONEWAY",
            TripType::RoundTrip => "ROUNDTRIP",
        };
        write!(f, "{name}")
    }
}

/// One scheduled flight leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightInfo {
    /// Flight id.
    pub id: u64,
    /// Origin city name.
    pub origin_location: String,
    /// Origin airport code.
    pub origin_code: String,
    /// Destination city name.
    pub destination_location: String,
    /// Destination airport code.
    pub destination_code: String,
    /// Departure date.
    pub departure_date: NaiveDate,
    /// Departure time.
    pub departure_time: NaiveTime,
    /// Base (economy, one-way) fare.
    pub base_price: f64,
}

/// A complete trip: an outbound flight and an optional return flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// One-way or round trip.
    pub trip_type: TripType,
    /// Outbound leg.
    pub outbound: FlightInfo,
    /// Return leg, present for round trips.
    pub return_flight: Option<FlightInfo>,
}

impl Trip {
    /// Summed base fares with the trip-type rate applied.
    fn base_trip_price(&self) -> f64 {
        let mut total = self.outbound.base_price;
        if self.trip_type == TripType::RoundTrip
            && let Some(ret) = &self.return_flight
        {
            total += ret.base_price;
        }
        total * self.trip_type.rate()
    }

    /// Price of this trip in the given travel class.
    pub fn price(&self, class: TravelClass) -> f64 {
        round2(self.base_trip_price() * class.rate())
    }
}

/// Flight search collaborator contract.
pub trait FlightService: Send + Sync {
    /// Search trips between two locations.
    ///
    /// Dates within two days of the requested outbound date are considered.
    /// Returns an ordered sequence of trips, empty if none match.
    fn search(
        &self,
        origin: &str,
        destination: &str,
        outbound_date: NaiveDate,
        return_date: Option<NaiveDate>,
        limit: usize,
    ) -> Result<Vec<Trip>>;

    /// Resolve free text against known locations (city name or airport
    /// code, case-insensitive). Returns the canonical city name.
    fn resolve_location(&self, text: &str) -> Option<String>;
}

/// Days around the requested outbound date that still match.
const NEARBY_DAYS: u64 = 2;

/// In-memory flight inventory.
pub struct InMemoryFlightService {
    flights: Vec<FlightInfo>,
}

impl InMemoryFlightService {
    /// Create an empty inventory.
    pub fn new(flights: Vec<FlightInfo>) -> Self {
        InMemoryFlightService { flights }
    }

    /// Create an inventory with a small sample schedule.
    ///
    /// Daily flights on a handful of European routes for the next year,
    /// enough to exercise every booking path.
    pub fn with_sample_flights() -> Self {
        let routes: &[(&str, &str, &str, &str, f64)] = &[
            ("London", "LHR", "Paris", "CDG", 120.0),
            ("Paris", "CDG", "London", "LHR", 120.0),
            ("London", "LHR", "Rome", "FCO", 150.0),
            ("Rome", "FCO", "London", "LHR", 150.0),
            ("Paris", "CDG", "Rome", "FCO", 130.0),
            ("Rome", "FCO", "Paris", "CDG", 130.0),
            ("London", "LHR", "Berlin", "BER", 110.0),
            ("Berlin", "BER", "London", "LHR", 110.0),
        ];

        let start = chrono::Local::now().date_naive();
        let mut flights = Vec::new();
        let mut id = 1u64;
        for day in 0..365u64 {
            let date = start + Days::new(day);
            for &(origin, origin_code, dest, dest_code, price) in routes {
                flights.push(FlightInfo {
                    id,
                    origin_location: origin.to_string(),
                    origin_code: origin_code.to_string(),
                    destination_location: dest.to_string(),
                    destination_code: dest_code.to_string(),
                    departure_date: date,
                    departure_time: NaiveTime::from_hms_opt(9, 30, 0)
                        .expect("constant departure time is valid"),
                    base_price: price,
                });
                id += 1;
            }
        }

        InMemoryFlightService { flights }
    }

    fn matches_location(flight_field: &str, code_field: &str, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        flight_field.to_lowercase() == query || code_field.to_lowercase() == query
    }

    fn find_legs(
        &self,
        origin: &str,
        destination: &str,
        around: NaiveDate,
    ) -> Vec<&FlightInfo> {
        let earliest = around - Days::new(NEARBY_DAYS);
        let latest = around + Days::new(NEARBY_DAYS);

        let mut legs: Vec<&FlightInfo> = self
            .flights
            .iter()
            .filter(|f| {
                Self::matches_location(&f.origin_location, &f.origin_code, origin)
                    && Self::matches_location(&f.destination_location, &f.destination_code, destination)
                    && f.departure_date >= earliest
                    && f.departure_date <= latest
            })
            .collect();
        legs.sort_by_key(|f| (f.departure_date, f.departure_time));
        legs
    }
}

impl FlightService for InMemoryFlightService {
    fn search(
        &self,
        origin: &str,
        destination: &str,
        outbound_date: NaiveDate,
        return_date: Option<NaiveDate>,
        limit: usize,
    ) -> Result<Vec<Trip>> {
        let outbound_legs = self.find_legs(origin, destination, outbound_date);

        let trips: Vec<Trip> = match return_date {
            None => outbound_legs
                .into_iter()
                .map(|leg| Trip {
                    trip_type: TripType::OneWay,
                    outbound: leg.clone(),
                    return_flight: None,
                })
                .take(limit)
                .collect(),
            Some(return_date) => {
                let return_legs = self.find_legs(destination, origin, return_date);
                outbound_legs
                    .into_iter()
                    .filter_map(|out| {
                        return_legs
                            .iter()
                            .find(|ret| ret.departure_date >= out.departure_date)
                            .map(|ret| Trip {
                                trip_type: TripType::RoundTrip,
                                outbound: out.clone(),
                                return_flight: Some((*ret).clone()),
                            })
                    })
                    .take(limit)
                    .collect()
            }
        };

        Ok(trips)
    }

    fn resolve_location(&self, text: &str) -> Option<String> {
        let query = text.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        self.flights
            .iter()
            .find_map(|f| {
                if f.origin_location.to_lowercase() == query
                    || f.origin_code.to_lowercase() == query
                {
                    Some(f.origin_location.clone())
                } else if f.destination_location.to_lowercase() == query
                    || f.destination_code.to_lowercase() == query
                {
                    Some(f.destination_location.clone())
                } else {
                    None
                }
            })
    }
}
