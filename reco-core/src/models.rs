use serde::{Deserialize, Serialize};

// ============================================================================
// Decoded records
// ============================================================================

/// One flight segment of a recommendation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub dep_airport: String,
    pub dep_date: String,
    pub dep_time: String,
    pub arr_airport: String,
    pub arr_date: String,
    pub arr_time: String,
    pub operating_airline: String,
    pub marketing_airline: String,
    pub flight_nb: String,
    pub cabin: String,
}

/// One priced itinerary returned for a customer search.
///
/// The search-level fields (`version_nb` to `currency`) are repeated on
/// every reco of the same search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reco {
    pub version_nb: String,
    pub search_id: String,
    pub search_country: String,
    pub search_date: String,
    pub search_time: String,
    pub origin_city: String,
    pub destination_city: String,
    pub request_dep_date: String,
    pub request_return_date: String,
    pub passengers_string: String,
    pub currency: String,
    pub price: String,
    pub taxes: String,
    pub fees: String,
    pub nb_of_flights: usize,
    pub flights: Vec<Flight>,
}

// ============================================================================
// Decorated output
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripType {
    #[serde(rename = "OW")]
    OneWay,
    #[serde(rename = "RT")]
    RoundTrip,
}

/// Domestic when origin and destination share a country
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoScope {
    #[serde(rename = "D")]
    Domestic,
    #[serde(rename = "I")]
    International,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub passenger_type: String,
    pub passenger_nb: u32,
}

/// A reco stripped of its search-level fields, amounts in EUR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoEntry {
    pub price: f64,
    pub taxes: f64,
    pub fees: f64,
    pub nb_of_flights: usize,
    pub flights: Vec<Flight>,
}

/// One decorated search: every contiguous reco sharing a `search_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Search {
    pub version_nb: String,
    pub search_id: String,
    pub search_country: String,
    pub search_date: String,
    pub search_time: String,
    pub origin_city: String,
    pub destination_city: String,
    pub request_dep_date: String,
    pub request_return_date: String,
    pub currency: String,
    pub advance_purchase: i64,
    /// `-1` for one-way trips
    pub stay_duration: i64,
    pub trip_type: TripType,
    pub passengers: Vec<Passenger>,
    pub origin_country: String,
    pub destination_country: String,
    pub geo: GeoScope,
    #[serde(rename = "OnD")]
    pub ond: String,
    #[serde(rename = "OnD_distance")]
    pub ond_distance: i64,
    pub recos: Vec<RecoEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_codes() {
        assert_eq!(serde_json::to_string(&TripType::OneWay).unwrap(), "\"OW\"");
        assert_eq!(serde_json::to_string(&TripType::RoundTrip).unwrap(), "\"RT\"");
        assert_eq!(serde_json::to_string(&GeoScope::Domestic).unwrap(), "\"D\"");
        assert_eq!(serde_json::to_string(&GeoScope::International).unwrap(), "\"I\"");
    }
}
