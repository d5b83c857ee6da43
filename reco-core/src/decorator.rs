use chrono::NaiveDate;
use tracing::warn;

use crate::geo::{GeoResolver, UNKNOWN_COUNTRY};
use crate::models::{GeoScope, Passenger, Reco, RecoEntry, Search, TripType};
use crate::rates::{convert_to_eur, RateTable};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stay duration reported for one-way searches
pub const ONE_WAY_STAY: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecorateError {
    #[error("Empty search group")]
    EmptyGroup,

    #[error("Malformed passengers entry {entry:?} in search {search_id}")]
    MalformedPassengers { search_id: String, entry: String },

    #[error("Invalid {field} {value:?} in search {search_id}")]
    InvalidDate {
        search_id: String,
        field: &'static str,
        value: String,
    },

    #[error("Invalid {field} {value:?} in search {search_id}")]
    InvalidAmount {
        search_id: String,
        field: &'static str,
        value: String,
    },
}

/// Turns a group of recos into one decorated [`Search`]
pub struct Decorator<'a> {
    rates: Option<&'a RateTable>,
    geo: &'a dyn GeoResolver,
}

impl<'a> Decorator<'a> {
    pub fn new(rates: Option<&'a RateTable>, geo: &'a dyn GeoResolver) -> Self {
        Self { rates, geo }
    }

    pub fn decorate(&self, group: &[Reco]) -> Result<Search, DecorateError> {
        let first = group.first().ok_or(DecorateError::EmptyGroup)?;
        let search_id = first.search_id.as_str();

        let search_date = parse_date(search_id, "search_date", &first.search_date)?;
        let dep_date = parse_date(search_id, "request_dep_date", &first.request_dep_date)?;
        let advance_purchase = (dep_date - search_date).num_days();

        let stay_duration = if first.request_return_date.is_empty() {
            ONE_WAY_STAY
        } else {
            let return_date =
                parse_date(search_id, "request_return_date", &first.request_return_date)?;
            (return_date - dep_date).num_days()
        };
        let trip_type = if stay_duration == ONE_WAY_STAY {
            TripType::OneWay
        } else {
            TripType::RoundTrip
        };

        let passengers = parse_passengers(search_id, &first.passengers_string)?;

        let recos = group
            .iter()
            .map(|reco| self.strip(reco))
            .collect::<Result<Vec<_>, _>>()?;

        let origin_country = self.country_of(&first.origin_city);
        let destination_country = self.country_of(&first.destination_city);
        let geo = if origin_country == destination_country {
            GeoScope::Domestic
        } else {
            GeoScope::International
        };
        let ond_distance = self.distance(&first.origin_city, &first.destination_city);

        Ok(Search {
            version_nb: first.version_nb.clone(),
            search_id: first.search_id.clone(),
            search_country: first.search_country.clone(),
            search_date: first.search_date.clone(),
            search_time: first.search_time.clone(),
            origin_city: first.origin_city.clone(),
            destination_city: first.destination_city.clone(),
            request_dep_date: first.request_dep_date.clone(),
            request_return_date: first.request_return_date.clone(),
            currency: first.currency.clone(),
            advance_purchase,
            stay_duration,
            trip_type,
            passengers,
            origin_country,
            destination_country,
            geo,
            ond: format!("{}-{}", first.origin_city, first.destination_city),
            ond_distance,
            recos,
        })
    }

    /// Keep only the reco-specific fields, converted to EUR
    fn strip(&self, reco: &Reco) -> Result<RecoEntry, DecorateError> {
        let amount = |field: &'static str, value: &str| -> Result<f64, DecorateError> {
            let parsed: f64 = value.trim().parse().map_err(|_| DecorateError::InvalidAmount {
                search_id: reco.search_id.clone(),
                field,
                value: value.to_string(),
            })?;
            Ok(convert_to_eur(parsed, &reco.currency, self.rates))
        };

        Ok(RecoEntry {
            price: amount("price", &reco.price)?,
            taxes: amount("taxes", &reco.taxes)?,
            fees: amount("fees", &reco.fees)?,
            nb_of_flights: reco.nb_of_flights,
            flights: reco.flights.clone(),
        })
    }

    fn country_of(&self, city: &str) -> String {
        self.geo.country_of(city).unwrap_or_else(|e| {
            warn!("Country lookup failed for {}: {}", city, e);
            UNKNOWN_COUNTRY.to_string()
        })
    }

    fn distance(&self, origin: &str, destination: &str) -> i64 {
        match self.geo.distance(origin, destination) {
            Ok(km) => km.round() as i64,
            Err(e) => {
                warn!("Distance lookup failed for {}-{}: {}", origin, destination, e);
                0
            }
        }
    }
}

fn parse_date(search_id: &str, field: &'static str, value: &str) -> Result<NaiveDate, DecorateError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| DecorateError::InvalidDate {
        search_id: search_id.to_string(),
        field,
        value: value.to_string(),
    })
}

/// Parse `ADT=1,CHD=2` into ordered passenger counts
pub fn parse_passengers(search_id: &str, raw: &str) -> Result<Vec<Passenger>, DecorateError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    raw.split(',')
        .map(|entry| {
            let malformed = || DecorateError::MalformedPassengers {
                search_id: search_id.to_string(),
                entry: entry.to_string(),
            };
            let (passenger_type, count) = entry.split_once('=').ok_or_else(malformed)?;
            Ok(Passenger {
                passenger_type: passenger_type.trim().to_string(),
                passenger_nb: count.trim().parse().map_err(|_| malformed())?,
            })
        })
        .collect()
}
