use crate::models::{Flight, Reco};

pub const FIELD_SEPARATOR: char = '^';

/// Positional layout of the fixed part of a record
pub const RECO_FIELDS: [&str; 15] = [
    "version_nb",
    "search_id",
    "search_country",
    "search_date",
    "search_time",
    "origin_city",
    "destination_city",
    "request_dep_date",
    "request_return_date",
    "passengers_string",
    "currency",
    "price",
    "taxes",
    "fees",
    "nb_of_flights",
];

/// Positional layout of one flight chunk
pub const FLIGHT_FIELDS: [&str; 10] = [
    "dep_airport",
    "dep_date",
    "dep_time",
    "arr_airport",
    "arr_date",
    "arr_time",
    "operating_airline",
    "marketing_airline",
    "flight_nb",
    "cabin",
];

/// Flight chunks a record may declare beyond what its trailing fields hold
pub const MAX_PADDED_FLIGHTS: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Degenerate line: fewer than 2 fields")]
    Degenerate,

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid flight count: {0:?}")]
    InvalidFlightCount(String),
}

/// Decode a raw payload line, replacing invalid UTF-8 sequences
pub fn decode_bytes(line: &[u8]) -> Result<Reco, DecodeError> {
    decode_line(&String::from_utf8_lossy(line))
}

/// Decode one `^`-separated record line into a [`Reco`].
///
/// Flights are read in chunks of ten fields. When the line is shorter than
/// `nb_of_flights` chunks require, the missing fields are left empty instead
/// of failing the record, up to [`MAX_PADDED_FLIGHTS`] chunks past the last
/// one present. A larger count is an [`DecodeError::InvalidFlightCount`].
pub fn decode_line(line: &str) -> Result<Reco, DecodeError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() < 2 {
        return Err(DecodeError::Degenerate);
    }

    if fields.len() < RECO_FIELDS.len() {
        return Err(DecodeError::MissingField(RECO_FIELDS[fields.len()]));
    }

    let field = |i: usize| fields[i].to_string();
    let raw_count = fields[14];
    let nb_of_flights: usize = raw_count
        .trim()
        .parse()
        .map_err(|_| DecodeError::InvalidFlightCount(raw_count.to_string()))?;

    let trailing = &fields[RECO_FIELDS.len()..];
    let available = trailing.len().div_ceil(FLIGHT_FIELDS.len());
    if nb_of_flights > available + MAX_PADDED_FLIGHTS {
        return Err(DecodeError::InvalidFlightCount(raw_count.to_string()));
    }

    let mut rest = trailing.iter().copied();
    let mut flights = Vec::with_capacity(nb_of_flights);
    for _ in 0..nb_of_flights {
        let mut next = || rest.next().unwrap_or_default().to_string();
        flights.push(Flight {
            dep_airport: next(),
            dep_date: next(),
            dep_time: next(),
            arr_airport: next(),
            arr_date: next(),
            arr_time: next(),
            operating_airline: next(),
            marketing_airline: next(),
            flight_nb: next(),
            cabin: next(),
        });
    }

    Ok(Reco {
        version_nb: field(0),
        search_id: field(1),
        search_country: field(2),
        search_date: field(3),
        search_time: field(4),
        origin_city: field(5),
        destination_city: field(6),
        request_dep_date: field(7),
        request_return_date: field(8),
        passengers_string: field(9),
        currency: field(10),
        price: field(11),
        taxes: field(12),
        fees: field(13),
        nb_of_flights,
        flights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "1.0^100^FR^2024-03-01^10:15:00^PAR^NYC^2024-04-10^2024-04-20^ADT=1^EUR^500.00^80.50^10.00";
    const OUTBOUND: &str = "CDG^2024-04-10^0930^JFK^2024-04-10^1200^AF^AF^006^Y";
    const INBOUND: &str = "JFK^2024-04-20^1800^CDG^2024-04-21^0730^AF^DL^007^M";

    #[test]
    fn test_decode_two_flights() {
        let line = format!("{HEADER}^2^{OUTBOUND}^{INBOUND}");
        let reco = decode_line(&line).expect("Failed to decode");

        assert_eq!(reco.search_id, "100");
        assert_eq!(reco.origin_city, "PAR");
        assert_eq!(reco.request_return_date, "2024-04-20");
        assert_eq!(reco.price, "500.00");
        assert_eq!(reco.nb_of_flights, 2);
        assert_eq!(reco.flights.len(), 2);
        assert_eq!(reco.flights[0].dep_airport, "CDG");
        assert_eq!(reco.flights[0].cabin, "Y");
        assert_eq!(reco.flights[1].marketing_airline, "DL");
        assert_eq!(reco.flights[1].arr_date, "2024-04-21");
    }

    #[test]
    fn test_trailing_newline_is_ignored() {
        let line = format!("{HEADER}^1^{OUTBOUND}\r\n");
        let reco = decode_line(&line).unwrap();
        assert_eq!(reco.flights[0].cabin, "Y");
    }

    #[test]
    fn test_degenerate_lines_fail() {
        assert_eq!(decode_line(""), Err(DecodeError::Degenerate));
        assert_eq!(decode_line("no separator here"), Err(DecodeError::Degenerate));
    }

    #[test]
    fn test_short_header_fails() {
        assert_eq!(
            decode_line("1.0^100^FR"),
            Err(DecodeError::MissingField("search_date"))
        );
    }

    #[test]
    fn test_non_numeric_flight_count_fails() {
        let line = format!("{HEADER}^two^{OUTBOUND}");
        assert_eq!(
            decode_line(&line),
            Err(DecodeError::InvalidFlightCount("two".to_string()))
        );
    }

    #[test]
    fn test_missing_flight_fields_are_left_empty() {
        let line = format!("{HEADER}^2^{OUTBOUND}^JFK^2024-04-20");
        let reco = decode_line(&line).unwrap();

        assert_eq!(reco.flights.len(), 2);
        assert_eq!(reco.flights[1].dep_airport, "JFK");
        assert_eq!(reco.flights[1].dep_date, "2024-04-20");
        assert_eq!(reco.flights[1].dep_time, "");
        assert_eq!(reco.flights[1].cabin, "");
    }

    #[test]
    fn test_one_missing_flight_is_padded() {
        let line = format!("{HEADER}^2^{OUTBOUND}");
        let reco = decode_line(&line).unwrap();

        assert_eq!(reco.flights.len(), 2);
        assert_eq!(reco.flights[1], Flight::default());
    }

    #[test]
    fn test_flight_count_beyond_the_line_fails() {
        let line = "1.0^100^FR^2024-03-01^10:15:00^PAR^NYC^2024-04-10^^ADT=1^EUR^1^0^0^18446744073709551615";
        assert_eq!(
            decode_line(line),
            Err(DecodeError::InvalidFlightCount("18446744073709551615".to_string()))
        );

        let line = format!("{HEADER}^1000000000^{OUTBOUND}");
        assert_eq!(
            decode_line(&line),
            Err(DecodeError::InvalidFlightCount("1000000000".to_string()))
        );

        let line = format!("{HEADER}^3^{OUTBOUND}");
        assert!(matches!(
            decode_line(&line),
            Err(DecodeError::InvalidFlightCount(_))
        ));
    }

    #[test]
    fn test_decode_bytes_is_lossy() {
        let mut line = format!("{HEADER}^0").into_bytes();
        line[2] = 0xff;
        let reco = decode_bytes(&line).unwrap();
        assert_eq!(reco.version_nb, "1.\u{fffd}");
        assert!(reco.flights.is_empty());
    }
}
