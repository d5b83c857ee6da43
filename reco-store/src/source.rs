use flate2::bufread::MultiGzDecoder;
use std::io::{BufRead, BufReader};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Line reader over a request or event body, gunzipping when needed.
///
/// Concatenated gzip members are read as one stream.
pub fn open_payload(bytes: &[u8]) -> Box<dyn BufRead + Send + '_> {
    if is_gzip(bytes) {
        Box::new(BufReader::new(MultiGzDecoder::new(bytes)))
    } else {
        Box::new(bytes)
    }
}
