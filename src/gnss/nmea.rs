//! NMEA 0183 sentence decoder
//!
//! Decodes a single line into a [`DecodedReading`]. Only RMC, GGA and GSV
//! are decoded; every other well-formed sentence is reported as
//! [`DecodeError::UnsupportedSentence`] and ignored by callers.
//!
//! A line either decodes completely or not at all. No partial reading is
//! ever produced from a sentence with a bad checksum, a short field list or
//! a non-numeric value in a numeric field.

use core::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use heapless::Vec;

use super::error::DecodeError;
use super::reading::{
    DecodedReading, FixQuality, GpsQuality, PositionFix, Satellite, SatelliteView, Talker,
    SATELLITES_PER_MESSAGE,
};

/// Upper bound on comma separated fields in a sentence we decode
const MAX_FIELDS: usize = 24;

/// RMC carries at least the magnetic variation fields
const RMC_MIN_FIELDS: usize = 12;
const GGA_MIN_FIELDS: usize = 15;
const GSV_MIN_FIELDS: usize = 4;

type Fields<'a> = Vec<&'a str, MAX_FIELDS>;

/// Decode one line, returning `None` for anything that isn't a valid,
/// supported sentence
pub fn decode(line: &str) -> Option<DecodedReading> {
    parse_sentence(line).ok()
}

/// Decode one line, reporting why it was rejected
pub fn parse_sentence(line: &str) -> Result<DecodedReading, DecodeError> {
    let line = line.trim_end();

    if !line.is_ascii() {
        return Err(DecodeError::InvalidFormat);
    }

    let body = strip_envelope(line)?;

    let mut fields = Fields::new();
    for field in body.split(',') {
        fields.push(field).map_err(|_| DecodeError::InvalidFormat)?;
    }

    let address = fields[0];

    // Proprietary sentences ($P...) use vendor specific addresses
    if address.starts_with('P') {
        return Err(DecodeError::UnsupportedSentence);
    }

    if address.len() != 5
        || !address
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    {
        return Err(DecodeError::InvalidFormat);
    }

    let id = address.as_bytes();
    let talker = Talker::from_id([id[0], id[1]]);

    match &address[2..] {
        "RMC" => parse_rmc(talker, &fields),
        "GGA" => parse_gga(talker, &fields),
        "GSV" => parse_gsv(talker, &fields),
        _ => Err(DecodeError::UnsupportedSentence),
    }
}

/// XOR of every byte, as used by the `*HH` suffix
pub fn checksum(data: &str) -> u8 {
    data.bytes().fold(0u8, |acc, b| acc ^ b)
}

/// Validates the start marker and the optional checksum, returning the
/// text between them
fn strip_envelope(line: &str) -> Result<&str, DecodeError> {
    match line.as_bytes().first() {
        Some(b'$') | Some(b'!') => {}
        _ => return Err(DecodeError::InvalidFormat),
    }

    let payload = &line[1..];

    let Some(asterisk_pos) = payload.find('*') else {
        return Ok(payload);
    };

    let (data, suffix) = (&payload[..asterisk_pos], &payload[asterisk_pos + 1..]);

    if suffix.len() != 2 || !suffix.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidFormat);
    }

    let provided = u8::from_str_radix(suffix, 16).map_err(|_| DecodeError::InvalidFormat)?;

    if checksum(data) != provided {
        return Err(DecodeError::InvalidChecksum);
    }

    Ok(data)
}

fn parse_rmc(talker: Talker, fields: &Fields) -> Result<DecodedReading, DecodeError> {
    // Fields: RMC,time,status,lat,N/S,lon,E/W,speed,course,date,mag,dir[,mode[,nav]]
    if fields.len() < RMC_MIN_FIELDS {
        return Err(DecodeError::MissingField("rmc"));
    }

    let mut valid = match fields[2] {
        "A" => true,
        "V" | "" => false,
        _ => return Err(DecodeError::InvalidField("status")),
    };

    // NMEA 2.3+ mode indicator, `N` means data not valid
    if fields.get(12) == Some(&"N") {
        valid = false;
    }

    let time = parse_time(fields[1])?;
    let latitude = parse_latitude(fields[3], fields[4])?;
    let longitude = parse_longitude(fields[5], fields[6])?;
    let speed_knots = parse_optional::<f32>(fields[7], "speed")?;
    let course = parse_optional::<f32>(fields[8], "course")?;
    let date = parse_date(fields[9])?;

    Ok(DecodedReading::PositionFix(PositionFix {
        talker,
        valid,
        time,
        date,
        latitude: latitude.filter(|_| valid),
        longitude: longitude.filter(|_| valid),
        speed_knots,
        course,
    }))
}

fn parse_gga(talker: Talker, fields: &Fields) -> Result<DecodedReading, DecodeError> {
    // Fields: GGA,time,lat,N/S,lon,E/W,fix,sats,hdop,alt,M,geoid,M,age,ref
    if fields.len() < GGA_MIN_FIELDS {
        return Err(DecodeError::MissingField("gga"));
    }

    let quality = match parse_optional::<u8>(fields[6], "quality")? {
        None => GpsQuality::Invalid,
        Some(digit) => GpsQuality::from_digit(digit).ok_or(DecodeError::InvalidField("quality"))?,
    };

    let time = parse_time(fields[1])?;
    let latitude = parse_latitude(fields[2], fields[3])?;
    let longitude = parse_longitude(fields[4], fields[5])?;
    let satellites = parse_optional::<u8>(fields[7], "satellites")?;
    let hdop = parse_optional::<f32>(fields[8], "hdop")?;
    let altitude = parse_optional::<f32>(fields[9], "altitude")?;

    let has_fix = quality.has_fix();

    Ok(DecodedReading::FixQuality(FixQuality {
        talker,
        time,
        quality,
        satellites,
        hdop,
        altitude,
        latitude: latitude.filter(|_| has_fix),
        longitude: longitude.filter(|_| has_fix),
    }))
}

fn parse_gsv(talker: Talker, fields: &Fields) -> Result<DecodedReading, DecodeError> {
    // Fields: GSV,total,index,in_view,{id,elevation,azimuth,snr}x(1..=4)[,signal]
    if fields.len() < GSV_MIN_FIELDS {
        return Err(DecodeError::MissingField("gsv"));
    }

    let total_messages = parse_optional::<u8>(fields[1], "total_messages")?
        .ok_or(DecodeError::MissingField("total_messages"))?;
    let message_index = parse_optional::<u8>(fields[2], "message_index")?
        .ok_or(DecodeError::MissingField("message_index"))?;
    let satellites_in_view = parse_optional::<u8>(fields[3], "satellites_in_view")?
        .ok_or(DecodeError::MissingField("satellites_in_view"))?;

    if total_messages == 0 || message_index == 0 || message_index > total_messages {
        return Err(DecodeError::InvalidField("message_index"));
    }

    let mut blocks = &fields[4..];
    match blocks.len() % 4 {
        0 => {}
        // NMEA 4.10 appends a signal id after the last satellite
        1 => blocks = &blocks[..blocks.len() - 1],
        _ => return Err(DecodeError::InvalidField("satellites")),
    }

    let mut satellites = Vec::<Satellite, SATELLITES_PER_MESSAGE>::new();

    for block in blocks.chunks_exact(4) {
        let Some(id) = parse_optional::<u16>(block[0], "satellite_id")? else {
            // Receivers pad the last message with empty blocks
            if block.iter().all(|field| field.is_empty()) {
                continue;
            }
            return Err(DecodeError::MissingField("satellite_id"));
        };

        let elevation = parse_optional::<u8>(block[1], "elevation")?;
        let azimuth = parse_optional::<u16>(block[2], "azimuth")?;
        let snr = parse_optional::<u8>(block[3], "snr")?;

        if elevation.is_some_and(|e| e > 90) {
            return Err(DecodeError::InvalidField("elevation"));
        }
        if azimuth.is_some_and(|a| a >= 360) {
            return Err(DecodeError::InvalidField("azimuth"));
        }

        satellites
            .push(Satellite {
                id,
                elevation,
                azimuth,
                snr,
            })
            .map_err(|_| DecodeError::InvalidField("satellites"))?;
    }

    Ok(DecodedReading::SatelliteView(SatelliteView {
        talker,
        total_messages,
        message_index,
        satellites_in_view,
        satellites,
    }))
}

/// Digits, at most one decimal point and an optional leading minus sign.
/// Rejects what `FromStr` would otherwise accept (`inf`, `1e3`, `+5`).
fn is_decimal(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);

    !digits.is_empty()
        && digits.bytes().any(|b| b.is_ascii_digit())
        && digits.bytes().filter(|&b| b == b'.').count() <= 1
        && digits.bytes().all(|b| b.is_ascii_digit() || b == b'.')
}

fn parse_optional<T: FromStr>(raw: &str, name: &'static str) -> Result<Option<T>, DecodeError> {
    if raw.is_empty() {
        return Ok(None);
    }

    if !is_decimal(raw) {
        return Err(DecodeError::InvalidField(name));
    }

    raw.parse::<T>()
        .map(Some)
        .map_err(|_| DecodeError::InvalidField(name))
}

fn parse_latitude(raw: &str, hemisphere: &str) -> Result<Option<f64>, DecodeError> {
    parse_coordinate(raw, hemisphere, 2, ("N", "S"), "latitude")
}

fn parse_longitude(raw: &str, hemisphere: &str) -> Result<Option<f64>, DecodeError> {
    parse_coordinate(raw, hemisphere, 3, ("E", "W"), "longitude")
}

/// Converts `DDMM.MMMM` / `DDDMM.MMMM` into signed decimal degrees
fn parse_coordinate(
    raw: &str,
    hemisphere: &str,
    degree_digits: usize,
    (positive, negative): (&str, &str),
    name: &'static str,
) -> Result<Option<f64>, DecodeError> {
    // Receivers without a fix often keep the hemisphere letter
    if raw.is_empty() {
        return Ok(None);
    }

    if raw.len() < degree_digits + 2 || !raw[..degree_digits].bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::InvalidField(name));
    }

    let degrees = parse_optional::<f64>(&raw[..degree_digits], name)?
        .ok_or(DecodeError::InvalidField(name))?;
    let minutes = match parse_optional::<f64>(&raw[degree_digits..], name)? {
        Some(minutes) if (0.0..60.0).contains(&minutes) => minutes,
        _ => return Err(DecodeError::InvalidField(name)),
    };

    let value = degrees + minutes / 60.0;
    let limit = if degree_digits == 2 { 90.0 } else { 180.0 };
    if value > limit {
        return Err(DecodeError::InvalidField(name));
    }

    if hemisphere == positive {
        Ok(Some(value))
    } else if hemisphere == negative {
        Ok(Some(-value))
    } else {
        Err(DecodeError::InvalidField(name))
    }
}

/// `hhmmss` with an optional fractional part
fn parse_time(raw: &str) -> Result<Option<NaiveTime>, DecodeError> {
    if raw.is_empty() {
        return Ok(None);
    }

    let bytes = raw.as_bytes();
    if bytes.len() < 6 || !bytes[..6].iter().all(u8::is_ascii_digit) {
        return Err(DecodeError::InvalidField("time"));
    }

    let millis = match &bytes[6..] {
        [] => 0,
        [b'.', fraction @ ..] if fraction.iter().all(u8::is_ascii_digit) => {
            (0..3).fold(0u32, |acc, i| {
                acc * 10 + fraction.get(i).map_or(0, |d| u32::from(d - b'0'))
            })
        }
        _ => return Err(DecodeError::InvalidField("time")),
    };

    // Leap second, chrono spells 23:59:60 as 23:59:59 plus 1000 ms
    let (second, millis) = match two_digits(&bytes[4..6]) {
        60 => (59, millis + 1000),
        second => (second, millis),
    };

    NaiveTime::from_hms_milli_opt(
        two_digits(&bytes[0..2]),
        two_digits(&bytes[2..4]),
        second,
        millis,
    )
    .map(Some)
    .ok_or(DecodeError::InvalidField("time"))
}

/// `ddmmyy`, two digit years pivot at 1980
fn parse_date(raw: &str) -> Result<Option<NaiveDate>, DecodeError> {
    if raw.is_empty() {
        return Ok(None);
    }

    let bytes = raw.as_bytes();
    if bytes.len() != 6 || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(DecodeError::InvalidField("date"));
    }

    let day = two_digits(&bytes[0..2]);
    let month = two_digits(&bytes[2..4]);
    let year = two_digits(&bytes[4..6]) as i32;
    let year = if year >= 80 { 1900 + year } else { 2000 + year };

    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or(DecodeError::InvalidField("date"))
}

fn two_digits(bytes: &[u8]) -> u32 {
    u32::from(bytes[0] - b'0') * 10 + u32::from(bytes[1] - b'0')
}
