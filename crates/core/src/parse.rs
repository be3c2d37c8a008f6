//! Decoding of correspondence records.
//!
//! Input is the comma separated export with a header line and the columns
//! `date,fromId,fromEmail,fromJobtitle,toId,toEmail,toJobtitle,messageType,sentiment`.

use crate::email::{Email, MessageType, Title};
use crate::error::{Error, Result};
use crate::id::IdAllocator;
use alloc::format;
use alloc::vec::Vec;
use chrono::NaiveDate;

const FIELD_COUNT: usize = 9;

/// Parses every record in `text`, assigning identifiers from `ids`.
///
/// The first line is treated as a header and blank lines are skipped.
pub fn parse_emails(text: &str, ids: &mut IdAllocator) -> Result<Vec<Email>> {
    let mut emails = Vec::new();

    for (index, line) in text.lines().enumerate().skip(1) {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        emails.push(parse_line(line, index + 1, ids)?);
    }

    Ok(emails)
}

/// Sorts records by date, keeping input order between records of the same day.
pub fn sort_by_date(emails: &mut [Email]) {
    emails.sort_by_key(|email| email.date);
}

fn parse_line(line: &str, line_no: usize, ids: &mut IdAllocator) -> Result<Email> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(Error::malformed_record(
            line_no,
            format!("expected {} fields, got {}", FIELD_COUNT, fields.len()),
        ));
    }

    let date = parse_date(fields[0], line_no)?;
    let from_id = parse_number(fields[1], "fromId", line_no)?;
    let to_id = parse_number(fields[4], "toId", line_no)?;
    let message_type = match fields[7].trim() {
        t if t.eq_ignore_ascii_case("TO") => MessageType::To,
        t if t.eq_ignore_ascii_case("CC") => MessageType::Cc,
        other => {
            return Err(Error::malformed_record(
                line_no,
                format!("unknown message type {:?}", other),
            ))
        }
    };
    let sentiment = fields[8]
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite())
        .ok_or_else(|| {
            Error::malformed_record(line_no, format!("invalid sentiment {:?}", fields[8]))
        })?;

    Ok(Email {
        id: ids.next_id(),
        date,
        from_id,
        from_email: fields[2].trim().into(),
        from_title: Title::parse(fields[3]),
        to_id,
        to_email: fields[5].trim().into(),
        to_title: Title::parse(fields[6]),
        message_type,
        sentiment,
    })
}

fn parse_date(field: &str, line_no: usize) -> Result<NaiveDate> {
    let field = field.trim();
    let day_part = field.split([' ', 'T']).next().unwrap_or(field);
    day_part
        .parse::<NaiveDate>()
        .map_err(|_| Error::malformed_record(line_no, format!("invalid date {:?}", field)))
}

fn parse_number(field: &str, name: &str, line_no: usize) -> Result<u64> {
    field
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::malformed_record(line_no, format!("invalid {} {:?}", name, field)))
}
