use chrono::{DateTime, Utc};

use crate::models::{BookingConfirmation, BookingStatus};

const ICS_TIME: &str = "%Y%m%dT%H%M%SZ";

/// iCalendar event for a confirmed booking. Times come from the
/// confirmation, not from the slot the visitor picked.
pub fn generate_ics(
    confirmation: &BookingConfirmation,
    service_name: &str,
    business_name: &str,
    location: Option<&str>,
    stamp: DateTime<Utc>,
) -> String {
    let dtstart = confirmation.start.with_timezone(&Utc).format(ICS_TIME);
    let dtend = confirmation.end.with_timezone(&Utc).format(ICS_TIME);
    let dtstamp = stamp.format(ICS_TIME);
    let uid = format!("{}@bookingflow", confirmation.appointment_id);
    let summary = escape_text(&format!("{service_name} at {business_name}"));
    let status = match confirmation.status {
        BookingStatus::Confirmed => "CONFIRMED",
        BookingStatus::Pending => "TENTATIVE",
    };

    let mut ics = format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Bookingflow//Public Booking//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{dtstart}\r\n\
         DTEND:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         STATUS:{status}\r\n"
    );
    if let Some(location) = location {
        ics.push_str(&format!("LOCATION:{}\r\n", escape_text(location)));
    }
    ics.push_str("END:VEVENT\r\nEND:VCALENDAR\r\n");
    ics
}

/// TEXT value escaping: backslash, `;`, `,` and line breaks.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}
