//! Time related utils.

use crate::Error;
use crate::Result;
use chrono::Utc;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into http date: `Sun, 06 Nov 1994 08:49:37 GMT`
///
/// ## Note
///
/// HTTP date is slightly different from RFC2822.
///
/// - Timezone is fixed to GMT.
/// - Day must be 2 digit.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an http date or any RFC2822 date such as `Tue, 27 Mar 2007 19:36:42 +0000`.
pub fn parse_http_date(s: &str) -> Result<DateTime> {
    let t = chrono::DateTime::parse_from_rfc2822(s)
        .map_err(|e| Error::unexpected(format!("invalid http date: {s}")).with_source(e))?;
    Ok(t.with_timezone(&Utc))
}

/// Format time as unix seconds, the form used by the `Expires` query parameter.
pub fn format_timestamp(t: DateTime) -> String {
    t.timestamp().to_string()
}
