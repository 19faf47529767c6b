//! Date parsing and the compact ISO 8601 form used in signing.

use crate::error::{Error, Result};

const RFC3339_LEN: usize = 20;
const RFC5322_LEN: usize = 29;

// Specifiers are `%NC` where N is a decimal width and C selects the field:
// Year, Month, Day, hour, minute, second, or `*` to skip. Any other byte
// must match the input exactly.
const FORMAT_RFC3339: &str = "%4Y-%2M-%2DT%2h:%2m:%2sZ";
const FORMAT_RFC5322: &str = "%3*, %2D %3M %4Y %2h:%2m:%2s GMT";

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTH_DAYS: [i32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const YEAR_MIN: i32 = 1900;

/// Calendar decomposition of a parsed date.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    /// Four digit year, 1900 or later.
    pub year: i32,
    /// Month of the year, 1 through 12.
    pub month: i32,
    /// Day of the month, 1 through 31 depending on the month.
    pub day: i32,
    /// Hour of the day, 0 through 23.
    pub hour: i32,
    /// Minute of the hour, 0 through 59.
    pub minute: i32,
    /// Second of the minute, 0 through 60. 60 admits a leap second.
    pub second: i32,
}

impl DateTime {
    /// Parses an RFC 3339 date (`2018-01-18T09:18:06Z`) or an RFC 5322
    /// date (`Thu, 18 Jan 2018 09:18:06 GMT`), dispatching on length, and
    /// validates the calendar fields.
    pub fn parse(date: &str) -> Result<Self> {
        let parsed = match date.len() {
            RFC3339_LEN => parse_date(date.as_bytes(), FORMAT_RFC3339)?,
            RFC5322_LEN => parse_date(date.as_bytes(), FORMAT_RFC5322)?,
            len => {
                return Err(Error::invalid_parameter(format!(
                    "date must be {RFC3339_LEN} bytes (RFC 3339) or {RFC5322_LEN} bytes (RFC 5322), got {len}"
                )))
            }
        };

        parsed.validate()?;
        Ok(parsed)
    }

    /// Formats the compact ISO 8601 basic form `YYYYMMDDTHHMMSSZ`.
    ///
    /// Formats the fields as they are; [`parse`](Self::parse) is what
    /// validates them.
    pub fn to_iso8601(&self) -> String {
        format!(
            "{:04}{:02}{:02}T{:02}{:02}{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    fn validate(&self) -> Result<()> {
        if self.year < YEAR_MIN {
            return Err(Error::iso_formatting(format!(
                "year must be {YEAR_MIN} or later, got {}",
                self.year
            )));
        }

        if !(1..=12).contains(&self.month) {
            return Err(Error::iso_formatting(format!(
                "month must be between 1 and 12, got {}",
                self.month
            )));
        }

        // February 29 is only valid in a leap year.
        if self.month == 2 && self.day == 29 {
            if !is_leap_year(self.year) {
                return Err(Error::iso_formatting(format!(
                    "{} is not a leap year",
                    self.year
                )));
            }
        } else if self.day < 1 || self.day > MONTH_DAYS[(self.month - 1) as usize] {
            return Err(Error::iso_formatting(format!(
                "day must be between 1 and {} for month {}, got {}",
                MONTH_DAYS[(self.month - 1) as usize],
                self.month,
                self.day
            )));
        }

        if !(0..=23).contains(&self.hour) {
            return Err(Error::iso_formatting(format!(
                "hour must be between 0 and 23, got {}",
                self.hour
            )));
        }

        if !(0..=59).contains(&self.minute) {
            return Err(Error::iso_formatting(format!(
                "minute must be between 0 and 59, got {}",
                self.minute
            )));
        }

        // An upper limit of 60 accounts for the occasional leap second UTC
        // adjustment.
        if !(0..=60).contains(&self.second) {
            return Err(Error::iso_formatting(format!(
                "second must be between 0 and 60, got {}",
                self.second
            )));
        }

        Ok(())
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Interprets `width` bytes of `date` at `at` according to the format
/// specifier and stores the field on `out`.
fn scan_value(date: &[u8], spec: u8, at: usize, width: usize, out: &mut DateTime) -> Result<()> {
    if spec == b'*' {
        return Ok(());
    }

    let field = date
        .get(at..at + width)
        .ok_or_else(|| Error::iso_formatting("date string ended before the last field"))?;

    // A three byte month is matched by name, case sensitively.
    if spec == b'M' && width == 3 {
        let month = MONTH_NAMES
            .iter()
            .position(|name| name.as_bytes() == field)
            .ok_or_else(|| {
                Error::iso_formatting(format!(
                    "unable to match {:?} to a month",
                    String::from_utf8_lossy(field)
                ))
            })?;
        out.month = month as i32 + 1;
        return Ok(());
    }

    let mut value = 0i32;
    for &b in field {
        if !b.is_ascii_digit() {
            return Err(Error::iso_formatting(format!(
                "expected {width} digits at byte {at} of date string"
            )));
        }
        value = value * 10 + i32::from(b - b'0');
    }

    match spec {
        b'Y' => out.year = value,
        b'M' => out.month = value,
        b'D' => out.day = value,
        b'h' => out.hour = value,
        b'm' => out.minute = value,
        b's' => out.second = value,
        _ => {}
    }

    Ok(())
}

fn parse_date(date: &[u8], format: &str) -> Result<DateTime> {
    let format = format.as_bytes();
    let mut out = DateTime::default();
    let mut read = 0;
    let mut i = 0;

    while i < format.len() {
        if format[i] == b'%' {
            let width = usize::from(format[i + 1] - b'0');
            scan_value(date, format[i + 2], read, width, &mut out)?;
            read += width;
            i += 3;
        } else {
            match date.get(read) {
                Some(&b) if b == format[i] => read += 1,
                _ => {
                    return Err(Error::iso_formatting(format!(
                        "expected {:?} at byte {} of date string",
                        format[i] as char, read
                    )))
                }
            }
            i += 1;
        }
    }

    Ok(out)
}

/// Converts an RFC 3339 date (`2018-01-18T09:18:06Z`) or an RFC 5322 date
/// (`Thu, 18 Jan 2018 09:18:06 GMT`) into the compact ISO 8601 basic form
/// `YYYYMMDDTHHMMSSZ` that SigV4 signs with.
///
/// The input shape is chosen by length. Any other length fails with
/// `InvalidParameter`; parse mismatches and invalid calendar dates fail
/// with `IsoFormatting`.
///
/// # Examples
///
/// ```
/// use sigv4::date_to_iso8601;
///
/// let date = date_to_iso8601("2015-08-30T12:36:00Z").unwrap();
/// assert_eq!(date, "20150830T123600Z");
/// ```
pub fn date_to_iso8601(date: &str) -> Result<String> {
    Ok(DateTime::parse(date)?.to_iso8601())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_rfc3339() {
        assert_eq!(
            date_to_iso8601("2018-01-18T09:18:06Z").unwrap(),
            "20180118T091806Z"
        );
        assert_eq!(
            date_to_iso8601("1900-01-01T00:00:00Z").unwrap(),
            "19000101T000000Z"
        );
    }

    #[test]
    fn test_parse_fields() {
        let parsed = DateTime::parse("2018-01-18T09:18:06Z").unwrap();
        assert_eq!(
            parsed,
            DateTime {
                year: 2018,
                month: 1,
                day: 18,
                hour: 9,
                minute: 18,
                second: 6,
            }
        );
        assert_eq!(parsed.to_iso8601(), "20180118T091806Z");
    }

    #[test]
    fn test_rfc5322() {
        assert_eq!(
            date_to_iso8601("Thu, 18 Jan 2018 09:18:06 GMT").unwrap(),
            "20180118T091806Z"
        );
        // The weekday is skipped, not validated.
        assert_eq!(
            date_to_iso8601("Xxx, 18 Jan 2018 09:18:06 GMT").unwrap(),
            "20180118T091806Z"
        );
    }

    #[test]
    fn test_month_names() {
        for (i, name) in ["Jan", "Feb", "Mar", "Apr", "May", "Jun"]
            .iter()
            .enumerate()
        {
            let input = format!("Thu, 18 {name} 2018 09:18:06 GMT");
            let expected = format!("20180{}18T091806Z", i + 1);
            assert_eq!(date_to_iso8601(&input).unwrap(), expected);
        }

        // Month names are matched case sensitively.
        let err = date_to_iso8601("Thu, 18 JAN 2018 09:18:06 GMT").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IsoFormatting);
    }

    #[test]
    fn test_leap_day() {
        assert_eq!(
            date_to_iso8601("2020-02-29T00:00:00Z").unwrap(),
            "20200229T000000Z"
        );
        // 2000 is divisible by 400, 1900 is not.
        assert_eq!(
            date_to_iso8601("2000-02-29T00:00:00Z").unwrap(),
            "20000229T000000Z"
        );

        let err = date_to_iso8601("2019-02-29T00:00:00Z").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IsoFormatting);
        let err = date_to_iso8601("1900-02-29T00:00:00Z").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IsoFormatting);
    }

    #[test]
    fn test_leap_second() {
        assert_eq!(
            date_to_iso8601("2016-12-31T23:59:60Z").unwrap(),
            "20161231T235960Z"
        );
        let err = date_to_iso8601("2016-12-31T23:59:61Z").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IsoFormatting);
    }

    #[test]
    fn test_out_of_range_fields() {
        for input in [
            "2018-13-18T09:18:06Z",
            "2018-00-18T09:18:06Z",
            "2018-04-31T09:18:06Z",
            "2018-01-00T09:18:06Z",
            "2018-01-18T24:18:06Z",
            "2018-01-18T09:60:06Z",
            "1899-12-31T23:59:59Z",
        ] {
            let err = date_to_iso8601(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::IsoFormatting, "input: {input}");
        }
    }

    #[test]
    fn test_separator_mismatch() {
        let err = date_to_iso8601("2018 01-18T09:18:06Z").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IsoFormatting);
        let err = date_to_iso8601("Thu, 18 Jan 2018 09:18:06 UTC").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IsoFormatting);
    }

    #[test]
    fn test_non_numeric_field() {
        let err = date_to_iso8601("2018-01-18T09:1x:06Z").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IsoFormatting);
    }

    #[test]
    fn test_wrong_length() {
        for input in ["", "2018-01-18", "2018-01-18T09:18:06.000Z"] {
            let err = date_to_iso8601(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter, "input: {input}");
        }
    }
}
