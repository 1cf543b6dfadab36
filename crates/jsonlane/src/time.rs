//! Time values written as strings in a reference layout.
//!
//! Layouts describe the reference instant `Mon Jan 2 15:04:05 MST 2006`
//! (offset `-0700`). Each token of that instant in the layout stands for the
//! matching field; every other character is copied verbatim.

use chrono::{
    DateTime, FixedOffset, NaiveTime, Offset, TimeZone, Utc,
    format::{Fixed, Item, Numeric, Pad, Parsed},
};

use crate::{
    decoder::{Decoder, Lead},
    encoder::Encoder,
    error::{Result, UnmarshalError},
};

/// `2006-01-02T15:04:05Z07:00`
pub const RFC3339: &str = "2006-01-02T15:04:05Z07:00";
/// `2006-01-02T15:04:05.999999999Z07:00`
pub const RFC3339_NANO: &str = "2006-01-02T15:04:05.999999999Z07:00";

const fn num(n: Numeric, pad: Pad) -> Item<'static> {
    Item::Numeric(n, pad)
}

/// Tokens tried at each position, longest spellings first so that `2006`
/// wins over `2` and `January` over `Jan`.
const TOKENS: &[(&str, Item<'static>)] = &[
    ("January", Item::Fixed(Fixed::LongMonthName)),
    ("Monday", Item::Fixed(Fixed::LongWeekdayName)),
    ("Jan", Item::Fixed(Fixed::ShortMonthName)),
    ("Mon", Item::Fixed(Fixed::ShortWeekdayName)),
    ("MST", Item::Fixed(Fixed::TimezoneName)),
    ("2006", num(Numeric::Year, Pad::Zero)),
    ("Z07:00", Item::Fixed(Fixed::TimezoneOffsetColonZ)),
    ("Z0700", Item::Fixed(Fixed::TimezoneOffsetZ)),
    ("-07:00", Item::Fixed(Fixed::TimezoneOffsetColon)),
    ("-0700", Item::Fixed(Fixed::TimezoneOffset)),
    ("-07", Item::Fixed(Fixed::TimezoneOffsetTripleColon)),
    (".000000000", Item::Fixed(Fixed::Nanosecond9)),
    (".000000", Item::Fixed(Fixed::Nanosecond6)),
    (".000", Item::Fixed(Fixed::Nanosecond3)),
    (".999999999", Item::Fixed(Fixed::Nanosecond)),
    (".999999", Item::Fixed(Fixed::Nanosecond)),
    (".999", Item::Fixed(Fixed::Nanosecond)),
    ("_2", num(Numeric::Day, Pad::Space)),
    ("01", num(Numeric::Month, Pad::Zero)),
    ("02", num(Numeric::Day, Pad::Zero)),
    ("03", num(Numeric::Hour12, Pad::Zero)),
    ("04", num(Numeric::Minute, Pad::Zero)),
    ("05", num(Numeric::Second, Pad::Zero)),
    ("06", num(Numeric::YearMod100, Pad::Zero)),
    ("15", num(Numeric::Hour, Pad::Zero)),
    ("PM", Item::Fixed(Fixed::UpperAmPm)),
    ("pm", Item::Fixed(Fixed::LowerAmPm)),
    ("1", num(Numeric::Month, Pad::None)),
    ("2", num(Numeric::Day, Pad::None)),
    ("3", num(Numeric::Hour12, Pad::None)),
    ("4", num(Numeric::Minute, Pad::None)),
    ("5", num(Numeric::Second, Pad::None)),
];

/// Translates a reference layout into formatting items.
fn layout_items(layout: &str) -> Vec<Item<'_>> {
    let mut items = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;
    while i < layout.len() {
        let rest = &layout[i..];
        if let Some((token, item)) = TOKENS.iter().find(|(token, _)| rest.starts_with(token)) {
            if literal_start < i {
                items.push(Item::Literal(&layout[literal_start..i]));
            }
            items.push(item.clone());
            i += token.len();
            literal_start = i;
        } else {
            i += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    if literal_start < layout.len() {
        items.push(Item::Literal(&layout[literal_start..]));
    }
    items
}

/// Parses `value` according to `layout`.
///
/// Missing date fields default to January 1st of year 0, a missing clock to
/// midnight and a missing offset to UTC.
///
/// ```rust
/// use jsonlane::time::{RFC3339, parse};
///
/// let t = parse("2024-03-09T10:11:12+02:00", RFC3339).unwrap();
/// assert_eq!(t.to_rfc3339(), "2024-03-09T10:11:12+02:00");
/// ```
pub fn parse(value: &str, layout: &str) -> Result<DateTime<FixedOffset>, UnmarshalError> {
    let fail = |reason: String| UnmarshalError::Time {
        value: value.to_owned(),
        layout: layout.to_owned(),
        reason,
    };
    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, value, layout_items(layout).iter()).map_err(|e| fail(e.to_string()))?;

    // Conflicting values are rejected by the setters and leave the field as parsed.
    let _ = parsed.set_month(1);
    let _ = parsed.set_day(1);
    let _ = parsed.set_ampm(false);
    let date = match parsed.to_naive_date() {
        Ok(date) => date,
        Err(_) => {
            let mut yearless = parsed.clone();
            yearless.set_year(0).map_err(|e| fail(e.to_string()))?;
            yearless.to_naive_date().map_err(|e| fail(e.to_string()))?
        }
    };
    let time = parsed.to_naive_time().unwrap_or(NaiveTime::MIN);
    let offset = parsed.to_fixed_offset().unwrap_or_else(|_| Utc.fix());
    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(|| fail("out of range".to_owned()))
}

/// Formats `t` according to `layout`.
#[must_use]
pub fn format(t: &DateTime<FixedOffset>, layout: &str) -> String {
    t.format_with_items(layout_items(layout).iter()).to_string()
}

impl Decoder<'_> {
    fn read_time(&mut self, layout: &str) -> Result<Option<DateTime<FixedOffset>>> {
        match self.string_borrowed()? {
            None => Ok(None),
            Some(s) => Ok(Some(parse(&s, layout)?)),
        }
    }

    /// Decodes a JSON string holding a time in `layout`.
    ///
    /// `null` leaves `v` unchanged.
    ///
    /// ```rust
    /// use chrono::{DateTime, FixedOffset};
    /// use jsonlane::{Decoder, time::RFC3339_NANO};
    ///
    /// let mut t = DateTime::<FixedOffset>::default();
    /// Decoder::from_slice(br#""2021-06-01T00:00:00.5Z""#).time(&mut t, RFC3339_NANO).unwrap();
    /// assert_eq!(t.timestamp_subsec_millis(), 500);
    /// ```
    pub fn time(&mut self, v: &mut DateTime<FixedOffset>, layout: &str) -> Result<()> {
        if let Some(t) = self.read_time(layout)? {
            *v = t;
        }
        Ok(())
    }

    /// Same as [`Decoder::time`].
    #[inline]
    pub fn add_time(&mut self, v: &mut DateTime<FixedOffset>, layout: &str) -> Result<()> {
        self.time(v, layout)
    }

    /// Decodes a time into an `Option`; `null` stores `None`.
    pub fn time_null(&mut self, v: &mut Option<DateTime<FixedOffset>>, layout: &str) -> Result<()> {
        self.start();
        match self.lead()? {
            Lead::End => Ok(()),
            Lead::Null => {
                *v = None;
                Ok(())
            }
            Lead::Byte(_) => {
                if let Some(t) = self.read_time(layout)? {
                    *v = Some(t);
                }
                Ok(())
            }
        }
    }

    /// Same as [`Decoder::time_null`].
    #[inline]
    pub fn add_time_null(&mut self, v: &mut Option<DateTime<FixedOffset>>, layout: &str) -> Result<()> {
        self.time_null(v, layout)
    }
}

impl Encoder<'_> {
    fn put_time(&mut self, t: &DateTime<FixedOffset>, layout: &str) {
        crate::encoder::write_escaped(&mut self.buf, &format(t, layout));
    }

    /// Writes `t` as a string in `layout`.
    ///
    /// ```rust
    /// use chrono::DateTime;
    /// use jsonlane::Encoder;
    ///
    /// let t = DateTime::parse_from_rfc3339("2006-01-02T15:04:05-07:00").unwrap();
    /// let mut enc = Encoder::new_buffer();
    /// enc.time(&t, "Jan _2 15:04 -0700");
    /// assert_eq!(enc.buf(), br#""Jan  2 15:04 -0700""#);
    /// ```
    pub fn time(&mut self, t: &DateTime<FixedOffset>, layout: &str) {
        self.begin_value();
        self.put_time(t, layout);
    }

    /// Same as [`Encoder::time`].
    #[inline]
    pub fn add_time(&mut self, t: &DateTime<FixedOffset>, layout: &str) {
        self.time(t, layout);
    }

    /// Writes `t` when present, nothing otherwise.
    pub fn time_omit_empty(&mut self, t: Option<&DateTime<FixedOffset>>, layout: &str) {
        self.active();
        if let Some(t) = t {
            self.time(t, layout);
        }
    }

    /// Same as [`Encoder::time_omit_empty`].
    #[inline]
    pub fn add_time_omit_empty(&mut self, t: Option<&DateTime<FixedOffset>>, layout: &str) {
        self.time_omit_empty(t, layout);
    }

    /// Writes an object member holding `t` in `layout`.
    pub fn time_key(&mut self, key: &str, t: &DateTime<FixedOffset>, layout: &str) {
        if self.begin_key(key) {
            self.put_time(t, layout);
        }
    }

    /// Same as [`Encoder::time_key`].
    #[inline]
    pub fn add_time_key(&mut self, key: &str, t: &DateTime<FixedOffset>, layout: &str) {
        self.time_key(key, t, layout);
    }

    /// Keyed variant of [`Encoder::time_omit_empty`].
    pub fn time_key_omit_empty(&mut self, key: &str, t: Option<&DateTime<FixedOffset>>, layout: &str) {
        self.active();
        if let Some(t) = t {
            self.time_key(key, t, layout);
        }
    }

    /// Same as [`Encoder::time_key_omit_empty`].
    #[inline]
    pub fn add_time_key_omit_empty(&mut self, key: &str, t: Option<&DateTime<FixedOffset>>, layout: &str) {
        self.time_key_omit_empty(key, t, layout);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Datelike, FixedOffset, Timelike};
    use rstest::rstest;

    use super::*;
    use crate::Error;

    fn reference() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2006-01-02T15:04:05.123456789-07:00").unwrap()
    }

    #[rstest]
    #[case(RFC3339, "2006-01-02T15:04:05-07:00")]
    #[case(RFC3339_NANO, "2006-01-02T15:04:05.123456789-07:00")]
    #[case("2006-01-02", "2006-01-02")]
    #[case("02/01/06 03:04PM", "02/01/06 03:04PM")]
    #[case("Monday, 2 January 2006", "Monday, 2 January 2006")]
    #[case("15:04:05.000 -07", "15:04:05.123 -07")]
    #[case("Mon Jan _2 3:4:5 pm", "Mon Jan  2 3:4:5 pm")]
    fn formats_reference_instant(#[case] layout: &str, #[case] expected: &str) {
        assert_eq!(format(&reference(), layout), expected);
    }

    #[test]
    fn utc_uses_z() {
        let t = DateTime::parse_from_rfc3339("2020-05-06T07:08:09Z").unwrap();
        assert_eq!(format(&t, RFC3339), "2020-05-06T07:08:09Z");
        assert_eq!(format(&t, "2006-01-02T15:04:05-07:00"), "2020-05-06T07:08:09+00:00");
    }

    #[test]
    fn parses_partial_layouts() {
        let d = parse("2019-11-30", "2006-01-02").unwrap();
        assert_eq!((d.year(), d.month(), d.day(), d.hour()), (2019, 11, 30, 0));
        assert_eq!(d.offset().local_minus_utc(), 0);

        let t = parse("07:30PM", "03:04PM").unwrap();
        assert_eq!((t.year(), t.hour(), t.minute()), (0, 19, 30));
    }

    #[test]
    fn rejects_mismatched_value() {
        let err = parse("2019/11/30", "2006-01-02").unwrap_err();
        assert!(matches!(err, UnmarshalError::Time { ref layout, .. } if layout == "2006-01-02"));
    }

    #[test]
    fn decoder_time_and_null() {
        let mut dec = Decoder::from_slice(br#""2001-02-03T04:05:06+01:00" null "bogus""#);
        let mut t = DateTime::<FixedOffset>::default();
        dec.time(&mut t, RFC3339).unwrap();
        assert_eq!(t.to_rfc3339(), "2001-02-03T04:05:06+01:00");
        dec.add_time(&mut t, RFC3339).unwrap();
        assert_eq!(t.year(), 2001);
        let err = dec.time(&mut t, RFC3339).unwrap_err();
        assert!(err.is_invalid_unmarshal());
    }

    #[test]
    fn decoder_time_null_variant() {
        let mut dec = Decoder::from_slice(br#""2001-02-03T04:05:06Z" null 5"#);
        let mut t = None;
        dec.time_null(&mut t, RFC3339).unwrap();
        assert!(t.is_some());
        dec.time_null(&mut t, RFC3339).unwrap();
        assert!(t.is_none());
        let err = dec.time_null(&mut t, RFC3339).unwrap_err();
        assert!(matches!(err, Error::InvalidUnmarshal(UnmarshalError::Mismatch { .. })));
    }

    #[test]
    fn encoder_time_variants() {
        let t = reference();
        let mut enc = Encoder::new_buffer();
        enc.raw_byte(b'{');
        enc.time_key("at", &t, "2006-01-02");
        enc.time_key_omit_empty("never", None, RFC3339);
        enc.add_time_key_omit_empty("hour", Some(&t), "15");
        enc.raw_byte(b'}');
        assert_eq!(enc.buf(), br#"{"at":"2006-01-02","hour":"15"}"#);
    }
}
