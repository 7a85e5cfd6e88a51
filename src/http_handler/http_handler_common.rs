use super::http_request::request_common::RequestError;
use super::http_response::response_common::ResponseError;
use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

/// A single HAL link object, `{"href": "..."}`.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Link {
    href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self { Self { href: href.into() } }
    pub fn href(&self) -> &str { &self.href }
}

/// The `_links` section of a HAL resource. Only the self link is of interest,
/// association links are ignored.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    #[serde(rename = "self")]
    self_link: Option<Link>,
}

impl Links {
    pub fn with_self(href: impl Into<String>) -> Self { Self { self_link: Some(Link::new(href)) } }
}

/// Anything the backend exposes under its own URL.
pub trait Resource {
    fn links(&self) -> &Links;

    /// URL identifying this resource, used as key for update notifications.
    fn url(&self) -> Option<&str> { self.links().self_link.as_ref().map(Link::href) }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DinghyClass {
    name: String,
    #[serde(default = "DinghyClass::default_crew_size")]
    crew_size: u8,
    #[serde(default)]
    portsmouth_number: Option<u16>,
    #[serde(rename = "_links", default)]
    links: Links,
}

impl DinghyClass {
    fn default_crew_size() -> u8 { 1 }

    pub fn new(name: &str, crew_size: u8, portsmouth_number: Option<u16>, links: Links) -> Self {
        Self { name: name.to_string(), crew_size, portsmouth_number, links }
    }
    pub fn name(&self) -> &str { &self.name }
    pub fn crew_size(&self) -> u8 { self.crew_size }
    pub fn portsmouth_number(&self) -> Option<u16> { self.portsmouth_number }
}

impl Resource for DinghyClass {
    fn links(&self) -> &Links { &self.links }
}

/// Read-only projection of a race as served by the backend with its dinghy
/// class inlined. A race without a class is a handicap race.
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    name: String,
    #[serde(default)]
    planned_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    dinghy_class: Option<DinghyClass>,
    #[serde(default)]
    planned_laps: Option<u32>,
    #[serde(default = "TimeDelta::zero", with = "iso_duration")]
    duration: TimeDelta,
    #[serde(rename = "_links", default)]
    links: Links,
}

impl Race {
    pub fn new(
        name: &str,
        planned_start_time: Option<DateTime<Utc>>,
        dinghy_class: Option<DinghyClass>,
        planned_laps: Option<u32>,
        duration: TimeDelta,
        links: Links,
    ) -> Self {
        Self {
            name: name.to_string(),
            planned_start_time,
            dinghy_class,
            planned_laps,
            duration,
            links,
        }
    }
    pub fn name(&self) -> &str { &self.name }
    pub fn dinghy_class(&self) -> Option<&DinghyClass> { self.dinghy_class.as_ref() }
    pub fn planned_laps(&self) -> Option<u32> { self.planned_laps }
    pub fn is_handicap(&self) -> bool { self.dinghy_class.is_none() }
}

impl Resource for Race {
    fn links(&self) -> &Links { &self.links }
}

impl Scheduled for Race {
    fn planned_start(&self) -> Option<DateTime<Utc>> { self.planned_start_time }
    fn duration(&self) -> TimeDelta { self.duration }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    name: String,
    #[serde(rename = "_links", default)]
    links: Links,
}

impl Competitor {
    pub fn new(name: &str, links: Links) -> Self { Self { name: name.to_string(), links } }
    pub fn name(&self) -> &str { &self.name }
}

impl Resource for Competitor {
    fn links(&self) -> &Links { &self.links }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Dinghy {
    sail_number: String,
    #[serde(default)]
    dinghy_class: Option<DinghyClass>,
    #[serde(rename = "_links", default)]
    links: Links,
}

impl Dinghy {
    pub fn new(sail_number: &str, dinghy_class: Option<DinghyClass>, links: Links) -> Self {
        Self { sail_number: sail_number.to_string(), dinghy_class, links }
    }
    pub fn sail_number(&self) -> &str { &self.sail_number }
    pub fn dinghy_class(&self) -> Option<&DinghyClass> { self.dinghy_class.as_ref() }
}

impl Resource for Dinghy {
    fn links(&self) -> &Links { &self.links }
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lap {
    number: u32,
    #[serde(with = "iso_duration")]
    time: TimeDelta,
}

impl Lap {
    pub fn new(number: u32, time: TimeDelta) -> Self { Self { number, time } }
    pub fn number(&self) -> u32 { self.number }
    /// Lap time, measured from the previous lap or the start.
    pub fn time(&self) -> TimeDelta { self.time }
}

/// A competitor sailing a dinghy in one race, with the laps recorded so far.
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    helm: Competitor,
    dinghy: Dinghy,
    #[serde(default)]
    laps: Vec<Lap>,
    #[serde(rename = "_links", default)]
    links: Links,
}

impl Entry {
    pub fn new(helm: Competitor, dinghy: Dinghy, laps: Vec<Lap>, links: Links) -> Self {
        Self { helm, dinghy, laps, links }
    }
    pub fn helm(&self) -> &Competitor { &self.helm }
    pub fn dinghy(&self) -> &Dinghy { &self.dinghy }
    pub fn laps(&self) -> &[Lap] { &self.laps }

    /// Sum of all recorded lap times, i.e. the elapsed race time at the last lap.
    pub fn sum_of_lap_times(&self) -> TimeDelta {
        self.laps.iter().fold(TimeDelta::zero(), |acc, l| acc + l.time())
    }
}

impl Resource for Entry {
    fn links(&self) -> &Links { &self.links }
}

/// Something with a planned start and a duration.
pub trait Scheduled {
    fn planned_start(&self) -> Option<DateTime<Utc>>;
    fn duration(&self) -> TimeDelta;

    fn time_to_start(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.planned_start().filter(|start| now < *start).map(|start| start - now)
    }

    fn is_under_way(&self, now: DateTime<Utc>) -> bool {
        self.planned_start()
            .is_some_and(|start| now >= start && now <= start + self.duration())
    }
}

/// (De)serialization of `TimeDelta` as ISO-8601 duration (`PT45M`), the format
/// the backend writes durations in. Plain numbers are accepted as seconds.
pub(crate) mod iso_duration {
    use super::{ISO_DURATION_REGEX, TimeDelta};
    use serde::{Deserializer, Serializer, de};
    use std::fmt::Formatter;

    pub fn format(value: &TimeDelta) -> String {
        let sign = if *value < TimeDelta::zero() { "-" } else { "" };
        let abs = value.abs();
        let secs = abs.num_seconds();
        let millis = abs.subsec_nanos() / 1_000_000;
        let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
        let mut out = format!("{sign}PT");
        if h > 0 {
            out.push_str(&format!("{h}H"));
        }
        if m > 0 {
            out.push_str(&format!("{m}M"));
        }
        if millis > 0 {
            out.push_str(&format!("{s}.{millis:03}S"));
        } else if s > 0 || (h == 0 && m == 0) {
            out.push_str(&format!("{s}S"));
        }
        out
    }

    pub fn parse(value: &str) -> Option<TimeDelta> {
        let caps = ISO_DURATION_REGEX.captures(value.trim())?;
        let int = |i: usize| caps.get(i).map_or(Ok(0), |m| m.as_str().parse::<i64>());
        let days = int(2).ok()?;
        let hours = int(3).ok()?;
        let minutes = int(4).ok()?;
        let seconds = caps.get(5).map_or(Ok(0.0), |m| m.as_str().parse::<f64>()).ok()?;
        #[allow(clippy::cast_possible_truncation)]
        let millis = (seconds * 1000.0).round() as i64;
        let total = TimeDelta::days(days)
            + TimeDelta::hours(hours)
            + TimeDelta::minutes(minutes)
            + TimeDelta::milliseconds(millis);
        Some(if caps.get(1).is_some() { -total } else { total })
    }

    pub fn serialize<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        deserializer.deserialize_any(DurationVisitor)
    }

    struct DurationVisitor;

    impl de::Visitor<'_> for DurationVisitor {
        type Value = TimeDelta;

        fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
            f.write_str("an ISO-8601 duration or a number of seconds")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            parse(v).ok_or_else(|| E::custom(format!("invalid ISO-8601 duration {v:?}")))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v).map(TimeDelta::seconds).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> { Ok(TimeDelta::seconds(v)) }

        #[allow(clippy::cast_possible_truncation)]
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(TimeDelta::milliseconds((v * 1000.0).round() as i64))
        }
    }
}

static ISO_DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-)?P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$").unwrap()
});

/// Outcome of a backend operation as shown to the operator.
pub type OpResult<T> = Result<T, HTTPError>;

#[derive(Debug)]
pub enum HTTPError {
    HTTPRequestError(RequestError),
    HTTPResponseError(ResponseError),
}

impl Display for HTTPError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HTTPError::HTTPRequestError(e) => write!(f, "{e}"),
            HTTPError::HTTPResponseError(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for HTTPError {}

impl From<RequestError> for HTTPError {
    fn from(value: RequestError) -> Self { HTTPError::HTTPRequestError(value) }
}

impl From<ResponseError> for HTTPError {
    fn from(value: ResponseError) -> Self { HTTPError::HTTPResponseError(value) }
}

impl From<reqwest::Error> for HTTPError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_builder() {
            HTTPError::HTTPRequestError(RequestError::from(value))
        } else {
            HTTPError::HTTPResponseError(ResponseError::from(value))
        }
    }
}
