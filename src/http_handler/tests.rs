use super::http_client::HTTPClient;
use super::http_request::{
    add_lap_patch::AddLapRequest, race_patch::RacePatch, races_between_get::RacesBetweenRequest,
    request_common::{HTTPRequestType, RequestError},
};
use super::http_response::{collection::HalCollection, response_common::ErrorReturn};
use super::{Entry, HTTPError, Lap, Race, Resource, Scheduled, http_handler_common::iso_duration};
use chrono::{DateTime, TimeDelta, Utc};

const BASE: &str = "http://localhost:8081/dinghyracing/api";

fn utc(s: &str) -> DateTime<Utc> { s.parse().unwrap() }

const RACE_JSON: &str = r#"{
    "name": "Scorpion A",
    "plannedStartTime": "2021-10-14T14:10:00Z",
    "dinghyClass": {
        "name": "Scorpion",
        "crewSize": 2,
        "portsmouthNumber": 1044,
        "_links": {"self": {"href": "http://localhost:8081/dinghyracing/api/dinghyClasses/1"}}
    },
    "plannedLaps": 5,
    "duration": "PT45M",
    "_links": {
        "self": {"href": "http://localhost:8081/dinghyracing/api/races/4"},
        "race": {"href": "http://localhost:8081/dinghyracing/api/races/4{?projection}", "templated": true}
    }
}"#;

#[test]
fn test_race_from_hal_json() {
    let race: Race = serde_json::from_str(RACE_JSON).unwrap();
    assert_eq!(race.name(), "Scorpion A");
    assert_eq!(race.planned_start(), Some(utc("2021-10-14T14:10:00Z")));
    assert_eq!(race.duration(), TimeDelta::minutes(45));
    assert_eq!(race.planned_laps(), Some(5));
    assert_eq!(race.url(), Some(format!("{BASE}/races/4").as_str()));
    let class = race.dinghy_class().unwrap();
    assert_eq!((class.name(), class.crew_size(), class.portsmouth_number()), ("Scorpion", 2, Some(1044)));
    assert!(!race.is_handicap());
}

#[test]
fn test_handicap_race_with_offset_start_time() {
    let json = r#"{"name": "Handicap A", "plannedStartTime": "2021-10-14T15:10:00+01:00", "duration": 2700}"#;
    let race: Race = serde_json::from_str(json).unwrap();
    assert!(race.is_handicap());
    assert_eq!(race.planned_start(), Some(utc("2021-10-14T14:10:00Z")));
    assert_eq!(race.duration(), TimeDelta::minutes(45));
    assert_eq!(race.url(), None);
    assert!(race.is_under_way(utc("2021-10-14T14:30:00Z")));
    assert_eq!(race.time_to_start(utc("2021-10-14T14:00:00Z")), Some(TimeDelta::minutes(10)));
    assert_eq!(race.time_to_start(utc("2021-10-14T14:30:00Z")), None);
}

#[test]
fn test_collection_of_entries() {
    let json = r#"{
        "_embedded": {"entries": [{
            "helm": {"name": "Chris Marshall"},
            "dinghy": {"sailNumber": "1234"},
            "laps": [{"number": 1, "time": "PT10M30S"}, {"number": 2, "time": "PT9M45.5S"}],
            "_links": {"self": {"href": "http://localhost:8081/dinghyracing/api/entries/10"}}
        }]},
        "page": {"size": 20, "totalElements": 1, "totalPages": 1, "number": 0}
    }"#;
    let collection: HalCollection<Entry> = serde_json::from_str(json).unwrap();
    assert!(collection.page().unwrap().is_last());
    let entries = collection.into_items();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].helm().name(), "Chris Marshall");
    assert_eq!(entries[0].dinghy().sail_number(), "1234");
    assert_eq!(entries[0].laps()[1].number(), 2);
    assert_eq!(entries[0].sum_of_lap_times(), TimeDelta::milliseconds(1_215_500));
}

#[test]
fn test_empty_collection_and_paging() {
    let empty: HalCollection<Race> =
        serde_json::from_str(r#"{"page": {"size": 20, "totalElements": 45, "totalPages": 3, "number": 1}}"#).unwrap();
    let page = empty.page().unwrap();
    assert_eq!((page.total_elements(), page.total_pages(), page.number()), (45, 3, 1));
    assert!(!page.is_last());
    assert!(empty.into_items().is_empty());

    let bare: HalCollection<Race> = serde_json::from_str("{}").unwrap();
    assert!(bare.page().is_none());
}

#[test]
fn test_iso_duration_parse() {
    assert_eq!(iso_duration::parse("PT45M"), Some(TimeDelta::minutes(45)));
    assert_eq!(iso_duration::parse("PT1H2M3S"), Some(TimeDelta::seconds(3723)));
    assert_eq!(iso_duration::parse("PT0.25S"), Some(TimeDelta::milliseconds(250)));
    assert_eq!(iso_duration::parse("P1DT1H"), Some(TimeDelta::hours(25)));
    assert_eq!(iso_duration::parse("-PT5M"), Some(TimeDelta::minutes(-5)));
    assert_eq!(iso_duration::parse("45 minutes"), None);
    assert_eq!(iso_duration::parse("PT1M1M"), None);
}

#[test]
fn test_iso_duration_format() {
    assert_eq!(iso_duration::format(&TimeDelta::minutes(45)), "PT45M");
    assert_eq!(iso_duration::format(&TimeDelta::seconds(3723)), "PT1H2M3S");
    assert_eq!(iso_duration::format(&TimeDelta::milliseconds(9_045_500)), "PT2H30M45.500S");
    assert_eq!(iso_duration::format(&TimeDelta::zero()), "PT0S");
    assert_eq!(iso_duration::format(&TimeDelta::minutes(-5)), "-PT5M");
}

#[test]
fn test_lap_body() {
    let body = serde_json::to_value(Lap::new(3, TimeDelta::seconds(630))).unwrap();
    assert_eq!(body, serde_json::json!({"number": 3, "time": "PT10M30S"}));
}

#[test]
fn test_race_patch_omits_unchanged_fields() {
    let patch = RacePatch { planned_start_time: Some(utc("2021-10-14T14:15:00Z")), ..RacePatch::default() };
    assert_eq!(
        serde_json::to_value(&patch).unwrap(),
        serde_json::json!({"plannedStartTime": "2021-10-14T14:15:00Z"})
    );
}

#[test]
fn test_error_message_from_body() {
    assert_eq!(
        ErrorReturn::message_from_body(r#"{"message": "Race name must be unique"}"#),
        Some("Race name must be unique".to_string())
    );
    assert_eq!(
        ErrorReturn::message_from_body(r#"{"error": "Bad Request", "status": 400}"#),
        Some("Bad Request".to_string())
    );
    assert_eq!(ErrorReturn::message_from_body(r#"{"status": 500}"#), None);
    assert_eq!(ErrorReturn::message_from_body("  "), None);
    assert_eq!(ErrorReturn::message_from_body("Gateway timeout"), Some("Gateway timeout".to_string()));
}

#[test]
fn test_client_resolves_endpoints() {
    let client = HTTPClient::new(&format!("{BASE}/")).unwrap();
    assert_eq!(client.url(), BASE);
    assert_eq!(client.resolve("/races"), format!("{BASE}/races"));
    assert_eq!(client.resolve("races"), format!("{BASE}/races"));
    assert_eq!(client.resolve(&format!("{BASE}/races/4")), format!("{BASE}/races/4"));
}

#[test]
fn test_request_endpoints_and_query() {
    let lap = AddLapRequest::new(&format!("{BASE}/entries/10/"), Lap::new(1, TimeDelta::minutes(1)));
    assert_eq!(lap.endpoint(), format!("{BASE}/entries/10/addLap"));
    assert_eq!(lap.request_method().to_string(), "PATCH");

    let search = RacesBetweenRequest {
        start: utc("2021-10-14T08:00:00Z"),
        end: utc("2021-10-14T18:00:00Z"),
        page: 0,
        size: 100,
    };
    let query = search.query_params();
    assert!(query.contains(&("startTime", "2021-10-14T08:00:00Z".to_string())));
    assert!(query.contains(&("endTime", "2021-10-14T18:00:00Z".to_string())));
    assert!(query.contains(&("projection", "inlineDinghyClass".to_string())));
}

#[test]
fn test_errors_display_as_text() {
    let err = HTTPError::from(RequestError::unknown("dinghy class", "Laser"));
    assert_eq!(err.to_string(), "Unknown dinghy class \"Laser\"");
    let err = HTTPError::from(RequestError::NotStarted { race: "Scorpion A".to_string() });
    assert_eq!(err.to_string(), "Scorpion A has not started yet");
}
