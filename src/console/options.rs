use crate::http_handler::{DinghyClass, Race, Resource, Scheduled};
use chrono::Local;

/// Label of the option that leaves the dinghy class empty.
pub const HANDICAP_LABEL: &str = "Handicap";

/// An entry of a selection list. `value` is the URL of the selected resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    label: String,
    value: Option<String>,
}

impl SelectOption {
    pub fn new(label: &str, value: Option<&str>) -> Self {
        Self { label: label.to_string(), value: value.map(str::to_string) }
    }
    pub fn label(&self) -> &str { &self.label }
    pub fn value(&self) -> Option<&str> { self.value.as_deref() }
}

/// Class options for a new race, led by the handicap option.
pub fn dinghy_class_options(classes: &[DinghyClass]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::new(HANDICAP_LABEL, None))
        .chain(classes.iter().map(|c| SelectOption::new(c.name(), c.url())))
        .collect()
}

/// Race options labelled with name and local start time.
pub fn race_options(races: &[Race]) -> Vec<SelectOption> {
    races
        .iter()
        .map(|race| {
            let label = match race.planned_start() {
                Some(start) => format!("{} ({})", race.name(), start.with_timezone(&Local).format("%H:%M")),
                None => race.name().to_string(),
            };
            SelectOption::new(&label, race.url())
        })
        .collect()
}

/// Finds an option by label. An exact match wins, otherwise the only option
/// whose label starts with `label`, ignoring case.
pub fn select<'a>(options: &'a [SelectOption], label: &str) -> Option<&'a SelectOption> {
    if let Some(exact) = options.iter().find(|o| o.label.eq_ignore_ascii_case(label)) {
        return Some(exact);
    }
    let wanted = label.to_lowercase();
    let mut matching = options.iter().filter(|o| o.label.to_lowercase().starts_with(&wanted));
    match (matching.next(), matching.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}
