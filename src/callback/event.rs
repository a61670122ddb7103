use std::fmt;

pub const ON_CHANGE_SELECTION: &str = "onChangeSelection";
pub const ON_CHANGE_IMPERSONATED: &str = "onChangeImpersonated";
pub const ON_CHANGE_TOKEN: &str = "onChangeToken";

/// Shape of the body appended to a callback reference
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadSchema {
    /// No body; the reference alone is the invocation
    Trigger,
    /// Bare entity id, no structure
    TokenId,
    /// JSON record (id, update kind, escaped parameters) terminated by `;`
    TokenChange,
}

impl fmt::Display for PayloadSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadSchema::Trigger => write!(f, "trigger"),
            PayloadSchema::TokenId => write!(f, "token-id"),
            PayloadSchema::TokenChange => write!(f, "token-change"),
        }
    }
}

/// A logical event and the payload schema of each of its versions.
///
/// `versions[0]` is version 1 (bare event name as key), `versions[n]` is
/// version `n + 1` (key suffixed with `_{n + 1}`).
#[derive(Debug)]
pub struct EventSpec {
    pub name: &'static str,
    pub versions: &'static [PayloadSchema],
}

impl EventSpec {
    /// `(version, schema)` pairs in ascending version order
    pub fn versions(&self) -> impl Iterator<Item = (u32, PayloadSchema)> + '_ {
        self.versions
            .iter()
            .enumerate()
            .map(|(i, schema)| (i as u32 + 1, *schema))
    }

    pub fn callback_key(&self, version: u32) -> String {
        callback_key(self.name, version)
    }
}

/// Known events. Adding a payload version is one more schema entry here.
pub static EVENT_TABLE: &[EventSpec] = &[
    EventSpec {
        name: ON_CHANGE_SELECTION,
        versions: &[PayloadSchema::Trigger],
    },
    EventSpec {
        name: ON_CHANGE_IMPERSONATED,
        versions: &[PayloadSchema::Trigger],
    },
    EventSpec {
        name: ON_CHANGE_TOKEN,
        versions: &[PayloadSchema::TokenId, PayloadSchema::TokenChange],
    },
];

/// Find an event by name in `table`
pub fn lookup_event<'t>(table: &'t [EventSpec], name: &str) -> Option<&'t EventSpec> {
    table.iter().find(|spec| spec.name == name)
}

/// Callback map key for `event` at `version` (`onChangeToken`, `onChangeToken_2`, ...)
pub fn callback_key(event: &str, version: u32) -> String {
    if version <= 1 {
        event.to_string()
    } else {
        format!("{}_{}", event, version)
    }
}

#[cfg(test)]
mod event_tests {
    use super::*;

    #[test]
    fn test_callback_keys() {
        assert_eq!(callback_key("onChangeToken", 1), "onChangeToken");
        assert_eq!(callback_key("onChangeToken", 2), "onChangeToken_2");
        assert_eq!(callback_key("onChangeToken", 10), "onChangeToken_10");
    }

    #[test]
    fn test_token_event_versions_ascend() {
        let spec = lookup_event(EVENT_TABLE, ON_CHANGE_TOKEN).unwrap();
        let versions: Vec<_> = spec.versions().collect();
        assert_eq!(
            versions,
            vec![(1, PayloadSchema::TokenId), (2, PayloadSchema::TokenChange)]
        );
        assert_eq!(spec.callback_key(2), "onChangeToken_2");
    }

    #[test]
    fn test_unknown_event_not_found() {
        assert!(lookup_event(EVENT_TABLE, "onChangeWeather").is_none());
        assert!(lookup_event(EVENT_TABLE, "onchangetoken").is_none());
    }
}
