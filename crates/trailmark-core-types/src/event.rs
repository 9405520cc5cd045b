//! Lifecycle events recorded by history rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The tracked mutation a history row was written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    Create,
    Update,
    Destroy,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Create => "create",
            Event::Update => "update",
            Event::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Event {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Event::Create),
            "update" => Ok(Event::Update),
            "destroy" => Ok(Event::Destroy),
            other => Err(format!("unknown history event '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_agree() {
        for event in [Event::Create, Event::Update, Event::Destroy] {
            assert_eq!(event.as_str().parse::<Event>().unwrap(), event);
            assert_eq!(event.to_string(), event.as_str());
        }
    }

    #[test]
    fn test_unknown_event_rejected() {
        assert!("touch".parse::<Event>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Event::Destroy).unwrap(), "\"destroy\"");
    }
}
