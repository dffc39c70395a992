//! Desired-state input: the JSON document handed to us on stdin
//!
//! Shape:
//!
//! ```json
//! { "alice": { "host": "%", "user": { "privs": { "create": true, "drop": false } } } }
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;

/// One principal as declared in the input document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredUserState {
    pub user: String,
    /// `None` means any host
    pub host: Option<String>,
    pub global_permissions: BTreeMap<String, bool>,
}

impl DesiredUserState {
    /// Look up a global permission, treating a missing entry as not granted
    pub fn has_global(&self, permission: &str) -> bool {
        self.global_permissions
            .get(permission)
            .copied()
            .unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    host: Option<String>,
    user: RawUser,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    #[serde(default)]
    privs: BTreeMap<String, bool>,
}

/// Decode the input document from a reader and normalize it
pub fn read_desired_state<R: Read>(reader: R) -> Result<Vec<DesiredUserState>> {
    let text = std::io::read_to_string(reader)?;
    let value: Value = serde_json::from_str(&text)?;
    parse_desired_state(value)
}

/// Normalize a decoded document into one state per user, sorted by name
pub fn parse_desired_state(value: Value) -> Result<Vec<DesiredUserState>> {
    let entries = match value {
        Value::Object(entries) => entries,
        other => {
            return Err(Error::MalformedSpecification(format!(
                "expected an object mapping user names to entries, got {}",
                kind(&other)
            )));
        }
    };

    let mut users: Vec<DesiredUserState> = entries
        .into_iter()
        .map(|(name, entry)| parse_entry(name, entry))
        .collect::<Result<_>>()?;
    users.sort_by(|a, b| a.user.cmp(&b.user));
    Ok(users)
}

fn parse_entry(name: String, entry: Value) -> Result<DesiredUserState> {
    if name.is_empty() {
        return Err(Error::MalformedSpecification(
            "user name must not be empty".to_string(),
        ));
    }
    if !entry.is_object() {
        return Err(Error::MalformedSpecification(format!(
            "entry for '{name}' must be an object, got {}",
            kind(&entry)
        )));
    }

    let raw: RawEntry = serde_json::from_value(entry)
        .map_err(|e| Error::MalformedSpecification(format!("entry for '{name}': {e}")))?;

    Ok(DesiredUserState {
        user: name,
        host: raw.host,
        global_permissions: raw.user.privs,
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_entry() {
        let users = parse_desired_state(json!({
            "alice": { "host": "%", "user": { "privs": { "create": true, "drop": true } } }
        }))
        .unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].user, "alice");
        assert_eq!(users[0].host.as_deref(), Some("%"));
        assert!(users[0].has_global("create"));
        assert!(users[0].has_global("drop"));
    }

    #[test]
    fn test_missing_privileges_default_to_false() {
        let users = parse_desired_state(json!({
            "bob": { "user": { "privs": {} } },
            "carol": { "host": "localhost", "user": {} }
        }))
        .unwrap();

        assert_eq!(users[0].user, "bob");
        assert_eq!(users[0].host, None);
        assert!(!users[0].has_global("create"));
        assert!(!users[0].has_global("drop"));
        assert!(!users[1].has_global("create"));
    }

    #[test]
    fn test_users_are_sorted() {
        let users = parse_desired_state(json!({
            "zed": { "user": {} },
            "amy": { "user": {} }
        }))
        .unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.user.as_str()).collect();
        assert_eq!(names, vec!["amy", "zed"]);
    }

    #[test]
    fn test_top_level_must_be_object() {
        let err = parse_desired_state(json!(["alice"])).unwrap_err();
        assert!(matches!(err, Error::MalformedSpecification(_)));
    }

    #[test]
    fn test_entry_without_user_is_rejected() {
        let err = parse_desired_state(json!({ "alice": { "host": "%" } })).unwrap_err();
        assert!(matches!(err, Error::MalformedSpecification(ref m) if m.contains("alice")));
    }

    #[test]
    fn test_entry_must_be_object() {
        let err = parse_desired_state(json!({ "alice": true })).unwrap_err();
        assert!(matches!(err, Error::MalformedSpecification(_)));
    }

    #[test]
    fn test_wrong_privilege_type_is_rejected() {
        let err = parse_desired_state(json!({
            "alice": { "user": { "privs": { "create": "yes" } } }
        }))
        .unwrap_err();
        assert!(matches!(err, Error::MalformedSpecification(_)));
    }

    #[test]
    fn test_empty_user_name_is_rejected() {
        let err = parse_desired_state(json!({ "": { "user": {} } })).unwrap_err();
        assert!(matches!(err, Error::MalformedSpecification(_)));
    }

    #[test]
    fn test_read_invalid_json() {
        let err = read_desired_state("{ not json".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_read_from_reader() {
        let input = r#"{ "alice": { "host": "%", "user": { "privs": { "create": true } } } }"#;
        let users = read_desired_state(input.as_bytes()).unwrap();
        assert_eq!(users[0].user, "alice");
    }
}
