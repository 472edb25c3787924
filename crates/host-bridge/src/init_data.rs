//! Launch parameters signed by the host
//!
//! The host passes a URL-encoded query string (`initData`) whose `hash` the
//! backend verifies. The parsed form here is UNTRUSTED: use it for display
//! (greeting the user by name), never for authorization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Errors raised while parsing init data
#[derive(Debug, thiserror::Error)]
pub enum InitDataError {
    /// A mandatory key is absent
    #[error("init data is missing `{0}`")]
    MissingField(&'static str),

    /// A value is not valid percent-encoded UTF-8
    #[error("invalid encoding for `{key}`: {reason}")]
    Encoding {
        /// Offending key
        key: String,
        /// Decoder message
        reason: String,
    },

    /// `auth_date` is not a unix timestamp
    #[error("invalid auth_date: {0:?}")]
    InvalidAuthDate(String),

    /// `user` is not the expected JSON object
    #[error("invalid user object: {0}")]
    InvalidUser(#[from] serde_json::Error),
}

/// Telegram user as described in init data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAppUser {
    /// Telegram user id
    pub id: i64,
    /// First name
    pub first_name: String,
    /// Last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Username without `@`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// IETF language tag of the user's client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    /// Telegram Premium subscriber
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
}

impl WebAppUser {
    /// "First Last", or just the first name
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

/// Parsed, unverified init data
///
/// # Examples
/// ```
/// use host_bridge::InitDataUnsafe;
///
/// let raw = "query_id=AAH&user=%7B%22id%22%3A42%2C%22first_name%22%3A%22Ann%22%7D\
///            &auth_date=1700000000&hash=deadbeef";
/// let data: InitDataUnsafe = raw.parse().unwrap();
/// assert_eq!(data.user.unwrap().first_name, "Ann");
/// assert_eq!(data.hash, "deadbeef");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitDataUnsafe {
    /// Session id for `answerWebAppQuery`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,
    /// The launching user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<WebAppUser>,
    /// Unix time the data was signed
    pub auth_date: i64,
    /// Signature over the other fields
    pub hash: String,
    /// Keys without a dedicated field (`chat_type`, `start_param`, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl InitDataUnsafe {
    /// Parse the raw `initData` query string
    pub fn parse(raw: &str) -> Result<Self, InitDataError> {
        let mut query_id = None;
        let mut user = None;
        let mut auth_date = None;
        let mut hash = None;
        let mut extra = BTreeMap::new();

        for pair in raw.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(key, value)?;

            match key {
                "query_id" => query_id = Some(value),
                "user" => user = Some(serde_json::from_str::<WebAppUser>(&value)?),
                "auth_date" => {
                    let secs = value
                        .parse::<i64>()
                        .map_err(|_| InitDataError::InvalidAuthDate(value.clone()))?;
                    auth_date = Some(secs);
                }
                "hash" => hash = Some(value),
                _ => {
                    extra.insert(key.to_string(), value);
                }
            }
        }

        Ok(Self {
            query_id,
            user,
            auth_date: auth_date.ok_or(InitDataError::MissingField("auth_date"))?,
            hash: hash.ok_or(InitDataError::MissingField("hash"))?,
            extra,
        })
    }

    /// `auth_date` as a UTC timestamp
    pub fn signed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.auth_date, 0)
    }

    /// Start parameter passed through the launch link, if any
    pub fn start_param(&self) -> Option<&str> {
        self.extra.get("start_param").map(String::as_str)
    }
}

impl FromStr for InitDataUnsafe {
    type Err = InitDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Form encoding: `+` is a space, a literal plus arrives as %2B.
fn decode_component(key: &str, value: &str) -> Result<String, InitDataError> {
    let value = value.replace('+', " ");
    urlencoding::decode(&value)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| InitDataError::Encoding { key: key.to_string(), reason: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "query_id=AAHdF6IQAAAAAN0XohDhrOrc\
        &user=%7B%22id%22%3A279058397%2C%22first_name%22%3A%22Vladislav%22%2C%22last_name%22%3A%22Kibenko%22%2C%22username%22%3A%22vdkfrost%22%2C%22language_code%22%3A%22ru%22%2C%22is_premium%22%3Atrue%7D\
        &auth_date=1662771648\
        &hash=c501b71e775f74ce10e377dea85a7ea24ecd640b223ea86dfe453e0eaed2e2b2";

    #[test]
    fn test_parse_full_init_data() {
        let data = InitDataUnsafe::parse(SAMPLE).unwrap();

        assert_eq!(data.query_id.as_deref(), Some("AAHdF6IQAAAAAN0XohDhrOrc"));
        assert_eq!(data.auth_date, 1662771648);
        assert!(data.hash.starts_with("c501b71e"));

        let user = data.user.unwrap();
        assert_eq!(user.id, 279058397);
        assert_eq!(user.username.as_deref(), Some("vdkfrost"));
        assert_eq!(user.is_premium, Some(true));
        assert_eq!(user.display_name(), "Vladislav Kibenko");
    }

    #[test]
    fn test_signed_at() {
        let data = InitDataUnsafe::parse(SAMPLE).unwrap();
        let signed_at = data.signed_at().unwrap();
        assert_eq!(signed_at.to_rfc3339(), "2022-09-10T01:00:48+00:00");
    }

    #[test]
    fn test_extra_keys_are_kept() {
        let data =
            InitDataUnsafe::parse("chat_type=private&start_param=ref+42&auth_date=1&hash=h").unwrap();
        assert_eq!(data.start_param(), Some("ref 42"));
        assert_eq!(data.extra.get("chat_type").map(String::as_str), Some("private"));
        assert!(data.user.is_none());
    }

    #[test]
    fn test_missing_hash() {
        let err = InitDataUnsafe::parse("auth_date=1662771648").unwrap_err();
        assert!(matches!(err, InitDataError::MissingField("hash")));
    }

    #[test]
    fn test_empty_string_is_missing_auth_date() {
        let err = "".parse::<InitDataUnsafe>().unwrap_err();
        assert!(matches!(err, InitDataError::MissingField("auth_date")));
    }

    #[test]
    fn test_invalid_auth_date() {
        let err = InitDataUnsafe::parse("auth_date=yesterday&hash=h").unwrap_err();
        assert!(matches!(err, InitDataError::InvalidAuthDate(v) if v == "yesterday"));
    }

    #[test]
    fn test_invalid_user_json() {
        let err = InitDataUnsafe::parse("user=%7Bnope&auth_date=1&hash=h").unwrap_err();
        assert!(matches!(err, InitDataError::InvalidUser(_)));
    }

    #[test]
    fn test_display_name_without_last_name() {
        let user = WebAppUser {
            id: 1,
            first_name: "Ann".to_string(),
            last_name: None,
            username: None,
            language_code: None,
            is_premium: None,
        };
        assert_eq!(user.display_name(), "Ann");
    }
}
