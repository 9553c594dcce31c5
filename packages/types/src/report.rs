use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use utoipa::ToSchema;

/// Treats an explicit JSON `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single client-side error as posted by the reporting script.
///
/// Every field defaults to its zero value when it is missing from the payload,
/// so an incomplete report still decodes and is rejected by validation instead
/// of by the JSON layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub column: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub datetime: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_agent: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stack_trace: String,
}

/// A report that has been accepted and persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredReport {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: ErrorReport,
}

/// Report fields, named as they appear on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Domain,
    ErrorText,
    Url,
    Filename,
    Line,
    Column,
    Datetime,
    UserAgent,
    StackTrace,
}

impl Field {
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Domain => "domain",
            Field::ErrorText => "errorText",
            Field::Url => "url",
            Field::Filename => "filename",
            Field::Line => "line",
            Field::Column => "column",
            Field::Datetime => "datetime",
            Field::UserAgent => "userAgent",
            Field::StackTrace => "stackTrace",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_camel_case_payload() {
        let report: ErrorReport = serde_json::from_str(
            r#"{
                "domain": "whatever.com",
                "errorText": "Uncaught TypeError",
                "url": "https://whatever.com/app",
                "filename": "app.js",
                "line": 42,
                "column": 7,
                "datetime": "2023-10-02T15:04:05Z",
                "userAgent": "Mozilla/5.0",
                "stackTrace": "at app.js:42"
            }"#,
        )
        .unwrap();

        assert_eq!(report.error_text, "Uncaught TypeError");
        assert_eq!(report.user_agent, "Mozilla/5.0");
        assert_eq!(report.line, 42);
        assert_eq!(report.column, 7);
    }

    #[test]
    fn test_missing_and_null_fields_decode_to_zero_values() {
        let report: ErrorReport =
            serde_json::from_str(r#"{"domain": null, "line": null, "extra": true}"#).unwrap();
        assert_eq!(report, ErrorReport::default());
    }

    #[test]
    fn test_stored_report_flattens_fields() {
        let stored = StoredReport {
            id: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            report: ErrorReport {
                domain: "example.com".to_string(),
                ..Default::default()
            },
        };

        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["domain"], "example.com");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("report").is_none());
    }
}
