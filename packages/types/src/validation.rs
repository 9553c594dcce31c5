//! Acceptance rules for inbound error reports.
//!
//! A report runs through a fixed pipeline: every required field is checked for
//! presence first, then domain, url, filename, datetime and (optionally) user
//! agent are checked in that order. The first failing step decides the error;
//! later steps never run. Domain and datetime are rewritten to their normalized
//! forms on the way through.

use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Timelike};
use regex::Regex;

use crate::report::{ErrorReport, Field};

static DOMAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9.-]{1,61}[A-Za-z0-9]$").unwrap());

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(localhost|[0-9a-z.-]+\.[a-z.]{2,6})(:[0-9]{1,5})?([/A-Za-z0-9_ .-]*)*/?$")
        .unwrap()
});

static FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[^<>:"\\/|?*\x00-\x1F]*[^<>:"\\/|?*\x00-\x1F .]$"#).unwrap()
});

// Fire TV / Android WebView agents only.
static USER_AGENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^Mozilla/5\.0 \(Linux; U; Android (\d+\.)?(\d+\.)?(\*|\d+); [a-z]{2}-[a-z]{2}; ",
        r"(AFTA|AFTN|AFTS|AFTB|AFTT|AFTM|AFTKMST12|AFTRS) Build/([A-Z0-9]+)\) ",
        r"AppleWebKit/(\d+\.)?(\*|\d+) \(KHTML, like Gecko\) Version/4\.0 ",
        r"Mobile Safari/(\d+\.)?(\*|\d+)$",
    ))
    .unwrap()
});

/// Why a report was rejected. Only the first failure is ever reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(Field),

    #[error("domain is invalid")]
    InvalidDomain,

    #[error("url is invalid")]
    InvalidUrl,

    #[error("filename is invalid")]
    InvalidFilename,

    #[error("datetime is invalid")]
    InvalidDatetime,

    #[error("userAgent is invalid")]
    InvalidUserAgent,
}

impl ValidationError {
    /// The field that failed.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::MissingField(field) => *field,
            ValidationError::InvalidDomain => Field::Domain,
            ValidationError::InvalidUrl => Field::Url,
            ValidationError::InvalidFilename => Field::Filename,
            ValidationError::InvalidDatetime => Field::Datetime,
            ValidationError::InvalidUserAgent => Field::UserAgent,
        }
    }
}

/// Validates and normalizes error reports.
///
/// The user agent is only required to be present unless strict matching is
/// switched on with [`ReportValidator::with_strict_user_agent`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportValidator {
    strict_user_agent: bool,
}

impl ReportValidator {
    pub const fn new() -> Self {
        Self {
            strict_user_agent: false,
        }
    }

    pub const fn with_strict_user_agent(mut self, enabled: bool) -> Self {
        self.strict_user_agent = enabled;
        self
    }

    pub const fn strict_user_agent(&self) -> bool {
        self.strict_user_agent
    }

    /// Runs the full pipeline and returns the sanitized report.
    pub fn validate(&self, mut report: ErrorReport) -> Result<ErrorReport, ValidationError> {
        check_presence(&report)?;
        report.domain = sanitize_domain(&report.domain)?;
        check_url(&report.url)?;
        check_filename(&report.filename)?;
        report.datetime = sanitize_datetime(&report.datetime)?;
        if self.strict_user_agent {
            check_user_agent(&report.user_agent)?;
        }
        Ok(report)
    }
}

impl ErrorReport {
    /// Validates in place with the default (lax) rules. Left untouched on error.
    pub fn sanitize(&mut self) -> Result<(), ValidationError> {
        *self = ReportValidator::new().validate(self.clone())?;
        Ok(())
    }
}

/// Zero counts as missing for `line` and `column`.
pub fn check_presence(report: &ErrorReport) -> Result<(), ValidationError> {
    let text_fields = [
        (Field::Domain, report.domain.as_str()),
        (Field::ErrorText, report.error_text.as_str()),
        (Field::Url, report.url.as_str()),
        (Field::Filename, report.filename.as_str()),
    ];
    for (field, value) in text_fields {
        if value.is_empty() {
            return Err(ValidationError::MissingField(field));
        }
    }

    if report.line == 0 {
        return Err(ValidationError::MissingField(Field::Line));
    }
    if report.column == 0 {
        return Err(ValidationError::MissingField(Field::Column));
    }
    if report.datetime.is_empty() {
        return Err(ValidationError::MissingField(Field::Datetime));
    }
    if report.user_agent.is_empty() {
        return Err(ValidationError::MissingField(Field::UserAgent));
    }

    Ok(())
}

/// Trims whitespace and one trailing and one leading dot, then checks the
/// hostname shape.
pub fn sanitize_domain(raw: &str) -> Result<String, ValidationError> {
    let domain = raw.trim();
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    let domain = domain.strip_prefix('.').unwrap_or(domain);

    if !DOMAIN_RE.is_match(domain) {
        return Err(ValidationError::InvalidDomain);
    }
    Ok(domain.to_string())
}

/// Loose sanity filter, not a URI parser.
pub fn check_url(url: &str) -> Result<(), ValidationError> {
    if !URL_RE.is_match(url) {
        return Err(ValidationError::InvalidUrl);
    }
    Ok(())
}

pub fn check_filename(filename: &str) -> Result<(), ValidationError> {
    if !FILENAME_RE.is_match(filename) {
        return Err(ValidationError::InvalidFilename);
    }
    Ok(())
}

/// Parses RFC 3339 and re-serializes with whole seconds, using `Z` for a zero
/// offset.
///
/// Stricter than chrono's parser: the date/time separator must be `T`, a UTC
/// designator must be `Z`, and leap seconds are rejected.
pub fn sanitize_datetime(raw: &str) -> Result<String, ValidationError> {
    let raw = raw.trim();
    if raw.as_bytes().get(10) != Some(&b'T') || raw.ends_with('z') {
        return Err(ValidationError::InvalidDatetime);
    }

    let parsed = DateTime::parse_from_rfc3339(raw).map_err(|_| ValidationError::InvalidDatetime)?;
    if parsed.nanosecond() >= 1_000_000_000 {
        return Err(ValidationError::InvalidDatetime);
    }
    Ok(parsed.to_rfc3339_opts(SecondsFormat::Secs, true))
}

pub fn check_user_agent(user_agent: &str) -> Result<(), ValidationError> {
    if !USER_AGENT_RE.is_match(user_agent) {
        return Err(ValidationError::InvalidUserAgent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRE_TV_AGENT: &str = "Mozilla/5.0 (Linux; U; Android 7.1.2; en-us; AFTT Build/NS6271) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Mobile Safari/537.36";
    const FIREFOX_AGENT: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:129.0) Gecko/20100101 Firefox/129.0";

    fn valid_report() -> ErrorReport {
        ErrorReport {
            domain: "whatever.com".to_string(),
            error_text: "Memory allocation error at line 150".to_string(),
            url: "https://vwhatever.com/path/to/resource".to_string(),
            filename: "app.js".to_string(),
            line: 42,
            column: 7,
            datetime: "2023-10-02T15:04:05Z".to_string(),
            user_agent: FIREFOX_AGENT.to_string(),
            stack_trace: String::new(),
        }
    }

    #[test]
    fn test_valid_report_is_accepted() {
        let sanitized = ReportValidator::new().validate(valid_report()).unwrap();
        assert_eq!(sanitized, valid_report());
    }

    #[test]
    fn test_missing_fields_follow_presence_order() {
        let cases: [(fn(&mut ErrorReport), Field); 8] = [
            (|r: &mut ErrorReport| r.domain.clear(), Field::Domain),
            (|r: &mut ErrorReport| r.error_text.clear(), Field::ErrorText),
            (|r: &mut ErrorReport| r.url.clear(), Field::Url),
            (|r: &mut ErrorReport| r.filename.clear(), Field::Filename),
            (|r: &mut ErrorReport| r.line = 0, Field::Line),
            (|r: &mut ErrorReport| r.column = 0, Field::Column),
            (|r: &mut ErrorReport| r.datetime.clear(), Field::Datetime),
            (|r: &mut ErrorReport| r.user_agent.clear(), Field::UserAgent),
        ];

        for (clear, field) in cases {
            let mut report = valid_report();
            clear(&mut report);
            assert_eq!(
                ReportValidator::new().validate(report),
                Err(ValidationError::MissingField(field)),
                "expected {} to be reported missing",
                field
            );
        }
    }

    #[test]
    fn test_presence_runs_before_pattern_checks() {
        // An invalid domain would fail later, but the missing user agent wins.
        let report = ErrorReport {
            domain: "invalid domain.com".to_string(),
            user_agent: String::new(),
            ..valid_report()
        };
        assert_eq!(
            ReportValidator::new().validate(report),
            Err(ValidationError::MissingField(Field::UserAgent))
        );

        assert_eq!(
            ReportValidator::new().validate(ErrorReport::default()),
            Err(ValidationError::MissingField(Field::Domain))
        );
    }

    #[test]
    fn test_first_pattern_failure_wins() {
        let report = ErrorReport {
            url: "example.com".to_string(),
            filename: "invalid|filename".to_string(),
            datetime: "invalid datetime".to_string(),
            ..valid_report()
        };
        assert_eq!(
            ReportValidator::new().validate(report),
            Err(ValidationError::InvalidUrl)
        );
    }

    #[test]
    fn test_zero_line_is_missing() {
        let report = ErrorReport {
            line: 0,
            ..valid_report()
        };
        let err = ReportValidator::new().validate(report).unwrap_err();
        assert_eq!(err.field(), Field::Line);
        assert_eq!(err.to_string(), "line is required");

        let negative = ErrorReport {
            line: -1,
            ..valid_report()
        };
        assert!(ReportValidator::new().validate(negative).is_ok());
    }

    #[test]
    fn test_sanitize_domain() {
        assert_eq!(sanitize_domain("  example.com.  ").unwrap(), "example.com");
        assert_eq!(sanitize_domain(".example.com").unwrap(), "example.com");
        assert_eq!(sanitize_domain("www.example.com.au").unwrap(), "www.example.com.au");
        assert_eq!(
            sanitize_domain("www.example-com.au.uk.au.au.au").unwrap(),
            "www.example-com.au.uk.au.au.au"
        );

        for invalid in [
            "",
            "ab",
            "invalid domain.com",
            "-example.com",
            "example.com-",
            "..example.com",
            "exa_mple.com",
            "example.com.au.uk.au.au.au.au.au.au.au.au.au.au.au.au.au.au.au.au.au",
        ] {
            assert_eq!(
                sanitize_domain(invalid),
                Err(ValidationError::InvalidDomain),
                "{invalid:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_domain_length_limit() {
        let at_limit = format!("a{}a", "b".repeat(61));
        assert_eq!(at_limit.len(), 63);
        assert!(sanitize_domain(&at_limit).is_ok());

        let over_limit = format!("a{}a", "b".repeat(62));
        assert_eq!(
            sanitize_domain(&over_limit),
            Err(ValidationError::InvalidDomain)
        );
    }

    #[test]
    fn test_sanitize_domain_is_idempotent() {
        for raw in ["  example.com.  ", ".www.example.com", "whatever.com"] {
            let once = sanitize_domain(raw).unwrap();
            assert_eq!(sanitize_domain(&once).unwrap(), once);
        }
    }

    #[test]
    fn test_check_url() {
        for valid in [
            "http://localhost:8080",
            "http://localhost:8080/test",
            "https://example.com",
            "https://www.example.com",
            "https://www.example.com.au.uk",
            "https://www.example-com.au.uk.au.au.au.au.au.au.au.au.au",
            "https://vwhatever.com/path/to/resource",
            "http://example.com:3000/app/",
        ] {
            assert!(check_url(valid).is_ok(), "{valid:?} should be accepted");
        }

        for invalid in [
            "example.com",
            "htp:/invalid-url",
            "ftp://example.com",
            "https://example",
            "https://example.com/search?q=1",
            "https://example.com/päth",
            "https://example.com/日本",
        ] {
            assert_eq!(
                check_url(invalid),
                Err(ValidationError::InvalidUrl),
                "{invalid:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_check_filename() {
        for valid in ["app.js", "example.txt", "example file.txt", "bundle.min.js", "x"] {
            assert!(check_filename(valid).is_ok(), "{valid:?} should be accepted");
        }

        for invalid in [
            "invalid|filename",
            "example.txt\x00",
            "dir/app.js",
            "dir\\app.js",
            "a<b",
            "what?",
            "trailing.",
            "trailing ",
            "app.js|",
            "",
        ] {
            assert_eq!(
                check_filename(invalid),
                Err(ValidationError::InvalidFilename),
                "{invalid:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_sanitize_datetime() {
        assert_eq!(
            sanitize_datetime("2023-01-01T00:00:00Z").unwrap(),
            "2023-01-01T00:00:00Z"
        );
        assert_eq!(
            sanitize_datetime("2023-01-01T00:00:00.000Z").unwrap(),
            "2023-01-01T00:00:00Z"
        );
        assert_eq!(
            sanitize_datetime("2023-01-01T00:00:00+00:00").unwrap(),
            "2023-01-01T00:00:00Z"
        );
        assert_eq!(
            sanitize_datetime(" 2023-01-01T10:30:00.123+02:00 ").unwrap(),
            "2023-01-01T10:30:00+02:00"
        );

        for invalid in [
            "2023-01-01T00:00:00",
            "invalid datetime",
            "2023-13-01T00:00:00Z",
            "2023-01-01 00:00:00Z",
            "2023-01-01t00:00:00Z",
            "2023-01-01T00:00:00z",
            "2023-01-01t00:00:00z",
            "2016-12-31T23:59:60Z",
            "2016-12-31T23:59:60.5+00:00",
        ] {
            assert_eq!(
                sanitize_datetime(invalid),
                Err(ValidationError::InvalidDatetime),
                "{invalid:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_datetime_normalization_round_trips() {
        let once = sanitize_datetime("2023-01-01T00:00:00.000+00:00").unwrap();
        assert_eq!(once, "2023-01-01T00:00:00Z");
        assert_eq!(sanitize_datetime(&once).unwrap(), once);

        let report = ErrorReport {
            domain: " whatever.com. ".to_string(),
            datetime: "2023-01-01T00:00:00.000+00:00".to_string(),
            ..valid_report()
        };
        let validator = ReportValidator::new();
        let first = validator.validate(report).unwrap();
        let second = validator.validate(first.clone()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.domain, "whatever.com");
    }

    #[test]
    fn test_invalid_datetime_report_is_rejected() {
        let report = ErrorReport {
            datetime: "invalid datetime".to_string(),
            ..valid_report()
        };
        assert_eq!(
            ReportValidator::new().validate(report),
            Err(ValidationError::InvalidDatetime)
        );
    }

    #[test]
    fn test_user_agent_is_lax_by_default() {
        let report = ErrorReport {
            user_agent: "InvalidUserAgent/1.0".to_string(),
            ..valid_report()
        };
        assert!(ReportValidator::new().validate(report).is_ok());
    }

    #[test]
    fn test_strict_user_agent() {
        let strict = ReportValidator::new().with_strict_user_agent(true);
        assert!(strict.strict_user_agent());

        let report = ErrorReport {
            user_agent: FIRE_TV_AGENT.to_string(),
            ..valid_report()
        };
        assert!(strict.validate(report).is_ok());

        assert_eq!(
            strict.validate(valid_report()),
            Err(ValidationError::InvalidUserAgent)
        );
        assert_eq!(
            ValidationError::InvalidUserAgent.field(),
            Field::UserAgent
        );
    }

    #[test]
    fn test_sanitize_in_place_is_idempotent() {
        let mut report = ErrorReport {
            domain: " .whatever.com. ".to_string(),
            datetime: "2023-01-01T00:00:00.000+00:00".to_string(),
            ..valid_report()
        };
        report.sanitize().unwrap();
        assert_eq!(report.domain, "whatever.com");
        assert_eq!(report.datetime, "2023-01-01T00:00:00Z");

        let once = report.clone();
        report.sanitize().unwrap();
        assert_eq!(report, once);

        let mut broken = ErrorReport {
            url: "example.com".to_string(),
            ..once.clone()
        };
        assert_eq!(broken.sanitize(), Err(ValidationError::InvalidUrl));
        assert_eq!(broken.url, "example.com");
    }
}
