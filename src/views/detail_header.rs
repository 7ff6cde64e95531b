//! Header block shown at the top of a captured request's detail page.
//!
//! Rendering is a pure function of the record's method, path, origin address
//! and capture time. The timestamp is formatted for display in the viewer's
//! UTC offset; the stored value is never touched.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::models::WebhookRecord;

/// en-US locale style, e.g. `1/5/2024, 3:04:05 PM`
const LOCALE_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

pub const DETAIL_HEADER_TEMPLATE_NAME: &str = "detail-header";

// Every `{{value}}` is HTML-escaped by the registry.
pub const DETAIL_HEADER_TEMPLATE: &str = r#"<header class="webhook-detail-header">
  <div class="request-line">
    <span class="method-badge">{{method}}</span>
    <span class="request-path">{{path}}</span>
  </div>
  <div class="request-meta">
    <span>From IP - <span class="origin-ip">{{ip}}</span></span>
    <span class="separator" aria-hidden="true"></span>
    <span>at - <time>{{captured_at}}</time></span>
  </div>
</header>
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailHeader {
    pub method: String,
    pub path: String,
    pub ip: String,
    pub captured_at: String,
}

impl DetailHeader {
    pub fn new(
        method: &str,
        path: &str,
        ip: &str,
        created_at: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            ip: ip.to_string(),
            captured_at: format_locale_timestamp(created_at, offset),
        }
    }

    pub fn from_record(record: &WebhookRecord, offset: FixedOffset) -> Self {
        Self::new(&record.method, &record.path, &record.ip, record.created_at, offset)
    }
}

impl fmt::Display for DetailHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} from IP - {} at - {}",
            self.method, self.path, self.ip, self.captured_at
        )
    }
}

pub fn format_locale_timestamp(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp
        .with_timezone(&offset)
        .format(LOCALE_TIMESTAMP_FORMAT)
        .to_string()
}
