//! CDN access policy construction.
//!
//! The policy grants read access to one user's manifest directory until the
//! next local midnight. It is serialized compactly and signed as-is; the edge
//! verifies the signature over exactly these bytes, so field order and
//! spacing must stay stable.

use chrono::{DateTime, Days, Local, LocalResult, NaiveTime, TimeZone};
use serde::Serialize;
use uuid::Uuid;

/// Wildcard resource pattern covering one user's manifest directory.
pub fn resource_pattern(cdn_domain: &str, user_id: Uuid) -> String {
    format!("{}/users/{}/m3u8/*", cdn_domain.trim_end_matches('/'), user_id)
}

/// Playback URL for a finalized video's HLS manifest.
pub fn playback_url(cdn_domain: &str, user_id: Uuid, file_path: &str) -> String {
    format!(
        "{}/users/{}/m3u8/{}/{}.m3u8",
        cdn_domain.trim_end_matches('/'),
        user_id,
        file_path,
        file_path
    )
}

/// Epoch seconds of the upcoming local midnight.
///
/// Cookies therefore live between 24 and 48 hours depending on when during
/// the day they are issued; all cookies issued on one day expire together.
pub fn next_local_midnight(now: DateTime<Local>) -> i64 {
    let midnight = (now.date_naive() + Days::new(1)).and_time(NaiveTime::MIN);

    match now.timezone().from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt.timestamp(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp(),
        // A DST jump can skip midnight entirely; interpret the wall time
        // through the current offset instead.
        LocalResult::None => {
            midnight.and_utc().timestamp() - i64::from(now.offset().local_minus_utc())
        }
    }
}

/// One-statement access policy in the edge's canonical form.
///
/// Field order matters: serialization follows declaration order and the
/// signature covers the serialized bytes.
#[derive(Debug, Clone, Serialize)]
pub struct AccessPolicy {
    #[serde(rename = "Statement")]
    statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, Serialize)]
struct PolicyStatement {
    #[serde(rename = "Resource")]
    resource: String,
    #[serde(rename = "Condition")]
    condition: PolicyCondition,
}

#[derive(Debug, Clone, Serialize)]
struct PolicyCondition {
    #[serde(rename = "DateLessThan")]
    date_less_than: DateLessThan,
}

#[derive(Debug, Clone, Serialize)]
struct DateLessThan {
    #[serde(rename = "AWS:EpochTime")]
    epoch_time: i64,
}

impl AccessPolicy {
    pub fn new(resource: String, expires_epoch: i64) -> Self {
        AccessPolicy {
            statement: vec![PolicyStatement {
                resource,
                condition: PolicyCondition {
                    date_less_than: DateLessThan {
                        epoch_time: expires_epoch,
                    },
                },
            }],
        }
    }

    /// Compact JSON as signed by the edge.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
