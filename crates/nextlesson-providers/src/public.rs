//! Public weekly-view source.
//!
//! The anonymous source: the JSON endpoints behind the upstream's public
//! week view. They need no login but do expect the browser warm-up
//! dance, a plain GET of the school's landing page so the server hands
//! out the cookies the API checks. The warm-up runs once per client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use nextlesson_core::{ElementType, iso_date};

use crate::config::UntisConfig;
use crate::error::{SourceError, SourceResult};
use crate::raw::{ElementInfo, WeeklyRoot};

/// Request timeout for public API calls.
const PUBLIC_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the anonymous weekly-view endpoints of one school.
#[derive(Debug)]
pub struct PublicClient {
    http: reqwest::Client,
    config: UntisConfig,
    warmed: AtomicBool,
}

impl PublicClient {
    /// Creates a client for the given deployment.
    pub fn new(config: UntisConfig) -> SourceResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(PUBLIC_TIMEOUT)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            http,
            config,
            warmed: AtomicBool::new(false),
        })
    }

    /// Weekly timetable data for one element under one format variant.
    /// The caller iterates format variants; a shape mismatch here is an
    /// error, not a panic.
    pub async fn weekly_data(
        &self,
        kind: ElementType,
        id: i64,
        date: NaiveDate,
        format_id: i64,
    ) -> SourceResult<WeeklyRoot> {
        let url = format!(
            "{}/api/public/timetable/weekly/data?elementType={}&elementId={}&date={}&formatId={}&school={}",
            self.config.base_url(),
            kind.code(),
            id,
            iso_date(date),
            format_id,
            urlencoding::encode(&self.config.school)
        );
        let body = self.get_json(&url).await?;
        extract_weekly(&body)
    }

    /// The public teacher directory from the week-view page config.
    pub async fn teacher_directory(&self, date: NaiveDate) -> SourceResult<Vec<ElementInfo>> {
        let url = format!(
            "{}/api/public/timetable/weekly/pageconfig?type={}&date={}&school={}",
            self.config.base_url(),
            ElementType::Teacher.code(),
            iso_date(date),
            urlencoding::encode(&self.config.school)
        );
        let body = self.get_json(&url).await?;
        extract_directory(&body)
    }

    async fn get_json(&self, url: &str) -> SourceResult<Value> {
        self.warm_up().await;

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| SourceError::InvalidResponse(format!("public response: {e}")))
    }

    /// Fetches the landing page once to populate the cookie jar. A failed
    /// warm-up is logged and the API call proceeds anyway.
    async fn warm_up(&self) {
        if self.warmed.swap(true, Ordering::SeqCst) {
            return;
        }
        let url = format!(
            "{}/?school={}",
            self.config.base_url(),
            urlencoding::encode(&self.config.school)
        );
        match self.http.get(&url).send().await {
            Ok(response) => debug!(status = %response.status(), "public warm-up done"),
            Err(err) => warn!(error = %err, "public warm-up failed"),
        }
    }
}

/// Unwraps the `data.result.data` envelope of a weekly-data response.
fn extract_weekly(body: &Value) -> SourceResult<WeeklyRoot> {
    let root = body
        .pointer("/data/result/data")
        .ok_or_else(|| SourceError::InvalidResponse("weekly data envelope missing".to_string()))?;
    serde_json::from_value(root.clone())
        .map_err(|e| SourceError::InvalidResponse(format!("weekly data: {e}")))
}

/// Unwraps the `data.elements` envelope of a pageconfig response.
fn extract_directory(body: &Value) -> SourceResult<Vec<ElementInfo>> {
    let elements = body
        .pointer("/data/elements")
        .ok_or_else(|| SourceError::InvalidResponse("pageconfig envelope missing".to_string()))?;
    serde_json::from_value(elements.clone())
        .map_err(|e| SourceError::InvalidResponse(format!("pageconfig elements: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_envelope_unwraps_nested_data() {
        let body = serde_json::json!({
            "data": {"result": {"data": {
                "elementPeriods": {"7": [{"id": 1, "date": 20250825}]},
                "elements": [{"type": 3, "id": 40, "name": "MAT"}]
            }}}
        });
        let root = extract_weekly(&body).unwrap();
        assert_eq!(root.element_periods["7"].len(), 1);
        assert_eq!(root.elements.len(), 1);
    }

    #[test]
    fn weekly_envelope_missing_is_invalid() {
        let body = serde_json::json!({"data": {"error": "nope"}});
        assert!(matches!(
            extract_weekly(&body),
            Err(SourceError::InvalidResponse(_))
        ));
    }

    #[test]
    fn directory_envelope_unwraps_elements() {
        let body = serde_json::json!({
            "data": {"elements": [
                {"type": 2, "id": 9, "name": "WP", "longName": "Winston Pedersen"}
            ]}
        });
        let elements = extract_directory(&body).unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].id, Some(9));
    }

    #[test]
    fn directory_envelope_missing_is_invalid() {
        let body = serde_json::json!({});
        assert!(matches!(
            extract_directory(&body),
            Err(SourceError::InvalidResponse(_))
        ));
    }
}
