//! Upstream server and school configuration.

use chrono::NaiveDate;
use nextlesson_core::{ElementType, iso_date};

/// Default server hostname, used when `UNTIS_SERVER` is unset.
pub const DEFAULT_SERVER: &str = "hektor.webuntis.com";
/// Default school name, used when `UNTIS_SCHOOL` is unset.
pub const DEFAULT_SCHOOL: &str = "Vinnuhaskulin Torshavn";

/// Which upstream deployment to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntisConfig {
    /// Server hostname, e.g. `hektor.webuntis.com`.
    pub server: String,
    /// School name, sent as the `school` selector on every request.
    pub school: String,
}

impl Default for UntisConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            school: DEFAULT_SCHOOL.to_string(),
        }
    }
}

impl UntisConfig {
    /// Creates a config with explicit server and school.
    pub fn new(server: impl Into<String>, school: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            school: school.into(),
        }
    }

    /// Reads `UNTIS_SERVER` / `UNTIS_SCHOOL` from the environment, falling
    /// back to the documented defaults.
    pub fn from_env() -> Self {
        let server = std::env::var("UNTIS_SERVER")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());
        let school = std::env::var("UNTIS_SCHOOL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SCHOOL.to_string());
        Self { server, school }
    }

    /// Builder: override the server.
    #[must_use]
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Builder: override the school.
    #[must_use]
    pub fn with_school(mut self, school: impl Into<String>) -> Self {
        self.school = school.into();
        self
    }

    /// Base URL of the upstream web application.
    pub fn base_url(&self) -> String {
        format!("https://{}/WebUntis", self.server)
    }

    /// The JSON-RPC endpoint, with the school selector attached.
    pub fn rpc_url(&self) -> String {
        format!(
            "{}/jsonrpc.do?school={}",
            self.base_url(),
            urlencoding::encode(&self.school)
        )
    }

    /// Deep link into the upstream week view for an element and date.
    pub fn week_view_url(&self, kind: ElementType, id: i64, date: NaiveDate) -> String {
        format!(
            "{}/?school={}#/timetable?elementType={}&elementId={}&date={}",
            self.base_url(),
            urlencoding::encode(&self.school),
            kind.code(),
            id,
            iso_date(date)
        )
    }
}
