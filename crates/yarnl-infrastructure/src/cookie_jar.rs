//! Persistent cookie jar shared by native HTTP calls and the view host.
//!
//! Cookies live in memory behind a mutex and reach `cookies.toml` only on
//! [`CookieJar::flush`].

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use cookie::Cookie;
use serde::{Deserialize, Serialize};
use url::Url;
use yarnl_core::Result;
use yarnl_core::cookie::CookieJar;

use crate::storage::{AtomicTomlFile, StorageError};

/// One stored cookie, scoped by domain and path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    /// Lowercased, without a leading dot.
    pub domain: String,
    /// Set when the cookie carried no Domain attribute.
    #[serde(default)]
    pub host_only: bool,
    pub path: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    /// `None` for session cookies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl CookieRecord {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    fn domain_matches(&self, host: &str) -> bool {
        if self.host_only {
            return host == self.domain;
        }
        domain_match(&self.domain, host)
    }

    fn path_matches(&self, request_path: &str) -> bool {
        if request_path == self.path {
            return true;
        }
        request_path.starts_with(&self.path)
            && (self.path.ends_with('/') || request_path[self.path.len()..].starts_with('/'))
    }

    fn same_slot(&self, other: &CookieRecord) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }
}

/// `host` equals `domain` or is a subdomain of it.
fn domain_match(domain: &str, host: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CookieFile {
    #[serde(default)]
    cookies: Vec<CookieRecord>,
}

/// What a single `Set-Cookie` asks the jar to do.
enum CookieChange {
    Store(CookieRecord),
    Delete(CookieRecord),
}

struct RequestTarget {
    host: String,
    path: String,
    https: bool,
}

impl RequestTarget {
    fn parse(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();
        Some(Self {
            host,
            path: parsed.path().to_string(),
            https: parsed.scheme() == "https",
        })
    }
}

pub struct PersistentCookieJar {
    file: AtomicTomlFile<CookieFile>,
    records: Mutex<Vec<CookieRecord>>,
}

impl PersistentCookieJar {
    /// Loads the jar from `path`, dropping cookies that expired while stored.
    pub fn open(path: PathBuf) -> std::result::Result<Self, StorageError> {
        let file: AtomicTomlFile<CookieFile> = AtomicTomlFile::new(path);
        let now = Utc::now();
        let mut records = file.load()?.unwrap_or_default().cookies;
        records.retain(|record| !record.is_expired(now));
        tracing::debug!("[CookieJar] Loaded {} cookies", records.len());
        Ok(Self {
            file,
            records: Mutex::new(records),
        })
    }

    /// An empty jar at `path` that ignores whatever is stored there.
    pub fn empty(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
            records: Mutex::new(Vec::new()),
        }
    }

    /// Number of live cookies currently held.
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.lock().iter().filter(|r| !r.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CookieRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn interpret(target: &RequestTarget, header: &str, now: DateTime<Utc>) -> Option<CookieChange> {
        let parsed = Cookie::parse(header).ok()?;
        if parsed.name().is_empty() {
            return None;
        }

        let (domain, host_only) = match parsed.domain() {
            Some(domain) if !domain.trim_start_matches('.').is_empty() => {
                let domain = domain.trim_start_matches('.').to_ascii_lowercase();
                if !domain_match(&domain, &target.host) {
                    tracing::warn!(
                        "[CookieJar] Rejected cookie '{}' for foreign domain {}",
                        parsed.name(),
                        domain
                    );
                    return None;
                }
                (domain, false)
            }
            _ => (target.host.clone(), true),
        };

        let path = parsed
            .path()
            .filter(|p| p.starts_with('/'))
            .unwrap_or("/")
            .to_string();

        // Max-Age takes precedence over Expires.
        let expires_at = match parsed.max_age() {
            Some(max_age) => Duration::try_seconds(max_age.whole_seconds())
                .and_then(|ttl| now.checked_add_signed(ttl)),
            None => parsed
                .expires_datetime()
                .and_then(|at| DateTime::<Utc>::from_timestamp(at.unix_timestamp(), 0)),
        };

        let record = CookieRecord {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            domain,
            host_only,
            path,
            secure: parsed.secure().unwrap_or(false),
            http_only: parsed.http_only().unwrap_or(false),
            expires_at,
        };

        if record.is_expired(now) {
            Some(CookieChange::Delete(record))
        } else {
            Some(CookieChange::Store(record))
        }
    }
}

impl CookieJar for PersistentCookieJar {
    fn get_cookie(&self, url: &str) -> Option<String> {
        let target = RequestTarget::parse(url)?;
        let now = Utc::now();

        let records = self.lock();
        let mut matching: Vec<&CookieRecord> = records
            .iter()
            .filter(|r| !r.is_expired(now))
            .filter(|r| r.domain_matches(&target.host))
            .filter(|r| r.path_matches(&target.path))
            .filter(|r| !r.secure || target.https)
            .collect();
        if matching.is_empty() {
            return None;
        }

        // Longer paths first.
        matching.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        Some(
            matching
                .iter()
                .map(|r| format!("{}={}", r.name, r.value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    fn set_cookie(&self, url: &str, set_cookie: &str) {
        let Some(target) = RequestTarget::parse(url) else {
            tracing::warn!("[CookieJar] Ignoring cookie for unparseable URL {}", url);
            return;
        };
        let Some(change) = Self::interpret(&target, set_cookie, Utc::now()) else {
            return;
        };

        let mut records = self.lock();
        match change {
            CookieChange::Store(record) => {
                tracing::debug!("[CookieJar] Stored '{}' for {}", record.name, record.domain);
                match records.iter_mut().find(|r| r.same_slot(&record)) {
                    Some(existing) => *existing = record,
                    None => records.push(record),
                }
            }
            CookieChange::Delete(record) => {
                tracing::debug!("[CookieJar] Deleted '{}' for {}", record.name, record.domain);
                records.retain(|r| !r.same_slot(&record));
            }
        }
    }

    fn flush(&self) -> Result<()> {
        let now = Utc::now();
        let cookies: Vec<CookieRecord> = self
            .lock()
            .iter()
            .filter(|r| !r.is_expired(now))
            .cloned()
            .collect();
        let count = cookies.len();
        self.file.save(&CookieFile { cookies })?;
        tracing::debug!("[CookieJar] Flushed {} cookies", count);
        Ok(())
    }

    fn clear_for_url(&self, url: &str) -> Result<()> {
        if let Some(target) = RequestTarget::parse(url) {
            let mut records = self.lock();
            let before = records.len();
            records.retain(|r| !(r.domain_matches(&target.host) && r.path_matches(&target.path)));
            tracing::info!(
                "[CookieJar] Cleared {} cookies for {}",
                before - records.len(),
                target.host
            );
        }
        self.flush()
    }
}
