//! Candidate upstream endpoints.
//!
//! # Responsibilities
//! - Represent one interchangeable upstream base URL and its role
//! - Build target URLs (base + path + query, appended unchanged)
//! - Group the three candidates with the run mode into a `Topology`

use serde::Serialize;
use std::fmt;
use url::Url;

use crate::config::GatewayConfig;

/// Role of a candidate in the failover order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Primary,
    Secondary,
    Local,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Primary => "primary",
            Role::Secondary => "secondary",
            Role::Local => "local",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One upstream base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub role: Role,
    pub base_url: Url,
}

impl Candidate {
    pub fn new(role: Role, base_url: Url) -> Self {
        Self { role, base_url }
    }

    /// Base URL without a trailing slash, as reported in diagnostics.
    pub fn target(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Full URL for a path and query. `path_and_query` starts with `/`.
    pub fn url_for(&self, path_and_query: &str) -> String {
        format!("{}{}", self.target(), path_and_query)
    }
}

/// Run mode plus the three candidates. Swapped as a whole on reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    pub dev_mode: bool,
    pub primary: Candidate,
    pub secondary: Candidate,
    pub local: Candidate,
}

impl Topology {
    pub fn new(dev_mode: bool, primary: Url, secondary: Url, local: Url) -> Self {
        Self {
            dev_mode,
            primary: Candidate::new(Role::Primary, primary),
            secondary: Candidate::new(Role::Secondary, secondary),
            local: Candidate::new(Role::Local, local),
        }
    }

    /// Build from validated configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, url::ParseError> {
        Ok(Self::new(
            config.is_dev(),
            Url::parse(&config.upstreams.primary_url)?,
            Url::parse(&config.upstreams.secondary_url)?,
            Url::parse(&config.upstreams.local_url)?,
        ))
    }

    pub fn candidate(&self, role: Role) -> &Candidate {
        match role {
            Role::Primary => &self.primary,
            Role::Secondary => &self.secondary,
            Role::Local => &self.local,
        }
    }
}
