//! Configuration file watcher for hot reload.
//!
//! Only the upstream topology (mode and base URLs) is applied to a
//! running gateway. Edits to any other setting are reported and wait for
//! the next restart.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::GatewayConfig;

/// Fields that differ between two configurations, split by how they apply.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ConfigChanges {
    /// Swapped into the running gateway.
    pub topology: Vec<&'static str>,
    /// Ignored until restart.
    pub restart: Vec<&'static str>,
}

impl ConfigChanges {
    pub fn between(old: &GatewayConfig, new: &GatewayConfig) -> Self {
        let topology = [
            ("mode", old.mode != new.mode),
            ("upstreams.primary_url", old.upstreams.primary_url != new.upstreams.primary_url),
            ("upstreams.secondary_url", old.upstreams.secondary_url != new.upstreams.secondary_url),
            ("upstreams.local_url", old.upstreams.local_url != new.upstreams.local_url),
        ];
        let restart = [
            ("listener.bind_address", old.listener.bind_address != new.listener.bind_address),
            ("listener.strip_prefix", old.listener.strip_prefix != new.listener.strip_prefix),
            ("timeouts.gateway_attempt_ms", old.timeouts.gateway_attempt_ms != new.timeouts.gateway_attempt_ms),
            ("timeouts.page_fetch_attempt_ms", old.timeouts.page_fetch_attempt_ms != new.timeouts.page_fetch_attempt_ms),
            ("timeouts.request_secs", old.timeouts.request_secs != new.timeouts.request_secs),
            ("observability.log_level", old.observability.log_level != new.observability.log_level),
            ("observability.metrics_enabled", old.observability.metrics_enabled != new.observability.metrics_enabled),
            ("observability.metrics_address", old.observability.metrics_address != new.observability.metrics_address),
            ("admin.enabled", old.admin.enabled != new.admin.enabled),
            ("admin.api_key", old.admin.api_key != new.admin.api_key),
            ("security.max_body_size", old.security.max_body_size != new.security.max_body_size),
        ];

        Self {
            topology: changed_fields(&topology),
            restart: changed_fields(&restart),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.topology.is_empty() && self.restart.is_empty()
    }
}

fn changed_fields(fields: &[(&'static str, bool)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, changed)| *changed)
        .map(|(field, _)| *field)
        .collect()
}

/// Watches the configuration file and publishes topology changes.
pub struct ConfigWatcher {
    path: PathBuf,
    current: GatewayConfig,
    update_tx: mpsc::UnboundedSender<GatewayConfig>,
}

impl ConfigWatcher {
    /// `current` is the configuration the gateway was started with.
    ///
    /// Returns the watcher and a receiver for configurations whose
    /// topology changed.
    pub fn new(path: &Path, current: GatewayConfig) -> (Self, mpsc::UnboundedReceiver<GatewayConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            current,
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching the file. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            mut current,
            update_tx,
        } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    reload(&path, &mut current, &update_tx);
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default(),
        )?;
        watcher.watch(&watched, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?watched, "Config watcher started");
        Ok(watcher)
    }
}

/// Re-read `path` and publish it when the topology differs from `current`.
fn reload(path: &Path, current: &mut GatewayConfig, update_tx: &mpsc::UnboundedSender<GatewayConfig>) {
    let next = match load_config(Some(path)) {
        Ok(next) => next,
        Err(e) => {
            tracing::error!(path = ?path, error = %e, "Failed to reload config, keeping current upstreams");
            return;
        }
    };

    let changes = ConfigChanges::between(current, &next);
    if changes.is_empty() {
        tracing::debug!(path = ?path, "Config file rewritten without changes");
        return;
    }
    if !changes.restart.is_empty() {
        tracing::warn!(fields = ?changes.restart, "Changed settings take effect after a restart");
    }
    if !changes.topology.is_empty() {
        tracing::info!(
            fields = ?changes.topology,
            mode = next.mode.as_str(),
            primary = %next.upstreams.primary_url,
            secondary = %next.upstreams.secondary_url,
            local = %next.upstreams.local_url,
            "Applying upstream changes"
        );
        let _ = update_tx.send(next.clone());
    }
    *current = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RunMode;
    use std::fs;

    fn config_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("manga-gateway-{}-{}.toml", name, std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_identical_configs_have_no_changes() {
        let config = GatewayConfig::default();
        assert!(ConfigChanges::between(&config, &config.clone()).is_empty());
    }

    #[test]
    fn test_changes_split_by_how_they_apply() {
        let old = GatewayConfig::default();
        let mut new = old.clone();
        new.mode = RunMode::Development;
        new.upstreams.secondary_url = "https://tunnel.example.com".into();
        new.timeouts.request_secs = 40;
        new.admin.api_key = "rotated".into();

        let changes = ConfigChanges::between(&old, &new);
        assert_eq!(changes.topology, vec!["mode", "upstreams.secondary_url"]);
        assert_eq!(changes.restart, vec!["timeouts.request_secs", "admin.api_key"]);
    }

    #[test]
    fn test_reload_publishes_only_topology_changes() {
        let path = config_file("reload", "[upstreams]\nprimary_url = \"https://primary.example.com\"\n");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut current = GatewayConfig::default();

        reload(&path, &mut current, &tx);
        let published = rx.try_recv().unwrap();
        assert_eq!(published.upstreams.primary_url, "https://primary.example.com");
        assert_eq!(current.upstreams.primary_url, "https://primary.example.com");

        fs::write(
            &path,
            "[upstreams]\nprimary_url = \"https://primary.example.com\"\n\n[timeouts]\nrequest_secs = 40\n",
        )
        .unwrap();
        reload(&path, &mut current, &tx);
        assert!(rx.try_recv().is_err());
        assert_eq!(current.timeouts.request_secs, 40);

        reload(&path, &mut current, &tx);
        assert!(rx.try_recv().is_err());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_file_keeps_current_config() {
        let path = config_file("invalid", "[upstreams]\nprimary_url = \"ftp://primary.example.com\"\n");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut current = GatewayConfig::default();

        reload(&path, &mut current, &tx);

        assert!(rx.try_recv().is_err());
        assert_eq!(current.upstreams.primary_url, "http://127.0.0.1:7860");
        let _ = fs::remove_file(&path);
    }
}
