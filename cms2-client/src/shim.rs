//! Extension lifecycle: activation and deactivation.
//!
//! The shim is an explicit lifecycle-owning object: `activate` resolves
//! configuration, builds the launch descriptor, starts the client, and hands
//! the resulting [`Shim`] back to the host, which passes it to `deactivate`
//! on shutdown. There is no module-level client handle.

use std::path::PathBuf;

use cms2_parser::cms2::SOURCE_PATTERNS;

use crate::config::ClientConfig;
use crate::launch::{ClientError, LanguageClient, LaunchMode, LaunchSpec};

/// Host-provided activation inputs.
#[derive(Debug, Clone)]
pub struct ActivationContext {
    /// The extension's install directory, base for the bundled server path.
    pub install_dir: PathBuf,
}

/// The visible status indicator registered while the integration is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusItem {
    pub label: String,
    pub tooltip: String,
}

impl StatusItem {
    fn active() -> Self {
        Self {
            label: "CMS-2".to_string(),
            tooltip: "CMS-2 Language Server active".to_string(),
        }
    }
}

/// Live state of an activated integration.
pub struct Shim<C: LanguageClient> {
    client: Option<C>,
    status: Option<StatusItem>,
}

/// Start the integration: build the launch descriptor from configuration and
/// start the client, which spawns the subprocess and performs the protocol
/// handshake. Spawn failures propagate to the host unchanged.
pub fn activate<C: LanguageClient>(
    context: &ActivationContext,
    config: &ClientConfig,
    mut client: C,
) -> Result<Shim<C>, ClientError> {
    let spec = LaunchSpec::from_config(config, &context.install_dir, LaunchMode::Run);
    client.start(&spec)?;
    Ok(Shim {
        client: Some(client),
        status: Some(StatusItem::active()),
    })
}

impl<C: LanguageClient> Shim<C> {
    /// A shim that was never activated. `deactivate` on it is a no-op.
    pub fn inactive() -> Self {
        Self {
            client: None,
            status: None,
        }
    }

    /// Glob patterns for the filesystem watcher the host registers.
    pub fn watch_patterns(&self) -> &'static [&'static str] {
        SOURCE_PATTERNS
    }

    /// The status indicator, present only while the integration is active.
    pub fn status(&self) -> Option<&StatusItem> {
        self.status.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.client.is_some()
    }

    /// Stop the client, if one was ever started. Safe to call repeatedly;
    /// only the first call issues a stop request. The status indicator is
    /// dropped either way.
    pub async fn deactivate(&mut self) -> Result<(), ClientError> {
        self.status = None;
        match self.client.take() {
            Some(mut client) => client.stop().await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_defaults;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct MockClient {
        starts: Arc<AtomicUsize>,
        stops: Arc<AtomicUsize>,
        last_spec: Arc<std::sync::Mutex<Option<LaunchSpec>>>,
    }

    impl LanguageClient for MockClient {
        fn start(&mut self, spec: &LaunchSpec) -> Result<(), ClientError> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            *self.last_spec.lock().unwrap() = Some(spec.clone());
            Ok(())
        }

        async fn stop(&mut self) -> Result<(), ClientError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn context() -> ActivationContext {
        ActivationContext {
            install_dir: PathBuf::from("/opt/cms2-ext"),
        }
    }

    #[tokio::test]
    async fn activate_starts_the_client_with_resolved_spec() {
        let config = load_defaults().unwrap();
        let client = MockClient::default();
        let starts = client.starts.clone();
        let last_spec = client.last_spec.clone();

        let shim = activate(&context(), &config, client).expect("activation succeeds");
        assert!(shim.is_active());
        assert_eq!(starts.load(Ordering::SeqCst), 1);

        let spec = last_spec.lock().unwrap().clone().unwrap();
        assert_eq!(spec.command, "python");
        assert_eq!(
            spec.args,
            vec![Path::new("/opt/cms2-ext/server/cms2_lsp_server.py")
                .to_string_lossy()
                .into_owned()]
        );
    }

    #[tokio::test]
    async fn deactivate_before_activate_is_a_no_op() {
        let mut shim = Shim::<MockClient>::inactive();
        assert!(!shim.is_active());
        shim.deactivate().await.expect("no-op deactivation");
    }

    #[tokio::test]
    async fn deactivate_stops_the_client_exactly_once() {
        let config = load_defaults().unwrap();
        let client = MockClient::default();
        let stops = client.stops.clone();

        let mut shim = activate(&context(), &config, client).unwrap();
        shim.deactivate().await.unwrap();
        shim.deactivate().await.unwrap();

        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert!(!shim.is_active());
    }

    #[test]
    fn watcher_covers_exactly_the_cms2_extensions() {
        let shim = Shim::<MockClient>::inactive();
        assert_eq!(shim.watch_patterns(), &["*.cms2", "*.cm2", "*.cms"]);
    }

    #[tokio::test]
    async fn status_item_tracks_the_active_lifetime() {
        let shim = Shim::<MockClient>::inactive();
        assert!(shim.status().is_none());

        let config = load_defaults().unwrap();
        let mut shim = activate(&context(), &config, MockClient::default()).unwrap();
        let status = shim.status().expect("active indicator");
        assert_eq!(status.label, "CMS-2");
        assert!(status.tooltip.contains("active"));

        shim.deactivate().await.unwrap();
        assert!(shim.status().is_none());
    }
}
