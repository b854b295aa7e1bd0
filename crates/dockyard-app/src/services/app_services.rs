// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — opens the host and hands the Dioxus UI the
// bridge, the push channel and the view-command stream.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use dockyard_bridge::{HostBridge, PushReceiver, SurfaceKind};
use dockyard_core::error::Result;
use dockyard_core::AppConfig;
use dockyard_host::data_dir;
use dockyard_host::store::{self, Store};
use dockyard_host::{DesktopHost, ViewCommand};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use super::desktop_notifier::DesktopNotifier;

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// Cheap to clone: everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppServices {
    host: Arc<DesktopHost>,
    view_commands: Arc<Mutex<Option<UnboundedReceiver<ViewCommand>>>>,
    config_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
}

impl AppServices {
    /// Open the host from the user's data directory. Call once at startup.
    pub fn init() -> Result<Self> {
        let (host, commands) = DesktopHost::open(Arc::new(DesktopNotifier))?;
        Ok(Self::assemble(host, commands, data_dir::base_dir()))
    }

    /// Host rooted in a scratch directory, used when the real data
    /// directory cannot be written.
    pub fn fallback() -> Result<Self> {
        let dir = std::env::temp_dir().join("dockyard-fallback");
        warn!(path = %dir.display(), "using scratch data directory");
        let (host, commands) = DesktopHost::with_store(
            Store::new(&dir),
            AppConfig::default(),
            Arc::new(DesktopNotifier),
        )?;
        Ok(Self::assemble(host, commands, dir))
    }

    fn assemble(
        host: DesktopHost,
        commands: UnboundedReceiver<ViewCommand>,
        config_dir: PathBuf,
    ) -> Self {
        let config = host.config().clone();
        info!("app services initialised");
        Self {
            host: Arc::new(host),
            view_commands: Arc::new(Mutex::new(Some(commands))),
            config_dir,
            config: Arc::new(Mutex::new(config)),
        }
    }

    pub fn host(&self) -> Arc<DesktopHost> {
        Arc::clone(&self.host)
    }

    /// The pull channel as seen by a surface.
    pub fn bridge(&self) -> &dyn HostBridge {
        self.host.as_ref()
    }

    /// Attach a mounted surface to the push channel.
    pub fn attach(&self, surface: SurfaceKind) -> PushReceiver {
        self.host.push_hub().attach(surface)
    }

    /// The view-command stream. Only the first caller gets it.
    pub fn take_view_commands(&self) -> Option<UnboundedReceiver<ViewCommand>> {
        self.view_commands.lock().ok()?.take()
    }

    // -- Config -----------------------------------------------------------------

    pub fn config(&self) -> AppConfig {
        self.config
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// Store `config.json`. Hibernation and data-directory changes apply on
    /// the next start.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        store::persist_config(&self.config_dir, config)?;
        if let Ok(mut current) = self.config.lock() {
            *current = config.clone();
        }
        info!("config saved");
        Ok(())
    }
}

impl PartialEq for AppServices {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.host, &other.host)
    }
}
