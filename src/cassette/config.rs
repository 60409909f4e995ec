//! Per-port cassette configuration for composable replay.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// A replayer shared between the adapters that read from it.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

/// Cassette file per port. A port left as `None` panics if it is called
/// during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Clock cassette.
    pub clock: Option<PathBuf>,
    /// Filesystem cassette.
    pub fs: Option<PathBuf>,
    /// Task store cassette.
    pub tasks: Option<PathBuf>,
    /// Insights service cassette.
    pub insights: Option<PathBuf>,
    /// ID generator cassette.
    pub id_gen: Option<PathBuf>,
}

/// Loaded replayers, one per configured port.
pub struct PortReplayers {
    /// Clock replayer.
    pub clock: Option<SharedReplayer>,
    /// Filesystem replayer.
    pub fs: Option<SharedReplayer>,
    /// Task store replayer.
    pub tasks: Option<SharedReplayer>,
    /// Insights replayer.
    pub insights: Option<SharedReplayer>,
    /// ID generator replayer.
    pub id_gen: Option<SharedReplayer>,
}

impl CassetteConfig {
    /// All ports unset; every call during replay panics.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Points every port at `<dir>/<port>.cassette.yaml` that exists, the
    /// layout written by a recording session.
    #[must_use]
    pub fn from_session_dir(dir: &Path) -> Self {
        let find = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.exists().then_some(path)
        };
        Self {
            clock: find("clock"),
            fs: find("fs"),
            tasks: find("tasks"),
            insights: find("insights"),
            id_gen: find("id_gen"),
        }
    }

    /// Loads one cassette into a shareable replayer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_port_cassette(path: &Path) -> Result<SharedReplayer, String> {
        let cassette = Cassette::load(path)?;
        Ok(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))))
    }

    /// Loads every configured cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        let load = |path: &Option<PathBuf>| {
            path.as_deref().map(Self::load_port_cassette).transpose()
        };
        Ok(PortReplayers {
            clock: load(&self.clock)?,
            fs: load(&self.fs)?,
            tasks: load(&self.tasks)?,
            insights: load(&self.insights)?,
            id_gen: load(&self.id_gen)?,
        })
    }
}
