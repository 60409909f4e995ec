//! Service context bundling all port trait objects.

use std::error::Error;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::http::ApiClient;
use crate::adapters::live::{
    HttpInsightsClient, HttpNotificationSource, HttpTaskStore, LiveClock, LiveFileSystem,
    LiveIdGenerator,
};
use crate::adapters::recording::{
    RecordingClock, RecordingFileSystem, RecordingIdGenerator, RecordingInsightsClient,
    RecordingTaskStore,
};
use crate::adapters::replaying::{
    ReplayingClock, ReplayingFileSystem, ReplayingIdGenerator, ReplayingInsightsClient,
    ReplayingTaskStore,
};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::AppConfig;
use crate::ports::{
    Clock, FileSystem, IdGenerator, InsightsClient, NotificationSource, Subscription, TaskStore,
};

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up live, recording, or replaying adapters; everything
/// downstream only sees the traits.
pub struct ServiceContext {
    /// Current time with the user's offset.
    pub clock: Box<dyn Clock>,
    /// Local document storage.
    pub fs: Box<dyn FileSystem>,
    /// The remote task store.
    pub tasks: Box<dyn TaskStore>,
    /// The AI insights service.
    pub insights: Box<dyn InsightsClient>,
    /// The push notification channel.
    pub notifications: Box<dyn NotificationSource>,
    /// Identifiers for locally created records.
    pub id_gen: Box<dyn IdGenerator>,
}

impl ServiceContext {
    /// Live adapters talking to the configured service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients cannot be built.
    pub fn live(config: &AppConfig) -> Result<Self, String> {
        let api = ApiClient::new(&config.api_url, config.timeout)
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        let notifications = HttpNotificationSource::new(&config.api_url, config.timeout)
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            tasks: Box::new(HttpTaskStore::new(api.clone())),
            insights: Box::new(HttpInsightsClient::new(api)),
            notifications: Box::new(notifications),
            id_gen: Box::new(LiveIdGenerator),
        })
    }

    /// Live adapters wrapped in recorders writing per-port cassettes under `dir`.
    ///
    /// The push channel is passed through unrecorded. Drop the context
    /// before calling [`RecordingSession::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the live adapters or the session directory
    /// cannot be created.
    pub fn recording_at(
        config: &AppConfig,
        dir: &Path,
    ) -> Result<(Self, RecordingSession), String> {
        let live = Self::live(config)?;
        let session = RecordingSession::new(dir)?;

        let ctx = Self {
            clock: Box::new(RecordingClock::new(live.clock, Arc::clone(&session.clock))),
            fs: Box::new(RecordingFileSystem::new(live.fs, Arc::clone(&session.fs))),
            tasks: Box::new(RecordingTaskStore::new(live.tasks, Arc::clone(&session.tasks))),
            insights: Box::new(RecordingInsightsClient::new(
                live.insights,
                Arc::clone(&session.insights),
            )),
            notifications: live.notifications,
            id_gen: Box::new(RecordingIdGenerator::new(live.id_gen, Arc::clone(&session.id_gen))),
        };
        Ok((ctx, session))
    }

    /// Replays every port from one cassette file.
    ///
    /// Each port/method pair keeps its own cursor, so calls on different
    /// ports may interleave differently than when recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        let replayer = Arc::new(Mutex::new(CassetteReplayer::new(&cassette)));

        Ok(Self {
            clock: Box::new(ReplayingClock::new(Arc::clone(&replayer))),
            fs: Box::new(ReplayingFileSystem::new(Arc::clone(&replayer))),
            tasks: Box::new(ReplayingTaskStore::new(Arc::clone(&replayer))),
            insights: Box::new(ReplayingInsightsClient::new(Arc::clone(&replayer))),
            notifications: Box::new(PanickingNotificationSource),
            id_gen: Box::new(ReplayingIdGenerator::new(replayer)),
        })
    }

    /// Replays from per-port cassettes. Ports without one panic when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            clock: Box::new(
                replayers
                    .clock
                    .map_or_else(ReplayingClock::unconfigured, ReplayingClock::new),
            ),
            fs: Box::new(
                replayers
                    .fs
                    .map_or_else(ReplayingFileSystem::unconfigured, ReplayingFileSystem::new),
            ),
            tasks: Box::new(
                replayers
                    .tasks
                    .map_or_else(ReplayingTaskStore::unconfigured, ReplayingTaskStore::new),
            ),
            insights: Box::new(
                replayers.insights.map_or_else(
                    ReplayingInsightsClient::unconfigured,
                    ReplayingInsightsClient::new,
                ),
            ),
            notifications: Box::new(PanickingNotificationSource),
            id_gen: Box::new(
                replayers
                    .id_gen
                    .map_or_else(ReplayingIdGenerator::unconfigured, ReplayingIdGenerator::new),
            ),
        })
    }
}

/// The push channel has no cassette form; replay contexts refuse it.
struct PanickingNotificationSource;

impl NotificationSource for PanickingNotificationSource {
    fn subscribe(&self) -> Result<Subscription, Box<dyn Error + Send + Sync>> {
        panic!("NotificationSource is not available during replay");
    }
}
