use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::ephemeris::Sgp4Ephemeris;
use crate::predict::{PredictError, TleLoader};

use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub loader: Arc<TleLoader>,
    tle: Arc<RwLock<Option<Arc<Sgp4Ephemeris>>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let loader = TleLoader::new(config.tle.file.clone(), config.tle.norad_id);
        Self {
            config: Arc::new(config),
            loader: Arc::new(loader),
            tle: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn ephemeris(&self) -> Option<Arc<Sgp4Ephemeris>> {
        self.tle.read().await.clone()
    }

    /// Re-reads the TLE file. On failure the previously loaded TLE stays.
    pub async fn reload(&self) -> Result<(), PredictError> {
        let ephemeris = self.loader.load()?.ephemeris()?;
        log::info!(
            "Loaded TLE for {} (epoch {}) from {}",
            ephemeris
                .elements()
                .object_name
                .as_deref()
                .unwrap_or("satellite"),
            ephemeris.epoch(),
            self.loader.path().display()
        );
        *self.tle.write().await = Some(Arc::new(ephemeris));
        Ok(())
    }

    /// Reloads the TLE every `interval` for the lifetime of the process.
    pub fn spawn_refresh(&self, interval: Duration) {
        let state = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; the initial load already happened
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = state.reload().await {
                    log::warn!("Failed to refresh TLE, keeping previous: {}", e);
                }
            }
        });
    }
}
