// ── Polling monitor ──
//
// Drives a StatusSource on a fixed interval and publishes each result
// into the StatusStore. One fetch at a time per device; a failed poll
// marks the store unavailable and the next tick is the retry.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use spyder_api::StatusSource;

use crate::error::CoreError;
use crate::sensor::{Sensor, build_sensors};
use crate::store::StatusStore;

/// Interval matching the device's own internal update cadence.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Periodic fetch-and-publish loop over a [`StatusSource`].
///
/// `start()` performs one eager refresh (setup fails if the device is
/// unreachable), fixes the sensor set from that first document, then
/// spawns the background poll task. `stop()` cancels and joins it.
pub struct Monitor<S: StatusSource> {
    source: Arc<S>,
    store: Arc<StatusStore>,
    sensors: OnceLock<Vec<Sensor>>,
    poll_interval: Duration,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<S: StatusSource> Monitor<S> {
    pub fn new(source: S, poll_interval: Duration) -> Self {
        Self {
            source: Arc::new(source),
            store: Arc::new(StatusStore::new()),
            sensors: OnceLock::new(),
            poll_interval,
            cancel: CancellationToken::new(),
            task: Mutex::new(None),
        }
    }

    /// Access the shared store.
    pub fn store(&self) -> &Arc<StatusStore> {
        &self.store
    }

    /// The sensor set built from the first successful refresh.
    ///
    /// Empty until [`start()`](Self::start) succeeds. Outputs added or
    /// removed by the device later are not reconciled; rebuild the
    /// monitor to pick them up.
    pub fn sensors(&self) -> &[Sensor] {
        self.sensors.get().map_or(&[], Vec::as_slice)
    }

    /// Eagerly refresh once, build the sensor set, and spawn the
    /// periodic poll task.
    ///
    /// A failing first fetch aborts setup — no sensors, no background
    /// task, store left empty.
    pub async fn start(&self) -> Result<(), CoreError> {
        let doc = self.source.fetch().await?;
        debug!(
            outputs = doc.outputs.len(),
            active = doc.active_outputs().count(),
            "initial status refresh complete"
        );

        let _ = self.sensors.set(build_sensors(&doc));
        self.store.publish(doc);

        let handle = tokio::spawn(poll_task(
            Arc::clone(&self.source),
            Arc::clone(&self.store),
            self.poll_interval,
            self.cancel.clone(),
        ));
        *self.task.lock().await = Some(handle);

        info!(interval = ?self.poll_interval, "monitor started");
        Ok(())
    }

    /// Cancel the background task and wait for it to finish.
    pub async fn stop(&self) {
        self.cancel.cancel();

        if let Some(handle) = self.task.lock().await.take() {
            let _ = handle.await;
        }
        debug!("monitor stopped");
    }
}

/// Periodically fetch the status document and publish it to the store.
async fn poll_task<S: StatusSource>(
    source: Arc<S>,
    store: Arc<StatusStore>,
    poll_interval: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(poll_interval);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                match source.fetch().await {
                    Ok(doc) => store.publish(doc),
                    Err(e) => {
                        warn!(error = %e, "status poll failed");
                        store.mark_unavailable();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use serde_json::json;
    use spyder_api::{Error, StatusDocument};

    /// Test source: serves a fixed document, or fails on demand.
    struct ScriptedSource {
        fail: AtomicBool,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self {
                fail: AtomicBool::new(false),
            }
        }
    }

    impl StatusSource for ScriptedSource {
        async fn fetch(&self) -> Result<StatusDocument, Error> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::Http {
                    status: 503,
                    message: "scripted failure".into(),
                });
            }
            Ok(sample_doc())
        }
    }

    fn sample_doc() -> StatusDocument {
        let body = json!({
            "system": {
                "numberofoutputs": 1,
                "internaltemp": 70,
                "internaltempmax": 90,
                "powerresets": 2,
                "safetyrelay": "OK"
            },
            "output1": {
                "outputnickname": "Porch",
                "outputmode": "Dimmer",
                "probereadingTEMP": 68,
                "probereadingTEMPMAX": 80,
                "probereadingTEMPMIN": 40,
                "currentsetting": 50,
                "errorcode": 0,
                "errorcodedescription": "None",
                "poweroutput": 30,
                "poweroutputLIMIT": 100,
                "highalarm": 85,
                "lowalarm": 30
            }
        })
        .to_string();
        StatusDocument::parse(&body).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn start_refreshes_eagerly_and_builds_sensors() {
        let monitor = Monitor::new(Arc::new(ScriptedSource::new()), Duration::from_secs(30));
        monitor.start().await.unwrap();

        // 4 per active output + 3 system sensors
        assert_eq!(monitor.sensors().len(), 7);
        assert!(monitor.store().is_available());
        assert!(monitor.store().snapshot().is_some());

        monitor.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failing_first_fetch_aborts_setup() {
        let source = Arc::new(ScriptedSource::new());
        source.fail.store(true, Ordering::SeqCst);

        let monitor = Monitor::new(Arc::clone(&source), Duration::from_secs(30));
        let err = monitor.start().await.unwrap_err();

        assert!(matches!(err, CoreError::Device { status: Some(503), .. }));
        assert!(monitor.sensors().is_empty());
        assert!(monitor.store().snapshot().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_poll_marks_unavailable_but_keeps_values() {
        let source = Arc::new(ScriptedSource::new());
        let monitor = Monitor::new(Arc::clone(&source), Duration::from_secs(30));
        monitor.start().await.unwrap();

        let mut availability = monitor.store().subscribe_availability();
        availability.mark_unchanged();

        source.fail.store(true, Ordering::SeqCst);
        tokio::time::advance(Duration::from_secs(31)).await;
        availability.changed().await.unwrap();

        assert!(!monitor.store().is_available());
        // Previously published values are retained.
        let snap = monitor.store().snapshot().unwrap();
        assert_eq!(snap.output(1).unwrap().nickname, "Porch");

        // Next successful poll restores availability.
        source.fail.store(false, Ordering::SeqCst);
        tokio::time::advance(Duration::from_secs(31)).await;
        availability.changed().await.unwrap();
        assert!(monitor.store().is_available());

        monitor.stop().await;
    }
}
