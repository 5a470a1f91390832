use crate::orchestrator::Step;
use crate::{AssetResolver, Resolved};
use assetkey_core::protocol::{LoadEvent, LoadProgress};
use assetkey_core::service::Asset;
use assetkey_core::KeyLabels;
use async_std::task;
use futures::channel::mpsc;

impl<A: Asset> AssetResolver<A> {
    /// Resolve and load `descriptor` on a background task, reporting through
    /// a channel.
    ///
    /// The stream always ends with exactly one terminal event: `Complete`,
    /// `NotFound` or `Error`. Consecutive progress snapshots with the same
    /// percentage are collapsed.
    pub fn load_asset_stream(
        &self,
        descriptor: KeyLabels,
        track_progress: bool,
    ) -> mpsc::UnboundedReceiver<LoadEvent<A>> {
        let (tx, rx) = mpsc::unbounded();
        let resolver = self.clone();

        task::spawn(async move {
            let mut last_percent: Option<f32> = None;

            let result = resolver
                .run(descriptor, track_progress, |step| {
                    let event = match step {
                        Step::Attempt(descriptor) => LoadEvent::Started(descriptor.clone()),
                        Step::Fallback { from, to } => LoadEvent::Fallback {
                            from: from.clone(),
                            to: to.clone(),
                        },
                        Step::Ambiguous(locations) => LoadEvent::Ambiguous(locations.to_vec()),
                        Step::DownloadPending { key, bytes } => LoadEvent::DownloadPending {
                            key: key.to_string(),
                            bytes,
                        },
                        Step::Progress(operation) => {
                            let progress = LoadProgress::snapshot(operation);
                            if last_percent == Some(progress.percent_complete) {
                                return;
                            }
                            last_percent = Some(progress.percent_complete);
                            LoadEvent::Progress(progress)
                        }
                        // Reported below as Complete
                        Step::Done(_) => return,
                    };
                    let _ = tx.unbounded_send(event);
                })
                .await;

            let terminal = match result {
                Ok(Resolved::Loaded {
                    asset, location, ..
                }) => LoadEvent::Complete { asset, location },
                Ok(Resolved::NotFound(descriptor)) => LoadEvent::NotFound(descriptor),
                Err(e) => {
                    log::error!("Asset load failed: {:#}", e);
                    LoadEvent::Error(format!("{:#}", e))
                }
            };
            let _ = tx.unbounded_send(terminal);
        });

        rx
    }
}
