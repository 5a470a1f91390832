use anyhow::{anyhow, Result};
use assetkey_core::service::{Asset, AssetLoader, Catalog, LoadOperation};
use assetkey_core::{AssetError, KeyLabels, ResourceLocation};
use async_std::task;

/// Everything the resolver reports while working on one request.
pub(crate) enum Step<'a, A> {
    Attempt(&'a KeyLabels),
    Fallback {
        from: &'a KeyLabels,
        to: &'a KeyLabels,
    },
    Ambiguous(&'a [ResourceLocation]),
    DownloadPending {
        key: &'a str,
        bytes: u64,
    },
    Progress(&'a dyn LoadOperation<A>),
    Done(&'a dyn LoadOperation<A>),
}

/// Pick the first location. Ambiguity is logged, never an error.
pub fn select_location<'a>(
    descriptor: &KeyLabels,
    locations: &'a [ResourceLocation],
) -> Option<&'a ResourceLocation> {
    if locations.len() > 1 {
        log::warn!(
            "Multiple assets were found by request ({}), return first. \n[{}]",
            descriptor,
            describe_candidates(locations)
        );
    }
    locations.first()
}

/// One line per candidate, numbered from 1.
pub fn describe_candidates(locations: &[ResourceLocation]) -> String {
    let mut listing = String::from("\n");
    for (index, location) in locations.iter().enumerate() {
        listing.push_str(&format!("\t{}. {}\n", index + 1, location.internal_id));
    }
    listing
}

/// Load the first of `locations` and drive the operation to completion.
///
/// With `track_progress` the observer sees the operation on every poll;
/// it always sees it once more after completion.
pub(crate) async fn load_location<A, F>(
    catalog: &dyn Catalog,
    loader: &dyn AssetLoader<A>,
    descriptor: &KeyLabels,
    locations: &[ResourceLocation],
    track_progress: bool,
    observe: &mut F,
) -> Result<(A, ResourceLocation)>
where
    A: Asset,
    F: FnMut(Step<'_, A>) + Send,
{
    let location = select_location(descriptor, locations)
        .ok_or_else(|| anyhow!("No location to load for ({})", descriptor))?;
    if locations.len() > 1 {
        observe(Step::Ambiguous(locations));
    }

    let bytes = catalog.download_size(location).await?;
    if bytes > 0 {
        log::warn!(
            "For {} \"{}\" start downloading dependencies ({} bytes)",
            A::type_name(),
            descriptor.key,
            bytes
        );
        observe(Step::DownloadPending {
            key: &descriptor.key,
            bytes,
        });
    }

    let operation = loader.load(location)?;
    while !operation.is_done() {
        if track_progress {
            observe(Step::Progress(&*operation));
        }
        task::yield_now().await;
    }

    // Last call as done, tracked or not.
    observe(Step::Done(&*operation));

    let asset = operation.result().ok_or_else(|| {
        AssetError::LoadError(format!(
            "{} completed without a result",
            operation.debug_name()
        ))
    })?;

    Ok((asset, location.clone()))
}
