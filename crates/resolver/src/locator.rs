use anyhow::Result;
use assetkey_core::service::{Catalog, LocationQuery, MergeMode};
use assetkey_core::{KeyLabels, ResourceLocation};

/// Query the catalog for `descriptor`.
///
/// With labels the query intersects them; without labels it goes by key.
/// Either way only entries whose primary key equals the requested key are
/// kept, so a labels-only descriptor never resolves.
pub async fn locate(
    catalog: &dyn Catalog,
    descriptor: &KeyLabels,
    asset_type: &str,
) -> Result<Vec<ResourceLocation>> {
    let query = if descriptor.has_labels() {
        LocationQuery::Labels {
            labels: &descriptor.labels,
            mode: MergeMode::Intersection,
        }
    } else {
        LocationQuery::Key(&descriptor.key)
    };

    let locations = catalog.locations(query, asset_type).await?;

    Ok(locations
        .into_iter()
        .filter(|location| location.primary_key == descriptor.key)
        .collect())
}
