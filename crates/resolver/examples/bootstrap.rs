use assetkey_catalog::{CatalogRegistry, Prefab, SimulatedLoader};
use assetkey_core::manifest::{AssetDirs, ResolverConfig};
use assetkey_core::KeyLabels;
use assetkey_resolver::{AssetResolver, LoadEvent};
use futures::StreamExt;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

#[async_std::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let dirs = AssetDirs::resolve()?;
    let config = ResolverConfig::load(&dirs)?;
    let catalog = Arc::new(CatalogRegistry::with_dirs(dirs));
    let loader = Arc::new(SimulatedLoader::<Prefab>::default());
    let resolver: AssetResolver<Prefab> =
        AssetResolver::with_config(catalog, loader, &config);

    let requests = [
        KeyLabels::by_key("Cube"),
        KeyLabels::new("Sphere", ["help", "ua"]),
        KeyLabels::new("Plain", ["en", "help", "ios"]),
        KeyLabels::new("Capsule", ["ua", "help", "ios"]),
        KeyLabels::new("Cylinder", ["help", "ios", "rrr"]),
    ];

    println!("--- Mode 1: Callback ---");
    for descriptor in requests.iter().cloned() {
        async_std::task::sleep(Duration::from_millis(500)).await;

        let result = resolver
            .load_asset(descriptor, true, |op| {
                if op.is_done() {
                    if let Some(prefab) = op.result() {
                        println!("\nInstantiated {} from {}", prefab.name, prefab.internal_id);
                    }
                } else {
                    print!(
                        "\rLoading asset ({}): {:.0}%",
                        op.debug_name(),
                        op.percent_complete() * 100.0
                    );
                    let _ = std::io::Write::flush(&mut std::io::stdout());
                }
            })
            .await;

        // A failed load is reported and the sequence continues
        if let Err(e) = result {
            eprintln!("EXCEPTION: {:#}", e);
        }
    }

    println!("\n--- Mode 2: Event Stream ---");
    let mut events = resolver.load_asset_stream(requests[1].clone(), true);
    while let Some(event) = events.next().await {
        match event {
            LoadEvent::Started(descriptor) => println!("Resolving {}", descriptor),
            LoadEvent::Fallback { from, to } => println!("No match for {}, trying {}", from, to),
            LoadEvent::Ambiguous(locations) => {
                println!("{} candidates, using the first", locations.len())
            }
            LoadEvent::DownloadPending { key, bytes } => {
                println!("{} needs {} bytes of dependencies", key, bytes)
            }
            LoadEvent::Progress(progress) => {
                print!("\rProgress: {:.0}%", progress.percent_complete * 100.0);
                let _ = std::io::Write::flush(&mut std::io::stdout());
            }
            LoadEvent::Complete { asset, location } => {
                println!("\nReady: {} ({})", asset.name, location.internal_id);
                resolver.release(asset);
            }
            LoadEvent::NotFound(descriptor) => eprintln!("Not found: {}", descriptor),
            LoadEvent::Error(err) => eprintln!("Asset Error: {}", err),
        }
    }

    Ok(())
}
