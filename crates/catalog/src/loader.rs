use anyhow::Result;
use assetkey_core::service::{Asset, AssetLoader, LoadOperation};
use assetkey_core::{AssetError, ResourceLocation};
use async_std::task;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Assets the simulated loader knows how to build.
pub trait SimulatedAsset: Asset {
    fn from_location(location: &ResourceLocation) -> Self;

    /// Location the value was built from, used for reference counting.
    fn internal_id(&self) -> &str;
}

/// Stand-in for an instantiable scene object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefab {
    pub name: String,
    pub internal_id: String,
}

impl Asset for Prefab {
    fn type_name() -> &'static str {
        "Prefab"
    }
}

impl SimulatedAsset for Prefab {
    fn from_location(location: &ResourceLocation) -> Self {
        Self {
            name: location.primary_key.clone(),
            internal_id: location.internal_id.clone(),
        }
    }

    fn internal_id(&self) -> &str {
        &self.internal_id
    }
}

struct OperationState<A> {
    percent: f32,
    result: Option<A>,
    done: bool,
}

pub struct SimulatedOperation<A> {
    name: String,
    state: Arc<Mutex<OperationState<A>>>,
}

impl<A> SimulatedOperation<A> {
    fn with_state<R>(&self, f: impl FnOnce(&OperationState<A>) -> R) -> R {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }
}

impl<A: Asset> LoadOperation<A> for SimulatedOperation<A> {
    fn is_done(&self) -> bool {
        self.with_state(|s| s.done)
    }

    fn percent_complete(&self) -> f32 {
        self.with_state(|s| s.percent)
    }

    fn result(&self) -> Option<A> {
        self.with_state(|s| s.result.clone())
    }

    fn debug_name(&self) -> &str {
        &self.name
    }
}

/// Loader that completes each load over `steps` timed increments and keeps
/// a reference count per location.
pub struct SimulatedLoader<A> {
    steps: u32,
    step_delay: Duration,
    live: Arc<Mutex<HashMap<String, usize>>>,
    _asset: PhantomData<fn() -> A>,
}

impl<A: SimulatedAsset> Default for SimulatedLoader<A> {
    fn default() -> Self {
        Self::new(4, Duration::from_millis(25))
    }
}

impl<A: SimulatedAsset> SimulatedLoader<A> {
    pub fn new(steps: u32, step_delay: Duration) -> Self {
        Self {
            steps,
            step_delay,
            live: Arc::new(Mutex::new(HashMap::new())),
            _asset: PhantomData,
        }
    }

    /// Loads of `internal_id` not yet released.
    pub fn live_count(&self, internal_id: &str) -> usize {
        let live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
        live.get(internal_id).copied().unwrap_or(0)
    }
}

impl<A: SimulatedAsset> AssetLoader<A> for SimulatedLoader<A> {
    fn load(&self, location: &ResourceLocation) -> Result<Box<dyn LoadOperation<A>>> {
        if location.asset_type != A::type_name() {
            return Err(AssetError::LoadError(format!(
                "{} provides {}, not {}",
                location.internal_id,
                location.asset_type,
                A::type_name()
            ))
            .into());
        }

        {
            let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
            *live.entry(location.internal_id.clone()).or_insert(0) += 1;
        }

        let state = Arc::new(Mutex::new(OperationState {
            percent: 0.0,
            result: None,
            done: false,
        }));
        let operation = SimulatedOperation {
            name: format!("{} ({})", location.primary_key, location.internal_id),
            state: state.clone(),
        };

        let asset = A::from_location(location);
        let steps = self.steps;
        let step_delay = self.step_delay;

        task::spawn(async move {
            for step in 1..=steps {
                task::sleep(step_delay).await;
                let mut s = state.lock().unwrap_or_else(PoisonError::into_inner);
                s.percent = step as f32 / steps as f32;
            }
            let mut s = state.lock().unwrap_or_else(PoisonError::into_inner);
            s.percent = 1.0;
            s.result = Some(asset);
            s.done = true;
        });

        Ok(Box::new(operation))
    }

    fn release(&self, asset: A) {
        let id = asset.internal_id();
        let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
        let remaining = match live.get_mut(id) {
            Some(count) => {
                *count -= 1;
                *count
            }
            None => {
                log::warn!("Release of {} which has no live loads", id);
                return;
            }
        };
        if remaining == 0 {
            live.remove(id);
        }
    }
}
