//! Process-wide codec cache keyed by type identity.
//!
//! Codec construction is a one-time preparation step per type; the result is
//! cached here so every caller shares one immutable codec. Tables are built
//! off to the side with no lock held, then published atomically: a racing
//! registration never corrupts a codec already in use, and build failures
//! are never cached.

use std::{
    any::{self, Any, TypeId},
    collections::HashMap,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use tracing::debug;

use crate::{codec::ArcCodec, error::BuildError};

type Shared = Box<dyn Any + Send + Sync>;

static CODECS: OnceLock<RwLock<HashMap<TypeId, Shared>>> = OnceLock::new();

fn store() -> &'static RwLock<HashMap<TypeId, Shared>> {
    CODECS.get_or_init(|| RwLock::new(HashMap::new()))
}

fn lookup<T: 'static>(map: &HashMap<TypeId, Shared>) -> Option<ArcCodec<T>> {
    map.get(&TypeId::of::<T>())
        .and_then(|shared| shared.downcast_ref::<ArcCodec<T>>())
        .map(Arc::clone)
}

/// The cached codec for `T`, if one has been registered.
#[must_use]
pub fn cached<T: 'static>() -> Option<ArcCodec<T>> {
    let guard = store().read().unwrap_or_else(PoisonError::into_inner);
    lookup::<T>(&guard)
}

/// The codec for `T`, building and registering it on first use.
///
/// `build` runs with no lock held. When two threads race, both builds may
/// run, but exactly one result is published and both callers receive it; the
/// loser's table is discarded. Re-registration of an already-cached type is
/// idempotent.
///
/// # Errors
///
/// Propagates the builder's [`BuildError`]. A failed build leaves the cache
/// untouched, so a later call may retry with fixed metadata.
pub fn codec_for<T, F>(build: F) -> Result<ArcCodec<T>, BuildError>
where
    T: 'static,
    F: FnOnce() -> Result<ArcCodec<T>, BuildError>,
{
    if let Some(codec) = cached::<T>() {
        return Ok(codec);
    }

    let built = build()?;

    let mut guard = store().write().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = lookup::<T>(&guard) {
        // Lost the race: keep the codec other callers already share.
        return Ok(existing);
    }
    guard.insert(TypeId::of::<T>(), Box::new(Arc::clone(&built)));
    debug!(type_name = any::type_name::<T>(), "codec published");
    Ok(built)
}
