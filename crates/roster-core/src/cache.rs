//! Cache — the single-slot dataset cache.
//!
//! [`DatasetCache`] is the one authoritative copy of the table for the
//! process. At most one load is in flight: the first caller on a cold cache
//! runs it, and callers arriving while it runs wait on a condvar and receive
//! that load's result, the table or a clone of its [`LoadError`]. Failures
//! are not kept: a `get` that starts after a failed load has returned loads
//! again.

use crate::{error::LoadError, loader::TableSource, types::Table};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Instant;

#[derive(Default)]
struct Slot {
    table: Option<Arc<Table>>,
    loading: bool,
    /// Bumped every time a load finishes, successfully or not.
    generation: u64,
    /// Error of the most recent failed load, tagged with the generation it
    /// ran in.
    failure: Option<(u64, LoadError)>,
}

pub struct DatasetCache {
    source: Box<dyn TableSource>,
    slot: Mutex<Slot>,
    loaded: Condvar,
}

impl std::fmt::Debug for DatasetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetCache")
            .field("source", &self.source.id())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Marks the in-flight load finished even if `TableSource::load` panics, so
/// waiters are never left blocked.
struct InFlight<'a> {
    cache: &'a DatasetCache,
    generation: u64,
    outcome: Option<Result<Arc<Table>, LoadError>>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut slot = self.cache.lock();
        slot.loading = false;
        slot.generation = self.generation + 1;
        match self.outcome.take() {
            Some(Ok(table)) => {
                slot.table = Some(table);
                slot.failure = None;
            }
            Some(Err(err)) => slot.failure = Some((self.generation, err)),
            None => slot.failure = None,
        }
        self.cache.loaded.notify_all();
    }
}

impl DatasetCache {
    pub fn new(source: impl TableSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            slot: Mutex::new(Slot::default()),
            loaded: Condvar::new(),
        }
    }

    /// Return the cached table, loading it from the source on first use.
    ///
    /// Blocks while another caller is loading. Run it off the async reactor.
    pub fn get(&self) -> Result<Arc<Table>, LoadError> {
        let mut slot = self.lock();
        loop {
            if let Some(table) = slot.table.as_ref() {
                return Ok(Arc::clone(table));
            }
            if !slot.loading {
                break;
            }

            let waiting_on = slot.generation;
            while slot.loading && slot.generation == waiting_on {
                slot = self
                    .loaded
                    .wait(slot)
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
            }
            if let Some((generation, err)) = &slot.failure {
                if *generation == waiting_on && slot.table.is_none() {
                    return Err(err.clone());
                }
            }
        }

        slot.loading = true;
        let mut in_flight = InFlight {
            cache: self,
            generation: slot.generation,
            outcome: None,
        };
        drop(slot);

        let result = self.load();
        in_flight.outcome = Some(result.clone());
        drop(in_flight);
        result
    }

    fn load(&self) -> Result<Arc<Table>, LoadError> {
        let source = self.source.id();
        tracing::info!(%source, "loading dataset");
        let started = Instant::now();

        let table = match self.source.load() {
            Ok(table) => Arc::new(table),
            Err(err) => {
                tracing::error!(%source, error = %err, "dataset load failed");
                return Err(err);
            }
        };

        tracing::info!(
            %source,
            rows = table.len(),
            columns = table.columns().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dataset loaded"
        );
        Ok(table)
    }

    /// Drop the cached table; the next [`get`](Self::get) reloads.
    pub fn invalidate(&self) {
        if self.lock().table.take().is_some() {
            tracing::info!(source = %self.source.id(), "dataset cache invalidated");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().table.is_some()
    }

    pub fn source_id(&self) -> String {
        self.source.id()
    }

    // The slot is only written by `InFlight::drop` and `invalidate`, both of
    // which leave it consistent, so a poisoned guard is still safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
