use std::{collections::HashMap, future::Future, io, path::Path, time::Duration};

use async_trait::async_trait;
use geo::{point, Point};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    airway::Airway,
    procedure::{Procedure, ProcedureCode, ProcedureKind},
    read_to_string,
    route::ErrorClass,
};

/// Result of a single-record lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn found_or_else<E>(self, err: impl FnOnce() -> E) -> Result<T, E> {
        match self {
            Lookup::Found(value) => Ok(value),
            Lookup::NotFound => Err(err()),
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Lookup::NotFound, Lookup::Found)
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("navigation data lookup for {lookup} timed out after {after:?}")]
    Timeout { lookup: String, after: Duration },
    #[error("navigation data store failure: {0}")]
    Backend(String),
    #[error("failed to read navigation data snapshot: {0}")]
    FileRead(#[from] io::Error),
    #[error("failed to deserialize navigation data snapshot: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl StoreError {
    pub fn class(&self) -> ErrorClass {
        match self {
            StoreError::Timeout { .. } => ErrorClass::NotFound,
            _ => ErrorClass::StoreFailure,
        }
    }
}

/// Everything expansion reads from navigation data: one lookup for airways, one
/// for procedures and a batch lookup for fix coordinates.
#[async_trait]
pub trait NavDataStore: Send + Sync {
    async fn find_airway(&self, code: &str) -> Result<Lookup<Airway>, StoreError>;

    async fn find_procedure(&self, code: &ProcedureCode)
        -> Result<Lookup<Procedure>, StoreError>;

    /// Coordinates for every id in `ids` that the store knows about. Unknown ids
    /// are left out of the map.
    async fn find_fixes_by_ids(&self, ids: &[String]) -> Result<HashMap<String, Point>, StoreError>;
}

/// Wraps a store so every lookup fails with [`StoreError::Timeout`] once it
/// runs longer than `timeout`.
#[derive(Clone, Debug)]
pub struct Bounded<S> {
    inner: S,
    timeout: Duration,
}

impl<S> Bounded<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

async fn bounded<T>(
    timeout: Duration,
    lookup: impl FnOnce() -> String,
    fut: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| StoreError::Timeout {
            lookup: lookup(),
            after: timeout,
        })?
}

#[async_trait]
impl<S: NavDataStore> NavDataStore for Bounded<S> {
    async fn find_airway(&self, code: &str) -> Result<Lookup<Airway>, StoreError> {
        bounded(
            self.timeout,
            || format!("airway '{code}'"),
            self.inner.find_airway(code),
        )
        .await
    }

    async fn find_procedure(
        &self,
        code: &ProcedureCode,
    ) -> Result<Lookup<Procedure>, StoreError> {
        bounded(
            self.timeout,
            || format!("{} '{code}'", code.kind),
            self.inner.find_procedure(code),
        )
        .await
    }

    async fn find_fixes_by_ids(&self, ids: &[String]) -> Result<HashMap<String, Point>, StoreError> {
        bounded(
            self.timeout,
            || format!("{} fixes", ids.len()),
            self.inner.find_fixes_by_ids(ids),
        )
        .await
    }
}

#[derive(Deserialize)]
struct FixRecord {
    id: String,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct Snapshot {
    #[serde(default)]
    fixes: Vec<FixRecord>,
    #[serde(default)]
    airways: Vec<Airway>,
    #[serde(default)]
    sids: Vec<Procedure>,
    #[serde(default)]
    stars: Vec<Procedure>,
}

/// Read-only navigation data held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    fixes: HashMap<String, Point>,
    airways: HashMap<String, Airway>,
    procedures: HashMap<(ProcedureKind, String), Procedure>,
}

impl MemoryStore {
    /// Loads a snapshot of the form
    /// `{"fixes": [{"id", "lat", "lon"}], "airways": [{"code", "fixes"}], "sids": [..], "stars": [..]}`.
    pub fn from_json(content: &[u8]) -> Result<Self, StoreError> {
        let snapshot: Snapshot = serde_json::from_str(&read_to_string(content)?)?;

        let store = snapshot.fixes.into_iter().fold(Self::default(), |acc, fix| {
            acc.with_fix(&fix.id, fix.lat, fix.lon)
        });
        let store = snapshot
            .airways
            .into_iter()
            .fold(store, MemoryStore::with_airway);
        let store = snapshot
            .sids
            .into_iter()
            .fold(store, |acc, sid| acc.with_procedure(ProcedureKind::Departure, sid));
        let store = snapshot
            .stars
            .into_iter()
            .fold(store, |acc, star| acc.with_procedure(ProcedureKind::Arrival, star));

        debug!(
            fixes = store.fixes.len(),
            airways = store.airways.len(),
            procedures = store.procedures.len(),
            "loaded navigation data snapshot"
        );

        Ok(store)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_json(&fs_err::read(path.as_ref())?)
    }

    #[must_use]
    pub fn with_fix(mut self, id: &str, lat: f64, lon: f64) -> Self {
        if self
            .fixes
            .insert(id.to_string(), point! { x: lon, y: lat })
            .is_some()
        {
            warn!("duplicate fix {id}, keeping the last definition");
        }
        self
    }

    #[must_use]
    pub fn with_airway(mut self, airway: Airway) -> Self {
        let code = airway.code().to_string();
        if self.airways.insert(code.clone(), airway).is_some() {
            warn!("duplicate airway {code}, keeping the last definition");
        }
        self
    }

    #[must_use]
    pub fn with_procedure(mut self, kind: ProcedureKind, procedure: Procedure) -> Self {
        let key = (kind, procedure.code.clone());
        if self.procedures.insert(key, procedure).is_some() {
            warn!("duplicate {kind} definition, keeping the last one");
        }
        self
    }
}

#[async_trait]
impl NavDataStore for MemoryStore {
    async fn find_airway(&self, code: &str) -> Result<Lookup<Airway>, StoreError> {
        trace!("looking up airway {code}");
        Ok(self.airways.get(code).cloned().into())
    }

    async fn find_procedure(
        &self,
        code: &ProcedureCode,
    ) -> Result<Lookup<Procedure>, StoreError> {
        trace!("looking up {} {code}", code.kind);
        Ok(self
            .procedures
            .get(&(code.kind, code.composite()))
            .cloned()
            .into())
    }

    async fn find_fixes_by_ids(&self, ids: &[String]) -> Result<HashMap<String, Point>, StoreError> {
        trace!("looking up {} fixes", ids.len());
        Ok(ids
            .iter()
            .filter_map(|id| self.fixes.get(id).map(|coord| (id.clone(), *coord)))
            .collect())
    }
}
