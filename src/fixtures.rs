use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use geo::Point;

use crate::{
    airway::Airway,
    procedure::{Procedure, ProcedureCode, ProcedureKind},
    store::{Lookup, MemoryStore, NavDataStore, StoreError},
};

pub fn airway(code: &str, fixes: &[&str]) -> Airway {
    Airway::new(code, fixes.iter().map(ToString::to_string).collect()).unwrap()
}

fn procedure(code: &str, airport: &str, fixes: &[&str]) -> Procedure {
    Procedure {
        code: code.to_string(),
        airports: vec![airport.to_string()],
        fixes: fixes.iter().map(ToString::to_string).collect(),
    }
}

pub fn store() -> MemoryStore {
    MemoryStore::default()
        .with_fix("HHOWE", 39.912_5, -75.301_1)
        .with_fix("DITCH", 39.792_4, -75.231_7)
        .with_fix("LNCON", 40.115_8, -75.902_3)
        .with_fix("HOXIE", 40.618_2, -76.412_9)
        .with_fix("MIDFX", 40.953_1, -76.027_4)
        .with_fix("LVZ", 41.272_7, -75.689_6)
        .with_fix("BOBTA", 41.602_3, -74.913_8)
        .with_fix("TPGUN", 41.210_4, -74.322_5)
        .with_fix("HOLEY", 40.911_6, -74.118_9)
        .with_fix("WEETU", 42.004_1, -74.532_2)
        .with_fix("KLOTZ", 42.412_8, -74.108_3)
        .with_airway(airway("J70", &["HOXIE", "MIDFX", "LVZ"]))
        .with_airway(airway("J6", &["LNCON", "HOXIE"]))
        .with_airway(airway("Q480", &["LVZ", "BOBTA", "WEETU", "KLOTZ"]))
        .with_procedure(
            ProcedureKind::Departure,
            procedure("HHOWE4.LNCON", "KPHL", &["HHOWE", "DITCH", "LNCON"]),
        )
        .with_procedure(
            ProcedureKind::Arrival,
            procedure("BOBTA.TPGUN2", "KEWR", &["BOBTA", "TPGUN", "HOLEY"]),
        )
}

/// Delays every lookup of the wrapped store.
pub struct SlowStore<S> {
    pub inner: S,
    pub delay: Duration,
}

#[async_trait]
impl<S: NavDataStore> NavDataStore for SlowStore<S> {
    async fn find_airway(&self, code: &str) -> Result<Lookup<Airway>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_airway(code).await
    }

    async fn find_procedure(
        &self,
        code: &ProcedureCode,
    ) -> Result<Lookup<Procedure>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_procedure(code).await
    }

    async fn find_fixes_by_ids(&self, ids: &[String]) -> Result<HashMap<String, Point>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_fixes_by_ids(ids).await
    }
}

/// Records every batch fix lookup made against the wrapped store.
pub struct RecordingStore<S> {
    pub inner: S,
    pub lookups: AtomicUsize,
    pub fix_batches: Mutex<Vec<Vec<String>>>,
}

impl<S> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
            fix_batches: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl<S: NavDataStore> NavDataStore for RecordingStore<S> {
    async fn find_airway(&self, code: &str) -> Result<Lookup<Airway>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_airway(code).await
    }

    async fn find_procedure(
        &self,
        code: &ProcedureCode,
    ) -> Result<Lookup<Procedure>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_procedure(code).await
    }

    async fn find_fixes_by_ids(&self, ids: &[String]) -> Result<HashMap<String, Point>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.fix_batches.lock().unwrap().push(ids.to_vec());
        self.inner.find_fixes_by_ids(ids).await
    }
}

/// Fails every lookup as if the backing database were unreachable.
pub struct FailingStore;

#[async_trait]
impl NavDataStore for FailingStore {
    async fn find_airway(&self, _code: &str) -> Result<Lookup<Airway>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn find_procedure(
        &self,
        _code: &ProcedureCode,
    ) -> Result<Lookup<Procedure>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn find_fixes_by_ids(&self, _ids: &[String]) -> Result<HashMap<String, Point>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}
