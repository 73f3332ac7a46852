use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::store::{NavDataStore, StoreError};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcedureKind {
    Departure,
    Arrival,
}

impl ProcedureKind {
    fn format_hint(self) -> &'static str {
        match self {
            ProcedureKind::Departure => "SID1.TRANS",
            ProcedureKind::Arrival => "TRANS.STAR1",
        }
    }
}

impl Display for ProcedureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ProcedureKind::Departure => "SID",
            ProcedureKind::Arrival => "STAR",
        })
    }
}

#[derive(Error, Debug)]
pub enum ProcedureError {
    #[error("invalid {kind} code format: {code}. Expected format \"{}\"", .kind.format_hint())]
    MalformedCode { kind: ProcedureKind, code: String },
    #[error("{kind} not found for code {code}")]
    NotFound { kind: ProcedureKind, code: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Lookup key of a SID or STAR.
///
/// Departures are keyed `NAME.TRANS`, arrivals `TRANS.NAME`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProcedureCode {
    pub kind: ProcedureKind,
    pub name: String,
    pub transition: String,
}

impl ProcedureCode {
    pub fn departure(name: &str, transition: &str) -> Result<Self, ProcedureError> {
        Self::new(ProcedureKind::Departure, name, transition)
    }

    pub fn arrival(transition: &str, name: &str) -> Result<Self, ProcedureError> {
        Self::new(ProcedureKind::Arrival, name, transition)
    }

    /// Splits an already composed code such as `HHOWE4.LNCON`.
    pub fn parse(kind: ProcedureKind, code: &str) -> Result<Self, ProcedureError> {
        let (left, right) = code
            .split_once('.')
            .ok_or_else(|| ProcedureError::MalformedCode {
                kind,
                code: code.to_string(),
            })?;
        match kind {
            ProcedureKind::Departure => Self::departure(left, right),
            ProcedureKind::Arrival => Self::arrival(left, right),
        }
    }

    fn new(kind: ProcedureKind, name: &str, transition: &str) -> Result<Self, ProcedureError> {
        let code = Self {
            kind,
            name: name.trim().to_string(),
            transition: transition.trim().to_string(),
        };
        if code.name.is_empty() || code.transition.is_empty() {
            return Err(ProcedureError::MalformedCode {
                kind,
                code: code.composite(),
            });
        }
        Ok(code)
    }

    pub fn composite(&self) -> String {
        match self.kind {
            ProcedureKind::Departure => format!("{}.{}", self.name, self.transition),
            ProcedureKind::Arrival => format!("{}.{}", self.transition, self.name),
        }
    }
}

impl Display for ProcedureCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.composite())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    pub code: String,
    #[serde(default)]
    pub airports: Vec<String>,
    pub fixes: Vec<String>,
}

pub(crate) async fn find<S: NavDataStore>(
    store: &S,
    code: &ProcedureCode,
) -> Result<Procedure, ProcedureError> {
    debug!("resolving {} {code}", code.kind);
    store
        .find_procedure(code)
        .await?
        .found_or_else(|| ProcedureError::NotFound {
            kind: code.kind,
            code: code.composite(),
        })
}

/// Fixes of the SID `name` via `transition`, in flown order.
pub async fn resolve_departure<S: NavDataStore>(
    store: &S,
    name: &str,
    transition: &str,
) -> Result<Vec<String>, ProcedureError> {
    let code = ProcedureCode::departure(name, transition)?;
    Ok(find(store, &code).await?.fixes)
}

/// Fixes of the STAR `name` entered via `transition`, in flown order.
pub async fn resolve_arrival<S: NavDataStore>(
    store: &S,
    transition: &str,
    name: &str,
) -> Result<Vec<String>, ProcedureError> {
    let code = ProcedureCode::arrival(transition, name)?;
    Ok(find(store, &code).await?.fixes)
}
