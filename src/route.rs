use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    airway::{self, AirwayError, Boundary},
    procedure::{self, ProcedureError},
    store::{NavDataStore, StoreError},
    token::{classify, TokenKind},
};

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("{0}")]
    Malformed(String),
    #[error(transparent)]
    Procedure(#[from] ProcedureError),
    #[error(transparent)]
    Airway(#[from] AirwayError),
    #[error("Fix '{0}' not found in navigation data")]
    UnresolvedFix(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification of a failure for the caller, mirroring HTTP status
/// classes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    BadRequest,
    NotFound,
    StoreFailure,
}

impl ErrorClass {
    pub fn status(self) -> u16 {
        match self {
            ErrorClass::BadRequest => 400,
            ErrorClass::NotFound => 404,
            ErrorClass::StoreFailure => 500,
        }
    }
}

impl RouteError {
    pub fn class(&self) -> ErrorClass {
        match self {
            RouteError::Malformed(_) | RouteError::Procedure(ProcedureError::MalformedCode { .. }) => {
                ErrorClass::BadRequest
            }
            RouteError::Procedure(ProcedureError::NotFound { .. })
            | RouteError::Airway(AirwayError::NotFound(_) | AirwayError::BoundaryNotFound { .. })
            | RouteError::UnresolvedFix(_) => ErrorClass::NotFound,
            RouteError::Procedure(ProcedureError::Store(e))
            | RouteError::Airway(AirwayError::Store(e))
            | RouteError::Store(e) => e.class(),
            RouteError::Airway(AirwayError::Empty(_)) => ErrorClass::StoreFailure,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Departure,
    Body(usize),
    Arrival,
    Done,
}

struct Assembly<'a, S> {
    store: &'a S,
    tokens: &'a [&'a str],
    fixes: Vec<String>,
}

impl<S: NavDataStore> Assembly<'_, S> {
    async fn step(&mut self, phase: Phase) -> Result<Phase, RouteError> {
        trace!(?phase, fixes = self.fixes.len(), "route assembly step");
        match phase {
            Phase::Departure => self.departure().await,
            Phase::Body(index) => self.body(index).await,
            Phase::Arrival => self.arrival().await,
            Phase::Done => Ok(Phase::Done),
        }
    }

    async fn departure(&mut self) -> Result<Phase, RouteError> {
        let tokens = self.tokens;
        if let [name, transition, ..] = tokens {
            if classify(name) == TokenKind::Procedure {
                let fixes = procedure::resolve_departure(self.store, name, transition).await?;
                debug!("SID {name}.{transition}: {} fixes", fixes.len());
                self.fixes.extend(fixes);
                return Ok(Phase::Body(2));
            }
        }
        Ok(Phase::Body(0))
    }

    async fn body(&mut self, index: usize) -> Result<Phase, RouteError> {
        let Some(token) = self.tokens.get(index).copied() else {
            return Ok(Phase::Arrival);
        };
        let last = self.tokens.len() - 1;

        match classify(token) {
            // reserved for the STAR
            TokenKind::Procedure if index == last => Ok(Phase::Arrival),
            TokenKind::Airway if index > 0 && index < last => {
                let (start, end) = (self.tokens[index - 1], self.tokens[index + 1]);
                let segment = airway::expand(self.store, token, start, end).await?;
                debug!("airway {token} {start}..{end}: {} fixes", segment.len());
                self.splice(token, start, segment)?;
                Ok(Phase::Body(index + 2))
            }
            TokenKind::Airway => Err(AirwayError::BoundaryNotFound {
                airway: token.to_string(),
                boundary: if index == 0 {
                    Boundary::Start
                } else {
                    Boundary::End
                },
                fix: None,
            }
            .into()),
            TokenKind::Procedure | TokenKind::Fix => {
                self.fixes.push(token.to_string());
                Ok(Phase::Body(index + 1))
            }
        }
    }

    /// Replaces the last assembled fix, which has to be the airway's entry
    /// fix, with the airway segment starting at that fix.
    fn splice(&mut self, airway: &str, start: &str, segment: Vec<String>) -> Result<(), AirwayError> {
        let joins = self.fixes.last().is_some_and(|previous| previous == start)
            && segment.first().is_some_and(|first| first == start);
        if !joins {
            return Err(AirwayError::BoundaryNotFound {
                airway: airway.to_string(),
                boundary: Boundary::Start,
                fix: Some(start.to_string()),
            });
        }

        self.fixes.pop();
        self.fixes.extend(segment);
        Ok(())
    }

    async fn arrival(&mut self) -> Result<Phase, RouteError> {
        let tokens = self.tokens;
        if let [.., transition, name] = tokens {
            if classify(name) == TokenKind::Procedure {
                let fixes = procedure::resolve_arrival(self.store, transition, name).await?;
                debug!("STAR {transition}.{name}: {} fixes", fixes.len());
                self.fixes.extend(fixes);
            }
        }
        Ok(Phase::Done)
    }
}

/// Expands `tokens` into the fix designators they describe, in flown order.
///
/// * SID: `NAME TRANS ...` at the start of the route expands to the SID's fixes.
/// * body: plain fixes are taken as they are, `START AIRWAY END` is replaced
///   by the airway's fixes from `START` to `END`.
/// * STAR: `... TRANS NAME` at the end of the route expands to the STAR's fixes.
///
/// Any failed lookup fails the whole route.
pub async fn assemble<S: NavDataStore>(store: &S, tokens: &[&str]) -> Result<Vec<String>, RouteError> {
    match tokens {
        [] => return Err(RouteError::Malformed("Route is empty".to_string())),
        [only] if classify(only) == TokenKind::Procedure => {
            return Err(RouteError::Malformed(format!(
                "Procedure '{only}' has no paired transition"
            )))
        }
        _ => {}
    }

    let mut assembly = Assembly {
        store,
        tokens,
        fixes: Vec::new(),
    };
    let mut phase = Phase::Departure;
    while phase != Phase::Done {
        phase = assembly.step(phase).await?;
    }

    if assembly.fixes.is_empty() {
        return Err(RouteError::Malformed(
            "Route does not expand to any fixes".to_string(),
        ));
    }

    Ok(assembly.fixes)
}
