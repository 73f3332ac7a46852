use geo::{Distance as _, Geodesic, LineString};
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, warn};
use uom::si::{f64::Length, length::meter};

use crate::{
    airway::{self, Airway, AirwayError},
    config::ExpanderConfig,
    coordinates::{self, ResolvedFix},
    procedure::{self, Procedure, ProcedureCode, ProcedureError, ProcedureKind},
    route::{self, RouteError},
    store::{Bounded, NavDataStore},
    token::tokenize,
};

const MISSING_ROUTE: &str = "Missing required query parameter: 'route'";

/// A route clearance expanded into its fixes, in flown order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExpandedRoute {
    pub route: String,
    pub fixes: Vec<ResolvedFix>,
}

impl ExpandedRoute {
    pub fn designators(&self) -> impl Iterator<Item = &str> {
        self.fixes.iter().map(|fix| fix.designator.as_str())
    }

    pub fn line_string(&self) -> LineString {
        self.fixes.iter().map(|fix| fix.coordinate).collect()
    }

    /// Geodesic length along all fixes.
    pub fn length(&self) -> Length {
        Length::new::<meter>(
            self.fixes
                .iter()
                .tuple_windows()
                .map(|(from, to)| Geodesic::distance(from.coordinate, to.coordinate))
                .sum::<f64>(),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: u16,
    pub error: String,
}

impl From<&RouteError> for ErrorResponse {
    fn from(err: &RouteError) -> Self {
        Self {
            status: err.class().status(),
            error: err.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RouteResponse {
    Expanded(ExpandedRoute),
    Failed(ErrorResponse),
}

impl RouteResponse {
    pub fn status(&self) -> u16 {
        match self {
            RouteResponse::Expanded(_) => 200,
            RouteResponse::Failed(err) => err.status,
        }
    }
}

/// Entry point for route expansion and the related navigation data queries.
///
/// Holds no state besides the store, every lookup of which is bounded by the
/// configured timeout.
#[derive(Clone, Debug)]
pub struct Navigator<S> {
    store: Bounded<S>,
}

impl<S: NavDataStore> Navigator<S> {
    pub fn new(store: S, config: &ExpanderConfig) -> Self {
        Self {
            store: Bounded::new(store, config.lookup_timeout()),
        }
    }

    pub fn store(&self) -> &S {
        self.store.inner()
    }

    pub async fn expand(&self, route: &str) -> Result<ExpandedRoute, RouteError> {
        let route = route.trim();
        debug!("expanding route {route:?}");
        let tokens = tokenize(route);
        let designators = route::assemble(&self.store, &tokens).await?;
        let fixes = coordinates::resolve(&self.store, designators).await?;

        Ok(ExpandedRoute {
            route: route.to_string(),
            fixes,
        })
    }

    /// Like [`Navigator::expand`], with failures turned into an error body.
    pub async fn respond(&self, route: Option<&str>) -> RouteResponse {
        let Some(route) = route.filter(|route| !route.trim().is_empty()) else {
            warn!("route request without route");
            return RouteResponse::Failed(ErrorResponse {
                status: 400,
                error: MISSING_ROUTE.to_string(),
            });
        };

        match self.expand(route).await {
            Ok(expanded) => RouteResponse::Expanded(expanded),
            Err(err) => {
                warn!("route expansion error for {route:?}: {err}");
                RouteResponse::Failed(ErrorResponse::from(&err))
            }
        }
    }

    /// The airway `code`, its fixes optionally limited to the part from `start`
    /// to `end`.
    pub async fn airway(
        &self,
        code: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Airway, AirwayError> {
        let airway = airway::find(&self.store, code).await?;
        Airway::new(airway.code(), airway.slice(start, end)?)
    }

    /// A SID or STAR by its composite code, e.g. `HHOWE4.LNCON` or `BOBTA.TPGUN2`.
    pub async fn procedure(
        &self,
        kind: ProcedureKind,
        code: &str,
    ) -> Result<Procedure, ProcedureError> {
        procedure::find(&self.store, &ProcedureCode::parse(kind, code)?).await
    }

    /// Positions of a comma separated list of fixes. Fixes the store doesn't
    /// know are left out.
    pub async fn fixes(&self, list: &str) -> Result<Vec<ResolvedFix>, RouteError> {
        let ids = list
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unique()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        if ids.is_empty() {
            return Err(RouteError::Malformed("No valid fixes provided".to_string()));
        }

        let coordinates = self.store.find_fixes_by_ids(&ids).await?;
        Ok(ids
            .into_iter()
            .filter_map(|designator| {
                coordinates.get(&designator).map(|coordinate| ResolvedFix {
                    coordinate: *coordinate,
                    designator,
                })
            })
            .collect())
    }
}
