use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::store::{NavDataStore, StoreError};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
}

impl Display for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Boundary::Start => "Start",
            Boundary::End => "End",
        })
    }
}

fn quoted(fix: Option<&String>) -> String {
    fix.map_or_else(|| "(none given)".to_string(), |fix| format!("'{fix}'"))
}

#[derive(Error, Debug)]
pub enum AirwayError {
    #[error("Airway '{0}' not found")]
    NotFound(String),
    /// `fix` is `None` when the route supplies no token for the boundary.
    #[error("{boundary} fix {} not found in airway '{airway}'", quoted(.fix.as_ref()))]
    BoundaryNotFound {
        airway: String,
        boundary: Boundary,
        fix: Option<String>,
    },
    #[error("Airway '{0}' has no fixes")]
    Empty(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Deserialize)]
struct AirwayRecord {
    code: String,
    fixes: Vec<String>,
}

/// An airway and its fixes in canonical order. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AirwayRecord")]
pub struct Airway {
    code: String,
    fixes: Vec<String>,
}

impl TryFrom<AirwayRecord> for Airway {
    type Error = AirwayError;

    fn try_from(record: AirwayRecord) -> Result<Self, Self::Error> {
        Self::new(record.code, record.fixes)
    }
}

impl Airway {
    pub fn new(code: impl Into<String>, fixes: Vec<String>) -> Result<Self, AirwayError> {
        let code = code.into();
        if fixes.is_empty() {
            return Err(AirwayError::Empty(code));
        }
        Ok(Self { code, fixes })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn fixes(&self) -> &[String] {
        &self.fixes
    }

    fn position(&self, boundary: Boundary, fix: &str) -> Result<usize, AirwayError> {
        self.fixes
            .iter()
            .position(|f| f == fix)
            .ok_or_else(|| AirwayError::BoundaryNotFound {
                airway: self.code.clone(),
                boundary,
                fix: Some(fix.to_string()),
            })
    }

    /// Fixes flown from `start` to `end`, both inclusive. Travelling against the
    /// canonical listing yields the reversed slice.
    pub fn segment(&self, start: &str, end: &str) -> Result<Vec<String>, AirwayError> {
        self.slice(Some(start), Some(end))
    }

    /// Like [`Airway::segment`], a missing `start` meaning the first fix and a
    /// missing `end` the last one.
    pub fn slice(&self, start: Option<&str>, end: Option<&str>) -> Result<Vec<String>, AirwayError> {
        let start_index = start.map_or(Ok(0), |fix| self.position(Boundary::Start, fix))?;
        let end_index = end.map_or(Ok(self.fixes.len().saturating_sub(1)), |fix| {
            self.position(Boundary::End, fix)
        })?;

        trace!(
            "slicing {} from {start_index} to {end_index} of {}",
            self.code,
            self.fixes.len()
        );

        Ok(if start_index <= end_index {
            self.fixes[start_index..=end_index].to_vec()
        } else {
            self.fixes[end_index..=start_index]
                .iter()
                .rev()
                .cloned()
                .collect()
        })
    }
}

pub(crate) async fn find<S: NavDataStore>(store: &S, code: &str) -> Result<Airway, AirwayError> {
    debug!("looking up airway {code}");
    store
        .find_airway(code)
        .await?
        .found_or_else(|| AirwayError::NotFound(code.to_string()))
}

/// Expands `code` between the boundary fixes `start` and `end`.
pub async fn expand<S: NavDataStore>(
    store: &S,
    code: &str,
    start: &str,
    end: &str,
) -> Result<Vec<String>, AirwayError> {
    find(store, code).await?.segment(start, end)
}

#[cfg(test)]
mod test {
    use crate::fixtures::{airway, store};

    use super::{expand, Airway, AirwayError, Boundary};

    #[test]
    fn test_segment_directions() {
        let q480 = airway("Q480", &["LVZ", "BOBTA", "WEETU", "KLOTZ", "CFB"]);
        let fixes = q480.fixes();

        for i in 0..fixes.len() {
            for j in i..fixes.len() {
                let forward = q480.segment(&fixes[i], &fixes[j]).unwrap();
                assert_eq!(forward, fixes[i..=j].to_vec());

                let mut backward = q480.segment(&fixes[j], &fixes[i]).unwrap();
                backward.reverse();
                assert_eq!(backward, forward);
            }
        }
    }

    #[test]
    fn test_segment_single_fix() {
        let j70 = airway("J70", &["HOXIE", "MIDFX", "LVZ"]);
        assert_eq!(j70.segment("MIDFX", "MIDFX").unwrap(), vec!["MIDFX"]);
    }

    #[test]
    fn test_open_slice() {
        let q480 = airway("Q480", &["LVZ", "BOBTA", "WEETU", "KLOTZ"]);
        assert_eq!(
            q480.slice(Some("WEETU"), None).unwrap(),
            vec!["WEETU", "KLOTZ"]
        );
        assert_eq!(
            q480.slice(None, Some("BOBTA")).unwrap(),
            vec!["LVZ", "BOBTA"]
        );
        assert_eq!(q480.slice(None, None).unwrap(), q480.fixes().to_vec());
    }

    #[test]
    fn test_empty_airway() {
        assert!(matches!(
            Airway::new("J70", vec![]),
            Err(AirwayError::Empty(code)) if code == "J70"
        ));
    }

    #[tokio::test]
    async fn test_expand() {
        let store = store();
        assert_eq!(
            expand(&store, "J70", "LVZ", "HOXIE").await.unwrap(),
            vec!["LVZ", "MIDFX", "HOXIE"]
        );
    }

    #[tokio::test]
    async fn test_expand_boundary_not_found() {
        let store = store();
        let err = expand(&store, "J70", "BOBTA", "LVZ").await.unwrap_err();
        assert!(
            matches!(&err, AirwayError::BoundaryNotFound { airway, boundary: Boundary::Start, fix: Some(fix) }
                if airway == "J70" && fix == "BOBTA"),
            "{err:?}"
        );
        assert_eq!(
            err.to_string(),
            "Start fix 'BOBTA' not found in airway 'J70'"
        );

        let err = expand(&store, "J70", "HOXIE", "KLOTZ").await.unwrap_err();
        assert_eq!(err.to_string(), "End fix 'KLOTZ' not found in airway 'J70'");
    }

    #[tokio::test]
    async fn test_expand_not_found() {
        let store = store();
        let err = expand(&store, "J999", "HOXIE", "LVZ").await.unwrap_err();
        assert!(matches!(&err, AirwayError::NotFound(code) if code == "J999"));
    }
}
