use geo::Point;
use itertools::Itertools;
use serde::{ser::SerializeStruct, Serialize, Serializer};
use tracing::debug;

use crate::{route::RouteError, store::NavDataStore};

/// A fix of an expanded route together with its position.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedFix {
    pub designator: String,
    pub coordinate: Point,
}

impl Serialize for ResolvedFix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut fix = serializer.serialize_struct("ResolvedFix", 3)?;
        fix.serialize_field("fix", &self.designator)?;
        fix.serialize_field("lat", &self.coordinate.y())?;
        fix.serialize_field("lon", &self.coordinate.x())?;
        fix.end()
    }
}

/// Attaches coordinates to `designators`, keeping their order and repeats.
///
/// All distinct designators are fetched in a single batch lookup. A designator
/// the store doesn't know fails the whole resolution.
pub async fn resolve<S: NavDataStore>(
    store: &S,
    designators: Vec<String>,
) -> Result<Vec<ResolvedFix>, RouteError> {
    let distinct = designators.iter().unique().cloned().collect::<Vec<_>>();
    debug!(
        "resolving {} fixes ({} distinct)",
        designators.len(),
        distinct.len()
    );
    let coordinates = store.find_fixes_by_ids(&distinct).await?;

    designators
        .into_iter()
        .map(|designator| match coordinates.get(&designator) {
            Some(coordinate) => Ok(ResolvedFix {
                coordinate: *coordinate,
                designator,
            }),
            None => Err(RouteError::UnresolvedFix(designator)),
        })
        .collect()
}
