use std::{env::args_os, fs, io};

use geojson::{Feature, FeatureCollection, Value};
use route_expander::{ExpanderConfig, MemoryStore, Navigator};
use serde_json::Map;
use uom::si::length::nautical_mile;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let snapshot_path = args_os()
        .nth(1)
        .expect("missing argument: path to navigation data snapshot");
    let route = args_os()
        .nth(2)
        .expect("missing argument: route")
        .into_string()
        .unwrap();
    let geojson_path = args_os()
        .nth(3)
        .expect("missing argument: path to .geojson output");

    let store = MemoryStore::from_path(snapshot_path).expect("could not load snapshot");
    let navigator = Navigator::new(store, &ExpanderConfig::default());
    let expanded = navigator.expand(&route).await.expect("could not expand route");

    let route_feature = Feature {
        geometry: Some(Value::from(&expanded.line_string()).into()),
        properties: Some(Map::from_iter(vec![
            ("route".to_string(), expanded.route.clone().into()),
            (
                "length_nm".to_string(),
                expanded.length().get::<nautical_mile>().into(),
            ),
        ])),
        ..Default::default()
    };
    let fix_features = expanded.fixes.iter().map(|fix| Feature {
        geometry: Some(Value::from(&fix.coordinate).into()),
        properties: Some(Map::from_iter(vec![(
            "fix".to_string(),
            fix.designator.clone().into(),
        )])),
        ..Default::default()
    });
    let feature_collection =
        FeatureCollection::from_iter(std::iter::once(route_feature).chain(fix_features));

    fs::write(geojson_path, feature_collection.to_string()).expect("could not write .geojson");
}
