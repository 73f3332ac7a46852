use std::{env::args_os, io};

use route_expander::{ExpanderConfig, MemoryStore, Navigator};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let snapshot_path = args_os()
        .nth(1)
        .expect("missing argument: path to navigation data snapshot");
    let route = args_os()
        .nth(2)
        .map(|route| route.into_string().expect("route is not valid unicode"));
    let config = args_os().nth(3).map_or_else(ExpanderConfig::default, |path| {
        ExpanderConfig::from_path(path).expect("could not read config")
    });

    let store = MemoryStore::from_path(snapshot_path).expect("could not load snapshot");
    let navigator = Navigator::new(store, &config);
    let response = navigator.respond(route.as_deref()).await;

    eprintln!("status: {}", response.status());
    println!("{}", serde_json::to_string_pretty(&response).unwrap());
}
