use std::io;

use tracing::warn;

pub mod airway;
pub mod config;
pub mod coordinates;
pub mod navigator;
pub mod procedure;
pub mod route;
pub mod store;
pub mod token;

#[cfg(test)]
mod fixtures;

pub use config::ExpanderConfig;
pub use navigator::{ExpandedRoute, Navigator, RouteResponse};
pub use route::{ErrorClass, RouteError};
pub use store::{Lookup, MemoryStore, NavDataStore};

fn read_to_string(contents: &[u8]) -> Result<String, io::Error> {
    String::from_utf8(contents.to_vec()).or_else(|_| {
        let (string, _, errors) = encoding_rs::WINDOWS_1252.decode(contents);
        if errors {
            warn!("errors while decoding win-1252");
        }
        Ok(string.to_string())
    })
}
