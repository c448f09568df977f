//! Flutter-facing bindings for `pocketnote_core`.

mod api;

pub use api::*;
