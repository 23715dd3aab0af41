//! Import von Rohdaten (Overpass-JSON) in ein [`Network`](crate::core::Network).

pub mod classify;
pub mod decoder;
pub mod elements;
pub mod query;

pub use decoder::{
    decode_elements, import_overpass_json, import_overpass_json_with_crs, parse_elements,
    point_bounds, ImportReport,
};
pub use elements::{Element, PointElement, RelationElement, RelationMember, Tags, WayElement};
pub use query::build_overpass_query;
