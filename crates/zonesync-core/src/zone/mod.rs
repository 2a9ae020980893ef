//! Zone files: parsing, rendering and the on-disk directory

pub mod parser;
pub mod render;
pub mod store;

pub use parser::{parse_zone, resolve_name};
pub use render::{DEFAULT_ZONE_TTL, render_zone};
pub use store::{ZoneDirectory, ZoneFile};
