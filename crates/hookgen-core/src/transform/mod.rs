pub mod naming;
pub mod normalizer;
pub mod shape_resolver;

pub use naming::{NameFamily, NamingOptions, check_unique, derive_names, normalize_name};
pub use normalizer::{normalize, normalize_operations};
pub use shape_resolver::ROUTE_HELPER_NAMES;
