pub mod grouping;
pub mod operations;
pub mod shapes;
pub mod types;

pub use grouping::{ResourceGroup, group_by_resource, resource_of};
pub use operations::*;
pub use shapes::*;
pub use types::{ApiInfo, ApiModel, NormalizedName};
