pub mod emitters;
pub mod flavor;
pub mod generator;

pub use flavor::{FlavorConfig, flavor};
pub use generator::QueryGenerator;
