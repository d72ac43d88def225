pub(crate) mod health_checks;

pub use health_checks::*;
