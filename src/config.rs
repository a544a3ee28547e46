pub mod effects;
pub mod model;
