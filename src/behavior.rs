pub mod clock;
pub mod effects;
pub mod orbit;
pub mod spin;
