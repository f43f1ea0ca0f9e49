pub mod assessment;
pub mod records;
pub mod roster;
