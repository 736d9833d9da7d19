pub mod altitude;
pub mod frequency;
pub mod runway;
pub mod squawk;
