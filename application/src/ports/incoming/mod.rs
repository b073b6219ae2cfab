pub mod credits;
pub mod identity;
pub mod payments;
pub mod upload;
