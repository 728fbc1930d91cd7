pub mod amount;
pub mod display;
