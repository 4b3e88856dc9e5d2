pub mod petition;
pub mod signature;
