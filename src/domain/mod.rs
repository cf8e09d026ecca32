pub mod gpo;
pub mod phrases;
pub mod export;

pub use gpo::*;
pub use phrases::*;
pub use export::*;
