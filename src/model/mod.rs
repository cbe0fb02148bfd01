pub mod branch;
pub mod draft;
pub mod product;

pub use branch::*;
pub use draft::*;
pub use product::*;
