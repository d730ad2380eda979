pub mod account;
pub mod directory;

pub use account::*;
pub use directory::*;
