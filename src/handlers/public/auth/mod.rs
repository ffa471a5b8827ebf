pub mod register;
pub mod session;

pub use register::register;
pub use session::{login, logout};
