pub mod context;
pub mod magic;
pub mod sessions;
pub mod token;

pub use context::{AuthState, SessionContext, SessionUser};
