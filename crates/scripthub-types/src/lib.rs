pub mod api;
pub mod models;

pub use models::{InvalidKeyless, Keyless, Script, UserProfile};
