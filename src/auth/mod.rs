//! Authentication: token model, strategies, and the manager that owns one

pub mod manager;
pub mod provider;
pub mod token;

pub use manager::AuthManager;
pub use provider::{AuthProvider, NoAuthProvider, PasswordAuthProvider, TokenAuthProvider};
pub use token::TokenInfo;
