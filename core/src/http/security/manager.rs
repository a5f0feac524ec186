//! Factory entry point mirroring Spring's `AuthenticationManagerBuilder`.

use crate::http::security::authenticator::MemoryAuthenticator;

pub struct AuthenticationManager {}

impl AuthenticationManager {
    /// `auth.inMemoryAuthentication()`
    pub fn in_memory_authentication() -> MemoryAuthenticator {
        MemoryAuthenticator::new()
    }
}
