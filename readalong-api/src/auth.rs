use uuid::Uuid;

use crate::STUB_UUID;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AuthToken(pub Uuid);

impl AuthToken {
    pub fn stub() -> AuthToken {
        AuthToken(STUB_UUID)
    }
}

/// Source of the bearer credential attached to every request
///
/// Returning `None` means the user is logged out, in which case callers must
/// refuse to reach the network at all.
pub trait Credentials: Send + Sync {
    fn bearer(&self) -> Option<AuthToken>;
}

impl Credentials for AuthToken {
    fn bearer(&self) -> Option<AuthToken> {
        Some(*self)
    }
}

impl Credentials for Option<AuthToken> {
    fn bearer(&self) -> Option<AuthToken> {
        *self
    }
}
