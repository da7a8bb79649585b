use uuid::Uuid;

use crate::{dto::session::SignInRequest, error::AppResult, models::Principal};

/// Seam for the identity provider. The real provider lives outside this
/// process; the shipped implementation fabricates principals locally with
/// no verification.
pub trait IdentityProvider: Send + Sync {
    fn sign_in(&self, request: &SignInRequest) -> AppResult<Principal>;
}

pub struct MockIdentity;

impl IdentityProvider for MockIdentity {
    fn sign_in(&self, request: &SignInRequest) -> AppResult<Principal> {
        Ok(Principal {
            uid: Uuid::new_v4(),
            display_name: request.display_name.clone(),
            email: request.email.clone(),
        })
    }
}
