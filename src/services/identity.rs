//! Session identity seam towards the auth service.

use std::sync::{Arc, Mutex};

use crate::types::task::SessionIdentity;

/// Supplies the signed-in user embedded into new tabs and audit records.
pub trait SessionIdentityProvider: Send {
    fn current(&self) -> Option<SessionIdentity>;
}

/// Identity slot shared between the host shell (which signs in and out) and
/// the tab manager (which reads it).
#[derive(Debug, Clone, Default)]
pub struct SharedIdentity {
    slot: Arc<Mutex<Option<SessionIdentity>>>,
}

impl SharedIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: SessionIdentity) -> Self {
        let shared = Self::new();
        shared.sign_in(identity);
        shared
    }

    pub fn sign_in(&self, identity: SessionIdentity) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(identity);
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

impl SessionIdentityProvider for SharedIdentity {
    fn current(&self) -> Option<SessionIdentity> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}
