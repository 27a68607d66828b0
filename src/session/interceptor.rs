use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

type SignOut = Arc<dyn Fn() + Send + Sync>;

struct Registration {
    id: u64,
    sign_out: SignOut,
}

/// Holds the currently registered response interceptor, if any.
///
/// While a registration is active the gateway runs its 401 handling
/// (refresh protocol, forced sign-out). With no registration, 401s are
/// surfaced as normalized errors and nothing else happens.
#[derive(Default)]
pub struct InterceptorSlot {
    current: RwLock<Option<Registration>>,
    next_id: AtomicU64,
}

impl InterceptorSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `sign_out` as the unrecoverable-failure callback and returns
    /// the handle that removes it. Registering again replaces the previous
    /// registration.
    pub fn register(
        self: Arc<Self>,
        sign_out: impl Fn() + Send + Sync + 'static,
    ) -> InterceptorHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut current = self.current.write().expect("interceptor lock poisoned");
            *current = Some(Registration {
                id,
                sign_out: Arc::new(sign_out),
            });
        }
        debug!("Registered response interceptor {}", id);
        InterceptorHandle { slot: self, id }
    }

    pub fn is_active(&self) -> bool {
        self.current
            .read()
            .expect("interceptor lock poisoned")
            .is_some()
    }

    /// Invokes the registered sign-out callback, if any. The callback is
    /// called outside the lock so it may re-enter the slot.
    pub fn sign_out(&self) {
        let callback = self
            .current
            .read()
            .expect("interceptor lock poisoned")
            .as_ref()
            .map(|r| Arc::clone(&r.sign_out));
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl std::fmt::Debug for InterceptorSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorSlot")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Capability to remove a registered interceptor. Unregistering twice, or
/// after a newer registration replaced this one, is a no-op.
pub struct InterceptorHandle {
    slot: Arc<InterceptorSlot>,
    id: u64,
}

impl InterceptorHandle {
    pub fn unregister(&self) {
        let mut current = self.slot.current.write().expect("interceptor lock poisoned");
        if current.as_ref().is_some_and(|r| r.id == self.id) {
            *current = None;
            debug!("Unregistered response interceptor {}", self.id);
        }
    }
}
