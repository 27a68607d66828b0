use crate::error::ApiError;
use std::collections::VecDeque;
use std::mem;
use std::sync::Mutex;
use tokio::sync::oneshot;

type Waiter = oneshot::Sender<Result<String, ApiError>>;

/// Coordinates a single in-flight token refresh across any number of
/// concurrent requests.
///
/// The first request that observes an expired token becomes the driver: it
/// performs the refresh call itself and reports the outcome back here. Every
/// other request that hits the same expiry while the refresh is outstanding
/// is parked on the queue and woken, in enqueue order, once the refresh
/// settles. The queue is empty whenever the state is `Idle`.
///
/// The `Idle -> Refreshing` transition is a check-and-set under one mutex,
/// so at most one driver exists per expiry episode even on a multi-threaded
/// runtime. The lock is never held across an await point.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

#[derive(Debug, Default)]
enum RefreshState {
    #[default]
    Idle,
    Refreshing {
        waiters: VecDeque<Waiter>,
    },
}

/// The role handed to a request entering the refresh protocol.
#[derive(Debug)]
pub enum RefreshTicket {
    /// No refresh was outstanding; the caller must perform the refresh call
    /// and settle the episode via `complete_success` / `complete_failure`.
    Driver,
    /// A refresh is already in flight; await the receiver for the new access
    /// token or the refresh error.
    Waiter(oneshot::Receiver<Result<String, ApiError>>),
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters the refresh protocol, either as driver or as queued waiter.
    pub fn begin(&self) -> RefreshTicket {
        let mut state = self.state.lock().expect("refresh state lock poisoned");
        match &mut *state {
            RefreshState::Idle => {
                *state = RefreshState::Refreshing {
                    waiters: VecDeque::new(),
                };
                RefreshTicket::Driver
            }
            RefreshState::Refreshing { waiters } => {
                let (tx, rx) = oneshot::channel();
                waiters.push_back(tx);
                RefreshTicket::Waiter(rx)
            }
        }
    }

    /// Settles the episode after a successful refresh: returns to `Idle` and
    /// hands the new access token to every waiter in FIFO order.
    pub fn complete_success(&self, token: &str) {
        for waiter in self.take_waiters() {
            // A closed receiver means the caller gave up; nothing to do.
            let _ = waiter.send(Ok(token.to_string()));
        }
    }

    /// Settles the episode after a failed refresh: returns to `Idle` and
    /// rejects every waiter with the refresh error.
    pub fn complete_failure(&self, message: &str) {
        for waiter in self.take_waiters() {
            let _ = waiter.send(Err(ApiError::RefreshFailed {
                message: message.to_string(),
            }));
        }
    }

    fn take_waiters(&self) -> VecDeque<Waiter> {
        let mut state = self.state.lock().expect("refresh state lock poisoned");
        match mem::take(&mut *state) {
            RefreshState::Refreshing { waiters } => waiters,
            RefreshState::Idle => VecDeque::new(),
        }
    }
}
