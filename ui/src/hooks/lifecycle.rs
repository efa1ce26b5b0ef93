//! Request bookkeeping for a single fetch call site.
//!
//! Every call site owns one [`RequestLifecycle`]. Starting a request through
//! it cancels the previous one, so at most one request per call site may
//! write state, and it is always the most recently started one. A cancelled
//! request is both aborted (its transport future is dropped at the next poll)
//! and marked dead, so even a result that is already sitting in a ready
//! future can't be committed.

use futures::future::{AbortHandle, AbortRegistration, Abortable};
use std::{
    cell::{Cell, RefCell},
    future::Future,
    rc::Rc,
};

struct Inflight {
    live: Rc<Cell<bool>>,
    abort: AbortHandle,
}

impl Inflight {
    fn cancel(self) {
        self.live.set(false);
        self.abort.abort();
    }
}

#[derive(Default)]
pub struct RequestLifecycle {
    current: RefCell<Option<Inflight>>,
}

impl RequestLifecycle {
    /// Cancel whatever is in flight and hand out the token for a new request.
    pub fn begin(&self) -> LiveRequest {
        self.cancel();
        let live = Rc::new(Cell::new(true));
        let (abort, registration) = AbortHandle::new_pair();
        *self.current.borrow_mut() = Some(Inflight {
            live: live.clone(),
            abort,
        });
        LiveRequest { live, registration }
    }

    /// Cancel the in-flight request, if any.
    pub fn cancel(&self) {
        let inflight = self.current.borrow_mut().take();
        if let Some(inflight) = inflight {
            inflight.cancel();
        }
    }

    /// True while the latest request has neither settled nor been cancelled.
    #[cfg(test)]
    fn is_pending(&self) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|inflight| inflight.live.get())
    }
}

impl Drop for RequestLifecycle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Permission for one request to write its result.
pub struct LiveRequest {
    live: Rc<Cell<bool>>,
    registration: AbortRegistration,
}

impl LiveRequest {
    #[cfg(test)]
    fn is_live(&self) -> bool {
        self.live.get()
    }

    /// Drive `request` to completion and pass its output to `commit`, unless
    /// the request was superseded or cancelled in the meantime.
    ///
    /// `request` is dropped as soon as it settles or is aborted, releasing
    /// whatever it holds. Returns whether `commit` ran.
    pub async fn run<T>(
        self,
        request: impl Future<Output = T>,
        commit: impl FnOnce(T),
    ) -> bool {
        let live = self.live;
        let outcome = Abortable::new(request, self.registration).await;
        match outcome {
            Ok(output) if live.get() => {
                live.set(false);
                commit(output);
                true
            }
            _ => false,
        }
    }
}
