//! Observability hook for container accesses.
//!
//! Every primitive accessor ([`get`](crate::OrderedMap::get),
//! [`set`](crate::OrderedMap::set), [`push`](crate::OrderedMap::push),
//! [`has_key`](crate::OrderedMap::has_key),
//! [`exists`](crate::OrderedMap::exists),
//! [`unset`](crate::OrderedMap::unset)) and every cursor move reports an
//! [`Access`] to the observer installed on the current thread. Nothing is
//! installed by default, so reporting costs a thread-local lookup and
//! nothing else.
//!
//! # Examples
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use koine::observer::{self, Access, Observer};
//! use koine::prelude::*;
//!
//! #[derive(Default)]
//! struct Counter(RefCell<usize>);
//!
//! impl Observer for Counter {
//!     fn observe(&self, _access: Access<'_>) {
//!         *self.0.borrow_mut() += 1;
//!     }
//! }
//!
//! let counter = Rc::new(Counter::default());
//! {
//!     let _guard = observer::install(counter.clone());
//!     let mut hash = Hash::default();
//!     hash.set("a", 1);
//!     let _ = hash.get("a");
//! }
//! assert_eq!(*counter.0.borrow(), 2);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::key::Key;

/// A single access to a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access<'a> {
    /// A value was read.
    Get(&'a Key),
    /// A value was written; `None` means it was appended.
    Set(Option<&'a Key>),
    /// A key was tested for presence.
    Exists(&'a Key),
    /// A key was removed.
    Unset(&'a Key),
    /// A cursor was moved back to the first pair.
    Rewind,
    /// A cursor advanced; carries the key it now points at.
    Advance(Option<&'a Key>),
}

impl Access<'_> {
    /// The operation name, without its key.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Get(_) => "get",
            Self::Set(_) => "set",
            Self::Exists(_) => "exists",
            Self::Unset(_) => "unset",
            Self::Rewind => "rewind",
            Self::Advance(_) => "advance",
        }
    }

    /// The key involved, if any.
    #[must_use]
    pub const fn key(&self) -> Option<&Key> {
        match self {
            Self::Get(key) | Self::Exists(key) | Self::Unset(key) => Some(*key),
            Self::Set(key) | Self::Advance(key) => *key,
            Self::Rewind => None,
        }
    }
}

impl fmt::Display for Access<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(key) => write!(formatter, "{}({key})", self.operation()),
            None => write!(formatter, "{}", self.operation()),
        }
    }
}

/// Receives container accesses.
pub trait Observer {
    /// Called once per access.
    fn observe(&self, access: Access<'_>);
}

thread_local! {
    /// Installed observers with their guard ids; the last one is active.
    static INSTALLED: RefCell<Vec<(u64, Rc<dyn Observer>)>> = const { RefCell::new(Vec::new()) };
    static NEXT_ID: Cell<u64> = const { Cell::new(0) };
}

/// Uninstalls its own observer when dropped.
///
/// Guards may be dropped in any order. Dropping a guard removes only the
/// observer it installed; the most recently installed observer still in
/// place stays active.
#[must_use = "the observer is uninstalled as soon as the guard is dropped"]
pub struct ObserverGuard {
    id: u64,
    _thread_bound: PhantomData<Rc<()>>,
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        let id = self.id;
        // The thread-local may already be gone during thread teardown.
        let _ = INSTALLED.try_with(|installed| {
            installed.borrow_mut().retain(|(installed_id, _)| *installed_id != id);
        });
    }
}

/// Installs `observer` for the current thread until the guard is dropped.
pub fn install(observer: Rc<dyn Observer>) -> ObserverGuard {
    let id = NEXT_ID.with(|next| {
        let id = next.get();
        next.set(id.wrapping_add(1));
        id
    });
    INSTALLED.with(|installed| installed.borrow_mut().push((id, observer)));
    ObserverGuard {
        id,
        _thread_bound: PhantomData,
    }
}

/// Returns `true` if an observer is installed on the current thread.
#[must_use]
pub fn is_installed() -> bool {
    INSTALLED.with(|installed| !installed.borrow().is_empty())
}

/// Reports an access to the installed observer, if any.
///
/// The observer runs outside the thread-local borrow, so it may itself use
/// containers.
pub(crate) fn notify(access: Access<'_>) {
    let observer = INSTALLED.with(|installed| {
        installed
            .borrow()
            .last()
            .map(|(_, observer)| Rc::clone(observer))
    });
    if let Some(observer) = observer {
        observer.observe(access);
    }
}

// =============================================================================
// Tracing
// =============================================================================

/// Forwards every access to `tracing` at trace level, target
/// `koine::access`.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl Observer for TracingObserver {
    fn observe(&self, access: Access<'_>) {
        match access.key() {
            Some(key) => tracing::trace!(
                target: "koine::access",
                operation = access.operation(),
                %key,
                "container access"
            ),
            None => tracing::trace!(
                target: "koine::access",
                operation = access.operation(),
                "container access"
            ),
        }
    }
}
