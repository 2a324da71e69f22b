// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed listener lifecycle.
//!
//! An [`Effect`] owns one set of host listeners together with the key it was
//! attached for. Each [`Effect::sync`] compares the new key with the current
//! one:
//!
//! - equal keys leave the listeners alone;
//! - different keys detach every listener of the old set, then run the attach
//!   closure for the new key (if any).
//!
//! So the attached listeners always reflect the latest key alone, however many
//! times it changes.

use alloc::vec::Vec;

use crate::host::Host;

/// One keyed set of listeners.
#[derive(Clone, Debug)]
pub struct Effect<K, L> {
    key: Option<K>,
    listeners: Vec<L>,
}

impl<K, L> Default for Effect<K, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, L> Effect<K, L> {
    /// An effect with nothing attached.
    pub const fn new() -> Self {
        Self {
            key: None,
            listeners: Vec::new(),
        }
    }

    /// Key of the attached set, if any.
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Currently attached listeners.
    pub fn listeners(&self) -> &[L] {
        &self.listeners
    }

    /// True if a key is active.
    pub fn is_active(&self) -> bool {
        self.key.is_some()
    }
}

impl<K: PartialEq, L: Copy> Effect<K, L> {
    /// Reconcile to `key`. Returns `true` if listeners were detached or attached.
    pub fn sync<H, F>(&mut self, host: &mut H, key: Option<K>, attach: F) -> bool
    where
        H: Host<Listener = L>,
        F: FnOnce(&mut H, &K) -> Vec<L>,
    {
        if self.key == key {
            return false;
        }
        self.teardown(host);
        if let Some(key) = key {
            self.listeners = attach(host, &key);
            self.key = Some(key);
        }
        true
    }

    /// Detach everything.
    pub fn teardown<H: Host<Listener = L>>(&mut self, host: &mut H) {
        for listener in self.listeners.drain(..) {
            host.unlisten(listener);
        }
        self.key = None;
    }
}
