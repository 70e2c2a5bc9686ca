// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Holding on to listeners of replaced content
//!
//! A listener that writes state commits new markup while it is still running, so
//! it can't be freed by that commit. Listeners retired during a call are kept
//! until the next commit after that call has returned.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Tracks listener calls currently on the stack.
#[derive(Debug, Default)]
pub(crate) struct Calls {
    depth: Cell<usize>,
    serial: Cell<u64>,
}

impl Calls {
    pub fn enter(&self) {
        if self.depth.get() == 0 {
            self.serial.set(self.serial.get() + 1);
        }
        self.depth.set(self.depth.get() + 1);
    }

    pub fn leave(&self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }

    /// Serial number of the outermost call currently running, if any.
    fn running(&self) -> Option<u64> {
        (self.depth.get() > 0).then(|| self.serial.get())
    }
}

pub(crate) struct Retired<T> {
    calls: Rc<Calls>,
    held: RefCell<Vec<(u64, T)>>,
}

impl<T> Retired<T> {
    pub fn new() -> Self {
        Retired {
            calls: Rc::new(Calls::default()),
            held: RefCell::new(Vec::new()),
        }
    }

    /// Handle for listeners to report when they run.
    pub fn calls(&self) -> Rc<Calls> {
        self.calls.clone()
    }

    /// Retire `stale`, freeing everything retired by calls that have returned.
    pub fn retire(&self, stale: Vec<T>) {
        let mut held = self.held.borrow_mut();

        let Some(call) = self.calls.running() else {
            held.clear();
            return;
        };

        held.retain(|(retired_in, _)| *retired_in == call);
        held.extend(stale.into_iter().map(|item| (call, item)));
    }

    pub fn len(&self) -> usize {
        self.held.borrow().len()
    }
}
