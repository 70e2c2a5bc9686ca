// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Observable state
//!
//! Every component instance owns exactly one [`Observable`](Observable). It wraps a
//! plain record and holds a single owner callback, registered explicitly when the
//! instance is constructed. Any effective write invokes that callback synchronously,
//! before the write call returns; that is what drives re-rendering.
//!
//! Writes that don't change the stored value (as determined by [`PartialEq`]) are
//! no-ops and never notify.
use std::cell::{Ref, RefCell};
use std::fmt;

#[cfg(feature = "serde")]
pub mod dict;

#[cfg(feature = "serde")]
pub use dict::Dict;

/// Describes whether or not the owner should be notified after a mutation.
/// For uses see [`Observable::update`](Observable::update).
pub trait ShouldRender {
    fn should_render(self) -> bool;
}

/// Closures without return type always notify.
impl ShouldRender for () {
    fn should_render(self) -> bool {
        true
    }
}

/// Outcome of an [`update`](Observable::update) closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Then {
    /// This is a silent update
    Stop,
    /// Notify the owner after this update
    Render,
}

impl ShouldRender for Then {
    fn should_render(self) -> bool {
        match self {
            Then::Stop => false,
            Then::Render => true,
        }
    }
}

impl ShouldRender for bool {
    fn should_render(self) -> bool {
        self
    }
}

/// A mutation-intercepting container around some state `S`.
pub struct Observable<S> {
    value: RefCell<S>,
    owner: Box<dyn Fn()>,
}

impl<S> Observable<S> {
    /// Wrap `value`, notifying `owner` on every effective write.
    pub fn new(value: S, owner: impl Fn() + 'static) -> Self {
        Observable {
            value: RefCell::new(value),
            owner: Box::new(owner),
        }
    }

    /// Borrow the current state.
    ///
    /// Writes attempted while the returned guard is alive are refused.
    pub fn read(&self) -> Ref<'_, S> {
        self.value.borrow()
    }

    /// Clone a single field out of the state.
    pub fn get<T, F>(&self, field: F) -> T
    where
        T: Clone,
        F: FnOnce(&S) -> &T,
    {
        field(&self.value.borrow()).clone()
    }

    /// Run a closure with a shared reference to the state.
    pub fn with<F, O>(&self, f: F) -> O
    where
        F: FnOnce(&S) -> O,
    {
        f(&self.value.borrow())
    }

    /// Write `value` into the field selected by `field`.
    ///
    /// Returns `true` if the value differed from the stored one, in which case the
    /// owner has been notified exactly once by the time this returns.
    ///
    /// ```
    /// # use kiln::state::Observable;
    /// struct Form {
    ///     name: String,
    /// }
    ///
    /// let form = Observable::new(Form { name: "Alice".into() }, || println!("changed"));
    ///
    /// assert!(form.set(|f| &mut f.name, "Bob".into()));
    /// assert!(!form.set(|f| &mut f.name, "Bob".into()));
    /// ```
    pub fn set<T, F>(&self, field: F, value: T) -> bool
    where
        T: PartialEq,
        F: FnOnce(&mut S) -> &mut T,
    {
        self.update(move |state| {
            let slot = field(state);

            if *slot == value {
                return Then::Stop;
            }

            *slot = value;
            Then::Render
        })
    }

    /// Replace the entire state, notifying if it differs from the current one.
    pub fn replace(&self, value: S) -> bool
    where
        S: PartialEq,
    {
        self.set(|state| state, value)
    }

    /// Mutate the state in place. The owner is notified if the closure returns
    /// `()`, `true` or [`Then::Render`](Then::Render).
    ///
    /// Returns whether the owner was notified.
    pub fn update<F, O>(&self, mutator: F) -> bool
    where
        F: FnOnce(&mut S) -> O,
        O: ShouldRender,
    {
        let render = match self.value.try_borrow_mut() {
            Ok(mut state) => mutator(&mut state).should_render(),
            Err(_) => {
                log::warn!("state is currently borrowed, write refused");
                return false;
            }
        };

        if render {
            (self.owner)();
        }

        render
    }
}

impl<S: fmt::Debug> fmt::Debug for Observable<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.value.try_borrow() {
            Ok(state) => f.debug_tuple("Observable").field(&*state).finish(),
            Err(_) => f.write_str("Observable(<borrowed>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default, PartialEq)]
    struct Record {
        label: String,
        items: Vec<u32>,
    }

    fn counted() -> (Observable<Record>, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        let state = Observable::new(Record::default(), move || inner.set(inner.get() + 1));

        (state, count)
    }

    #[test]
    fn distinct_writes_notify_once_each() {
        let (state, count) = counted();

        for n in 0..10 {
            let label = if n % 2 == 0 { "a" } else { "b" };

            assert!(state.set(|r| &mut r.label, label.to_owned()));
        }

        assert_eq!(count.get(), 10);
    }

    #[test]
    fn identical_writes_are_silent() {
        let (state, count) = counted();

        state.set(|r| &mut r.items, vec![1, 2]);
        state.set(|r| &mut r.items, vec![1, 2]);
        state.set(|r| &mut r.items, vec![1, 2]);

        assert_eq!(count.get(), 1);
        assert_eq!(state.get(|r| &r.items), [1, 2]);
    }

    #[test]
    fn value_is_stored_before_notification() {
        let state = Rc::new_cyclic(|weak: &std::rc::Weak<Observable<Record>>| {
            let weak = weak.clone();

            Observable::new(Record::default(), move || {
                let state = weak.upgrade().unwrap();

                assert_eq!(state.read().label, "stored");
            })
        });

        assert!(state.set(|r| &mut r.label, "stored".into()));
    }

    #[test]
    fn update_respects_then() {
        let (state, count) = counted();

        assert!(!state.update(|r| {
            r.label.push('x');
            Then::Stop
        }));
        assert!(state.update(|r| r.items.push(1)));

        assert_eq!(count.get(), 1);
        assert_eq!(state.read().label, "x");
    }

    #[test]
    fn write_while_borrowed_is_refused() {
        let (state, count) = counted();

        let guard = state.read();

        assert!(!state.set(|r| &mut r.label, "nope".into()));
        drop(guard);

        assert_eq!(count.get(), 0);
        assert_eq!(state.read().label, "");
    }

    #[test]
    fn replace_whole_record() {
        let (state, count) = counted();

        assert!(!state.replace(Record::default()));
        assert!(state.replace(Record {
            label: "new".into(),
            items: vec![3],
        }));

        assert_eq!(count.get(), 1);
    }
}
