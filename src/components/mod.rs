pub mod canvas_editor;
pub mod overlay;

use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;

use yew::Reducible;

/// Shared mutable state passed through props. Equality is identity, so a
/// component re-renders when handed a different cell, not when the contents
/// change.
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    pub fn new(inner: Rc<RefCell<T>>) -> Self {
        Self(inner)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Deref for Shared<T> {
    type Target = RefCell<T>;

    fn deref(&self) -> &RefCell<T> {
        &self.0
    }
}

pub enum CounterAction {
    Increment,
    Decrement,
}

/// Counter usable from callbacks created in earlier renders
#[derive(Debug, Default, PartialEq)]
pub struct Counter(pub u32);

impl Reducible for Counter {
    type Action = CounterAction;

    fn reduce(self: Rc<Self>, action: CounterAction) -> Rc<Self> {
        let value = match action {
            CounterAction::Increment => self.0.wrapping_add(1),
            CounterAction::Decrement => self.0.saturating_sub(1),
        };
        Rc::new(Counter(value))
    }
}
