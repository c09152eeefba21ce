use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;

use crate::{Error, State};

/// Type-keyed storage for the states of one UI session.
///
/// Removing a state drops it, so any resource it owns (a camera session,
/// a pending job receiver) is released together with it.
#[derive(Default)]
pub struct StateCtx {
    storage: BTreeMap<TypeId, Box<dyn Any>>,
}

impl std::fmt::Debug for StateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCtx")
            .field("states", &self.storage.len())
            .finish()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `state`, replacing (and dropping) any previous value of the same type.
    pub fn add_state<T: State>(&mut self, state: T) {
        log::debug!("add state {} ({})", T::TYPE, type_name::<T>());
        self.storage.insert(TypeId::of::<T>(), Box::new(state));
    }

    pub fn contains<T: State>(&self) -> bool {
        self.storage.contains_key(&TypeId::of::<T>())
    }

    pub fn state<T: State>(&self) -> Option<&T> {
        self.storage
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    pub fn state_mut<T: State>(&mut self) -> Option<&mut T> {
        self.storage
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut::<T>())
    }

    /// Like [`state_mut`](Self::state_mut), but reports which state was missing.
    pub fn try_state_mut<T: State>(&mut self, context: &str) -> Result<&mut T, Error> {
        self.state_mut::<T>()
            .ok_or_else(|| Error::state_not_found(T::TYPE, context))
    }

    /// Removes the state and hands it back to the caller.
    pub fn remove_state<T: State>(&mut self) -> Option<T> {
        let boxed = self.storage.remove(&TypeId::of::<T>())?;
        log::debug!("remove state {}", T::TYPE);
        boxed.downcast::<T>().ok().map(|state| *state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Default, PartialEq)]
    struct Counter {
        value: i32,
    }

    impl State for Counter {
        const TYPE: &'static str = "counter";
    }

    struct DropProbe(Rc<Cell<bool>>);

    impl State for DropProbe {}

    impl Drop for DropProbe {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    #[test]
    fn add_and_read_state() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter { value: 42 });

        assert!(ctx.contains::<Counter>());
        assert_eq!(ctx.state::<Counter>().map(|c| c.value), Some(42));
    }

    #[test]
    fn state_mut_updates_in_place() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());

        if let Some(counter) = ctx.state_mut::<Counter>() {
            counter.value += 1;
        }

        assert_eq!(ctx.state::<Counter>(), Some(&Counter { value: 1 }));
    }

    #[test]
    fn missing_state_reports_type() {
        let mut ctx = StateCtx::new();
        let err = ctx.try_state_mut::<Counter>("render").unwrap_err();
        assert!(err.to_string().contains("counter"));
        assert!(err.to_string().contains("render"));
    }

    #[test]
    fn remove_state_drops_owned_resources() {
        let dropped = Rc::new(Cell::new(false));
        let mut ctx = StateCtx::new();
        ctx.add_state(DropProbe(dropped.clone()));

        drop(ctx.remove_state::<DropProbe>());

        assert!(dropped.get());
        assert!(!ctx.contains::<DropProbe>());
    }

    #[test]
    fn replacing_state_drops_previous_value() {
        let first = Rc::new(Cell::new(false));
        let second = Rc::new(Cell::new(false));
        let mut ctx = StateCtx::new();

        ctx.add_state(DropProbe(first.clone()));
        ctx.add_state(DropProbe(second.clone()));

        assert!(first.get());
        assert!(!second.get());
    }
}
