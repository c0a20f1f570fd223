//! Before-send hook list.
//!
//! Hosts call [`HookList::dispatch`] on every outgoing packet before sending it.
//! Observers only get a shared reference, and `dispatch` hands the packet back
//! untouched, so registered observers can never alter or swallow traffic.

use std::fmt;

/// Handle returned by [`HookList::register`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

type Observer<P> = Box<dyn FnMut(&P) + Send>;

pub struct HookList<P> {
    observers: Vec<(HookId, Observer<P>)>,
    next_id: u64,
}

impl<P> Default for HookList<P> {
    fn default() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<P> fmt::Debug for HookList<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookList")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<P> HookList<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer. Observers run in registration order.
    pub fn register(&mut self, observer: impl FnMut(&P) + Send + 'static) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unregister(&mut self, id: HookId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(hook_id, _)| *hook_id != id);
        self.observers.len() != before
    }

    /// Show `packet` to every observer and return it for sending.
    pub fn dispatch(&mut self, packet: P) -> P {
        for (_, observer) in &mut self.observers {
            observer(&packet);
        }
        packet
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn dispatch_passes_packet_through_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = HookList::new();

        let first = Arc::clone(&seen);
        hooks.register(move |p: &String| first.lock().unwrap().push(format!("a:{p}")));
        let second = Arc::clone(&seen);
        hooks.register(move |p: &String| second.lock().unwrap().push(format!("b:{p}")));

        let sent = hooks.dispatch("skill".to_string());

        assert_eq!(sent, "skill");
        assert_eq!(*seen.lock().unwrap(), ["a:skill", "b:skill"]);
    }

    #[test]
    fn unregister_removes_only_that_observer() {
        let count = Arc::new(Mutex::new(0));
        let mut hooks = HookList::new();

        let c = Arc::clone(&count);
        let id = hooks.register(move |_: &u8| *c.lock().unwrap() += 1);
        let c = Arc::clone(&count);
        hooks.register(move |_: &u8| *c.lock().unwrap() += 10);
        assert_eq!(hooks.len(), 2);

        assert!(hooks.unregister(id));
        assert!(!hooks.unregister(id));
        assert_eq!(hooks.dispatch(1), 1);
        assert_eq!(*count.lock().unwrap(), 10);
    }

    #[test]
    fn empty_list_is_plain_passthrough() {
        let mut hooks: HookList<Vec<u8>> = HookList::new();
        assert!(hooks.is_empty());
        assert_eq!(hooks.dispatch(vec![1, 2, 3]), vec![1, 2, 3]);
    }
}
