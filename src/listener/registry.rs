use super::SessionListener;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Insertion-ordered set of listeners with identity-based membership.
///
/// Two handles are the same listener when they point at the same allocation;
/// two equal-valued listeners in separate `Arc`s are distinct members.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Mutex<Vec<Arc<dyn SessionListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<dyn SessionListener>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn same(a: &Arc<dyn SessionListener>, b: &Arc<dyn SessionListener>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
    }

    /// Adds a listener. Returns `false` if it was already registered.
    pub fn subscribe(&self, listener: Arc<dyn SessionListener>) -> bool {
        let mut listeners = self.lock();
        if listeners.iter().any(|l| Self::same(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, listener: &Arc<dyn SessionListener>) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|l| !Self::same(l, listener));
        listeners.len() != before
    }

    pub fn contains(&self, listener: &Arc<dyn SessionListener>) -> bool {
        self.lock().iter().any(|l| Self::same(l, listener))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Current listeners in insertion order.
    pub fn snapshot(&self) -> Vec<Arc<dyn SessionListener>> {
        self.lock().clone()
    }

    /// Delivers a notification to every listener exactly once.
    ///
    /// Iterates a snapshot taken before the first call, so listeners added
    /// during delivery are skipped. A listener removed during delivery is
    /// skipped if its turn has not come yet. The registry lock is never held
    /// while a callback runs.
    pub fn for_each<F>(&self, mut notify: F)
    where
        F: FnMut(&dyn SessionListener),
    {
        for listener in self.snapshot() {
            if self.contains(&listener) {
                notify(listener.as_ref());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingListener};

    fn as_dyn(listener: &Arc<RecordingListener>) -> Arc<dyn SessionListener> {
        listener.clone()
    }

    #[test]
    fn test_subscribe_is_identity_based_and_deduplicated() {
        let registry = ListenerRegistry::new();
        let a = Arc::new(RecordingListener::default());
        let b = Arc::new(RecordingListener::default());

        assert!(registry.subscribe(as_dyn(&a)));
        assert!(!registry.subscribe(as_dyn(&a)));
        assert!(registry.subscribe(as_dyn(&b)));
        assert_eq!(registry.len(), 2);

        assert!(registry.unsubscribe(&as_dyn(&a)));
        assert!(!registry.unsubscribe(&as_dyn(&a)));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&as_dyn(&b)));
    }

    struct OrderedListener {
        index: usize,
        log: Arc<Mutex<Vec<usize>>>,
    }

    impl SessionListener for OrderedListener {
        fn on_failed(&self, _message: &str, _code: i32) {}

        fn on_connection_established(&self) {
            self.log.lock().unwrap().push(self.index);
        }

        fn on_event(&self, _event: &crate::messaging::ChatEvent) {}

        fn on_raw_frame(&self, _bytes: &[u8]) {}
    }

    #[test]
    fn test_for_each_preserves_insertion_order() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for index in [2, 0, 1] {
            registry.subscribe(Arc::new(OrderedListener {
                index,
                log: Arc::clone(&log),
            }));
        }

        registry.for_each(|l| l.on_connection_established());

        assert_eq!(*log.lock().unwrap(), vec![2, 0, 1]);
    }

    #[test]
    fn test_listener_added_during_fan_out_misses_current_notification() {
        let registry = Arc::new(ListenerRegistry::new());
        let first = Arc::new(RecordingListener::default());
        let late = Arc::new(RecordingListener::default());
        registry.subscribe(as_dyn(&first));

        let late_dyn = as_dyn(&late);
        registry.for_each(|l| {
            l.on_connection_established();
            registry.subscribe(late_dyn.clone());
        });

        assert_eq!(first.calls(), vec![Call::Established]);
        assert!(late.calls().is_empty());

        registry.for_each(|l| l.on_connection_established());
        assert_eq!(late.calls(), vec![Call::Established]);
    }

    #[test]
    fn test_listener_removed_during_fan_out_is_skipped_without_skipping_others() {
        let registry = ListenerRegistry::new();
        let a = Arc::new(RecordingListener::default());
        let b = Arc::new(RecordingListener::default());
        let c = Arc::new(RecordingListener::default());
        for listener in [&a, &b, &c] {
            registry.subscribe(as_dyn(listener));
        }

        let b_dyn = as_dyn(&b);
        registry.for_each(|l| {
            l.on_failed("boom", 1);
            registry.unsubscribe(&b_dyn);
        });

        assert_eq!(a.calls(), vec![Call::Failed("boom".to_string(), 1)]);
        assert!(b.calls().is_empty());
        assert_eq!(c.calls(), vec![Call::Failed("boom".to_string(), 1)]);
    }

    #[test]
    fn test_listener_removing_itself_still_receives_current_notification_once() {
        let registry = ListenerRegistry::new();
        let a = Arc::new(RecordingListener::default());
        let b = Arc::new(RecordingListener::default());
        registry.subscribe(as_dyn(&a));
        registry.subscribe(as_dyn(&b));

        let a_dyn = as_dyn(&a);
        registry.for_each(|l| {
            l.on_raw_frame(&[7]);
            registry.unsubscribe(&a_dyn);
        });

        assert_eq!(a.calls(), vec![Call::Raw(vec![7])]);
        assert_eq!(b.calls(), vec![Call::Raw(vec![7])]);
        assert_eq!(registry.len(), 1);
    }
}
