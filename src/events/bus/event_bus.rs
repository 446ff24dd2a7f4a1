// events/bus/event_bus.rs
//
// Synchronous in-process event bus.
//
// 1. Handlers execute immediately, in subscription order
// 2. Every emission is logged; the most recent ones are kept in a bounded
//    in-memory log
// 3. A panicking handler never stops the others

use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::events::types::DomainEvent;

/// Emissions kept by `EventBus::new`
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 256;

/// Type-erased handler; downcasts to the concrete event inside
type EventHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// Central coordination point for domain events.
///
/// Services emit after a committed write; subscribers (blob cleanup, audit,
/// UI refresh) react without the services knowing about them.
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<TypeId, Vec<EventHandler>>>>,
    event_log: Arc<RwLock<VecDeque<EventLogEntry>>>,
    log_capacity: usize,
}

/// A logged emission
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_log_capacity(DEFAULT_EVENT_LOG_CAPACITY)
    }

    /// Keeps at most `capacity` emissions, dropping the oldest first.
    /// Zero disables the in-memory log.
    pub fn with_log_capacity(capacity: usize) -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            event_log: Arc::new(RwLock::new(VecDeque::with_capacity(capacity.min(64)))),
            log_capacity: capacity,
        }
    }

    /// Subscribe to a specific event type.
    ///
    /// ```ignore
    /// bus.subscribe::<AssetDeleted, _>(|event| {
    ///     for key in &event.storage_keys { blobs.remove(key); }
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<E>();

        let wrapped: EventHandler = Box::new(move |event_any: &dyn Any| {
            if let Some(event) = event_any.downcast_ref::<E>() {
                handler(event);
            } else {
                log::error!(
                    "failed to downcast event in handler for {}",
                    std::any::type_name::<E>()
                );
            }
        });

        write(&self.handlers)
            .entry(type_id)
            .or_default()
            .push(wrapped);
    }

    /// Emit an event to every handler registered for its type
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let type_id = TypeId::of::<E>();

        let handlers = read(&self.handlers);
        let event_handlers = handlers.get(&type_id);

        let log_entry = EventLogEntry {
            event_type: event.event_type().to_string(),
            event_id: event.event_id().to_string(),
            occurred_at: event.occurred_at().to_rfc3339(),
            handler_count: event_handlers.map(|h| h.len()).unwrap_or(0),
        };

        log::debug!(
            "[EVENT] {} (id: {}) | {} handlers",
            log_entry.event_type,
            log_entry.event_id,
            log_entry.handler_count
        );
        if self.log_capacity > 0 {
            let mut event_log = write(&self.event_log);
            while event_log.len() >= self.log_capacity {
                event_log.pop_front();
            }
            event_log.push_back(log_entry);
        }

        if let Some(handlers) = event_handlers {
            for (idx, handler) in handlers.iter().enumerate() {
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    handler(&event as &dyn Any);
                }));

                if let Err(e) = result {
                    log::error!(
                        "handler {} for {} panicked: {:?}",
                        idx,
                        event.event_type(),
                        e
                    );
                }
            }
        }
    }

    /// Retained emissions, oldest first
    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        read(&self.event_log).iter().cloned().collect()
    }

    pub fn log_capacity(&self) -> usize {
        self.log_capacity
    }

    pub fn clear_event_log(&self) {
        write(&self.event_log).clear();
    }

    pub fn subscriber_count<E>(&self) -> usize
    where
        E: 'static,
    {
        read(&self.handlers)
            .get(&TypeId::of::<E>())
            .map(|h| h.len())
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share handlers and log
impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            event_log: Arc::clone(&self.event_log),
            log_capacity: self.log_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HistoryCategory;
    use crate::events::types::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_subscribe_and_emit() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        bus.subscribe::<AssetCreated, _>(move |_event| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(AssetCreated::new(1, 1, "TS-1".to_string()));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_multiple_handlers_execute_in_order() {
        let bus = EventBus::new();
        let sequence = Arc::new(RwLock::new(Vec::new()));

        for n in 1..=3 {
            let seq = Arc::clone(&sequence);
            bus.subscribe::<HistoryRecorded, _>(move |_| {
                seq.write().unwrap().push(n);
            });
        }

        bus.emit(HistoryRecorded::new(1, HistoryCategory::Calibration, 1));

        assert_eq!(*sequence.read().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_event_log_records_emissions() {
        let bus = EventBus::new();

        bus.emit(AssetCreated::new(1, 1, "TS-1".to_string()));
        bus.emit(AssetDeleted::new(1, "TS-1".to_string(), vec![]));

        let log = bus.get_event_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].event_type, "AssetCreated");
        assert_eq!(log[1].event_type, "AssetDeleted");

        bus.clear_event_log();
        assert!(bus.get_event_log().is_empty());
    }

    #[test]
    fn test_event_log_keeps_only_latest_entries() {
        let bus = EventBus::with_log_capacity(3);

        for key in 1..=5 {
            bus.emit(AssetUpdated::new(key));
        }
        bus.emit(AssetCreated::new(6, 6, "TS-6".to_string()));

        let log = bus.get_event_log();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].event_type, "AssetUpdated");
        assert_eq!(log[2].event_type, "AssetCreated");
    }

    #[test]
    fn test_zero_capacity_disables_log_but_not_handlers() {
        let bus = EventBus::with_log_capacity(0);
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);
        bus.subscribe::<AssetUpdated, _>(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(AssetUpdated::new(1));

        assert!(bus.get_event_log().is_empty());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscriber_count() {
        let bus = EventBus::new();

        assert_eq!(bus.subscriber_count::<AssetCreated>(), 0);

        bus.subscribe::<AssetCreated, _>(|_| {});
        bus.subscribe::<AssetCreated, _>(|_| {});
        assert_eq!(bus.subscriber_count::<AssetCreated>(), 2);

        assert_eq!(bus.subscriber_count::<AssetUpdated>(), 0);
    }

    #[test]
    fn test_handler_panic_doesnt_break_bus() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));

        bus.subscribe::<AssetUpdated, _>(|_| {
            panic!("Intentional panic");
        });

        let counter_clone = Arc::clone(&counter);
        bus.subscribe::<AssetUpdated, _>(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(AssetUpdated::new(1));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
