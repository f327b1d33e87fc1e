//! Event plumbing for cache regions and cache operations.
//!
//! Regions and operation layers publish events through an
//! [`EventListeners`] collection. Listeners are shared (`Arc`) so one
//! collection can be handed to every region a manager creates.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// An observable event emitted by a cache region or a cache operation.
pub trait Event: Send + Sync + fmt::Debug {
    /// Short machine-friendly type tag, e.g. `"cache_hit"`.
    fn event_type(&self) -> &'static str;

    /// When the event happened.
    fn timestamp(&self) -> Instant;

    /// Name of the region or operation that emitted the event.
    fn source_name(&self) -> &str;
}

/// Receives events of type `E`.
pub trait EventListener<E: Event>: Send + Sync {
    /// Called once per emitted event.
    fn on_event(&self, event: &E);
}

/// Shared, type-erased listener.
pub type BoxedEventListener<E> = Arc<dyn EventListener<E>>;

/// An ordered collection of listeners.
///
/// Cloning is cheap: the listeners themselves are reference counted.
#[derive(Clone)]
pub struct EventListeners<E: Event> {
    listeners: Vec<BoxedEventListener<E>>,
}

impl<E: Event> EventListeners<E> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers a listener.
    pub fn add<L>(&mut self, listener: L)
    where
        L: EventListener<E> + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    /// Registers an already shared listener.
    pub fn add_shared(&mut self, listener: BoxedEventListener<E>) {
        self.listeners.push(listener);
    }

    /// Registers `f` for events whose [`Event::event_type`] equals
    /// `event_type`; other events are skipped.
    pub fn on_type<F>(&mut self, event_type: &'static str, f: F)
    where
        E: 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.add(FnListener::new(move |event: &E| {
            if event.event_type() == event_type {
                f(event);
            }
        }));
    }

    /// Appends every listener of `other`, keeping registration order.
    pub fn extend(&mut self, other: &EventListeners<E>) {
        self.listeners.extend(other.listeners.iter().cloned());
    }

    /// Delivers `event` to every listener in registration order.
    ///
    /// A panicking listener is isolated: the panic is swallowed and the
    /// remaining listeners still run.
    pub fn emit(&self, event: &E) {
        for listener in &self.listeners {
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                listener.on_event(event);
            }));
        }
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl<E: Event> Default for EventListeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for EventListeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("len", &self.listeners.len())
            .finish()
    }
}

/// Adapts a closure into an [`EventListener`].
pub struct FnListener<E, F>
where
    F: Fn(&E) + Send + Sync,
{
    f: F,
    _phantom: std::marker::PhantomData<fn(&E)>,
}

impl<E, F> FnListener<E, F>
where
    F: Fn(&E) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<E, F> EventListener<E> for FnListener<E, F>
where
    E: Event,
    F: Fn(&E) + Send + Sync,
{
    fn on_event(&self, event: &E) {
        (self.f)(event)
    }
}
