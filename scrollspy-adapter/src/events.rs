use scrollspy::ActivateEvent;

/// Handle returned by [`EventBus::on`], used to remove the listener again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler<N> = Box<dyn FnMut(&ActivateEvent<N>)>;

struct Listener<N> {
    id: ListenerId,
    element: N,
    handler: Handler<N>,
}

/// Activation listeners keyed by the element they were registered on.
///
/// This plays the role of the page's event dispatch for the "activate" notification: the
/// registry triggers it on the observed container whenever a scroll spy activates a link.
pub struct EventBus<N> {
    listeners: Vec<Listener<N>>,
    next_id: u64,
}

impl<N> Default for EventBus<N> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<N: PartialEq> EventBus<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, element: N, handler: impl FnMut(&ActivateEvent<N>) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            element,
            handler: Box::new(handler),
        });
        id
    }

    /// Removes one listener. Returns `false` if it was already gone.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Removes every listener registered on `element`.
    pub fn off_element(&mut self, element: &N) {
        self.listeners.retain(|l| l.element != *element);
    }

    pub fn listener_count(&self, element: &N) -> usize {
        self.listeners.iter().filter(|l| l.element == *element).count()
    }

    /// Calls every listener registered on `element`, in registration order. Returns how many
    /// were called.
    pub fn trigger(&mut self, element: &N, event: &ActivateEvent<N>) -> usize {
        let mut called = 0;
        for listener in self.listeners.iter_mut().filter(|l| l.element == *element) {
            (listener.handler)(event);
            called += 1;
        }
        called
    }
}

impl<N: core::fmt::Debug> core::fmt::Debug for EventBus<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
