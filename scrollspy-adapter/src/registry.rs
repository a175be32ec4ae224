use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex};

use scrollspy::{ActivateEvent, ClickOutcome, Dom, IntersectionBatch, ScrollSpy, ScrollSpyOptions};

use crate::data_api::options_from_element;
use crate::{AdapterError, Command, ElementKey, EventBus};

type Pending<N> = Arc<Mutex<Vec<N>>>;

#[derive(Debug)]
struct Instance<N> {
    spy: ScrollSpy<N>,
    // Links activated since the last flush, in activation order.
    pending: Pending<N>,
}

/// At most one [`ScrollSpy`] per container element, plus the "activate" event dispatch.
///
/// Every activation made through the registry is re-emitted as an [`ActivateEvent`] on the
/// container via [`Registry::events`], after the instance's own `on_activate` callback ran.
#[derive(Debug)]
pub struct Registry<N: ElementKey> {
    instances: HashMap<N, Instance<N>>,
    events: EventBus<N>,
}

impl<N: ElementKey> Default for Registry<N> {
    fn default() -> Self {
        Self {
            instances: HashMap::new(),
            events: EventBus::new(),
        }
    }
}

impl<N: ElementKey + Send + 'static> Registry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn contains(&self, container: &N) -> bool {
        self.instances.contains_key(container)
    }

    /// Containers with a live instance, in no particular order.
    pub fn containers(&self) -> impl Iterator<Item = &N> {
        self.instances.keys()
    }

    pub fn events(&self) -> &EventBus<N> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus<N> {
        &mut self.events
    }

    pub fn get_instance(&self, container: &N) -> Option<&ScrollSpy<N>> {
        self.instances.get(container).map(|i| &i.spy)
    }

    /// Runs `f` on the container's instance, then dispatches any activation it caused to the
    /// container's listeners.
    ///
    /// Returns `None` if there is no instance. Replace options through
    /// [`Registry::set_options`]; `ScrollSpy::set_options` inside `f` unhooks the events.
    pub fn with_instance_mut<R>(
        &mut self,
        container: &N,
        f: impl FnOnce(&mut ScrollSpy<N>) -> R,
    ) -> Option<R> {
        let out = f(&mut self.instances.get_mut(container)?.spy);
        self.flush(container);
        Some(out)
    }

    /// Returns the container's instance, creating it with `options` if there is none yet.
    ///
    /// `options` is ignored for an existing instance. Drive the instance through the registry
    /// (or [`Registry::with_instance_mut`]) so its activations reach the event bus.
    pub fn get_or_create_instance<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        container: N,
        options: ScrollSpyOptions<N>,
    ) -> Result<&ScrollSpy<N>, AdapterError> {
        let instance = match self.instances.entry(container) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let instance = Self::create(dom, entry.key().clone(), options)?;
                entry.insert(instance)
            }
        };
        Ok(&instance.spy)
    }

    fn create<D: Dom<Node = N>>(
        dom: &mut D,
        container: N,
        options: ScrollSpyOptions<N>,
    ) -> Result<Instance<N>, AdapterError> {
        let pending: Pending<N> = Arc::new(Mutex::new(Vec::new()));
        let options = Self::queue_activations(options, &pending);
        adebug!(container = ?container, "Registry: create instance");
        let spy = ScrollSpy::new(dom, container, options)?;
        Ok(Instance { spy, pending })
    }

    /// Chains a push onto `pending` after the caller's own `on_activate`.
    fn queue_activations(options: ScrollSpyOptions<N>, pending: &Pending<N>) -> ScrollSpyOptions<N> {
        let queue = Arc::clone(pending);
        let user = options.on_activate.clone();
        options.with_on_activate(Some(move |event: &ActivateEvent<N>| {
            if let Some(cb) = &user {
                cb(event);
            }
            queue
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(event.related_target.clone());
        }))
    }

    /// Replaces the options of an existing instance, keeping its activate events wired.
    ///
    pub fn set_options<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        container: &N,
        options: ScrollSpyOptions<N>,
    ) -> Result<bool, AdapterError> {
        let Some(instance) = self.instances.get_mut(container) else {
            return Ok(false);
        };
        let options = Self::queue_activations(options, &instance.pending);
        instance.spy.set_options(dom, options)?;
        self.flush(container);
        Ok(true)
    }

    /// Dispatches the container's pending activations to its event listeners.
    fn flush(&mut self, container: &N) -> usize {
        let Some(instance) = self.instances.get(container) else {
            return 0;
        };
        let drained: Vec<N> = core::mem::take(
            &mut *instance
                .pending
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        let mut called = 0;
        for related_target in drained {
            called += self
                .events
                .trigger(container, &ActivateEvent { related_target });
        }
        called
    }

    pub fn on_scroll<D: Dom<Node = N>>(&mut self, dom: &mut D, container: &N) -> Option<N> {
        let activated = self.instances.get_mut(container)?.spy.on_scroll(dom);
        self.flush(container);
        activated
    }

    /// Polls every instance. Returns `(container, link)` for each activation.
    pub fn on_scroll_all<D: Dom<Node = N>>(&mut self, dom: &mut D) -> Vec<(N, N)> {
        let containers: Vec<N> = self.instances.keys().cloned().collect();
        containers
            .into_iter()
            .filter_map(|c| self.on_scroll(dom, &c).map(|link| (c, link)))
            .collect()
    }

    pub fn process_batch<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        container: &N,
        batch: &IntersectionBatch<N>,
    ) -> Option<N> {
        let activated = self
            .instances
            .get_mut(container)?
            .spy
            .process_batch(dom, batch);
        self.flush(container);
        activated
    }

    pub fn on_click<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        container: &N,
        clicked: &N,
    ) -> ClickOutcome {
        match self.instances.get_mut(container) {
            Some(instance) => instance.spy.on_click(dom, clicked),
            None => ClickOutcome::IGNORED,
        }
    }

    /// Refreshes the container's instance. Returns `false` if there is none.
    pub fn refresh<D: Dom<Node = N>>(&mut self, dom: &mut D, container: &N) -> bool {
        match self.instances.get_mut(container) {
            Some(instance) => {
                instance.spy.refresh(dom);
                true
            }
            None => false,
        }
    }

    /// Disposes and forgets the container's instance, dropping its listeners.
    ///
    /// Returns `false` if there was no instance.
    pub fn dispose(&mut self, container: &N) -> bool {
        let Some(mut instance) = self.instances.remove(container) else {
            return false;
        };
        instance.spy.dispose();
        self.events.off_element(container);
        adebug!(container = ?container, "Registry: dispose instance");
        true
    }

    /// Runs a string-keyed command on the container's instance, creating the instance from the
    /// container's data attributes first if needed.
    ///
    /// The name is validated before anything is created.
    pub fn execute<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        document: &N,
        container: &N,
        command: &str,
    ) -> Result<(), AdapterError> {
        let command: Command = command.parse()?;
        if !self.contains(container) {
            let options = options_from_element(&*dom, document, container)?;
            self.get_or_create_instance(dom, container.clone(), options)?;
        }
        adebug!(container = ?container, command = %command, "Registry::execute");
        match command {
            Command::Refresh => {
                self.refresh(dom, container);
            }
            Command::Dispose => {
                self.dispose(container);
            }
        }
        Ok(())
    }
}
