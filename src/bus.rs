//! Legacy event-bus dispatch.
//!
//! Some applications still funnel UI events through a global event aggregator
//! instead of (or in addition to) native DOM dispatch. This module hosts that
//! integration: an [`EventBus`] with `on`/`off`/`emit`, and a per-thread
//! installation slot the listener factory consults when a registration asks
//! for bus delivery.
//!
//! Presence of an installed bus is the switch: requesting bus delivery while
//! no bus is installed is a configuration error reported by the factory, not
//! by this module.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::dom::Event;

struct BusListener {
	id: u64,
	event_type: String,
	callback: Rc<dyn Fn(&Event)>,
}

/// A global event aggregator.
///
/// Subscriptions are keyed by an internal id, so the same callback can be
/// registered several times and each subscription removed individually.
#[derive(Clone)]
pub struct EventBus {
	inner: Rc<BusInner>,
}

struct BusInner {
	listeners: RefCell<Vec<BusListener>>,
	next_id: Cell<u64>,
}

impl EventBus {
	/// Creates an empty bus.
	pub fn new() -> Self {
		Self {
			inner: Rc::new(BusInner {
				listeners: RefCell::new(Vec::new()),
				next_id: Cell::new(0),
			}),
		}
	}

	/// Subscribes `callback` to events named `event_type`.
	pub fn on<F>(&self, event_type: &str, callback: F) -> BusHandle
	where
		F: Fn(&Event) + 'static,
	{
		let id = self.inner.next_id.get();
		self.inner.next_id.set(id + 1);
		self.inner.listeners.borrow_mut().push(BusListener {
			id,
			event_type: event_type.to_string(),
			callback: Rc::new(callback),
		});
		BusHandle {
			bus: Rc::downgrade(&self.inner),
			event_type: event_type.to_string(),
			id: Some(id),
		}
	}

	/// Delivers `event` to every subscription matching its type.
	pub fn emit(&self, event: &Event) {
		let matching: Vec<Rc<dyn Fn(&Event)>> = self
			.inner
			.listeners
			.borrow()
			.iter()
			.filter(|l| l.event_type == event.event_type())
			.map(|l| l.callback.clone())
			.collect();
		for callback in matching {
			callback(event);
		}
	}

	/// Number of live subscriptions.
	pub fn listener_count(&self) -> usize {
		self.inner.listeners.borrow().len()
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for EventBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventBus")
			.field("listeners", &self.listener_count())
			.finish()
	}
}

/// Owns one bus subscription.
///
/// Like a DOM listener handle, dropping it without calling
/// [`BusHandle::off`] leaves the subscription alive.
pub struct BusHandle {
	bus: Weak<BusInner>,
	event_type: String,
	id: Option<u64>,
}

impl BusHandle {
	/// Cancels the subscription; a second call is a no-op.
	pub fn off(&mut self) {
		let Some(id) = self.id.take() else {
			return;
		};
		if let Some(bus) = self.bus.upgrade() {
			bus.listeners
				.borrow_mut()
				.retain(|l| !(l.id == id && l.event_type == self.event_type));
		}
	}
}

thread_local! {
	static INSTALLED: RefCell<Option<EventBus>> = const { RefCell::new(None) };
}

/// Installs `bus` as the current thread's legacy bus.
pub fn install_bus(bus: &EventBus) {
	INSTALLED.with(|slot| *slot.borrow_mut() = Some(bus.clone()));
}

/// Returns the installed legacy bus, if any.
pub fn installed_bus() -> Option<EventBus> {
	INSTALLED.with(|slot| slot.borrow().clone())
}

/// Removes the installed legacy bus, if any.
pub fn reset_bus() {
	INSTALLED.with(|slot| *slot.borrow_mut() = None);
}
