//! DOM abstraction layer.
//!
//! Everything the listener logic needs from the platform is funneled through
//! the four types in this module: [`Document`], [`Element`], [`Event`] and
//! [`EventHandle`]. On `wasm32` they are thin wrappers over web-sys. On native
//! targets the same surface is backed by a small in-memory document, so the
//! whole detection pipeline can be driven by ordinary `cargo test` without a
//! browser.
//!
//! ## Listener ownership
//!
//! [`EventHandle`] owns exactly one (event name, callback, capture flag)
//! registration. Removal must match the registration parameters, mirroring
//! `EventTarget.removeEventListener` semantics. Dropping a handle without
//! calling [`EventHandle::remove`] leaves the listener attached; on wasm the
//! backing closure is forgotten so the browser keeps a valid callback.

#[cfg(target_arch = "wasm32")]
mod imp {
	use wasm_bindgen::JsCast;
	use wasm_bindgen::JsValue;
	use wasm_bindgen::closure::Closure;

	/// A DOM element handle.
	#[derive(Clone)]
	pub struct Element {
		inner: web_sys::Element,
	}

	impl Element {
		/// Wraps a raw web-sys element.
		pub fn new(inner: web_sys::Element) -> Self {
			Self { inner }
		}

		/// Returns the underlying web-sys element.
		pub fn raw(&self) -> &web_sys::Element {
			&self.inner
		}

		/// Appends `child` to this element.
		pub fn append_child(&self, child: &Element) {
			let _ = self.inner.append_child(child.inner.as_ref());
		}

		/// Returns true if `other` is this element or one of its descendants.
		pub fn contains(&self, other: &Element) -> bool {
			self.inner.contains(Some(other.inner.as_ref()))
		}

		/// Identity comparison (JS `===`).
		pub fn ptr_eq(&self, other: &Element) -> bool {
			let a: &JsValue = self.inner.as_ref();
			let b: &JsValue = other.inner.as_ref();
			a == b
		}
	}

	impl std::fmt::Debug for Element {
		fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
			f.debug_struct("Element")
				.field("tag", &self.inner.tag_name())
				.finish()
		}
	}

	/// A platform event as seen by a document-level listener.
	pub struct Event {
		inner: web_sys::Event,
	}

	impl Event {
		/// Wraps a raw web-sys event.
		pub fn new(inner: web_sys::Event) -> Self {
			Self { inner }
		}

		/// Returns the underlying web-sys event.
		pub fn raw(&self) -> &web_sys::Event {
			&self.inner
		}

		/// The event type name (`"click"`, `"focusout"`, ...).
		pub fn event_type(&self) -> String {
			self.inner.type_()
		}

		/// Returns true if the event's origin target is exactly `el`.
		pub fn is_target(&self, el: &Element) -> bool {
			match self.inner.target() {
				Some(target) => {
					let target: &JsValue = target.as_ref();
					let el: &JsValue = el.inner.as_ref();
					target == el
				}
				None => false,
			}
		}

		/// Whether the event propagates across shadow boundaries.
		pub fn composed(&self) -> bool {
			self.inner.composed()
		}

		/// Returns true if `el` appears anywhere in the event's composed path.
		pub fn path_contains(&self, el: &Element) -> bool {
			let el: &JsValue = el.inner.as_ref();
			self.inner.composed_path().iter().any(|entry| &entry == el)
		}

		/// Returns true if the event's origin target lies inside `el`.
		///
		/// An event without a node target is never "within" an element.
		pub fn target_within(&self, el: &Element) -> bool {
			self.inner
				.target()
				.and_then(|target| target.dyn_into::<web_sys::Node>().ok())
				.map(|node| el.inner.contains(Some(&node)))
				.unwrap_or(false)
		}
	}

	impl std::fmt::Debug for Event {
		fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
			f.debug_struct("Event")
				.field("type", &self.event_type())
				.field("composed", &self.composed())
				.finish()
		}
	}

	/// The document-level event dispatch point.
	pub struct Document {
		inner: web_sys::Document,
	}

	impl Document {
		/// Registers a passive document-level listener.
		///
		/// The returned handle owns the registration; see [`EventHandle`].
		pub fn add_listener<F>(&self, event_type: &str, capture: bool, callback: F) -> EventHandle
		where
			F: Fn(&Event) + 'static,
		{
			let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
				callback(&Event::new(event));
			}) as Box<dyn FnMut(web_sys::Event)>);

			let options = web_sys::AddEventListenerOptions::new();
			options.set_passive(true);
			options.set_capture(capture);

			let _ = self.inner.add_event_listener_with_callback_and_add_event_listener_options(
				event_type,
				closure.as_ref().unchecked_ref(),
				&options,
			);

			EventHandle {
				target: self.inner.clone().into(),
				event_type: event_type.to_string(),
				capture,
				closure: Some(closure),
			}
		}
	}

	/// Owns one document-level listener registration.
	pub struct EventHandle {
		target: web_sys::EventTarget,
		event_type: String,
		capture: bool,
		closure: Option<Closure<dyn FnMut(web_sys::Event)>>,
	}

	impl EventHandle {
		/// Detaches the listener this handle registered.
		///
		/// Removal uses the same event name and capture flag as registration;
		/// calling `remove` a second time is a no-op.
		pub fn remove(&mut self) {
			if let Some(closure) = self.closure.take() {
				let _ = self.target.remove_event_listener_with_callback_and_bool(
					&self.event_type,
					closure.as_ref().unchecked_ref(),
					self.capture,
				);
			}
		}
	}

	impl Drop for EventHandle {
		fn drop(&mut self) {
			// Not removed: the browser still holds the callback, so the
			// closure must outlive the handle.
			if let Some(closure) = self.closure.take() {
				closure.forget();
			}
		}
	}

	/// Returns the current document, or `None` outside a browser context.
	pub fn document() -> Option<Document> {
		web_sys::window()
			.and_then(|window| window.document())
			.map(|inner| Document { inner })
	}
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
	use std::cell::{Cell, RefCell};
	use std::rc::{Rc, Weak};

	/// A DOM element handle (in-memory double).
	#[derive(Clone)]
	pub struct Element {
		inner: Rc<ElementInner>,
	}

	struct ElementInner {
		tag: String,
		parent: RefCell<Weak<ElementInner>>,
		children: RefCell<Vec<Element>>,
	}

	impl Element {
		/// Creates a detached element.
		pub fn new(tag: impl Into<String>) -> Self {
			Self {
				inner: Rc::new(ElementInner {
					tag: tag.into(),
					parent: RefCell::new(Weak::new()),
					children: RefCell::new(Vec::new()),
				}),
			}
		}

		/// The element's tag name.
		pub fn tag_name(&self) -> &str {
			&self.inner.tag
		}

		/// Appends `child` to this element, reparenting it.
		pub fn append_child(&self, child: &Element) {
			*child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
			self.inner.children.borrow_mut().push(child.clone());
		}

		/// Returns true if `other` is this element or one of its descendants.
		pub fn contains(&self, other: &Element) -> bool {
			let mut cursor = Some(other.inner.clone());
			while let Some(node) = cursor {
				if Rc::ptr_eq(&node, &self.inner) {
					return true;
				}
				let parent = node.parent.borrow().upgrade();
				cursor = parent;
			}
			false
		}

		/// Identity comparison.
		pub fn ptr_eq(&self, other: &Element) -> bool {
			Rc::ptr_eq(&self.inner, &other.inner)
		}
	}

	impl std::fmt::Debug for Element {
		fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
			f.debug_struct("Element")
				.field("tag", &self.inner.tag)
				.finish()
		}
	}

	/// A synthetic event for the in-memory document.
	pub struct Event {
		event_type: String,
		target: Option<Element>,
		composed: bool,
		path: Vec<Element>,
	}

	impl Event {
		/// Creates an event with no origin target.
		pub fn new(event_type: impl Into<String>) -> Self {
			Self {
				event_type: event_type.into(),
				target: None,
				composed: false,
				path: Vec::new(),
			}
		}

		/// Sets the event's origin target.
		pub fn with_target(mut self, target: &Element) -> Self {
			self.target = Some(target.clone());
			self
		}

		/// Marks the event as composed and records its composed path.
		pub fn with_composed_path(mut self, path: Vec<Element>) -> Self {
			self.composed = true;
			self.path = path;
			self
		}

		/// The event type name.
		pub fn event_type(&self) -> &str {
			&self.event_type
		}

		/// Returns true if the event's origin target is exactly `el`.
		pub fn is_target(&self, el: &Element) -> bool {
			self.target
				.as_ref()
				.map(|target| target.ptr_eq(el))
				.unwrap_or(false)
		}

		/// Whether the event propagates across shadow boundaries.
		pub fn composed(&self) -> bool {
			self.composed
		}

		/// Returns true if `el` appears anywhere in the event's composed path.
		pub fn path_contains(&self, el: &Element) -> bool {
			self.path.iter().any(|entry| entry.ptr_eq(el))
		}

		/// Returns true if the event's origin target lies inside `el`.
		pub fn target_within(&self, el: &Element) -> bool {
			self.target
				.as_ref()
				.map(|target| el.contains(target))
				.unwrap_or(false)
		}
	}

	impl std::fmt::Debug for Event {
		fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
			f.debug_struct("Event")
				.field("type", &self.event_type())
				.field("composed", &self.composed())
				.finish()
		}
	}

	struct DocListener {
		id: u64,
		event_type: String,
		capture: bool,
		callback: Rc<dyn Fn(&Event)>,
	}

	/// The document-level event dispatch point (in-memory double).
	#[derive(Clone)]
	pub struct Document {
		inner: Rc<DocumentInner>,
	}

	struct DocumentInner {
		listeners: RefCell<Vec<DocListener>>,
		next_id: Cell<u64>,
	}

	impl Document {
		/// Creates an empty document.
		pub fn new() -> Self {
			Self {
				inner: Rc::new(DocumentInner {
					listeners: RefCell::new(Vec::new()),
					next_id: Cell::new(0),
				}),
			}
		}

		/// Registers a document-level listener.
		pub fn add_listener<F>(&self, event_type: &str, capture: bool, callback: F) -> EventHandle
		where
			F: Fn(&Event) + 'static,
		{
			let id = self.inner.next_id.get();
			self.inner.next_id.set(id + 1);
			self.inner.listeners.borrow_mut().push(DocListener {
				id,
				event_type: event_type.to_string(),
				capture,
				callback: Rc::new(callback),
			});
			EventHandle {
				document: Rc::downgrade(&self.inner),
				event_type: event_type.to_string(),
				capture,
				id: Some(id),
			}
		}

		/// Dispatches `event` to every listener registered for its type.
		///
		/// Capture-phase listeners run before bubble-phase listeners.
		pub fn dispatch(&self, event: &Event) {
			let matching: Vec<Rc<dyn Fn(&Event)>> = {
				let listeners = self.inner.listeners.borrow();
				let capture = listeners
					.iter()
					.filter(|l| l.capture && l.event_type == event.event_type());
				let bubble = listeners
					.iter()
					.filter(|l| !l.capture && l.event_type == event.event_type());
				capture.chain(bubble).map(|l| l.callback.clone()).collect()
			};
			for callback in matching {
				callback(event);
			}
		}

		/// Number of currently registered listeners.
		pub fn listener_count(&self) -> usize {
			self.inner.listeners.borrow().len()
		}
	}

	impl Default for Document {
		fn default() -> Self {
			Self::new()
		}
	}

	/// Owns one document-level listener registration (in-memory double).
	pub struct EventHandle {
		document: Weak<DocumentInner>,
		event_type: String,
		capture: bool,
		id: Option<u64>,
	}

	impl EventHandle {
		/// Detaches the listener this handle registered.
		///
		/// Removal matches the registration's event name and capture flag;
		/// calling `remove` a second time is a no-op.
		pub fn remove(&mut self) {
			let Some(id) = self.id.take() else {
				return;
			};
			if let Some(document) = self.document.upgrade() {
				document.listeners.borrow_mut().retain(|l| {
					!(l.id == id && l.event_type == self.event_type && l.capture == self.capture)
				});
			}
		}
	}

	thread_local! {
		static DOCUMENT: RefCell<Option<Document>> = const { RefCell::new(None) };
	}

	/// Returns the current document, or `None` when none is installed.
	///
	/// Server-side there is no document; outside-event detection silently
	/// no-ops in that case. Tests install one with [`install_document`].
	pub fn document() -> Option<Document> {
		DOCUMENT.with(|slot| slot.borrow().clone())
	}

	/// Installs a fresh document for the current thread and returns it.
	pub fn install_document() -> Document {
		let document = Document::new();
		DOCUMENT.with(|slot| *slot.borrow_mut() = Some(document.clone()));
		document
	}

	/// Removes the current thread's document, if any.
	pub fn reset_document() {
		DOCUMENT.with(|slot| *slot.borrow_mut() = None);
	}
}

#[cfg(not(target_arch = "wasm32"))]
pub use imp::{install_document, reset_document};
pub use imp::{Document, Element, Event, EventHandle, document};
