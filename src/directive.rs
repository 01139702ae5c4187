//! Directive adapter for declarative outside-event bindings.
//!
//! The host framework hands a directive three things: an element, a binding
//! value and lifecycle hook invocations. This module normalizes the binding
//! value into `(name, handler, options)`, drives the listener factory from
//! the mount hook, and keeps the returned teardowns in a side registry so
//! the unmount hook can find them again.
//!
//! ## Lifecycle hook names
//!
//! Host API revisions disagree on what the hooks are called; the adapter is
//! written against the logical [`LifecyclePhase`]s and [`hook_names`] maps a
//! phase to the identifier a given revision expects.
//!
//! ## Teardown storage
//!
//! Teardowns live in a registry owned by this module, keyed by element
//! identity plus directive name (plus the resolved event name for the
//! generic directive, so several generic bindings coexist on one element).
//! Storing over an occupied key detaches the superseded registration first:
//! re-mounting replaces a subscription, it never stacks or leaks one.

use crate::debug_log;
use crate::dom::Element;
use crate::listener::{OutsideHandler, OutsideOptions, Teardown, outside_listener};

/// Logical directive lifecycle phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecyclePhase {
	/// The element carrying the directive entered the tree.
	Mount,
	/// The element carrying the directive left the tree.
	Unmount,
}

/// Hook identifiers used by one host API revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HookNames {
	/// Identifier of the mount-equivalent hook.
	pub mount: &'static str,
	/// Identifier of the unmount-equivalent hook.
	pub unmount: &'static str,
}

/// Host framework API revisions with diverging hook naming.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostApiRevision {
	/// Current hook naming (`before_mount` / `unmounted`).
	Current,
	/// Legacy hook naming (`bind` / `unbind`).
	Legacy,
}

/// Maps the logical phases onto the hook identifiers of `revision`.
pub const fn hook_names(revision: HostApiRevision) -> HookNames {
	match revision {
		HostApiRevision::Current => HookNames {
			mount: "before_mount",
			unmount: "unmounted",
		},
		HostApiRevision::Legacy => HookNames {
			mount: "bind",
			unmount: "unbind",
		},
	}
}

/// Modifier flags carried by a declarative binding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BindingModifiers {
	/// Listen in the capture phase.
	pub capture: bool,
	/// Route through the legacy event bus.
	pub bus: bool,
}

/// Structured binding payload: `{ name?, handler, options? }`.
#[derive(Clone, Debug)]
pub struct EventSpec {
	/// Event-name override; mandatory (here or in the options) for the
	/// generic directive.
	pub name: Option<String>,
	/// The outside-event handler.
	pub handler: OutsideHandler,
	/// Per-registration options.
	pub options: Option<OutsideOptions>,
}

impl EventSpec {
	/// A spec carrying only a handler.
	pub fn new<F>(handler: F) -> Self
	where
		F: Fn(&crate::dom::Event, &Element, Option<&crate::listener::Extras>) + 'static,
	{
		Self {
			name: None,
			handler: OutsideHandler::new(handler),
			options: None,
		}
	}

	/// A spec carrying an explicit event name.
	pub fn named<F>(name: impl Into<String>, handler: F) -> Self
	where
		F: Fn(&crate::dom::Event, &Element, Option<&crate::listener::Extras>) + 'static,
	{
		Self {
			name: Some(name.into()),
			handler: OutsideHandler::new(handler),
			options: None,
		}
	}

	/// Attaches options to the spec.
	pub fn with_options(mut self, options: OutsideOptions) -> Self {
		self.options = Some(options);
		self
	}
}

/// The decoded declarative binding payload.
///
/// Hosts hand bindings over either as a bare handler or as a structured
/// value; the positional form `[name?, handler, options?]` maps onto the
/// tuple conversions below.
#[derive(Clone, Debug)]
pub enum BindingValue {
	/// A bare handler function.
	Handler(OutsideHandler),
	/// A structured `{ name?, handler, options? }` value.
	Spec(EventSpec),
}

impl BindingValue {
	/// Wraps a bare handler closure.
	pub fn handler<F>(f: F) -> Self
	where
		F: Fn(&crate::dom::Event, &Element, Option<&crate::listener::Extras>) + 'static,
	{
		Self::Handler(OutsideHandler::new(f))
	}
}

impl From<OutsideHandler> for BindingValue {
	fn from(handler: OutsideHandler) -> Self {
		Self::Handler(handler)
	}
}

impl From<EventSpec> for BindingValue {
	fn from(spec: EventSpec) -> Self {
		Self::Spec(spec)
	}
}

impl From<(&str, OutsideHandler)> for BindingValue {
	fn from((name, handler): (&str, OutsideHandler)) -> Self {
		Self::Spec(EventSpec {
			name: Some(name.to_string()),
			handler,
			options: None,
		})
	}
}

impl From<(&str, OutsideHandler, OutsideOptions)> for BindingValue {
	fn from((name, handler, options): (&str, OutsideHandler, OutsideOptions)) -> Self {
		Self::Spec(EventSpec {
			name: Some(name.to_string()),
			handler,
			options: Some(options),
		})
	}
}

impl From<(OutsideHandler, OutsideOptions)> for BindingValue {
	fn from((handler, options): (OutsideHandler, OutsideOptions)) -> Self {
		Self::Spec(EventSpec {
			name: None,
			handler,
			options: Some(options),
		})
	}
}

/// A declarative binding: value plus modifiers.
#[derive(Clone, Debug)]
pub struct OutsideBinding {
	/// The binding payload.
	pub value: BindingValue,
	/// Modifier flags.
	pub modifiers: BindingModifiers,
}

impl OutsideBinding {
	/// A binding with default modifiers.
	pub fn new(value: impl Into<BindingValue>) -> Self {
		Self {
			value: value.into(),
			modifiers: BindingModifiers::default(),
		}
	}

	/// Enables the capture modifier.
	pub fn capture(mut self) -> Self {
		self.modifiers.capture = true;
		self
	}

	/// Enables the legacy-bus modifier.
	pub fn bus(mut self) -> Self {
		self.modifiers.bus = true;
		self
	}
}

/// A directive watching one event kind (or, without an implied event name,
/// the generic kind).
#[derive(Clone, Debug)]
pub struct OutsideDirective {
	event_name: Option<String>,
	directive_name: String,
}

impl OutsideDirective {
	/// Creates a directive for `event_name`, `descriptor`, or both.
	///
	/// The descriptor defaults to the event name and yields the directive
	/// name `"<descriptor>-outside"`. Supplying neither is a setup-time
	/// programming mistake and panics.
	pub fn new(event_name: Option<&str>, descriptor: Option<&str>) -> Self {
		let descriptor = descriptor.or(event_name).unwrap_or_else(|| {
			panic!("{}: a directive requires an event name or a descriptor", crate::listener::TAG)
		});
		Self {
			event_name: event_name.map(str::to_string),
			directive_name: format!("{}-outside", descriptor.to_lowercase()),
		}
	}

	/// The platform event this directive listens for, if one is implied.
	pub fn event_name(&self) -> Option<&str> {
		self.event_name.as_deref()
	}

	/// The directive's registration name.
	pub fn directive_name(&self) -> &str {
		&self.directive_name
	}

	/// Dispatches a lifecycle hook invocation onto the matching adapter.
	pub fn run(&self, phase: LifecyclePhase, element: &Element, binding: Option<&OutsideBinding>) {
		match phase {
			LifecyclePhase::Mount => {
				if let Some(binding) = binding {
					self.mounted(element, binding);
				}
			}
			LifecyclePhase::Unmount => self.unmounted(element, binding),
		}
	}

	/// Mount hook: decode the binding, attach, and store the teardown.
	pub fn mounted(&self, element: &Element, binding: &OutsideBinding) {
		let (handler, spec_options) = match &binding.value {
			BindingValue::Handler(handler) => (handler.clone(), None),
			BindingValue::Spec(spec) => (spec.handler.clone(), spec.options.clone()),
		};
		let mut options = spec_options.unwrap_or_default();
		options.capture |= binding.modifiers.capture;
		options.bus |= binding.modifiers.bus;

		let name = self.resolved_event_name(Some(binding));
		let key = self.registry_key(name.as_deref());
		let teardown = outside_listener(name.as_deref(), element, Some(handler), options);
		registry::store(element, &key, teardown);
	}

	/// Unmount hook: invoke the stored teardown, if any.
	///
	/// Absence of a teardown (a mount that failed validation) is not an
	/// error.
	pub fn unmounted(&self, element: &Element, binding: Option<&OutsideBinding>) {
		let name = self.resolved_event_name(binding);
		let key = self.registry_key(name.as_deref());
		if let Some(mut teardown) = registry::take(element, &key) {
			teardown.call();
		} else {
			debug_log!("no teardown stored under {key}");
		}
	}

	/// Explicit spec name, else options name, else the implied event name.
	fn resolved_event_name(&self, binding: Option<&OutsideBinding>) -> Option<String> {
		let from_binding = binding.and_then(|binding| match &binding.value {
			BindingValue::Handler(_) => None,
			BindingValue::Spec(spec) => spec
				.name
				.clone()
				.or_else(|| spec.options.as_ref().and_then(|options| options.name.clone())),
		});
		from_binding.or_else(|| self.event_name.clone())
	}

	fn registry_key(&self, event_name: Option<&str>) -> String {
		match &self.event_name {
			Some(_) => self.directive_name.clone(),
			// The generic directive keys per resolved event so distinct
			// bindings on one element do not clobber each other.
			None => format!("{}:{}", self.directive_name, event_name.unwrap_or_default()),
		}
	}
}

mod registry {
	use std::cell::RefCell;

	use super::*;

	struct Entry {
		element: Element,
		key: String,
		teardown: Teardown,
	}

	thread_local! {
		static TEARDOWNS: RefCell<Vec<Entry>> = const { RefCell::new(Vec::new()) };
	}

	/// Stores `teardown` under `(element, key)`, detaching whatever was
	/// there before.
	pub(super) fn store(element: &Element, key: &str, teardown: Option<Teardown>) {
		if let Some(mut previous) = take(element, key) {
			previous.call();
		}
		if let Some(teardown) = teardown {
			TEARDOWNS.with(|slot| {
				slot.borrow_mut().push(Entry {
					element: element.clone(),
					key: key.to_string(),
					teardown,
				});
			});
		}
	}

	/// Removes and returns the teardown stored under `(element, key)`.
	pub(super) fn take(element: &Element, key: &str) -> Option<Teardown> {
		TEARDOWNS.with(|slot| {
			let mut entries = slot.borrow_mut();
			let index = entries
				.iter()
				.position(|entry| entry.element.ptr_eq(element) && entry.key == key)?;
			Some(entries.swap_remove(index).teardown)
		})
	}

	#[cfg(test)]
	pub(super) fn len() -> usize {
		TEARDOWNS.with(|slot| slot.borrow().len())
	}
}
