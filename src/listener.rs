//! Outside-listener factory.
//!
//! The one real routine in this crate: given an event name, a target
//! reference, a handler and options, register a document-level listener that
//! invokes the handler only for events originating **outside** the target
//! element, and hand back a teardown that removes exactly that registration.
//!
//! ## Event-time resolution
//!
//! The target is resolved on every event delivery, never at registration
//! time. A conditionally rendered component can swap the watched element
//! between mount and the moment an outside event fires; re-resolving keeps
//! the containment test honest.
//!
//! ## Failure behavior
//!
//! Configuration mistakes (blank event name, missing handler, bus dispatch
//! without an installed bus) are logged and yield `None`; a misconfigured
//! registration must not crash the surrounding application. A missing
//! document (server-side rendering) is not even worth a log line: outside
//! events are a client-only concept.

use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::bus::{self, BusHandle};
use crate::dom::{self, Document, Element, Event, EventHandle};
use crate::error_log;
use crate::resolve::ElementRef;

/// Prefix for every diagnostic this crate logs.
pub(crate) const TAG: &str = "[outside-events]";

/// Opaque payload forwarded verbatim to the handler on every invocation.
pub type Extras = HashMap<String, serde_json::Value>;

/// A cloneable outside-event handler.
///
/// Wraps the user callback behind a shared pointer so directive bindings and
/// registrations can hold it without lifetime gymnastics. Invoked as
/// `handler(event, resolved_element, extras)`.
#[derive(Clone)]
pub struct OutsideHandler {
	inner: Rc<dyn Fn(&Event, &Element, Option<&Extras>) + 'static>,
}

impl OutsideHandler {
	/// Wraps a callback.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&Event, &Element, Option<&Extras>) + 'static,
	{
		Self { inner: Rc::new(f) }
	}

	/// Invokes the callback.
	pub fn call(&self, event: &Event, element: &Element, extras: Option<&Extras>) {
		(self.inner)(event, element, extras);
	}
}

impl std::fmt::Debug for OutsideHandler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("OutsideHandler")
	}
}

/// Options for one outside-event registration.
///
/// # Example
///
/// ```ignore
/// let options = OutsideOptions::default()
///     .capture(true)
///     .extras(HashMap::from([("menu".into(), json!("main"))]));
/// on_click_outside(&element, close_menu, options);
/// ```
#[derive(Clone, Debug, Default)]
pub struct OutsideOptions {
	/// Event-name override; required for the generic kind, ignored otherwise
	/// unless no name is supplied at all.
	pub name: Option<String>,
	/// Listen in the capture phase.
	pub capture: bool,
	/// Route through the installed legacy event bus instead of the DOM.
	pub bus: bool,
	/// Forwarded unchanged to the handler on every invocation.
	pub extras: Option<Extras>,
}

impl OutsideOptions {
	/// Sets the event-name override.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Sets capture-phase listening.
	pub fn capture(mut self, capture: bool) -> Self {
		self.capture = capture;
		self
	}

	/// Sets legacy-bus dispatch.
	pub fn bus(mut self, bus: bool) -> Self {
		self.bus = bus;
		self
	}

	/// Sets the opaque handler payload.
	pub fn extras(mut self, extras: Extras) -> Self {
		self.extras = Some(extras);
		self
	}
}

/// A configuration mistake in an outside-event registration.
///
/// Logged at the factory boundary and converted into an aborted
/// registration; never propagated as a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	/// Neither the call site nor the options supplied an event name.
	#[error("no event name was provided")]
	MissingEventName,
	/// No handler was supplied.
	#[error("no event handler was provided")]
	MissingHandler,
	/// Bus dispatch was requested while no bus is installed.
	#[error("bus dispatch was requested but no event bus is installed")]
	BusMissing,
}

enum TeardownKind {
	Dom(EventHandle),
	Bus(BusHandle),
}

/// Removes the registration it was created for.
///
/// Teardown is matched to its registration exactly (same event name, same
/// capture flag, same delivery mode) so the underlying subscription cannot
/// be left dangling. Calling [`Teardown::call`] a second time is a no-op.
/// Dropping an uncalled teardown leaves the listener attached.
pub struct Teardown {
	inner: Option<TeardownKind>,
}

impl Teardown {
	fn dom(handle: EventHandle) -> Self {
		Self {
			inner: Some(TeardownKind::Dom(handle)),
		}
	}

	fn bus(handle: BusHandle) -> Self {
		Self {
			inner: Some(TeardownKind::Bus(handle)),
		}
	}

	/// Unregisters the listener; subsequent calls do nothing.
	pub fn call(&mut self) {
		match self.inner.take() {
			Some(TeardownKind::Dom(mut handle)) => handle.remove(),
			Some(TeardownKind::Bus(mut handle)) => handle.off(),
			None => {}
		}
	}

	/// Whether the registration is still in place.
	pub fn is_active(&self) -> bool {
		self.inner.is_some()
	}
}

impl std::fmt::Debug for Teardown {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mode = match &self.inner {
			Some(TeardownKind::Dom(_)) => "dom",
			Some(TeardownKind::Bus(_)) => "bus",
			None => "spent",
		};
		f.debug_struct("Teardown").field("mode", &mode).finish()
	}
}

/// Registers an outside-event listener.
///
/// The event name may come from `name` or, failing that, from
/// `options.name`. Returns `None` without attaching anything when the
/// environment has no document (silently) or when the registration is
/// misconfigured (with a logged diagnostic).
///
/// # Example
///
/// ```ignore
/// let teardown = outside_listener(
///     Some("click"),
///     &dropdown,
///     Some(OutsideHandler::new(|_event, _el, _extras| close())),
///     OutsideOptions::default(),
/// );
/// ```
pub fn outside_listener(
	name: Option<&str>,
	target: impl Into<ElementRef>,
	handler: Option<OutsideHandler>,
	options: OutsideOptions,
) -> Option<Teardown> {
	let document = dom::document()?;
	match try_attach(&document, name, target.into(), handler, options) {
		Ok(teardown) => Some(teardown),
		Err(error) => {
			error_log!("{TAG}: {error}");
			None
		}
	}
}

fn try_attach(
	document: &Document,
	name: Option<&str>,
	target: ElementRef,
	handler: Option<OutsideHandler>,
	options: OutsideOptions,
) -> Result<Teardown, ConfigError> {
	let name = match name.or(options.name.as_deref()) {
		Some(name) if !name.trim().is_empty() => name.to_string(),
		_ => return Err(ConfigError::MissingEventName),
	};
	let handler = handler.ok_or(ConfigError::MissingHandler)?;
	let bus = if options.bus {
		Some(bus::installed_bus().ok_or(ConfigError::BusMissing)?)
	} else {
		None
	};

	let extras = options.extras;
	let listener = move |event: &Event| {
		// Re-resolve on every delivery; the watched element may have been
		// swapped since registration.
		let Some(element) = target.resolve() else {
			return;
		};
		if event.is_target(&element) {
			return;
		}
		if event.composed() {
			// Composed events carry the full shadow-crossing path; the plain
			// containment check cannot see into it and is not consulted.
			if event.path_contains(&element) {
				return;
			}
		} else if event.target_within(&element) {
			return;
		}
		handler.call(event, &element, extras.as_ref());
	};

	Ok(match bus {
		Some(bus) => Teardown::bus(bus.on(&name, listener)),
		None => Teardown::dom(document.add_listener(&name, options.capture, listener)),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn config_errors_render_their_cause() {
		assert_eq!(
			ConfigError::MissingEventName.to_string(),
			"no event name was provided"
		);
		assert_eq!(
			ConfigError::MissingHandler.to_string(),
			"no event handler was provided"
		);
		assert!(ConfigError::BusMissing.to_string().contains("no event bus"));
	}

	#[test]
	fn options_builder_sets_every_field() {
		let options = OutsideOptions::default()
			.name("click")
			.capture(true)
			.bus(true)
			.extras(Extras::from([(
				"key".to_string(),
				serde_json::Value::from(7),
			)]));

		assert_eq!(options.name.as_deref(), Some("click"));
		assert!(options.capture);
		assert!(options.bus);
		assert_eq!(
			options.extras.unwrap().get("key"),
			Some(&serde_json::Value::from(7))
		);
	}
}
