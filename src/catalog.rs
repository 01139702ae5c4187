//! Event catalog and per-kind API.
//!
//! A fixed table maps each short descriptor to the platform event actually
//! observed. Most entries are one-to-one; `focus` and `blur` are not: the
//! native `focus`/`blur` events do not bubble and can never reach a
//! document-level listener, so the catalog observes the bubbling `focusin`
//! and `focusout` instead. That substitution is load bearing; do not
//! "simplify" it away.
//!
//! Everything else here is mechanical fan-out over the listener factory and
//! the directive adapter, generated per kind.

use crate::dom::{Element, Event};
use crate::directive::OutsideDirective;
use crate::listener::{Extras, OutsideHandler, OutsideOptions, Teardown, outside_listener};
use crate::resolve::ElementRef;

/// The catalog: `(platform event, descriptor)` per supported kind.
pub const EVENT_CATALOG: &[(&str, &str)] = &[
	("click", "click"),
	("dblclick", "dblclick"),
	// focus/blur do not bubble; observe their bubbling counterparts.
	("focusin", "focus"),
	("focusout", "blur"),
	("change", "change"),
	("select", "select"),
	("submit", "submit"),
	("keydown", "keydown"),
	("keypress", "keypress"),
	("keyup", "keyup"),
	("mousedown", "mousedown"),
	("mousemove", "mousemove"),
	("mouseover", "mouseover"),
	("mouseout", "mouseout"),
	("mouseup", "mouseup"),
];

macro_rules! outside_event_kind {
	($event:literal, $descriptor:literal, $event_const:ident, $name_const:ident, $on_fn:ident, $directive_fn:ident) => {
		#[doc = concat!("Platform event observed by the `", $descriptor, "` kind.")]
		pub const $event_const: &str = $event;

		#[doc = concat!("Directive name of the `", $descriptor, "` kind.")]
		pub const $name_const: &str = concat!($descriptor, "-outside");

		#[doc = concat!(
			"Invokes `handler` whenever a `", $event,
			"` event fires outside the element `target` resolves to."
		)]
		///
		/// Returns the teardown for the registration, or `None` when there is
		/// no document or the registration is misconfigured (logged).
		pub fn $on_fn<T, F>(target: T, handler: F, options: OutsideOptions) -> Option<Teardown>
		where
			T: Into<ElementRef>,
			F: Fn(&Event, &Element, Option<&Extras>) + 'static,
		{
			outside_listener(
				Some($event_const),
				target,
				Some(OutsideHandler::new(handler)),
				options,
			)
		}

		#[doc = concat!("Directive adapter for the `", $descriptor, "` kind.")]
		pub fn $directive_fn() -> OutsideDirective {
			OutsideDirective::new(Some($event), Some($descriptor))
		}
	};
}

outside_event_kind!("click", "click", CLICK_OUTSIDE_EVENT_NAME, CLICK_OUTSIDE_NAME, on_click_outside, click_outside_directive);
outside_event_kind!("dblclick", "dblclick", DBLCLICK_OUTSIDE_EVENT_NAME, DBLCLICK_OUTSIDE_NAME, on_dblclick_outside, dblclick_outside_directive);
outside_event_kind!("focusin", "focus", FOCUS_OUTSIDE_EVENT_NAME, FOCUS_OUTSIDE_NAME, on_focus_outside, focus_outside_directive);
outside_event_kind!("focusout", "blur", BLUR_OUTSIDE_EVENT_NAME, BLUR_OUTSIDE_NAME, on_blur_outside, blur_outside_directive);
outside_event_kind!("change", "change", CHANGE_OUTSIDE_EVENT_NAME, CHANGE_OUTSIDE_NAME, on_change_outside, change_outside_directive);
outside_event_kind!("select", "select", SELECT_OUTSIDE_EVENT_NAME, SELECT_OUTSIDE_NAME, on_select_outside, select_outside_directive);
outside_event_kind!("submit", "submit", SUBMIT_OUTSIDE_EVENT_NAME, SUBMIT_OUTSIDE_NAME, on_submit_outside, submit_outside_directive);
outside_event_kind!("keydown", "keydown", KEYDOWN_OUTSIDE_EVENT_NAME, KEYDOWN_OUTSIDE_NAME, on_keydown_outside, keydown_outside_directive);
outside_event_kind!("keypress", "keypress", KEYPRESS_OUTSIDE_EVENT_NAME, KEYPRESS_OUTSIDE_NAME, on_keypress_outside, keypress_outside_directive);
outside_event_kind!("keyup", "keyup", KEYUP_OUTSIDE_EVENT_NAME, KEYUP_OUTSIDE_NAME, on_keyup_outside, keyup_outside_directive);
outside_event_kind!("mousedown", "mousedown", MOUSEDOWN_OUTSIDE_EVENT_NAME, MOUSEDOWN_OUTSIDE_NAME, on_mousedown_outside, mousedown_outside_directive);
outside_event_kind!("mousemove", "mousemove", MOUSEMOVE_OUTSIDE_EVENT_NAME, MOUSEMOVE_OUTSIDE_NAME, on_mousemove_outside, mousemove_outside_directive);
outside_event_kind!("mouseover", "mouseover", MOUSEOVER_OUTSIDE_EVENT_NAME, MOUSEOVER_OUTSIDE_NAME, on_mouseover_outside, mouseover_outside_directive);
outside_event_kind!("mouseout", "mouseout", MOUSEOUT_OUTSIDE_EVENT_NAME, MOUSEOUT_OUTSIDE_NAME, on_mouseout_outside, mouseout_outside_directive);
outside_event_kind!("mouseup", "mouseup", MOUSEUP_OUTSIDE_EVENT_NAME, MOUSEUP_OUTSIDE_NAME, on_mouseup_outside, mouseup_outside_directive);

/// Directive name of the generic kind.
pub const EVENT_OUTSIDE_NAME: &str = "event-outside";

/// Invokes `handler` whenever an event named `name` fires outside the
/// element `target` resolves to.
///
/// This is the explicit-name form used by the generic kind; the other kinds
/// imply their event name.
pub fn on_event_outside<T, F>(
	name: &str,
	target: T,
	handler: F,
	options: OutsideOptions,
) -> Option<Teardown>
where
	T: Into<ElementRef>,
	F: Fn(&Event, &Element, Option<&Extras>) + 'static,
{
	outside_listener(
		Some(name),
		target,
		Some(OutsideHandler::new(handler)),
		options,
	)
}

/// Directive adapter for the generic kind.
///
/// The binding value must carry a resolvable event name; a generic binding
/// without one is rejected with a logged diagnostic at mount time.
pub fn event_outside_directive() -> OutsideDirective {
	OutsideDirective::new(None, Some("event"))
}
