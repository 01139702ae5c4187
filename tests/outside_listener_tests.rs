//! Outside-listener factory integration tests
//!
//! Success Criteria:
//! 1. Events originating outside the watched element invoke the handler
//!    exactly once, with the event, the resolved element and the extras
//! 2. Events originating on or inside the watched element are ignored,
//!    including through shadow-DOM composed paths
//! 3. Teardown removes exactly the registration it was created for and is
//!    safe to call twice
//! 4. Targets are re-resolved at event time, not registration time
//! 5. Configuration mistakes abort with a diagnostic instead of panicking

#![cfg(not(target_arch = "wasm32"))]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use outside_events::{
	Element, ElementCell, ElementRef, Event, EventBus, Extras, OutsideHandler, OutsideOptions,
	install_bus, install_document, on_click_outside, on_event_outside, outside_listener,
	reset_bus, reset_document,
};
use serial_test::serial;

/// Builds `container > (watched > inner, sibling)`.
fn fixture() -> (
	Element,
	Element,
	Element,
	Element,
) {
	let container = Element::new("div");
	let watched = Element::new("div");
	let inner = Element::new("span");
	let sibling = Element::new("button");
	container.append_child(&watched);
	container.append_child(&sibling);
	watched.append_child(&inner);
	(container, watched, inner, sibling)
}

fn counter() -> (Rc<Cell<u32>>, impl Fn(&Event, &Element, Option<&Extras>) + 'static) {
	let count = Rc::new(Cell::new(0));
	let handler = {
		let count = count.clone();
		move |_: &Event, _: &Element, _: Option<&Extras>| {
			count.set(count.get() + 1)
		}
	};
	(count, handler)
}

#[test]
#[serial]
fn outside_event_invokes_the_handler_exactly_once() {
	reset_document();
	let document = install_document();
	let (_container, watched, _inner, sibling) = fixture();
	let (count, handler) = counter();

	let _teardown = on_click_outside(&watched, handler, OutsideOptions::default());

	document.dispatch(&Event::new("click").with_target(&sibling));
	assert_eq!(count.get(), 1);

	document.dispatch(&Event::new("click").with_target(&sibling));
	assert_eq!(count.get(), 2);
	reset_document();
}

#[test]
#[serial]
fn handler_receives_the_resolved_element_and_extras() {
	reset_document();
	let document = install_document();
	let (_container, watched, _inner, sibling) = fixture();

	let seen: Rc<RefCell<Vec<(bool, Option<Extras>)>>> = Rc::new(RefCell::new(Vec::new()));
	let extras = Extras::from([("menu".to_string(), serde_json::Value::from("main"))]);
	let _teardown = on_click_outside(
		&watched,
		{
			let seen = seen.clone();
			let watched = watched.clone();
			move |_event, element, extras| {
				seen.borrow_mut()
					.push((element.ptr_eq(&watched), extras.cloned()));
			}
		},
		OutsideOptions::default().extras(extras.clone()),
	);

	document.dispatch(&Event::new("click").with_target(&sibling));

	let seen = seen.borrow();
	assert_eq!(seen.len(), 1);
	let (is_watched, forwarded) = &seen[0];
	assert!(is_watched);
	assert_eq!(forwarded.as_ref(), Some(&extras));
	reset_document();
}

#[test]
#[serial]
fn events_on_the_element_itself_are_ignored() {
	reset_document();
	let document = install_document();
	let (_container, watched, _inner, _sibling) = fixture();
	let (count, handler) = counter();

	let _teardown = on_click_outside(&watched, handler, OutsideOptions::default());
	document.dispatch(&Event::new("click").with_target(&watched));

	assert_eq!(count.get(), 0);
	reset_document();
}

#[test]
#[serial]
fn events_inside_the_element_are_ignored() {
	reset_document();
	let document = install_document();
	let (_container, watched, inner, _sibling) = fixture();
	let (count, handler) = counter();

	let _teardown = on_click_outside(&watched, handler, OutsideOptions::default());
	document.dispatch(&Event::new("click").with_target(&inner));

	assert_eq!(count.get(), 0);
	reset_document();
}

#[test]
#[serial]
fn composed_events_are_filtered_by_their_path() {
	reset_document();
	let document = install_document();
	let (container, watched, _inner, sibling) = fixture();
	let (count, handler) = counter();

	let _teardown = on_click_outside(&watched, handler, OutsideOptions::default());

	// A shadow descendant: the composed path climbs through the watched
	// element, so the event is not outside.
	let shadow_child = Element::new("slot");
	document.dispatch(
		&Event::new("click")
			.with_target(&shadow_child)
			.with_composed_path(vec![shadow_child.clone(), watched.clone(), container.clone()]),
	);
	assert_eq!(count.get(), 0);

	// A composed event whose path never crosses the watched element is
	// outside.
	document.dispatch(
		&Event::new("click")
			.with_target(&sibling)
			.with_composed_path(vec![sibling.clone(), container.clone()]),
	);
	assert_eq!(count.get(), 1);
	reset_document();
}

#[test]
#[serial]
fn events_without_a_target_count_as_outside() {
	reset_document();
	let document = install_document();
	let (_container, watched, _inner, _sibling) = fixture();
	let (count, handler) = counter();

	let _teardown = on_click_outside(&watched, handler, OutsideOptions::default());
	document.dispatch(&Event::new("click"));

	assert_eq!(count.get(), 1);
	reset_document();
}

#[test]
#[serial]
fn teardown_removes_the_subscription_and_is_safe_to_call_twice() {
	reset_document();
	let document = install_document();
	let (_container, watched, _inner, sibling) = fixture();
	let (count, handler) = counter();

	let mut teardown =
		on_click_outside(&watched, handler, OutsideOptions::default()).expect("registered");
	assert!(teardown.is_active());

	document.dispatch(&Event::new("click").with_target(&sibling));
	assert_eq!(count.get(), 1);

	teardown.call();
	assert!(!teardown.is_active());
	document.dispatch(&Event::new("click").with_target(&sibling));
	assert_eq!(count.get(), 1);
	assert_eq!(document.listener_count(), 0);

	// Second call must not panic.
	teardown.call();
	reset_document();
}

#[test]
#[serial]
fn capture_registrations_tear_down_cleanly() {
	reset_document();
	let document = install_document();
	let (_container, watched, _inner, sibling) = fixture();
	let (count, handler) = counter();

	let mut teardown =
		on_click_outside(&watched, handler, OutsideOptions::default().capture(true))
			.expect("registered");

	document.dispatch(&Event::new("click").with_target(&sibling));
	assert_eq!(count.get(), 1);

	// Removal matches the capture flag used at registration.
	teardown.call();
	assert_eq!(document.listener_count(), 0);
	reset_document();
}

#[test]
#[serial]
fn swapped_cell_targets_are_re_resolved_at_event_time() {
	reset_document();
	let document = install_document();
	let (_container, watched, _inner, sibling) = fixture();
	let (count, handler) = counter();

	let cell = ElementCell::new(watched.clone());
	let _teardown = on_click_outside(&cell, handler, OutsideOptions::default());

	// Outside the original element.
	document.dispatch(&Event::new("click").with_target(&sibling));
	assert_eq!(count.get(), 1);

	// After the swap the same origin is the watched element itself.
	cell.set(Some(sibling.clone()));
	document.dispatch(&Event::new("click").with_target(&sibling));
	assert_eq!(count.get(), 1);

	// An emptied cell suppresses delivery entirely.
	cell.set(None);
	document.dispatch(&Event::new("click").with_target(&sibling));
	assert_eq!(count.get(), 1);
	reset_document();
}

#[test]
#[serial]
fn generic_registration_by_name_matches_the_named_scenario() {
	reset_document();
	let document = install_document();
	let (_container, a, _inner, b) = fixture();

	let seen: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));
	let _teardown = on_event_outside(
		"click",
		&a,
		{
			let seen = seen.clone();
			let a = a.clone();
			move |_event, element, extras| {
				seen.borrow_mut()
					.push(element.ptr_eq(&a) && extras.is_none());
			}
		},
		OutsideOptions::default(),
	);

	document.dispatch(&Event::new("click").with_target(&b));
	assert_eq!(*seen.borrow(), vec![true]);
	reset_document();
}

#[test]
#[serial]
fn missing_environment_is_a_silent_no_op() {
	reset_document();
	let (_container, watched, _inner, _sibling) = fixture();
	let (_count, handler) = counter();

	let teardown = on_click_outside(&watched, handler, OutsideOptions::default());
	assert!(teardown.is_none());
}

#[test]
#[serial]
fn blank_event_names_abort_with_no_listener_attached() {
	reset_document();
	let document = install_document();
	let (_container, watched, _inner, _sibling) = fixture();

	let teardown = outside_listener(
		Some("   "),
		&watched,
		Some(OutsideHandler::new(|_, _, _| {})),
		OutsideOptions::default(),
	);
	assert!(teardown.is_none());

	let teardown = outside_listener(
		None,
		&watched,
		Some(OutsideHandler::new(|_, _, _| {})),
		OutsideOptions::default(),
	);
	assert!(teardown.is_none());
	assert_eq!(document.listener_count(), 0);
	reset_document();
}

#[test]
#[serial]
fn missing_handlers_abort_with_no_listener_attached() {
	reset_document();
	let document = install_document();
	let (_container, watched, _inner, _sibling) = fixture();

	let teardown = outside_listener(Some("click"), &watched, None, OutsideOptions::default());

	assert!(teardown.is_none());
	assert_eq!(document.listener_count(), 0);
	reset_document();
}

#[test]
#[serial]
fn options_name_supplies_the_event_name_when_the_call_site_has_none() {
	reset_document();
	let document = install_document();
	let (_container, watched, _inner, sibling) = fixture();
	let (count, handler) = counter();

	let _teardown = outside_listener(
		None,
		&watched,
		Some(OutsideHandler::new(handler)),
		OutsideOptions::default().name("keydown"),
	);

	document.dispatch(&Event::new("keydown").with_target(&sibling));
	assert_eq!(count.get(), 1);
	reset_document();
}

#[test]
#[serial]
fn bus_mode_without_an_installed_bus_aborts() {
	reset_document();
	reset_bus();
	let document = install_document();
	let (_container, watched, _inner, _sibling) = fixture();
	let (count, handler) = counter();

	let teardown = on_click_outside(&watched, handler, OutsideOptions::default().bus(true));

	assert!(teardown.is_none());
	assert_eq!(document.listener_count(), 0);
	assert_eq!(count.get(), 0);
	reset_document();
}

#[test]
#[serial]
fn bus_mode_routes_through_the_installed_bus() {
	reset_document();
	reset_bus();
	let document = install_document();
	let bus = EventBus::new();
	install_bus(&bus);
	let (_container, watched, _inner, sibling) = fixture();
	let (count, handler) = counter();

	let mut teardown = on_click_outside(&watched, handler, OutsideOptions::default().bus(true))
		.expect("registered");

	// The registration lives on the bus, not the document.
	assert_eq!(document.listener_count(), 0);
	assert_eq!(bus.listener_count(), 1);

	bus.emit(&Event::new("click").with_target(&sibling));
	assert_eq!(count.get(), 1);
	bus.emit(&Event::new("click").with_target(&watched));
	assert_eq!(count.get(), 1);

	teardown.call();
	assert_eq!(bus.listener_count(), 0);
	bus.emit(&Event::new("click").with_target(&sibling));
	assert_eq!(count.get(), 1);

	reset_bus();
	reset_document();
}

#[test]
#[serial]
fn getter_targets_resolve_on_every_event() {
	reset_document();
	let document = install_document();
	let (_container, watched, _inner, sibling) = fixture();
	let (count, handler) = counter();

	let active = Rc::new(Cell::new(true));
	let target = ElementRef::from_getter({
		let active = active.clone();
		let watched = watched.clone();
		move || active.get().then(|| watched.clone())
	});
	let _teardown = outside_listener(
		Some("click"),
		target,
		Some(OutsideHandler::new(handler)),
		OutsideOptions::default(),
	);

	document.dispatch(&Event::new("click").with_target(&sibling));
	assert_eq!(count.get(), 1);

	active.set(false);
	document.dispatch(&Event::new("click").with_target(&sibling));
	assert_eq!(count.get(), 1);
	reset_document();
}
