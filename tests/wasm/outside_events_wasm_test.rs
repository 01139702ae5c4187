//! Browser smoke tests for the outside-listener pipeline.
//!
//! The native suites cover the detection logic against the in-memory
//! document; this suite checks the web-sys wiring against a real one.
//!
//! Run with: `wasm-pack test --chrome --headless`

#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use outside_events::{Element, OutsideOptions, on_click_outside};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

fn mounted_element(tag: &str) -> Element {
	let document = web_sys::window().unwrap().document().unwrap();
	let raw = document.create_element(tag).unwrap();
	document.body().unwrap().append_child(&raw).unwrap();
	Element::new(raw)
}

fn bubbling_click() -> web_sys::Event {
	let init = web_sys::EventInit::new();
	init.set_bubbles(true);
	web_sys::Event::new_with_event_init_dict("click", &init).unwrap()
}

#[wasm_bindgen_test]
fn sibling_clicks_are_outside_and_own_clicks_are_not() {
	let watched = mounted_element("div");
	let sibling = mounted_element("button");
	let count = Rc::new(Cell::new(0));

	let mut teardown = on_click_outside(
		&watched,
		{
			let count = count.clone();
			move |_, _, _| count.set(count.get() + 1)
		},
		OutsideOptions::default(),
	)
	.expect("registered");

	sibling.raw().dispatch_event(&bubbling_click()).unwrap();
	assert_eq!(count.get(), 1);

	watched.raw().dispatch_event(&bubbling_click()).unwrap();
	assert_eq!(count.get(), 1);

	teardown.call();
	sibling.raw().dispatch_event(&bubbling_click()).unwrap();
	assert_eq!(count.get(), 1);
}

#[wasm_bindgen_test]
fn descendant_clicks_are_inside() {
	let watched = mounted_element("div");
	let inner = {
		let document = web_sys::window().unwrap().document().unwrap();
		let raw = document.create_element("span").unwrap();
		watched.raw().append_child(&raw).unwrap();
		Element::new(raw)
	};
	let outsider = mounted_element("p");
	let count = Rc::new(Cell::new(0));

	let mut teardown = on_click_outside(
		&watched,
		{
			let count = count.clone();
			move |_, _, _| count.set(count.get() + 1)
		},
		OutsideOptions::default(),
	)
	.expect("registered");

	inner.raw().dispatch_event(&bubbling_click()).unwrap();
	assert_eq!(count.get(), 0);

	outsider.raw().dispatch_event(&bubbling_click()).unwrap();
	assert_eq!(count.get(), 1);

	teardown.call();
}
