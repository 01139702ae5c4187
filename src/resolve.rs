//! Element reference resolution.
//!
//! Targets handed to the listener factory are not necessarily plain elements:
//! they may be produced lazily by a closure, live in a shared [`ElementCell`]
//! that gets swapped as the UI re-renders, or be a component instance whose
//! root element is the thing to watch. [`ElementRef`] captures those shapes
//! and [`ElementRef::resolve`] projects them down to an element.
//!
//! Resolution runs on **every** event delivery, never at registration time:
//! the referenced element can change between mount and the moment an outside
//! event actually fires, and re-resolving avoids holding a stale handle.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::Element;

/// A component instance whose root element can be watched.
///
/// Component-shaped targets are resolved through this trait on every event,
/// so a component that re-renders to a new root is picked up automatically.
pub trait ComponentHandle {
	/// The component's current root element, if it is mounted.
	fn root_element(&self) -> Option<Element>;
}

/// A shared, swappable element slot.
///
/// Clones share the same slot; swapping the content through any clone is
/// visible to every holder. This is the deferred-reference shape used when an
/// element is conditionally rendered.
///
/// # Example
///
/// ```ignore
/// let cell = ElementCell::empty();
/// let teardown = on_click_outside(cell.clone(), handler, OutsideOptions::default());
/// // later, once the element exists:
/// cell.set(Some(element));
/// ```
#[derive(Clone, Default)]
pub struct ElementCell {
	inner: Rc<RefCell<Option<Element>>>,
}

impl ElementCell {
	/// Creates a cell holding `element`.
	pub fn new(element: Element) -> Self {
		Self {
			inner: Rc::new(RefCell::new(Some(element))),
		}
	}

	/// Creates an empty cell.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Replaces the cell's content.
	pub fn set(&self, element: Option<Element>) {
		*self.inner.borrow_mut() = element;
	}

	/// Returns a clone of the cell's current content.
	pub fn get(&self) -> Option<Element> {
		self.inner.borrow().clone()
	}
}

impl std::fmt::Debug for ElementCell {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ElementCell")
			.field("occupied", &self.inner.borrow().is_some())
			.finish()
	}
}

/// A possibly-deferred reference to a watched element.
#[derive(Clone)]
pub enum ElementRef {
	/// A concrete element handle.
	Element(Element),
	/// A shared slot whose content may be swapped after registration.
	Cell(ElementCell),
	/// A zero-argument accessor evaluated on every event.
	Getter(Rc<dyn Fn() -> Option<Element>>),
	/// A component instance; its root element is watched.
	Component(Rc<dyn ComponentHandle>),
}

impl ElementRef {
	/// Wraps a lazy accessor.
	pub fn from_getter<F>(getter: F) -> Self
	where
		F: Fn() -> Option<Element> + 'static,
	{
		Self::Getter(Rc::new(getter))
	}

	/// Wraps a component instance.
	pub fn from_component<C>(component: C) -> Self
	where
		C: ComponentHandle + 'static,
	{
		Self::Component(Rc::new(component))
	}

	/// Projects the reference down to the current element.
	///
	/// Pure and cheap; absent content resolves to `None` rather than failing.
	pub fn resolve(&self) -> Option<Element> {
		match self {
			Self::Element(element) => Some(element.clone()),
			Self::Cell(cell) => cell.get(),
			Self::Getter(getter) => getter(),
			Self::Component(component) => component.root_element(),
		}
	}
}

impl std::fmt::Debug for ElementRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let variant = match self {
			Self::Element(_) => "Element",
			Self::Cell(_) => "Cell",
			Self::Getter(_) => "Getter",
			Self::Component(_) => "Component",
		};
		write!(f, "ElementRef::{variant}")
	}
}

impl From<Element> for ElementRef {
	fn from(element: Element) -> Self {
		Self::Element(element)
	}
}

impl From<&Element> for ElementRef {
	fn from(element: &Element) -> Self {
		Self::Element(element.clone())
	}
}

impl From<ElementCell> for ElementRef {
	fn from(cell: ElementCell) -> Self {
		Self::Cell(cell)
	}
}

impl From<&ElementCell> for ElementRef {
	fn from(cell: &ElementCell) -> Self {
		Self::Cell(cell.clone())
	}
}

impl From<Rc<dyn ComponentHandle>> for ElementRef {
	fn from(component: Rc<dyn ComponentHandle>) -> Self {
		Self::Component(component)
	}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;

	struct FixedRoot {
		root: Option<Element>,
	}

	impl ComponentHandle for FixedRoot {
		fn root_element(&self) -> Option<Element> {
			self.root.clone()
		}
	}

	#[test]
	fn concrete_element_resolves_to_itself() {
		let element = Element::new("div");
		let reference = ElementRef::from(&element);
		assert!(reference.resolve().unwrap().ptr_eq(&element));
	}

	#[test]
	fn empty_cell_resolves_to_none() {
		let reference = ElementRef::from(ElementCell::empty());
		assert!(reference.resolve().is_none());
	}

	#[test]
	fn cell_swap_is_visible_through_the_reference() {
		let first = Element::new("div");
		let second = Element::new("aside");
		let cell = ElementCell::new(first.clone());
		let reference = ElementRef::from(&cell);

		assert!(reference.resolve().unwrap().ptr_eq(&first));
		cell.set(Some(second.clone()));
		assert!(reference.resolve().unwrap().ptr_eq(&second));
		cell.set(None);
		assert!(reference.resolve().is_none());
	}

	#[test]
	fn getter_is_invoked_on_every_resolve() {
		let element = Element::new("div");
		let reference = ElementRef::from_getter({
			let element = element.clone();
			move || Some(element.clone())
		});
		assert!(reference.resolve().unwrap().ptr_eq(&element));
		assert!(reference.resolve().unwrap().ptr_eq(&element));
	}

	#[test]
	fn component_resolves_to_its_root() {
		let root = Element::new("section");
		let mounted = ElementRef::from_component(FixedRoot {
			root: Some(root.clone()),
		});
		let unmounted = ElementRef::from_component(FixedRoot { root: None });

		assert!(mounted.resolve().unwrap().ptr_eq(&root));
		assert!(unmounted.resolve().is_none());
	}
}
