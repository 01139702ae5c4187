//! Outside Events - outside-event detection for web-sys frontends
//!
//! A small runtime utility for reacting when the user interacts anywhere on
//! the page *except* a designated element: closing a dropdown on an outside
//! click, dismissing a popover when focus moves elsewhere, and so on. The
//! capability is exposed three ways: a plain function per event kind, a
//! declarative directive adapter for host frameworks, and a plugin installer
//! that registers the whole catalog onto an application instance.
//!
//! ## Architecture
//!
//! - [`dom`]: platform seam - web-sys on `wasm32`, an in-memory document on
//!   native targets so the logic is testable without a browser
//! - [`resolve`]: deferred element references ([`ElementRef`]), resolved at
//!   event time rather than registration time
//! - [`listener`]: the core factory - containment/composed-path filtering,
//!   passive document-level registration, parameter-exact teardown
//! - [`bus`]: optional legacy event-bus dispatch
//! - [`directive`]: declarative binding adapter and lifecycle glue
//! - [`catalog`]: the descriptor -> platform-event table and per-kind API
//! - [`plugin`]: the installer
//!
//! ## Example
//!
//! ```ignore
//! use outside_events::{OutsideOptions, on_click_outside};
//!
//! let teardown = on_click_outside(
//!     &dropdown_element,
//!     |_event, _element, _extras| close_dropdown(),
//!     OutsideOptions::default(),
//! );
//!
//! // later, on unmount:
//! if let Some(mut teardown) = teardown {
//!     teardown.call();
//! }
//! ```
//!
//! ## Event-time resolution
//!
//! Targets may be concrete elements, shared [`ElementCell`]s, lazy getters or
//! component handles. Whatever the shape, the element is re-resolved on every
//! event delivery: a conditionally rendered component can swap its root
//! between registration and the moment an outside event fires.

#![warn(missing_docs)]

// Core modules
pub mod bus;
pub mod catalog;
pub mod directive;
pub mod dom;
pub mod listener;
pub mod logging;
pub mod plugin;
pub mod resolve;

// Re-export commonly used types
pub use bus::{BusHandle, EventBus, install_bus, installed_bus, reset_bus};
pub use catalog::*;
pub use directive::{
	BindingModifiers, BindingValue, EventSpec, HookNames, HostApiRevision, LifecyclePhase,
	OutsideBinding, OutsideDirective, hook_names,
};
#[cfg(not(target_arch = "wasm32"))]
pub use dom::{install_document, reset_document};
pub use dom::{Document, Element, Event, EventHandle, document};
pub use listener::{
	ConfigError, Extras, OutsideHandler, OutsideOptions, Teardown, outside_listener,
};
pub use plugin::{DirectiveApp, OutsideEvents};
pub use resolve::{ComponentHandle, ElementCell, ElementRef};

// Logging macros are automatically exported via #[macro_export]
// Users can access them as: outside_events::error_log!, etc.
