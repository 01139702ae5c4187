//! Plugin installer.
//!
//! The host application registers directives by name; [`DirectiveApp`] is
//! the seam this crate expects from it, and [`OutsideEvents::install`] pours
//! the whole catalog through it in one call.

use crate::catalog::{EVENT_CATALOG, EVENT_OUTSIDE_NAME, event_outside_directive};
use crate::directive::OutsideDirective;

/// The surface an application instance exposes for directive registration.
pub trait DirectiveApp {
	/// Registers `directive` under `name`.
	fn register_directive(&mut self, name: &str, directive: OutsideDirective);
}

/// The outside-events plugin.
///
/// # Example
///
/// ```ignore
/// let mut app = App::new();
/// OutsideEvents::install(&mut app);
/// // app now knows `click-outside`, `blur-outside`, ..., `event-outside`.
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OutsideEvents;

impl OutsideEvents {
	/// Registers every catalog directive plus the generic one onto `app`.
	pub fn install(app: &mut impl DirectiveApp) {
		for &(event, descriptor) in EVENT_CATALOG {
			let directive = OutsideDirective::new(Some(event), Some(descriptor));
			let name = directive.directive_name().to_string();
			app.register_directive(&name, directive);
		}
		app.register_directive(EVENT_OUTSIDE_NAME, event_outside_directive());
	}
}
