//! Interfaces of the external collaborators the core calls out to.
//!
//! The core only ever pushes fully-resolved data through these; it never
//! queries a collaborator back for state it could hold itself.

use crate::components::skeleton_source::SkeletonId;

/// Resolves display names for entities, keyed by id. Header and row labels
/// fall back to the plain id when a name is unknown.
pub trait NameLookup {
	fn name_of(&self, id: SkeletonId) -> Option<String>;
}

/// Reports which entity is currently active in the surrounding tool, used
/// to decide what to highlight on each render.
pub trait ActiveSkeleton {
	fn active_skeleton(&self) -> Option<SkeletonId>;
}

/// Error/notification sink; failures of remote operations end up here.
pub trait Notifier {
	fn error(&self, message: &str);
}

/// Receives a fully-computed view model and displays it somewhere.
pub trait RenderSink<V> {
	fn render(&self, view: &V);
}

#[cfg(test)]
pub(crate) mod stubs {
	use std::cell::{Cell, RefCell};

	use super::*;

	#[derive(Default)]
	pub struct RecordingNotifier {
		pub messages: RefCell<Vec<String>>,
	}

	impl Notifier for RecordingNotifier {
		fn error(&self, message: &str) {
			self.messages.borrow_mut().push(message.to_string());
		}
	}

	#[derive(Default)]
	pub struct FixedActive {
		pub id: Cell<Option<SkeletonId>>,
	}

	impl ActiveSkeleton for FixedActive {
		fn active_skeleton(&self) -> Option<SkeletonId> {
			self.id.get()
		}
	}

	pub struct MapNames(pub std::collections::HashMap<SkeletonId, String>);

	impl NameLookup for MapNames {
		fn name_of(&self, id: SkeletonId) -> Option<String> {
			self.0.get(&id).cloned()
		}
	}

	#[derive(Default)]
	pub struct CapturingSink<V: Clone> {
		pub last: RefCell<Option<V>>,
		pub renders: Cell<usize>,
	}

	impl<V: Clone> RenderSink<V> for CapturingSink<V> {
		fn render(&self, view: &V) {
			self.renders.set(self.renders.get() + 1);
			*self.last.borrow_mut() = Some(view.clone());
		}
	}
}
