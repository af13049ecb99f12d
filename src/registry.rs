//! Process-wide table of live skeleton sources.
//!
//! The registry is the only shared mutable state outside the collections
//! themselves. It is a cheaply clonable handle injected into constructors,
//! never reached for as an ambient global, which keeps its lifetime
//! testable in isolation.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::components::skeleton_source::{SkeletonSource, WeakState};

/// Identifier of a registered source. No two live handles ever share a
/// value within one registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceHandle(u64);

impl SourceHandle {
	/// Placeholder carried by a source between construction and
	/// registration; never handed out by a registry.
	pub(crate) const UNREGISTERED: Self = Self(0);
}

/// What a source is addressed as when looked up by kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
	/// A standalone collection with no widget attached.
	Plain,
	/// A selection table widget.
	SelectionTable,
	/// A row or column source owned by a connectivity matrix widget.
	ConnectivityMatrix,
}

struct Entry {
	handle: SourceHandle,
	kind: SourceKind,
	state: WeakState,
}

#[derive(Default)]
struct Inner {
	next: u64,
	entries: Vec<Entry>,
}

/// Registry handle. Clones share the same table.
#[derive(Clone, Default)]
pub struct SourceRegistry {
	inner: Rc<RefCell<Inner>>,
}

impl SourceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn register(&self, kind: SourceKind, source: &SkeletonSource) -> SourceHandle {
		let mut inner = self.inner.borrow_mut();
		inner.next += 1;
		let handle = SourceHandle(inner.next);
		inner.entries.push(Entry {
			handle,
			kind,
			state: Rc::downgrade(&source.inner),
		});
		debug!("registered source {handle:?} ({kind:?})");
		handle
	}

	/// Drop the entry for `handle`. Unknown handles are a no-op.
	pub fn unregister(&self, handle: SourceHandle) {
		self.inner
			.borrow_mut()
			.entries
			.retain(|e| e.handle != handle);
	}

	/// Whether `handle` refers to a registered, still-live source. In-flight
	/// response handlers call this before mutating anything.
	pub fn contains(&self, handle: SourceHandle) -> bool {
		self.inner
			.borrow()
			.entries
			.iter()
			.any(|e| e.handle == handle && e.state.strong_count() > 0)
	}

	/// Every live source, in registration order. Entries whose source has
	/// been dropped without unregistering are pruned along the way.
	pub fn list_all(&self) -> Vec<SkeletonSource> {
		let mut inner = self.inner.borrow_mut();
		inner.entries.retain(|e| e.state.strong_count() > 0);
		inner
			.entries
			.iter()
			.filter_map(|e| e.state.upgrade())
			.map(|inner| SkeletonSource { inner })
			.collect()
	}

	/// First live source registered with the given kind.
	pub fn find_first_of_kind(&self, kind: SourceKind) -> Option<SkeletonSource> {
		self.inner
			.borrow()
			.entries
			.iter()
			.filter(|e| e.kind == kind)
			.find_map(|e| e.state.upgrade())
			.map(|inner| SkeletonSource { inner })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn source(name: &str, kind: SourceKind, registry: &SourceRegistry) -> SkeletonSource {
		SkeletonSource::new(name, kind, false, registry)
	}

	#[test]
	fn handles_are_unique_and_live() {
		let registry = SourceRegistry::new();
		let a = source("a", SourceKind::Plain, &registry);
		let b = source("b", SourceKind::Plain, &registry);
		assert_ne!(a.handle(), b.handle());
		assert!(registry.contains(a.handle()));
		assert!(registry.contains(b.handle()));
	}

	#[test]
	fn unregister_unknown_handle_is_a_no_op() {
		let registry = SourceRegistry::new();
		let a = source("a", SourceKind::Plain, &registry);
		registry.unregister(SourceHandle(999));
		assert!(registry.contains(a.handle()));
	}

	#[test]
	fn find_first_of_kind_respects_registration_order() {
		let registry = SourceRegistry::new();
		let _plain = source("plain", SourceKind::Plain, &registry);
		let first = source("first", SourceKind::SelectionTable, &registry);
		let _second = source("second", SourceKind::SelectionTable, &registry);

		let found = registry.find_first_of_kind(SourceKind::SelectionTable).unwrap();
		assert_eq!(found.handle(), first.handle());
		assert!(registry.find_first_of_kind(SourceKind::ConnectivityMatrix).is_none());
	}

	#[test]
	fn dropped_sources_are_pruned() {
		let registry = SourceRegistry::new();
		let keep = source("keep", SourceKind::Plain, &registry);
		let gone_handle = {
			let gone = source("gone", SourceKind::Plain, &registry);
			gone.handle()
		};

		let all = registry.list_all();
		assert_eq!(all.len(), 1);
		assert_eq!(all[0].handle(), keep.handle());
		assert!(!registry.contains(gone_handle));
	}

	#[test]
	fn handles_are_not_reused_after_unregister() {
		let registry = SourceRegistry::new();
		let a = source("a", SourceKind::Plain, &registry);
		let old = a.handle();
		a.destroy(&registry);
		let b = source("b", SourceKind::Plain, &registry);
		assert_ne!(b.handle(), old);
	}
}
