//! Collection state and the synchronization protocol between linked sources.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

use log::debug;

use super::color;
use super::types::{ChangeEvent, SkeletonId, SkeletonModel};
use crate::error::Error;
use crate::registry::{SourceHandle, SourceKind, SourceRegistry};

pub(crate) type SharedState = Rc<RefCell<SourceState>>;
pub(crate) type WeakState = Weak<RefCell<SourceState>>;

type Listener = Rc<dyn Fn(&ChangeEvent)>;

pub(crate) struct SourceState {
	name: String,
	kind: SourceKind,
	handle: SourceHandle,
	members: HashMap<SkeletonId, SkeletonModel>,
	order: Vec<SkeletonId>,
	index: HashMap<SkeletonId, usize>,
	highlight: Option<SkeletonId>,
	link_target: Option<WeakState>,
	back_links: Vec<WeakState>,
	listeners: Vec<Listener>,
	colorize: bool,
	color_counter: usize,
}

impl SourceState {
	fn rebuild_index(&mut self) {
		self.index.clear();
		for (pos, id) in self.order.iter().enumerate() {
			self.index.insert(*id, pos);
		}
	}
}

/// A named, ordered collection of [`SkeletonModel`]s with optional
/// propagation to one linked counterpart.
///
/// The handle is cheap to clone; all clones share the same underlying state.
/// Membership changes flow forward along `link_target` and terminate once
/// both sides converge; single-model field updates flow backward over every
/// source linked to this one and terminate through an explicit visited set.
#[derive(Clone)]
pub struct SkeletonSource {
	pub(crate) inner: SharedState,
}

impl SkeletonSource {
	/// Create a collection and register it for the lifetime of the widget
	/// that owns it. `colorize` sources assign their own colors to new
	/// members; others keep whatever color the incoming model carries.
	pub fn new(
		name: impl Into<String>,
		kind: SourceKind,
		colorize: bool,
		registry: &SourceRegistry,
	) -> Self {
		let source = Self {
			inner: Rc::new(RefCell::new(SourceState {
				name: name.into(),
				kind,
				handle: SourceHandle::UNREGISTERED,
				members: HashMap::new(),
				order: Vec::new(),
				index: HashMap::new(),
				highlight: None,
				link_target: None,
				back_links: Vec::new(),
				listeners: Vec::new(),
				colorize,
				color_counter: 0,
			})),
		};
		let handle = registry.register(kind, &source);
		source.inner.borrow_mut().handle = handle;
		source
	}

	pub fn name(&self) -> String {
		self.inner.borrow().name.clone()
	}

	pub fn kind(&self) -> SourceKind {
		self.inner.borrow().kind
	}

	pub fn handle(&self) -> SourceHandle {
		self.inner.borrow().handle
	}

	pub fn len(&self) -> usize {
		self.inner.borrow().order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.borrow().order.is_empty()
	}

	pub fn contains(&self, id: SkeletonId) -> bool {
		self.inner.borrow().members.contains_key(&id)
	}

	/// Clone of the stored model, if present.
	pub fn get(&self, id: SkeletonId) -> Option<SkeletonModel> {
		self.inner.borrow().members.get(&id).cloned()
	}

	/// Member ids in display order.
	pub fn ordered_ids(&self) -> Vec<SkeletonId> {
		self.inner.borrow().order.clone()
	}

	/// Member models in display order.
	pub fn members(&self) -> Vec<SkeletonModel> {
		let st = self.inner.borrow();
		st.order.iter().map(|id| st.members[id].clone()).collect()
	}

	/// Position of `id` in the display order.
	pub fn position_of(&self, id: SkeletonId) -> Option<usize> {
		self.inner.borrow().index.get(&id).copied()
	}

	pub fn highlighted(&self) -> Option<SkeletonId> {
		self.inner.borrow().highlight
	}

	/// Point the highlight at `id`. An id the collection does not hold is
	/// silently ignored; `None` clears the highlight.
	pub fn highlight(&self, id: Option<SkeletonId>) {
		let mut st = self.inner.borrow_mut();
		match id {
			None => st.highlight = None,
			Some(id) if st.members.contains_key(&id) => st.highlight = Some(id),
			Some(_) => {}
		}
	}

	/// Subscribe to change events. Listeners run after each local mutation
	/// completes, outside any internal borrow.
	pub fn on_change(&self, listener: impl Fn(&ChangeEvent) + 'static) {
		self.inner.borrow_mut().listeners.push(Rc::new(listener));
	}

	/// Insert or replace the given models, in the given order.
	///
	/// New ids go to the end of the display order; ids already present are
	/// replaced whole (last writer wins, never merged field by field). The
	/// difference against the link target (models the target is missing or
	/// stores differently) is forwarded onward; an empty difference stops
	/// the cascade. Returns the ids of the batch.
	pub fn append(&self, models: Vec<SkeletonModel>) -> Result<Vec<SkeletonId>, Error> {
		if models.is_empty() {
			return Err(Error::nothing_selected());
		}
		let mut batch = Vec::with_capacity(models.len());
		let mut changed = Vec::new();
		{
			let mut st = self.inner.borrow_mut();
			for mut model in models {
				let id = model.id;
				batch.push(id);
				if st.members.get(&id).is_some_and(|m| *m == model) {
					continue;
				}
				if !st.members.contains_key(&id) {
					if st.colorize {
						model.color = color::pick_color(st.color_counter);
						st.color_counter += 1;
					}
					st.order.push(id);
					let pos = st.order.len() - 1;
					st.index.insert(id, pos);
				}
				st.members.insert(id, model);
				changed.push(id);
			}
		}
		if !changed.is_empty() {
			self.emit(&ChangeEvent::Appended(changed));
		}

		if let Some(target) = self.link_target() {
			let diff = self.diff_against(&target, &batch);
			if !diff.is_empty() {
				debug!(
					"forwarding {} of {} appended skeletons from '{}' to '{}'",
					diff.len(),
					batch.len(),
					self.name(),
					target.name()
				);
				target.append(diff)?;
			}
		}
		Ok(batch)
	}

	/// Delete the given ids, preserving the relative order of survivors.
	///
	/// A single id takes a positional fast path; several ids rebuild the
	/// order through a membership filter. The same ids are forwarded to the
	/// link target for as long as the target still holds any of them.
	pub fn remove(&self, ids: &[SkeletonId]) {
		let removed = {
			let mut st = self.inner.borrow_mut();
			let removed: Vec<SkeletonId> = if let [id] = ids {
				match st.index.get(id).copied() {
					Some(pos) => {
						st.order.remove(pos);
						st.members.remove(id);
						vec![*id]
					}
					None => Vec::new(),
				}
			} else {
				let doomed: HashSet<SkeletonId> = ids.iter().copied().collect();
				let removed = st
					.order
					.iter()
					.copied()
					.filter(|id| doomed.contains(id))
					.collect();
				st.order.retain(|id| !doomed.contains(id));
				st.members.retain(|id, _| !doomed.contains(id));
				removed
			};
			st.rebuild_index();
			if let Some(h) = st.highlight
				&& removed.contains(&h)
			{
				st.highlight = None;
			}
			removed
		};
		if !removed.is_empty() {
			self.emit(&ChangeEvent::Removed(removed));
		}

		if let Some(target) = self.link_target()
			&& ids.iter().any(|id| target.contains(*id))
		{
			debug!(
				"forwarding removal of {} skeletons from '{}' to '{}'",
				ids.len(),
				self.name(),
				target.name()
			);
			target.remove(ids);
		}
	}

	/// Apply a single-model field change (visibility toggle, recolor, rename)
	/// and broadcast it to every source linked to this one.
	///
	/// `visited` carries the handles already reached by this broadcast; a
	/// source seeing itself in the set returns immediately, which keeps
	/// arbitrary link graphs, including user-built cycles, from looping.
	pub fn update(&self, model: &SkeletonModel, visited: &mut HashSet<SourceHandle>) {
		if !visited.insert(self.handle()) {
			return;
		}
		let applied = {
			let mut st = self.inner.borrow_mut();
			if st.members.contains_key(&model.id) {
				st.members.insert(model.id, model.clone());
				true
			} else {
				false
			}
		};
		if applied {
			self.emit(&ChangeEvent::Updated(model.id));
		}
		for link in self.back_links() {
			link.update(model, visited);
		}
	}

	/// Drop every member. A local reset only: the link target is not
	/// touched, and the color counter keeps running so colors stay stable
	/// over the collection's whole lifetime.
	pub fn clear(&self) {
		let had_members = {
			let mut st = self.inner.borrow_mut();
			let had = !st.order.is_empty();
			st.members.clear();
			st.order.clear();
			st.index.clear();
			st.highlight = None;
			had
		};
		if had_members {
			self.emit(&ChangeEvent::Cleared);
		}
	}

	/// Forward membership changes to `target` from now on. Passing `None`
	/// unlinks. Linking a source to itself is ignored.
	pub fn set_link_target(&self, target: Option<&SkeletonSource>) {
		if let Some(t) = target
			&& Rc::ptr_eq(&self.inner, &t.inner)
		{
			return;
		}
		if let Some(old) = self.link_target() {
			let mut st = old.inner.borrow_mut();
			let me = Rc::downgrade(&self.inner);
			st.back_links.retain(|w| !w.ptr_eq(&me));
		}
		self.inner.borrow_mut().link_target = target.map(|t| Rc::downgrade(&t.inner));
		if let Some(t) = target {
			t.inner.borrow_mut().back_links.push(Rc::downgrade(&self.inner));
		}
	}

	/// The collection currently receiving this one's membership changes.
	pub fn link_target(&self) -> Option<SkeletonSource> {
		let st = self.inner.borrow();
		st.link_target
			.as_ref()
			.and_then(Weak::upgrade)
			.map(|inner| SkeletonSource { inner })
	}

	/// Unregister and reset. Safe to call more than once; an in-flight
	/// response handler checks the registry before touching a destroyed
	/// collection.
	pub fn destroy(&self, registry: &SourceRegistry) {
		registry.unregister(self.handle());
		self.set_link_target(None);
		self.clear();
	}

	/// The subset of `ids` (as stored here) that `target` is missing or
	/// stores with a different value.
	fn diff_against(&self, target: &SkeletonSource, ids: &[SkeletonId]) -> Vec<SkeletonModel> {
		if Rc::ptr_eq(&self.inner, &target.inner) {
			return Vec::new();
		}
		let mine = self.inner.borrow();
		let theirs = target.inner.borrow();
		ids.iter()
			.filter_map(|id| {
				let model = mine.members.get(id)?;
				match theirs.members.get(id) {
					Some(t) if t == model => None,
					_ => Some(model.clone()),
				}
			})
			.collect()
	}

	fn back_links(&self) -> Vec<SkeletonSource> {
		let mut st = self.inner.borrow_mut();
		st.back_links.retain(|w| w.strong_count() > 0);
		st.back_links
			.iter()
			.filter_map(Weak::upgrade)
			.map(|inner| SkeletonSource { inner })
			.collect()
	}

	fn emit(&self, event: &ChangeEvent) {
		let listeners: Vec<Listener> = self.inner.borrow().listeners.clone();
		for listener in listeners {
			listener(event);
		}
	}
}
