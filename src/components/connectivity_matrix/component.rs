//! The connectivity matrix widget: two member collections, the aggregation
//! engine, and the render loop that keeps them in sync.

use std::cell::Cell;
use std::rc::Rc;

use log::warn;

use super::engine::ConnectivityMatrix;
use super::render::{self, MatrixView};
use crate::collaborators::{NameLookup, Notifier, RenderSink};
use crate::components::skeleton_source::SkeletonSource;
use crate::error::Error;
use crate::registry::{SourceKind, SourceRegistry};
use crate::remote::Backend;

/// Where the widget currently is: showing a table, or the prompt asking the
/// user to populate a side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetState {
	Empty,
	Populated,
}

/// Orchestrates a row source, a column source, and the matrix engine.
///
/// Membership changes on either source mark the widget dirty; the next
/// [`process`](Self::process) refreshes the matrix and re-renders the table
/// wholesale; individual cells are never patched.
pub struct ConnectivityMatrixWidget {
	rows: SkeletonSource,
	columns: SkeletonSource,
	matrix: ConnectivityMatrix,
	backend: Rc<dyn Backend>,
	names: Rc<dyn NameLookup>,
	notifier: Rc<dyn Notifier>,
	sink: Rc<dyn RenderSink<MatrixView>>,
	registry: SourceRegistry,
	state: WidgetState,
	dirty: Rc<Cell<bool>>,
}

impl ConnectivityMatrixWidget {
	pub fn new(
		name: &str,
		registry: &SourceRegistry,
		backend: Rc<dyn Backend>,
		names: Rc<dyn NameLookup>,
		notifier: Rc<dyn Notifier>,
		sink: Rc<dyn RenderSink<MatrixView>>,
	) -> Self {
		let rows = SkeletonSource::new(
			format!("{name} rows"),
			SourceKind::ConnectivityMatrix,
			false,
			registry,
		);
		let columns = SkeletonSource::new(
			format!("{name} columns"),
			SourceKind::ConnectivityMatrix,
			false,
			registry,
		);
		let dirty = Rc::new(Cell::new(false));
		for source in [&rows, &columns] {
			let flag = dirty.clone();
			source.on_change(move |_| flag.set(true));
		}
		Self {
			rows,
			columns,
			matrix: ConnectivityMatrix::new(),
			backend,
			names,
			notifier,
			sink,
			registry: registry.clone(),
			state: WidgetState::Empty,
			dirty,
		}
	}

	pub fn rows(&self) -> &SkeletonSource {
		&self.rows
	}

	pub fn columns(&self) -> &SkeletonSource {
		&self.columns
	}

	pub fn matrix(&self) -> &ConnectivityMatrix {
		&self.matrix
	}

	pub fn state(&self) -> WidgetState {
		self.state
	}

	/// Whether a source change is waiting for the next [`process`](Self::process).
	pub fn needs_refresh(&self) -> bool {
		self.dirty.get()
	}

	/// Refresh if a source changed since the last render.
	pub async fn process(&mut self) -> Result<(), Error> {
		if self.dirty.get() {
			self.refresh().await?;
		}
		Ok(())
	}

	/// Re-aggregate from the current source membership and re-render. A
	/// failed aggregation is surfaced and leaves the prior table in place.
	pub async fn refresh(&mut self) -> Result<(), Error> {
		self.matrix.set_row_ids(self.rows.ordered_ids());
		self.matrix.set_column_ids(self.columns.ordered_ids());
		if let Err(e) = self.matrix.refresh(self.backend.as_ref()).await {
			warn!("connectivity refresh failed: {e}");
			self.notifier.error(&e.to_string());
			return Err(e);
		}
		self.dirty.set(false);
		self.state = if self.matrix.is_empty() {
			WidgetState::Empty
		} else {
			WidgetState::Populated
		};
		self.sink.render(&render::build_view(&self.matrix, self.names.as_ref()));
		Ok(())
	}

	/// Reset both sources and the matrix and show the prompt.
	pub fn clear(&mut self) {
		self.rows.clear();
		self.columns.clear();
		self.matrix = ConnectivityMatrix::new();
		self.state = WidgetState::Empty;
		self.dirty.set(false);
		self.sink.render(&MatrixView::default());
	}

	/// Unregister both sources. Safe to call redundantly.
	pub fn destroy(&mut self) {
		self.rows.destroy(&self.registry);
		self.columns.destroy(&self.registry);
	}
}
