//! Connectivity matrix state: two ordered id sets and the aggregated
//! (incoming, outgoing) counts between them.

use log::debug;

use crate::components::skeleton_source::SkeletonId;
use crate::error::Error;
use crate::remote::{Backend, CellCounts, ConnectivityRequest, checked};

/// Aggregated pairwise connection counts between two ordered skeleton sets.
///
/// A refresh replaces the cells wholesale; no partially-updated matrix is
/// ever observable, and a failed refresh leaves the previous one in place.
#[derive(Clone, Debug, Default)]
pub struct ConnectivityMatrix {
	row_ids: Vec<SkeletonId>,
	col_ids: Vec<SkeletonId>,
	cells: Vec<Vec<CellCounts>>,
}

/// First-occurrence order with duplicates dropped; duplicates carry no
/// meaning for matrix addressing.
fn dedup(ids: Vec<SkeletonId>) -> Vec<SkeletonId> {
	let mut seen = std::collections::HashSet::new();
	ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

impl ConnectivityMatrix {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replace the row addressing wholesale.
	pub fn set_row_ids(&mut self, ids: Vec<SkeletonId>) {
		self.row_ids = dedup(ids);
	}

	/// Replace the column addressing wholesale.
	pub fn set_column_ids(&mut self, ids: Vec<SkeletonId>) {
		self.col_ids = dedup(ids);
	}

	pub fn row_ids(&self) -> &[SkeletonId] {
		&self.row_ids
	}

	pub fn column_ids(&self) -> &[SkeletonId] {
		&self.col_ids
	}

	/// Cells as of the last refresh; one inner vec per row id.
	pub fn cells(&self) -> &[Vec<CellCounts>] {
		&self.cells
	}

	pub fn cell(&self, row: usize, col: usize) -> Option<CellCounts> {
		self.cells.get(row).and_then(|r| r.get(col)).copied()
	}

	/// Whether the last refresh produced no table.
	pub fn is_empty(&self) -> bool {
		self.cells.is_empty()
	}

	/// Re-aggregate. With either side empty this resolves immediately to an
	/// empty matrix without a network round-trip, discarding prior cells.
	pub async fn refresh(&mut self, backend: &dyn Backend) -> Result<(), Error> {
		if self.row_ids.is_empty() || self.col_ids.is_empty() {
			self.cells.clear();
			return Ok(());
		}
		let request = ConnectivityRequest {
			rows: self.row_ids.clone(),
			columns: self.col_ids.clone(),
		};
		let response = checked(backend.connectivity_counts(request).await?)?;
		if response.matrix.len() != self.row_ids.len()
			|| response.matrix.iter().any(|r| r.len() != self.col_ids.len())
		{
			return Err(Error::Remote(format!(
				"connectivity matrix shape mismatch: expected {}x{}",
				self.row_ids.len(),
				self.col_ids.len()
			)));
		}
		debug!(
			"connectivity matrix refreshed: {}x{}",
			self.row_ids.len(),
			self.col_ids.len()
		);
		self.cells = response.matrix;
		Ok(())
	}
}
