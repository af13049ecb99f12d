//! Pure view-model construction for the connectivity matrix table.

use super::engine::ConnectivityMatrix;
use crate::collaborators::NameLookup;
use crate::components::skeleton_source::SkeletonId;

/// One rendered count. Positive counts become drill-down links; zeros stay
/// semantically present but visually hidden so exports still carry the true
/// value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountCell {
	pub value: u32,
	pub clickable: bool,
	pub hidden: bool,
}

impl CountCell {
	fn new(value: u32) -> Self {
		Self {
			value,
			clickable: value > 0,
			hidden: value == 0,
		}
	}
}

/// One body row: header cell plus an (incoming, outgoing) pair per column.
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixRowView {
	pub id: SkeletonId,
	pub name: String,
	pub cells: Vec<(CountCell, CountCell)>,
}

/// The whole table: a header row of column names and one row per row id.
/// An empty view tells the adapter to show the empty-state prompt instead.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatrixView {
	pub header: Vec<String>,
	pub rows: Vec<MatrixRowView>,
}

impl MatrixView {
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}
}

fn display_name(names: &dyn NameLookup, id: SkeletonId) -> String {
	names.name_of(id).unwrap_or_else(|| id.to_string())
}

pub(crate) fn build_view(matrix: &ConnectivityMatrix, names: &dyn NameLookup) -> MatrixView {
	if matrix.is_empty() {
		return MatrixView::default();
	}
	let header = matrix
		.column_ids()
		.iter()
		.map(|id| display_name(names, *id))
		.collect();
	let rows = matrix
		.row_ids()
		.iter()
		.zip(matrix.cells())
		.map(|(id, cells)| MatrixRowView {
			id: *id,
			name: display_name(names, *id),
			cells: cells
				.iter()
				.map(|c| (CountCell::new(c.incoming), CountCell::new(c.outgoing)))
				.collect(),
		})
		.collect();
	MatrixView { header, rows }
}
