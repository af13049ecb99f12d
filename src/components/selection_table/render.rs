//! Pure view-model construction for the selection table. Reads
//! already-computed state only; never mutates, never reaches the network.

use crate::components::skeleton_source::{SkeletonId, SkeletonSource};

/// One rendered table row.
#[derive(Clone, Debug, PartialEq)]
pub struct RowView {
	pub position: usize,
	pub id: SkeletonId,
	pub name: String,
	pub color_hex: String,
	pub selected: bool,
	pub pre_visible: bool,
	pub post_visible: bool,
	pub text_visible: bool,
	pub highlighted: bool,
}

/// The current page of the table, ready for a rendering adapter.
#[derive(Clone, Debug, PartialEq)]
pub struct TableView {
	pub rows: Vec<RowView>,
	pub offset: usize,
	pub page_size: usize,
	pub total: usize,
}

pub(crate) fn build_view(source: &SkeletonSource, offset: usize, page_size: usize) -> TableView {
	let highlight = source.highlighted();
	let members = source.members();
	let total = members.len();
	let rows = members
		.into_iter()
		.enumerate()
		.skip(offset)
		.take(page_size)
		.map(|(position, m)| RowView {
			position,
			id: m.id,
			name: m.base_name,
			color_hex: m.color.to_hex(),
			selected: m.selected,
			pre_visible: m.pre_visible,
			post_visible: m.post_visible,
			text_visible: m.text_visible,
			highlighted: highlight == Some(m.id),
		})
		.collect();
	TableView {
		rows,
		offset,
		page_size,
		total,
	}
}
