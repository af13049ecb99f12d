//! Selection table: a paged view over a colorizing skeleton collection plus
//! the bulk remote operations (names, saved lists, measurements).

use std::collections::HashSet;
use std::rc::Rc;

use log::info;

use super::render::{self, TableView};
use crate::collaborators::{ActiveSkeleton, Notifier};
use crate::components::skeleton_source::{Rgb, SkeletonId, SkeletonModel, SkeletonSource};
use crate::error::Error;
use crate::registry::{SourceKind, SourceRegistry};
use crate::remote::{
	Backend, LoadListRequest, MeasureRequest, MeasurementRow, NameRequest, SaveListRequest,
	StatisticsRequest, StatisticsResponse, checked,
};

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// The selection table widget state. Owns its source; every remote
/// operation is fire-and-forget: on success it mutates local state and the
/// next render picks it up, on failure it notifies and changes nothing.
pub struct SelectionTable {
	source: SkeletonSource,
	registry: SourceRegistry,
	backend: Rc<dyn Backend>,
	notifier: Rc<dyn Notifier>,
	active: Rc<dyn ActiveSkeleton>,
	offset: usize,
	page_size: usize,
}

impl SelectionTable {
	pub fn new(
		name: impl Into<String>,
		registry: &SourceRegistry,
		backend: Rc<dyn Backend>,
		notifier: Rc<dyn Notifier>,
		active: Rc<dyn ActiveSkeleton>,
	) -> Self {
		let source = SkeletonSource::new(name, SourceKind::SelectionTable, true, registry);
		Self {
			source,
			registry: registry.clone(),
			backend,
			notifier,
			active,
			offset: 0,
			page_size: DEFAULT_PAGE_SIZE,
		}
	}

	pub fn source(&self) -> &SkeletonSource {
		&self.source
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn page_size(&self) -> usize {
		self.page_size
	}

	pub fn set_page_size(&mut self, page_size: usize) {
		self.page_size = page_size.max(1);
		self.clamp_offset();
	}

	/// Advance one page; a no-op at the last page.
	pub fn show_next(&mut self) {
		if self.offset + self.page_size < self.source.len() {
			self.offset += self.page_size;
		}
	}

	/// Go back one page; a no-op at the first page.
	pub fn show_previous(&mut self) {
		self.offset = self.offset.saturating_sub(self.page_size);
	}

	/// Ids visible in the current page window.
	pub fn page_ids(&self) -> Vec<SkeletonId> {
		let ids = self.source.ordered_ids();
		ids.iter()
			.skip(self.offset)
			.take(self.page_size)
			.copied()
			.collect()
	}

	/// Append and resolve display names for the appended batch.
	pub async fn add_skeletons(&mut self, models: Vec<SkeletonModel>) -> Result<(), Error> {
		let ids = match self.source.append(models) {
			Ok(ids) => ids,
			Err(e) => return self.surface(Err(e)),
		};
		let result = self.try_resolve_names(&ids).await;
		self.surface(result)
	}

	pub fn remove(&mut self, ids: &[SkeletonId]) {
		self.source.remove(ids);
		self.clamp_offset();
	}

	/// Drop everything and rewind to the first page. Local only.
	pub fn clear(&mut self) {
		self.offset = 0;
		self.source.clear();
	}

	/// Fetch display names and rename the members still present.
	pub async fn resolve_names(&self, ids: &[SkeletonId]) -> Result<(), Error> {
		let result = self.try_resolve_names(ids).await;
		self.surface(result)
	}

	/// Persist the current member ids under `name`.
	pub async fn save_list(&self, name: &str) -> Result<(), Error> {
		let request = SaveListRequest {
			name: name.to_string(),
			skeleton_ids: self.source.ordered_ids(),
		};
		let result = async {
			checked(self.backend.save_skeleton_list(request).await?)?;
			info!("saved skeleton list '{name}'");
			Ok(())
		}
		.await;
		self.surface(result)
	}

	/// Replace the member set with the saved list `name` and resolve names.
	/// Loading an empty list just clears the table.
	pub async fn load_list(&mut self, name: &str) -> Result<(), Error> {
		let request = LoadListRequest {
			name: name.to_string(),
		};
		let response = match self.backend.load_skeleton_list(request).await.and_then(checked) {
			Ok(r) => r,
			Err(e) => return self.surface(Err(e)),
		};
		if !self.registry.contains(self.source.handle()) {
			return Ok(());
		}
		self.clear();
		if response.skeletonlist.is_empty() {
			return Ok(());
		}
		let models = response
			.skeletonlist
			.iter()
			.map(|id| SkeletonModel::new(*id, id.to_string(), Rgb::default()))
			.collect();
		let result = async {
			self.source.append(models)?;
			info!("loaded skeleton list '{name}' ({} members)", response.skeletonlist.len());
			self.try_resolve_names(&response.skeletonlist).await
		}
		.await;
		self.surface(result)
	}

	/// Aggregate statistics for one member. Asking for a skeleton the table
	/// does not hold is an error; the caller explicitly expects it to exist.
	pub async fn statistics(&self, id: SkeletonId) -> Result<StatisticsResponse, Error> {
		if !self.source.contains(id) {
			return self.surface(Err(Error::UnknownSkeleton(id)));
		}
		let request = StatisticsRequest { skeleton_id: id };
		let result = async { checked(self.backend.skeleton_statistics(request).await?) }.await;
		self.surface(result)
	}

	/// Measurement rows for every member, for display only.
	pub async fn measure(&self) -> Result<Vec<MeasurementRow>, Error> {
		let skeleton_ids = self.source.ordered_ids();
		if skeleton_ids.is_empty() {
			return self.surface(Err(Error::nothing_selected()));
		}
		let request = MeasureRequest { skeleton_ids };
		let result = async {
			let response = checked(self.backend.measure_skeletons(request).await?)?;
			Ok(response.rows)
		}
		.await;
		self.surface(result)
	}

	/// Build the current page's view model. The highlight is re-resolved
	/// from the active-entity collaborator on every render.
	pub fn view(&self) -> TableView {
		match self.active.active_skeleton() {
			Some(id) if self.source.contains(id) => self.source.highlight(Some(id)),
			_ => self.source.highlight(None),
		}
		render::build_view(&self.source, self.offset, self.page_size)
	}

	/// Unregister the source; in-flight responses become no-ops.
	pub fn destroy(&mut self) {
		self.source.destroy(&self.registry);
		self.offset = 0;
	}

	async fn try_resolve_names(&self, ids: &[SkeletonId]) -> Result<(), Error> {
		let request = NameRequest {
			skeleton_ids: ids.to_vec(),
		};
		let response = checked(self.backend.skeleton_names(request).await?)?;
		if !self.registry.contains(self.source.handle()) {
			// Destroyed while the request was in flight.
			return Ok(());
		}
		for (id, name) in response.names {
			if let Some(mut model) = self.source.get(id)
				&& model.base_name != name
			{
				model.base_name = name;
				self.source.update(&model, &mut HashSet::new());
			}
		}
		Ok(())
	}

	fn clamp_offset(&mut self) {
		let len = self.source.len();
		if len == 0 {
			self.offset = 0;
		} else if self.offset >= len {
			self.offset = (len - 1) / self.page_size * self.page_size;
		}
	}

	fn surface<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
		if let Err(e) = &result {
			self.notifier.error(&e.to_string());
		}
		result
	}
}
