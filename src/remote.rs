//! The network boundary: an abstract asynchronous backend plus the payload
//! shapes exchanged with it.
//!
//! Transport is out of scope here; an implementation POSTs these payloads
//! wherever the backend lives. Two failure channels exist and are handled
//! the same way by callers: a transport-level `Err`, and a success payload
//! carrying an `error` field; [`checked`] folds the second into the first.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::components::skeleton_source::SkeletonId;
use crate::error::Error;

/// A response payload that may carry a backend-reported error.
pub trait ResponsePayload {
	fn error(&self) -> Option<&str>;
}

/// Reject a success payload that carries an `error` field.
pub fn checked<T: ResponsePayload>(response: T) -> Result<T, Error> {
	match response.error() {
		Some(message) => Err(Error::Remote(message.to_string())),
		None => Ok(response),
	}
}

macro_rules! response_payload {
	($($ty:ty),+) => {
		$(impl ResponsePayload for $ty {
			fn error(&self) -> Option<&str> {
				self.error.as_deref()
			}
		})+
	};
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NameRequest {
	pub skeleton_ids: Vec<SkeletonId>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NameResponse {
	pub names: HashMap<SkeletonId, String>,
	pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatisticsRequest {
	pub skeleton_id: SkeletonId,
}

/// Aggregate per-skeleton metrics for display.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsResponse {
	pub node_count: u64,
	pub input_count: u64,
	pub output_count: u64,
	pub cable_length: f64,
	pub percent_reviewed: f64,
	pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveListRequest {
	pub name: String,
	pub skeleton_ids: Vec<SkeletonId>,
}

/// Empty acknowledgement, or an error.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ack {
	pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoadListRequest {
	pub name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadListResponse {
	pub skeletonlist: Vec<SkeletonId>,
	pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MeasureRequest {
	pub skeleton_ids: Vec<SkeletonId>,
}

/// One row of the measurement table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementRow {
	pub skeleton_id: SkeletonId,
	pub neuron_name: String,
	pub node_count: u64,
	pub input_count: u64,
	pub output_count: u64,
	pub cable_length: f64,
	pub percent_reviewed: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureResponse {
	pub rows: Vec<MeasurementRow>,
	pub error: Option<String>,
}

/// `(incoming, outgoing)` connection counts for one matrix cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCounts {
	pub incoming: u32,
	pub outgoing: u32,
}

impl CellCounts {
	pub const fn new(incoming: u32, outgoing: u32) -> Self {
		Self { incoming, outgoing }
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectivityRequest {
	pub rows: Vec<SkeletonId>,
	pub columns: Vec<SkeletonId>,
}

/// One inner vec per row id, one cell per column id.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityResponse {
	pub matrix: Vec<Vec<CellCounts>>,
	pub error: Option<String>,
}

response_payload!(
	NameResponse,
	StatisticsResponse,
	Ack,
	LoadListResponse,
	MeasureResponse,
	ConnectivityResponse
);

/// The asynchronous backend every remote operation goes through.
///
/// Callers never block on these; they are awaited from the single
/// cooperative thread, and every response handler re-reads current
/// collection state before mutating anything.
#[async_trait(?Send)]
pub trait Backend {
	async fn skeleton_names(&self, request: NameRequest) -> Result<NameResponse, Error>;
	async fn skeleton_statistics(
		&self,
		request: StatisticsRequest,
	) -> Result<StatisticsResponse, Error>;
	async fn save_skeleton_list(&self, request: SaveListRequest) -> Result<Ack, Error>;
	async fn load_skeleton_list(
		&self,
		request: LoadListRequest,
	) -> Result<LoadListResponse, Error>;
	async fn measure_skeletons(&self, request: MeasureRequest) -> Result<MeasureResponse, Error>;
	async fn connectivity_counts(
		&self,
		request: ConnectivityRequest,
	) -> Result<ConnectivityResponse, Error>;
}

#[cfg(test)]
pub(crate) mod mock {
	use std::cell::{Cell, RefCell};

	use super::*;

	/// Canned backend that records how many requests were issued.
	#[derive(Default)]
	pub struct MockBackend {
		pub names: RefCell<HashMap<SkeletonId, String>>,
		pub saved_lists: RefCell<HashMap<String, Vec<SkeletonId>>>,
		pub matrix: RefCell<Vec<Vec<CellCounts>>>,
		/// Payload-level error attached to every response when set.
		pub payload_error: RefCell<Option<String>>,
		/// Transport-level failure for every call when set.
		pub fail_transport: Cell<bool>,
		pub calls: Cell<usize>,
	}

	impl MockBackend {
		fn touch(&self) -> Result<Option<String>, Error> {
			self.calls.set(self.calls.get() + 1);
			if self.fail_transport.get() {
				return Err(Error::Remote("connection refused".into()));
			}
			Ok(self.payload_error.borrow().clone())
		}
	}

	#[async_trait(?Send)]
	impl Backend for MockBackend {
		async fn skeleton_names(&self, request: NameRequest) -> Result<NameResponse, Error> {
			let error = self.touch()?;
			let known = self.names.borrow();
			let names = request
				.skeleton_ids
				.iter()
				.filter_map(|id| known.get(id).map(|n| (*id, n.clone())))
				.collect();
			Ok(NameResponse { names, error })
		}

		async fn skeleton_statistics(
			&self,
			request: StatisticsRequest,
		) -> Result<StatisticsResponse, Error> {
			let error = self.touch()?;
			Ok(StatisticsResponse {
				node_count: 100 + request.skeleton_id,
				input_count: 5,
				output_count: 7,
				cable_length: 1234.5,
				percent_reviewed: 50.0,
				error,
			})
		}

		async fn save_skeleton_list(&self, request: SaveListRequest) -> Result<Ack, Error> {
			let error = self.touch()?;
			if error.is_none() {
				self.saved_lists
					.borrow_mut()
					.insert(request.name, request.skeleton_ids);
			}
			Ok(Ack { error })
		}

		async fn load_skeleton_list(
			&self,
			request: LoadListRequest,
		) -> Result<LoadListResponse, Error> {
			let error = self.touch()?;
			let skeletonlist = self
				.saved_lists
				.borrow()
				.get(&request.name)
				.cloned()
				.unwrap_or_default();
			Ok(LoadListResponse { skeletonlist, error })
		}

		async fn measure_skeletons(
			&self,
			request: MeasureRequest,
		) -> Result<MeasureResponse, Error> {
			let error = self.touch()?;
			let rows = request
				.skeleton_ids
				.iter()
				.map(|id| MeasurementRow {
					skeleton_id: *id,
					neuron_name: format!("neuron {id}"),
					node_count: *id * 10,
					..Default::default()
				})
				.collect();
			Ok(MeasureResponse { rows, error })
		}

		async fn connectivity_counts(
			&self,
			_request: ConnectivityRequest,
		) -> Result<ConnectivityResponse, Error> {
			let error = self.touch()?;
			Ok(ConnectivityResponse {
				matrix: self.matrix.borrow().clone(),
				error,
			})
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn name_response_decodes_integer_keys() {
		let resp: NameResponse =
			serde_json::from_value(json!({ "names": { "1": "A", "20": "B" } })).unwrap();
		assert_eq!(resp.names.get(&1).map(String::as_str), Some("A"));
		assert_eq!(resp.names.get(&20).map(String::as_str), Some("B"));
		assert!(checked(resp).is_ok());
	}

	#[test]
	fn error_payload_is_rejected() {
		let resp: LoadListResponse =
			serde_json::from_value(json!({ "error": "no such list" })).unwrap();
		assert_eq!(
			checked(resp).unwrap_err(),
			Error::Remote("no such list".into())
		);
	}

	#[test]
	fn empty_ack_decodes() {
		let ack: Ack = serde_json::from_value(json!({})).unwrap();
		assert!(checked(ack).is_ok());
	}

	#[test]
	fn connectivity_response_shape() {
		let resp: ConnectivityResponse = serde_json::from_value(json!({
			"matrix": [
				[{ "incoming": 2, "outgoing": 0 }],
				[{ "incoming": 0, "outgoing": 5 }]
			]
		}))
		.unwrap();
		assert_eq!(resp.matrix[0][0], CellCounts::new(2, 0));
		assert_eq!(resp.matrix[1][0], CellCounts::new(0, 5));
	}
}
