//! Error taxonomy for collection operations and the backend boundary.

use thiserror::Error;

use crate::components::skeleton_source::SkeletonId;

/// Everything a collection operation can fail with.
///
/// None of these are fatal: a failing operation reports, mutates nothing,
/// and never leaves a collection with its member map and order sequence out
/// of step.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
	/// An operation was called with empty or invalid input.
	#[error("{0}")]
	Validation(String),
	/// The backend failed at the transport level or returned an error payload.
	#[error("remote error: {0}")]
	Remote(String),
	/// An operation named a skeleton the collection does not hold.
	#[error("unknown skeleton #{0}")]
	UnknownSkeleton(SkeletonId),
}

impl Error {
	pub(crate) fn nothing_selected() -> Self {
		Self::Validation("nothing selected".into())
	}
}
