//! Named, linkable collections of skeleton reconstructions and the
//! connectivity matrix built on top of them.
//!
//! Every widget that owns a set of skeletons exposes the same capability: a
//! [`SkeletonSource`] that can be queried, appended to, pruned, and linked
//! to one counterpart that receives its membership changes. Propagation
//! along those links converges by diffing (append/remove) or by an explicit
//! visited set (single-model updates), so arbitrary link graphs, including
//! cycles users wire up, never loop or double-apply.
//!
//! Live sources are discoverable through a [`SourceRegistry`] injected into
//! constructors. The network, name lookup, active-entity query, error
//! reporting, and display are all external collaborators behind traits; the
//! core only pushes fully-resolved data outward. Everything runs on one
//! cooperative thread, suspending only at backend awaits.

// Modules
pub mod collaborators;
pub mod components;
pub mod error;
pub mod registry;
pub mod remote;

pub use collaborators::{ActiveSkeleton, NameLookup, Notifier, RenderSink};
pub use components::connectivity_matrix::{
	ConnectivityMatrix, ConnectivityMatrixWidget, MatrixView, WidgetState,
};
pub use components::selection_table::{SelectionTable, TableView};
pub use components::skeleton_source::{
	ChangeEvent, Rgb, SkeletonId, SkeletonModel, SkeletonSource,
};
pub use error::Error;
pub use registry::{SourceHandle, SourceKind, SourceRegistry};
