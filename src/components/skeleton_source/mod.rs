mod color;
mod state;
mod types;

pub(crate) use state::WeakState;
pub use state::SkeletonSource;
pub use types::{ChangeEvent, Rgb, SkeletonId, SkeletonModel};
