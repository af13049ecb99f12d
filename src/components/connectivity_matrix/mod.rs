mod component;
mod engine;
mod render;

pub use component::{ConnectivityMatrixWidget, WidgetState};
pub use engine::ConnectivityMatrix;
pub use render::{CountCell, MatrixRowView, MatrixView};
