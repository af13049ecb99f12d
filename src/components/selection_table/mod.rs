mod render;
mod state;

pub use render::{RowView, TableView};
pub use state::{DEFAULT_PAGE_SIZE, SelectionTable};
