pub mod connectivity_matrix;
pub mod selection_table;
pub mod skeleton_source;
