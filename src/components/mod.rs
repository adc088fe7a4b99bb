pub mod data_editor;
pub mod file_uploader;
pub mod graph_canvas;
pub mod graph_view;
pub mod node_details;
