pub mod log_accordion_item;
pub mod spinner;
pub mod task_data_tree;
