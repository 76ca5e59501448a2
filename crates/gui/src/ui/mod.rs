pub mod annotation_list;
pub mod status_bar;
