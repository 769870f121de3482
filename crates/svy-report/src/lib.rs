pub mod common;
pub mod stata_xml;

pub use stata_xml::{write_dataset, write_dataset_file};
