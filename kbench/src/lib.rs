pub mod aggregate;
pub mod catalog;
pub mod list;
pub mod measurement;
pub mod reader;
pub mod report;
pub mod table;

#[doc(hidden)]
pub mod _internal_test_data;
