pub mod console;
pub mod report_model;
pub mod text;
