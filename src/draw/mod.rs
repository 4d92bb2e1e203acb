pub mod selector;
pub mod session;
