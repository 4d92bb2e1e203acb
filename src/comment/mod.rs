pub mod comment_model;
pub mod normalize;
pub mod paste;
