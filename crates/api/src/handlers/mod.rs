pub mod survey;
pub mod template;
