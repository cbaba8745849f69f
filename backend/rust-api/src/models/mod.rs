pub mod email;
pub mod puzzle;
pub mod selection;
