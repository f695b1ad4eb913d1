pub mod form;
pub mod projection;
