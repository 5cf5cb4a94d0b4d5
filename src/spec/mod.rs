pub mod boundary;
pub mod spec_model;
