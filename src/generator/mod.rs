pub mod pom;
pub mod test_generator;
pub mod values;
