pub mod validation;

pub use validation::{FieldError, ValidationErrors};
