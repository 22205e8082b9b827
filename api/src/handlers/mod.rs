pub mod error;

pub use error::{
    forbidden_response, handle_domain_error, invalid_code_response, json_error_handler,
    partial_activation_response, validation_error_response,
};
