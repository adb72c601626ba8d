pub mod code;
pub mod extractor;
pub mod password;
pub mod token;
