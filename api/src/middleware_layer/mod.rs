pub mod function_key;
pub mod json_extractor;
