//! Fixed instruction and sampling parameters for the captioning call.

/// System instruction sent with every image.
pub const SYSTEM_PROMPT: &str = "As an AI assistant, your task is to describe and identify the main object in an image. \
Provide a detailed explanation that describes the image but no more than 3 sentences, \
and specify a noun that represents the primary object in the image. \
Ensure that the output strictly adheres to the specified JSON format and does not include any additional keys. \
Always return the result in the following JSON format: {\"description\": \"\", \"entity\": \"\"}. \
Please provide your response in JSON format only, without using triple backticks (```). \
Ensure the output is a valid JSON object.";

/// Content type declared in the data URI, whatever the real image format is.
pub const IMAGE_MIME: &str = "image/jpeg";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.95;
pub const DEFAULT_MAX_TOKENS: u32 = 200;

/// Prompt and sampling knobs passed to the captioner with each record.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSettings {
    pub system_prompt: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            system_prompt: SYSTEM_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}
