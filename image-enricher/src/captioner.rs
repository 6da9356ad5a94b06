//! Captioning seam between the pipeline and the vision model client.

use std::{future::Future, pin::Pin};

use vision_llm_service::{ProviderErrorKind, VisionChatRequest, VisionChatService, VisionLlmError};

use crate::{error::EnrichError, prompt::PromptSettings};

/// Produces raw model text for one inlined image.
///
/// The text is returned undecoded; validation happens in [`crate::caption::parse_caption`].
pub trait ImageCaptioner: Send + Sync {
    fn caption<'a>(
        &'a self,
        image_data_uri: &'a str,
        settings: &'a PromptSettings,
    ) -> Pin<Box<dyn Future<Output = Result<String, EnrichError>> + Send + 'a>>;
}

impl ImageCaptioner for VisionChatService {
    fn caption<'a>(
        &'a self,
        image_data_uri: &'a str,
        settings: &'a PromptSettings,
    ) -> Pin<Box<dyn Future<Output = Result<String, EnrichError>> + Send + 'a>> {
        Box::pin(async move {
            let request = VisionChatRequest {
                system_prompt: &settings.system_prompt,
                image_data_uri,
                temperature: Some(settings.temperature),
                top_p: Some(settings.top_p),
                max_tokens: Some(settings.max_tokens),
            };
            self.describe(request).await.map_err(model_error)
        })
    }
}

/// A reply that arrived but carried no usable text is the model's fault, not the call's.
fn model_error(err: VisionLlmError) -> EnrichError {
    match err {
        VisionLlmError::Provider(p)
            if matches!(
                p.kind,
                ProviderErrorKind::Decode(_) | ProviderErrorKind::EmptyChoices
            ) =>
        {
            EnrichError::MalformedModelOutput(p.to_string())
        }
        other => EnrichError::ModelCall(other.to_string()),
    }
}
