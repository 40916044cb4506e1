//! Seam between the flows and the model backend.

use serde_json::Value;

use crate::error::Result;
use crate::template::RenderedPrompt;

/// One structured-output generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: RenderedPrompt,
    /// JSON schema the model output must follow.
    pub response_schema: Value,
}

/// Anything that can turn a prompt into model text.
///
/// Returned text is expected to be a JSON document matching
/// `request.response_schema`.
pub trait TextGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

impl<G: TextGenerator + ?Sized> TextGenerator for &G {
    fn generate(&self, request: &GenerationRequest) -> Result<String> {
        (**self).generate(request)
    }
}
