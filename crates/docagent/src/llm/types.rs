//! Request types shared by LLM clients.

/// Inline image attached to a chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub mime_type: String,
    pub base64: String,
}

impl ImageInput {
    /// Builds an image input, sniffing the MIME type from the base64 prefix.
    pub fn from_base64(base64: impl Into<String>) -> Self {
        let base64 = base64.into();
        let mime_type = sniff_image_mime(&base64).to_string();
        Self { mime_type, base64 }
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Guesses an image MIME type from the first bytes of its base64 encoding.
pub fn sniff_image_mime(base64: &str) -> &'static str {
    let head = base64.trim_start();
    if head.starts_with("iVBOR") {
        "image/png"
    } else if head.starts_with("R0lGOD") {
        "image/gif"
    } else if head.starts_with("UklGR") {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

/// A single-turn chat completion request.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub system: Option<String>,
    pub user: String,
    pub image: Option<ImageInput>,
    /// Ask the provider for a JSON object response.
    pub json_mode: bool,
    /// Overrides the client's default model.
    pub model: Option<String>,
}

impl ChatRequest {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ..Default::default()
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_image(mut self, image: ImageInput) -> Self {
        self.image = Some(image);
        self
    }

    pub fn json(mut self) -> Self {
        self.json_mode = true;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
