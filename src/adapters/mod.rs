// Adapters layer: concrete HTTP clients behind the domain ports, plus scripted doubles.

pub mod gemini;
pub mod mock;
pub mod places;
pub mod whatsapp;

pub use gemini::GeminiClient;
pub use places::GooglePlacesClient;
pub use whatsapp::WhatsAppGatewayClient;
