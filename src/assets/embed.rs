use rust_embed::Embed;

/// Browser client (public; it authenticates its own API calls)
#[derive(Embed)]
#[folder = "web/"]
pub struct WebAssets;
