use rust_embed::RustEmbed;

use crate::error::ApiError;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

/// The single-page admin dashboard.
pub fn dashboard_html() -> Result<String, ApiError> {
    let page = Assets::get("dashboard.html")
        .ok_or_else(|| anyhow::anyhow!("dashboard.html was not embedded"))?;
    let html = String::from_utf8(page.data.into_owned())
        .map_err(|e| anyhow::anyhow!("dashboard.html is not valid UTF-8: {e}"))?;
    Ok(html)
}
