use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ShortenParams {
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
}
