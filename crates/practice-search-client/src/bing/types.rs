use serde::Deserialize;

use crate::types::RawSearchHit;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BingResponse {
    #[serde(default)]
    pub web_pages: Option<BingWebPages>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BingWebPages {
    #[serde(default)]
    pub value: Vec<BingWebPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BingWebPage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl BingWebPage {
    pub fn into_hit(self) -> Option<RawSearchHit> {
        let url = self.url?;
        RawSearchHit::from_provider(self.name, &url)
    }
}
