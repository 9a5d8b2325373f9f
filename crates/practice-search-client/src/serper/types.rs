use serde::{Deserialize, Serialize};

use crate::types::RawSearchHit;

#[derive(Debug, Clone, Serialize)]
pub struct SerperRequest<'a> {
    pub q: &'a str,
    pub num: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SerperResponse {
    #[serde(default)]
    pub organic: Vec<SerperOrganic>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SerperOrganic {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl SerperOrganic {
    pub fn into_hit(self) -> Option<RawSearchHit> {
        let link = self.link?;
        RawSearchHit::from_provider(self.title, &link)
    }
}
