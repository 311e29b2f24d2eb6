use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::NewsPost;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNewsRequest {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

/// Absent fields are left alone; an empty `image_url` removes the image.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateNewsRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct NewsList {
    #[schema(value_type = Vec<NewsPost>)]
    pub items: Vec<NewsPost>,
}
