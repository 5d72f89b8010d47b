use crate::state::SearchResult;

/// Route under which the service mounts its image directory.
pub const IMAGE_ROUTE: &str = "/images/";

/// Derives the thumbnail URL of a result. A server-provided `image_path` under
/// [`IMAGE_ROUTE`] wins; otherwise the URL is built from the filename.
#[derive(Clone, Debug)]
pub struct ImageLocationResolver {
    base: String,
}

impl ImageLocationResolver {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn resolve(&self, result: &SearchResult) -> String {
        if result.image_path.starts_with(IMAGE_ROUTE) {
            format!("{}{}", self.base, result.image_path)
        } else {
            format!("{}{}{}", self.base, IMAGE_ROUTE, result.filename)
        }
    }
}
