use std::sync::Arc;

use tracing::{info, instrument, warn};

use models::post;
use crate::blog::input::PostInput;
use crate::blog::repository::BlogRepository;
use crate::errors::ServiceError;
use crate::uploader::ImageHost;

/// An image file attached to the post form.
#[derive(Clone, Debug)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

/// Application service combining the repository with the image host.
///
/// Creating a post with an image is two steps: upload, then insert. When the
/// insert fails the uploaded image is destroyed again; if that cleanup fails
/// the image is left orphaned on the host and a warning is logged.
pub struct BlogService {
    repo: Arc<dyn BlogRepository>,
    images: Arc<dyn ImageHost>,
}

impl BlogService {
    pub fn new(repo: Arc<dyn BlogRepository>, images: Arc<dyn ImageHost>) -> Self {
        Self { repo, images }
    }

    /// Plain data access for read paths and deletes.
    pub fn repo(&self) -> &dyn BlogRepository {
        self.repo.as_ref()
    }

    #[instrument(skip(self, input, image), fields(has_image = image.is_some()))]
    pub async fn create_post(&self, mut input: PostInput, image: Option<ImageUpload>) -> Result<post::Model, ServiceError> {
        let uploaded = match image {
            Some(img) => Some(self.images.upload(img.bytes, &img.file_name).await?),
            None => None,
        };
        input.feature_image = uploaded.as_ref().map(|u| u.url.clone()).unwrap_or_default();

        match self.repo.add_post(input).await {
            Ok(created) => Ok(created),
            Err(e) => {
                if let Some(img) = uploaded {
                    match self.images.destroy(&img.public_id).await {
                        Ok(()) => info!(public_id = %img.public_id, event = "image_rolled_back", "removed image of failed post"),
                        Err(cleanup) => warn!(public_id = %img.public_id, error = %cleanup, event = "image_orphaned", "could not remove image of failed post"),
                    }
                }
                Err(e)
            }
        }
    }
}
