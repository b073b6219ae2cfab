use axum::{Router, middleware};
use std::sync::Arc;

use crate::incoming::http_axum::middleware::{
    request_id::request_id_middleware,
    upload_quota::{UploadQuota, upload_quota_middleware},
};

pub trait RouterExt<State> {
    fn with_request_id(self) -> Self;
    fn with_upload_quota(self, quota: Arc<UploadQuota>) -> Self;
}

impl<State> RouterExt<State> for Router<State>
where
    State: Clone + Send + Sync + 'static,
{
    fn with_request_id(self) -> Self {
        self.layer(middleware::from_fn(request_id_middleware))
    }

    fn with_upload_quota(self, quota: Arc<UploadQuota>) -> Self {
        self.layer(middleware::from_fn(move |req, next| {
            upload_quota_middleware(Arc::clone(&quota), req, next)
        }))
    }
}
