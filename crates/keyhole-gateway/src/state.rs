use std::sync::Arc;

use crate::auth::ApiKeySet;
use keyhole_resolver::Resolver;

#[derive(Clone)]
pub struct AppState {
    resolver: Arc<dyn Resolver>,
    api_keys: Arc<ApiKeySet>,
}

impl AppState {
    pub fn new(resolver: Arc<dyn Resolver>, api_keys: ApiKeySet) -> Self {
        Self {
            resolver,
            api_keys: Arc::new(api_keys),
        }
    }

    pub fn resolver(&self) -> &dyn Resolver {
        self.resolver.as_ref()
    }

    pub fn api_keys(&self) -> &ApiKeySet {
        &self.api_keys
    }
}
