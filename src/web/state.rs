use std::sync::Arc;

use crate::auth::TokenService;
use crate::service::ActivityService;
use crate::storage::ActivityRepository;
use crate::validation::Validators;

#[derive(Clone)]
pub struct AppState {
    pub activities: ActivityService,
    pub tokens: TokenService,
    pub validators: Arc<Validators>,
}

impl AppState {
    pub fn new(repo: Arc<dyn ActivityRepository>, tokens: TokenService) -> Self {
        Self {
            activities: ActivityService::new(repo),
            tokens,
            validators: Arc::new(Validators::default()),
        }
    }
}
