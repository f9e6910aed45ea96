use std::sync::Arc;

use fieldkit_application::{AccessControlService, UserAccessService, UserDirectory};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_access_service: UserAccessService,
    pub access_control_service: AccessControlService,
    pub user_directory: Arc<dyn UserDirectory>,
    pub auth_user_header: String,
}
