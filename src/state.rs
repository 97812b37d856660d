use std::sync::Arc;

use crate::users::repo::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::users::repo::memory::MemoryUserStore;

        Self::new(Arc::new(MemoryUserStore::default()))
    }
}
