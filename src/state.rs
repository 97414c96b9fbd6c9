use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tokio::sync::Mutex;

use crate::store::DayImageStore;
use crate::viewer::DayViewer;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub store: DayImageStore,
    pub viewer: Arc<Mutex<DayViewer>>,
}

impl AppState {
    pub fn new(store: DayImageStore, viewer: DayViewer) -> Self {
        Self {
            store,
            viewer: Arc::new(Mutex::new(viewer)),
        }
    }
}
