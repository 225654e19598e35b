use crate::remote::RemoteDrive;
use crate::store::AttendanceStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<AttendanceStore>>,
    pub drive: Option<Arc<dyn RemoteDrive>>,
}

impl AppState {
    pub fn new(store: AttendanceStore, drive: Option<Arc<dyn RemoteDrive>>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            drive,
        }
    }
}
