use crate::advice::AdviceGateway;
use crate::hub::Hub;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<Mutex<Hub>>,
    pub advice: AdviceGateway,
}

impl AppState {
    pub fn new(hub: Hub, advice: AdviceGateway) -> Self {
        Self {
            hub: Arc::new(Mutex::new(hub)),
            advice,
        }
    }
}
