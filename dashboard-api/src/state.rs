use storage::TicketStore;

/// Shared state for all dashboard routes.
#[derive(Clone)]
pub struct AppState {
    pub store: TicketStore,
}

impl AppState {
    pub fn new(store: TicketStore) -> Self {
        Self { store }
    }
}
