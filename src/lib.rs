pub mod error;
pub mod handler;
pub mod model;
pub mod route;
pub mod schema;
pub mod sort;
pub mod stats;
pub mod store;

use store::TodoStore;

// Struct representing the application state
pub struct AppState {
    pub store: Box<dyn TodoStore>,
}
