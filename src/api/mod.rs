pub mod handlers;

pub use handlers::{processar_nota, root, AppState};
