pub mod router;

pub use router::{AJAX_PATH, AppState, CREATE_OBS_ACTION, router};
