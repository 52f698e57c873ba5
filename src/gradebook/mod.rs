pub mod storage;
pub mod types;
pub mod validation;

pub use storage::{get_gradebook_path, load_gradebook, save_gradebook};
pub use types::GradeBook;
pub use validation::{EntryError, Field};
