pub mod delete;
pub mod list;
pub mod update;
pub mod upload;

pub use delete::delete;
pub use list::{cbse_list, list, stateboard_list};
pub use update::update;
pub use upload::upload;
