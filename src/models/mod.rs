pub mod account;
pub mod todo;

pub use account::Account;
pub use todo::{Todo, TodoInput, TodoStatus};
