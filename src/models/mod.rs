pub mod summary;
pub mod todo;

pub use summary::{DeliveryReceipt, SendSummaryRequest, SummaryResponse, SummaryTodo};
pub use todo::{
    CreateTodo, DueDateChange, NewTodo, Priority, Todo, TodoChanges, TodoRow, UpdateTodo,
};
