mod easing;
mod task_scheduler;
mod timed_task;

pub use easing::Easing;
pub use task_scheduler::{TaskHandle, TaskScheduler};
pub use timed_task::TimedTask;
