use log::trace;

use crate::{
    tasks::{easing::Easing, timed_task::TimedTask},
    Tick,
};

/// Identifies a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u32);

/// Timed tasks advanced once per tick. Completed tasks hand their payload
/// back to the caller, which performs the state transition.
pub struct TaskScheduler<T> {
    tasks: Vec<(TaskHandle, TimedTask<T>)>,
    next_handle: u32,
}

impl<T> TaskScheduler<T> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_handle: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn schedule(&mut self, now: Tick, duration: u16, easing: Easing, payload: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.tasks
            .push((handle, TimedTask::new(now, duration, easing, payload)));
        handle
    }

    pub fn cancel(&mut self, handle: TaskHandle) -> Option<T> {
        let position = self.tasks.iter().position(|(id, _)| *id == handle)?;
        Some(self.tasks.remove(position).1.payload)
    }

    /// Drops every task whose payload matches.
    pub fn cancel_where<F: Fn(&T) -> bool>(&mut self, predicate: F) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|(_, task)| !predicate(&task.payload));
        before - self.tasks.len()
    }

    pub fn progress(&self, handle: TaskHandle, now: Tick) -> Option<f32> {
        self.tasks
            .iter()
            .find(|(id, _)| *id == handle)
            .map(|(_, task)| task.progress(now))
    }

    /// Removes and returns the payloads of tasks complete at `now`, in the
    /// order they were scheduled.
    pub fn advance(&mut self, now: Tick) -> Vec<T> {
        let mut completed = Vec::new();
        let mut index = 0;
        while index < self.tasks.len() {
            if self.tasks[index].1.is_complete(now) {
                completed.push(self.tasks.remove(index).1.payload);
            } else {
                index += 1;
            }
        }
        if !completed.is_empty() {
            trace!("TaskScheduler: {} task(s) completed at tick {}", completed.len(), now);
        }
        completed
    }
}

impl<T> Default for TaskScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
