//! Single-consumer task queue for marshalling work onto the main thread.
//!
//! Decoding and file reads may run anywhere, but registry mutations and
//! texture-sink calls must happen on the designated main thread. The host
//! runtime used to provide an implicit "run this later" scheduler for that;
//! here it is an explicit queue: any thread may [`TaskSender::post`] work,
//! and the owner of the [`TaskQueue`] calls [`TaskQueue::drain`] from its
//! main loop, once per tick, to run everything queued so far. The queue is
//! the only synchronization in this crate; the registry itself holds no
//! locks.

use std::sync::mpsc::{channel, Receiver, Sender};

type Task = Box<dyn FnOnce() + Send>;

/// Cloneable handle for posting work from any thread.
#[derive(Clone)]
pub struct TaskSender {
    sender: Sender<Task>,
}

/// The receiving half. Owned by the main loop; not `Send`-shared.
pub struct TaskQueue {
    receiver: Receiver<Task>,
}

/// Creates a connected sender/queue pair.
pub fn task_queue() -> (TaskSender, TaskQueue) {
    let (sender, receiver) = channel();

    (TaskSender { sender }, TaskQueue { receiver })
}

impl TaskSender {
    /// Queues `task` to run on the next drain. If the queue half is gone the
    /// task is dropped with a warning; there is nowhere left to run it.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) {
        if self.sender.send(Box::new(task)).is_err() {
            log::warn!("task queue has shut down; dropping posted task");
        }
    }
}

impl TaskQueue {
    /// Runs every task queued so far on the calling thread, in posting order,
    /// and returns how many ran. Never blocks waiting for new tasks.
    pub fn drain(&self) -> usize {
        let mut ran = 0;

        while let Ok(task) = self.receiver.try_recv() {
            task();
            ran += 1;
        }

        ran
    }
}
