//! Named worker pool executing tagged tasks; surfaces panics to the
//! logger rather than letting them tear down a worker thread.
//!
//! The `Dispatcher` owns two of these — the request pool and the worker
//! pool — built from plain `std::thread`s rather than an async runtime.
//! A panicking task is caught at the task boundary, logged with the
//! worker's name and index and the task's description, and never
//! propagates.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use tracing::error;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Task {
    description: String,
    job: Job,
}

/// A named pool of worker threads pulling tagged jobs off a shared queue.
pub struct ThreadPool {
    name: Arc<str>,
    sender: Option<Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    pub fn new(name: impl Into<Arc<str>>, size: usize) -> Self {
        let name: Arc<str> = name.into();
        let (sender, receiver): (Sender<Task>, Receiver<Task>) = crossbeam_channel::unbounded();

        let workers = (0..size)
            .map(|index| {
                let receiver = receiver.clone();
                let pool_name = name.clone();
                thread::Builder::new()
                    .name(format!("{pool_name}-{index}"))
                    .spawn(move || worker_loop(&pool_name, index, &receiver))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Self {
            name,
            sender: Some(sender),
            workers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Submits a task. `description` is used only for the log line emitted
    /// if the task panics.
    pub fn execute(&self, description: impl Into<String>, job: impl FnOnce() + Send + 'static) {
        let task = Task {
            description: description.into(),
            job: Box::new(job),
        };
        if let Some(sender) = &self.sender {
            // The pool is never cancelled mid-lifetime in this crate (it is
            // dropped, which joins workers); a disconnected send here would
            // mean a task was submitted after shutdown, which we drop
            // silently rather than panic over.
            let _ = sender.send(task);
        }
    }
}

fn worker_loop(pool_name: &str, index: usize, receiver: &Receiver<Task>) {
    while let Ok(Task { description, job }) = receiver.recv() {
        let result = panic::catch_unwind(AssertUnwindSafe(job));
        if let Err(payload) = result {
            let reason = panic_message(&payload);
            error!(pool = pool_name, worker = index, %description, %reason, "task panicked");
        }
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        // Dropping the sender disconnects the channel, which ends every
        // worker's `recv` loop once pending tasks drain.
        self.sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[test]
    fn runs_submitted_tasks() {
        let pool = ThreadPool::new("test", 2);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..10 {
            let counter = counter.clone();
            pool.execute("increment", move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        drop(pool);
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn panicking_task_does_not_kill_the_pool() {
        let pool = ThreadPool::new("test", 1);
        pool.execute("boom", || panic!("boom"));
        let counter = Arc::new(AtomicUsize::new(0));
        let counter2 = counter.clone();
        pool.execute("survive", move || {
            counter2.fetch_add(1, Ordering::SeqCst);
        });
        // give the worker a moment to process both tasks before drop joins it
        thread::sleep(Duration::from_millis(50));
        drop(pool);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn worker_names_are_tagged_with_pool_and_index() {
        let pool = ThreadPool::new("request", 3);
        assert_eq!(pool.name(), "request");
        assert_eq!(pool.size(), 3);
    }
}
