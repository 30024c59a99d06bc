//! Worker pool for Monte Carlo tasks.
//!
//! Tasks are queued on a crossbeam channel and pulled by named scoped
//! threads; each result travels back tagged with its task index so the
//! caller can restore submission order. Panics are caught per task and
//! reported as [`TaskError::Panicked`]. If a worker thread cannot be
//! spawned the caller thread drains the remaining queue itself.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::error::TaskError;

type Outcome<O> = Result<O, TaskError>;

/// Run `job` over `tasks` on up to `worker_count` threads.
///
/// The returned vector is in task order, one entry per task.
pub(crate) fn execute<T, O, F>(tasks: Vec<T>, worker_count: usize, job: F) -> Vec<Outcome<O>>
where
    T: Send,
    O: Send,
    F: Fn(T) -> Outcome<O> + Sync,
{
    let n = tasks.len();
    let (task_tx, task_rx) = crossbeam_channel::unbounded::<(usize, T)>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, Outcome<O>)>();
    for task in tasks.into_iter().enumerate() {
        // The receiver is alive until the end of this function.
        let _ = task_tx.send(task);
    }
    drop(task_tx);

    let mut slots: Vec<Option<Outcome<O>>> = (0..n).map(|_| None).collect();
    thread::scope(|scope| {
        let mut spawned = 0usize;
        for i in 0..worker_count {
            let rx = task_rx.clone();
            let tx = result_tx.clone();
            let job = &job;
            let spawn = thread::Builder::new()
                .name(format!("cavefrag-mc-{i}"))
                .spawn_scoped(scope, move || worker_loop(rx, tx, job));
            match spawn {
                Ok(_) => spawned += 1,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        spawned,
                        "worker spawn failed, running remaining tasks inline"
                    );
                    worker_loop(task_rx.clone(), result_tx.clone(), job);
                    break;
                }
            }
        }
        if worker_count == 0 {
            worker_loop(task_rx.clone(), result_tx.clone(), &job);
        }
        drop(result_tx);
        for (index, outcome) in result_rx.iter() {
            slots[index] = Some(outcome);
        }
    });

    slots
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| {
                Err(TaskError::Panicked {
                    message: "worker exited before reporting".to_string(),
                })
            })
        })
        .collect()
}

/// Pull tasks until the queue is empty.
fn worker_loop<T, O, F>(
    task_rx: Receiver<(usize, T)>,
    result_tx: Sender<(usize, Outcome<O>)>,
    job: &F,
)
where
    F: Fn(T) -> Outcome<O>,
{
    while let Ok((index, task)) = task_rx.recv() {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| job(task)))
            .unwrap_or_else(|payload| {
                Err(TaskError::Panicked {
                    message: panic_message(payload.as_ref()),
                })
            });
        if result_tx.send((index, outcome)).is_err() {
            break;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavefrag_core::ConfigError;

    #[test]
    fn results_keep_task_order() {
        let tasks: Vec<u64> = (0..100).collect();
        let out = execute(tasks, 4, |x| Ok(x * x));
        for (i, r) in out.into_iter().enumerate() {
            assert_eq!(r.unwrap(), (i * i) as u64);
        }
    }

    #[test]
    fn panics_are_isolated() {
        let out = execute(vec![1, 2, 3, 4], 2, |x: i32| {
            if x == 3 {
                panic!("task three failed");
            }
            Ok(x)
        });
        assert_eq!(out[0], Ok(1));
        assert_eq!(out[1], Ok(2));
        assert_eq!(
            out[2],
            Err(TaskError::Panicked {
                message: "task three failed".into()
            })
        );
        assert_eq!(out[3], Ok(4));
    }

    #[test]
    fn errors_are_reported_per_task() {
        let out = execute(vec![0, 1], 1, |x: u8| {
            if x == 0 {
                Err(TaskError::Config(ConfigError::NoCombinations))
            } else {
                Ok(x)
            }
        });
        assert!(out[0].is_err());
        assert_eq!(out[1], Ok(1));
    }

    #[test]
    fn zero_workers_runs_inline() {
        let out = execute(vec![5, 6], 0, |x: u32| Ok(x + 1));
        assert_eq!(out, vec![Ok(6), Ok(7)]);
    }

    #[test]
    fn empty_task_list() {
        let out: Vec<Outcome<u8>> = execute(Vec::<u8>::new(), 3, Ok);
        assert!(out.is_empty());
    }
}
