//! A [`SystemRunner`] that records tasks instead of running them.

use std::cell::RefCell;

use super::{SystemRunner, SystemTask};
use crate::error::{KioskError, Result};

/// Records every task; optionally fails tasks matching a predicate.
#[derive(Default)]
pub struct RecordingRunner {
    tasks: RefCell<Vec<SystemTask>>,
    failing: Vec<Box<dyn Fn(&SystemTask) -> bool>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make tasks matching `predicate` fail with a non-zero exit.
    pub fn fail_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&SystemTask) -> bool + 'static,
    {
        self.failing.push(Box::new(predicate));
        self
    }

    /// Tasks run so far, in order.
    pub fn tasks(&self) -> Vec<SystemTask> {
        self.tasks.borrow().clone()
    }

    /// Packages passed to every install task, flattened.
    pub fn installed(&self) -> Vec<String> {
        self.tasks
            .borrow()
            .iter()
            .filter_map(|t| match t {
                SystemTask::Install(packages) => Some(packages.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

impl SystemRunner for RecordingRunner {
    fn run(&self, task: &SystemTask) -> Result<()> {
        self.tasks.borrow_mut().push(task.clone());
        if self.failing.iter().any(|f| f(task)) {
            return Err(KioskError::CommandFailed {
                command: task.to_string(),
                code: Some(100),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let runner = RecordingRunner::new();
        runner.run(&SystemTask::UpdateIndex).unwrap();
        runner.run(&SystemTask::Install(vec!["labwc".into()])).unwrap();

        assert_eq!(
            runner.tasks(),
            vec![SystemTask::UpdateIndex, SystemTask::Install(vec!["labwc".into()])]
        );
        assert_eq!(runner.installed(), vec!["labwc"]);
    }

    #[test]
    fn fails_matching_tasks_but_still_records() {
        let runner = RecordingRunner::new().fail_when(|t| matches!(t, SystemTask::Upgrade));
        assert!(runner.run(&SystemTask::Upgrade).is_err());
        assert!(runner.run(&SystemTask::UpdateIndex).is_ok());
        assert_eq!(runner.tasks().len(), 2);
    }
}
