//! Provisioning sequence orchestration.

pub mod presenter;
pub mod sequencer;

pub use presenter::UiPresenter;
pub use sequencer::{
    Presenter, RunOptions, RunProgress, RunReport, Sequencer, StepRecord, StepStatus,
};
