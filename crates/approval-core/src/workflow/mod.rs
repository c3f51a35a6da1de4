//! Review workflow: engine, promotion, recovery and the admin desk

pub mod desk;
pub mod engine;
pub mod promotion;
pub mod recovery;

pub use desk::{Notice, NoticeLevel, ReviewDesk};
pub use engine::{ActionOutcome, ApprovalWorkflow};
pub use promotion::build_live_record;
pub use recovery::{RecoveryAction, RecoveryReport, RecoverySweep};
