//! Safety check execution: photo and voice evidence judged by AI.

mod execute_check;
mod prompt;

pub use execute_check::{
    CheckServices, CheckSettings, ExecuteCheckCommand, ExecuteCheckHandler, ExecuteCheckResult,
    SpokenConfirmation,
};
pub use prompt::{sop_outline, verification_prompt};
