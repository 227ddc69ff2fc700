pub mod error;
pub mod message;
pub mod traits;

pub use error::TriageError;
pub use message::{
    Condition, HandoffMessage, PatientDataSummary, ResetRequest, Role, TurnRequest, TurnResponse,
};
pub use traits::{ConfirmationGate, KeyValueStore, StaticAnswer, Transport};
