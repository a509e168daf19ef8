//! AI collaborator adapters.
//!
//! Only scripted implementations ship with the crate; production clients
//! implement the same ports out of tree.

mod mock;

pub use mock::{MockSafetyJudge, MockSpeechToText, MockTextToSpeech};
