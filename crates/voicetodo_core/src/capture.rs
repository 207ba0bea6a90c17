//! Ownership of the external speech recognizer.
//!
//! The recognizer and its listening flag live in one session value with an
//! explicit `Idle -> Listening -> Idle` cycle.

use crate::error::AppError;
use log::debug;

/// Callback receiving transcripts while listening. It may fire zero or more
/// times between `start_listening` and `stop_listening`.
pub type TranscriptCallback = Box<dyn FnMut(String) + Send>;

/// Speech-to-text engine supplied by the platform.
pub trait Recognizer {
    fn start_listening(&mut self, on_transcript: TranscriptCallback) -> Result<(), AppError>;

    fn stop_listening(&mut self) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Listening,
}

pub struct CaptureSession<R: Recognizer> {
    recognizer: R,
    state: CaptureState,
}

impl<R: Recognizer> CaptureSession<R> {
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            state: CaptureState::Idle,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == CaptureState::Listening
    }

    pub fn start<F>(&mut self, on_transcript: F) -> Result<(), AppError>
    where
        F: FnMut(String) + Send + 'static,
    {
        if self.state == CaptureState::Listening {
            return Err(AppError::invalid_input("already listening"));
        }

        self.recognizer.start_listening(Box::new(on_transcript))?;
        self.state = CaptureState::Listening;
        debug!("capture session listening");
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), AppError> {
        if self.state == CaptureState::Idle {
            return Err(AppError::invalid_input("not listening"));
        }

        self.recognizer.stop_listening()?;
        self.state = CaptureState::Idle;
        debug!("capture session idle");
        Ok(())
    }

    pub fn into_inner(self) -> R {
        self.recognizer
    }
}
