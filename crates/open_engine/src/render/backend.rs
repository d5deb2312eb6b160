//! Backend abstraction for the rendering system

use super::{CommandBatch, DrawCommand, RenderError};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Receiver of draw commands
///
/// Implement this over a graphics API to put pixels on screen. Frame
/// boundaries are optional hooks.
pub trait RenderBackend {
    /// Called before the first view of a frame is drawn
    fn begin_frame(&mut self) -> BackendResult<()> {
        Ok(())
    }

    /// Execute or record one command
    fn submit(&mut self, command: DrawCommand) -> BackendResult<()>;

    /// Called after the last view of a frame is drawn
    fn end_frame(&mut self) -> BackendResult<()> {
        Ok(())
    }
}

/// Backend that keeps the commands of the current frame in memory
///
/// Useful for headless runs and for inspecting what a scene would draw.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    batch: CommandBatch,
    frames: u64,
    in_frame: bool,
}

impl CommandRecorder {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the current (or last) frame began
    pub fn commands(&self) -> &CommandBatch {
        &self.batch
    }

    /// Take the recorded commands, leaving the recorder empty
    pub fn take(&mut self) -> CommandBatch {
        std::mem::take(&mut self.batch)
    }

    /// Number of completed frames
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderBackend for CommandRecorder {
    fn begin_frame(&mut self) -> BackendResult<()> {
        if self.in_frame {
            return Err(RenderError::Backend("Frame already in progress".into()));
        }
        self.in_frame = true;
        self.batch.clear();
        Ok(())
    }

    fn submit(&mut self, command: DrawCommand) -> BackendResult<()> {
        self.batch.add(command);
        Ok(())
    }

    fn end_frame(&mut self) -> BackendResult<()> {
        if !self.in_frame {
            return Err(RenderError::Backend("No frame in progress".into()));
        }
        self.in_frame = false;
        self.frames += 1;
        log::trace!("Recorded frame {} with {} commands", self.frames, self.batch.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_frames() {
        let mut recorder = CommandRecorder::new();
        recorder.begin_frame().unwrap();
        recorder.submit(DrawCommand::PopMatrix).unwrap();
        recorder.end_frame().unwrap();
        assert_eq!(recorder.frames(), 1);
        assert_eq!(recorder.commands().len(), 1);

        recorder.begin_frame().unwrap();
        assert!(recorder.commands().is_empty());
        assert!(recorder.begin_frame().is_err());
    }

    #[test]
    fn test_end_without_begin_fails() {
        let mut recorder = CommandRecorder::new();
        assert_eq!(
            recorder.end_frame(),
            Err(RenderError::Backend("No frame in progress".into()))
        );
    }
}
