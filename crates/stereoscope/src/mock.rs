//! Scriptable tracking provider and presenter for tests and demos.

use std::collections::VecDeque;

use stereoscope_core::{
    DevicePresenter, FrameSubmission, StereoError, SubmitError, TrackingError, TrackingProvider,
    ViewerPose, FALLBACK_DISPLAY_SIZE,
};

/// What the mock tracker reports for one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingStep {
    /// The viewer is not connected.
    Unavailable,
    /// The viewer is connected at this pose.
    Pose(ViewerPose),
    /// The viewer is connected but the pose query fails.
    Fail(TrackingError),
}

/// A tracking provider that replays a script, one step per frame.
///
/// Each `is_available` call starts a new frame and advances the script; once
/// the script runs out the last step repeats.
#[derive(Debug, Clone)]
pub struct MockTracker {
    script: VecDeque<TrackingStep>,
    current: TrackingStep,
    frames: u64,
}

impl Default for MockTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTracker {
    /// A tracker that is never available.
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            current: TrackingStep::Unavailable,
            frames: 0,
        }
    }

    /// A tracker that is always available at `pose`.
    pub fn tracking(pose: ViewerPose) -> Self {
        let mut tracker = Self::new();
        tracker.current = TrackingStep::Pose(pose);
        tracker
    }

    /// A tracker that replays `steps`, then repeats the last one.
    pub fn scripted(steps: impl IntoIterator<Item = TrackingStep>) -> Self {
        Self {
            script: steps.into_iter().collect(),
            ..Self::new()
        }
    }

    /// Appends a step to the script.
    pub fn push(&mut self, step: TrackingStep) {
        self.script.push_back(step);
    }

    /// Replaces the script with a single repeating step.
    pub fn set(&mut self, step: TrackingStep) {
        self.script.clear();
        self.current = step;
    }

    /// Number of frames started so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl TrackingProvider for MockTracker {
    fn is_available(&mut self) -> bool {
        self.frames += 1;
        if let Some(step) = self.script.pop_front() {
            self.current = step;
        }
        !matches!(self.current, TrackingStep::Unavailable)
    }

    fn pose(&mut self) -> Result<ViewerPose, TrackingError> {
        match &self.current {
            TrackingStep::Unavailable => Err(TrackingError::Unavailable),
            TrackingStep::Pose(pose) => Ok(*pose),
            TrackingStep::Fail(e) => Err(e.clone()),
        }
    }
}

/// A presenter that records every accepted frame.
///
/// Failures can be queued to reject upcoming submission attempts in order.
#[derive(Debug, Clone)]
pub struct RecordingPresenter {
    submissions: Vec<FrameSubmission>,
    failures: VecDeque<SubmitError>,
    attempts: u64,
    display: Option<(u32, u32)>,
}

impl Default for RecordingPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPresenter {
    /// A presenter that accepts everything and reports the fallback display size.
    pub fn new() -> Self {
        Self {
            submissions: Vec::new(),
            failures: VecDeque::new(),
            attempts: 0,
            display: Some(FALLBACK_DISPLAY_SIZE),
        }
    }

    /// Sets the reported display size; `None` makes the query fail.
    #[must_use]
    pub fn with_display(mut self, display: Option<(u32, u32)>) -> Self {
        self.display = display;
        self
    }

    /// Rejects the next submission attempt with `error`.
    pub fn fail_next(&mut self, error: SubmitError) {
        self.failures.push_back(error);
    }

    /// Accepted frames, oldest first.
    pub fn submissions(&self) -> &[FrameSubmission] {
        &self.submissions
    }

    /// The most recently accepted frame.
    pub fn last(&self) -> Option<&FrameSubmission> {
        self.submissions.last()
    }

    /// Submission attempts, accepted or not.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }
}

impl DevicePresenter for RecordingPresenter {
    fn submit_frame(&mut self, frame: &FrameSubmission) -> Result<(), SubmitError> {
        self.attempts += 1;
        if let Some(error) = self.failures.pop_front() {
            return Err(error);
        }
        if !frame.has_textures() {
            return Err(SubmitError::InvalidHandle);
        }
        self.submissions.push(*frame);
        Ok(())
    }

    fn query_display_dimensions(&mut self) -> Result<(u32, u32), StereoError> {
        self.display
            .ok_or_else(|| StereoError::DisplayQuery("mock display disconnected".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use stereoscope_core::{Pose, ViewerSource};

    #[test]
    fn test_script_advances_per_frame_and_repeats_last() {
        let pose = Pose::new(Vec3::Y, Quat::IDENTITY);
        let mut tracker = MockTracker::scripted([
            TrackingStep::Unavailable,
            TrackingStep::Fail(TrackingError::Timeout),
            TrackingStep::Pose(pose),
        ]);
        let fallback = Pose::IDENTITY;

        let a = ViewerSource::select(&mut tracker, &fallback);
        assert!(!a.available);
        let b = ViewerSource::select(&mut tracker, &fallback);
        assert!(b.available);
        assert!(!b.source.is_tracked());
        for _ in 0..3 {
            let c = ViewerSource::select(&mut tracker, &fallback);
            assert_eq!(c.source, ViewerSource::Tracked(pose));
        }
        assert_eq!(tracker.frames(), 5);
    }

    #[test]
    fn test_display_query_failure() {
        let mut presenter = RecordingPresenter::new().with_display(None);
        assert!(presenter.query_display_dimensions().is_err());
    }
}
