// SPDX-License-Identifier: MIT OR Apache-2.0
//! Runs a scene on the logical clock.
//!
//! Each frame the runner applies due script steps, reports timeline events,
//! and prints the composed text whenever it changed. It stops once the
//! script is exhausted and nothing is left in flight.

use crate::error::AppError;
use crate::scene::{Scene, ScriptStep};
use crate::text::compose;
use std::collections::VecDeque;
use std::io::Write;
use steptimeline_sequencer::{GotoOutcome, Millis, TimelineEvent, TimelineView};

/// Default frame step (about 60 fps)
pub const DEFAULT_FRAME: Millis = Millis(16);

/// How a scene is run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    /// Clock step between frames
    pub frame: Millis,
    /// Print each navigation plan as JSON
    pub plan_json: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            frame: DEFAULT_FRAME,
            plan_json: false,
        }
    }
}

/// What happened during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames whose text differed from the previous one
    pub frames_printed: usize,
    /// Committed steps, in commit order
    pub settled: Vec<usize>,
    /// Commits dropped because a newer navigation was issued
    pub stale_dropped: usize,
    /// Clock time when the run ended
    pub finished_at: Millis,
    /// Settled step at the end
    pub final_index: usize,
}

/// Drives one scene
pub struct Runner {
    view: TimelineView<String>,
    script: VecDeque<ScriptStep>,
    settings: RunSettings,
}

impl Runner {
    /// Mount the scene's timeline
    pub fn new(scene: &Scene, settings: RunSettings) -> Result<Self, AppError> {
        if settings.frame == Millis::ZERO {
            return Err(AppError::Settings("frame step must be at least 1ms".to_string()));
        }
        let view = TimelineView::mount(scene.text_items(), scene.options.clone())?;
        let mut script: Vec<_> = scene.script.clone();
        script.sort_by_key(|s| s.at);
        Ok(Self {
            view,
            script: script.into(),
            settings,
        })
    }

    /// Run to completion, writing frames (and plans) to `out`
    pub fn run(&mut self, out: &mut impl Write) -> Result<RunSummary, AppError> {
        let timeline = self.view.timeline().clone();
        let mut summary = RunSummary::default();
        let mut last_text = String::new();

        loop {
            let now = timeline.now();
            self.apply_due_steps(now, &mut *out)?;

            for event in timeline.take_events() {
                match event {
                    TimelineEvent::Settled { index, at, .. } => {
                        tracing::info!("Step {index} settled at {at}");
                        summary.settled.push(index);
                    }
                    TimelineEvent::StaleCommitDropped { index, at, .. } => {
                        tracing::warn!("Commit of step {index} at {at} was overtaken");
                        summary.stale_dropped += 1;
                    }
                }
            }

            let text = compose(&self.view, &self.view.frame());
            if text != last_text {
                writeln!(out, "t={now}")?;
                write!(out, "{text}")?;
                summary.frames_printed += 1;
                last_text = text;
            }

            if self.script.is_empty() && !timeline.is_settling() {
                break;
            }

            // Land exactly on the next script step if it falls inside this frame
            let mut next = now + self.settings.frame;
            if let Some(step) = self.script.front() {
                next = next.min(step.at);
            }
            timeline.advance_to(next);
        }

        summary.finished_at = timeline.now();
        summary.final_index = timeline.active_index();
        Ok(summary)
    }

    fn apply_due_steps(&mut self, now: Millis, out: &mut impl Write) -> Result<(), AppError> {
        while self.script.front().is_some_and(|s| s.at <= now) {
            let Some(step) = self.script.pop_front() else {
                break;
            };
            match self.view.timeline().goto(step.goto)? {
                GotoOutcome::NoOp => {
                    tracing::info!("goto({}) at {now}: already there", step.goto);
                }
                GotoOutcome::Scheduled { navigation, plan } => {
                    tracing::info!(
                        "goto({}) at {now}: {} -> {}, settles at {}",
                        step.goto,
                        navigation.from,
                        navigation.to,
                        navigation.commit_at
                    );
                    if self.settings.plan_json {
                        writeln!(out, "{}", serde_json::to_string(&plan)?)?;
                    }
                }
            }
        }
        Ok(())
    }
}
