//! Input sources
//!
//! The frame loop polls an [`InputSource`] once per frame. The Win32 window
//! implements it on Windows; [`ScriptedInput`] replays a fixed key script for
//! headless runs and tests.

use std::collections::VecDeque;

use thiserror::Error;

use crate::input::keyboard::InputEvent;

/// Anything that can deliver input to the frame loop
pub trait InputSource {
    /// Returns the events that arrived since the previous poll, in order
    fn poll(&mut self) -> Vec<InputEvent>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown script step '{0}'")]
    UnknownStep(String),
    #[error("invalid argument in script step '{0}'")]
    InvalidArgument(String),
}

/// One frame's worth of scripted input
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScriptStep {
    Events(Vec<InputEvent>),
    /// Number of frames with no input
    Idle(u32),
}

/// Replays a comma-separated key script, one step per frame
///
/// Steps are event names (`right`, `trigger`, `mode`, `7`, ...) plus two
/// compound forms:
/// - `launch:N` selects slot N and launches it in the same frame
/// - `wait:N` idles for N frames
///
/// Once the script is exhausted every poll returns `Quit`.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    steps: VecDeque<ScriptStep>,
}

impl ScriptedInput {
    pub fn parse(script: &str) -> Result<Self, ScriptError> {
        let mut steps = VecDeque::new();

        for raw in script.split(',') {
            let token = raw.trim();
            if token.is_empty() {
                continue;
            }

            let step = match token.split_once(':') {
                Some((name, arg)) => {
                    let arg: u32 = arg
                        .trim()
                        .parse()
                        .map_err(|_| ScriptError::InvalidArgument(token.to_string()))?;
                    match name.trim().to_ascii_lowercase().as_str() {
                        "wait" => ScriptStep::Idle(arg),
                        "launch" if (1..=9).contains(&arg) => {
                            ScriptStep::Events(vec![
                                InputEvent::DirectSelect(arg as u8),
                                InputEvent::Launch,
                            ])
                        }
                        "launch" => return Err(ScriptError::InvalidArgument(token.to_string())),
                        _ => return Err(ScriptError::UnknownStep(token.to_string())),
                    }
                }
                None => {
                    let event = InputEvent::from_name(token)
                        .ok_or_else(|| ScriptError::UnknownStep(token.to_string()))?;
                    ScriptStep::Events(vec![event])
                }
            };
            steps.push_back(step);
        }

        Ok(Self { steps })
    }

    pub fn is_exhausted(&self) -> bool {
        self.steps.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        loop {
            match self.steps.pop_front() {
                None => return vec![InputEvent::Quit],
                Some(ScriptStep::Idle(0)) => continue,
                Some(ScriptStep::Idle(frames)) => {
                    if frames > 1 {
                        self.steps.push_front(ScriptStep::Idle(frames - 1));
                    }
                    return Vec::new();
                }
                Some(ScriptStep::Events(events)) => return events,
            }
        }
    }
}
