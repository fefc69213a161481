// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Scripted replay of session events against real or fake collaborators.
//!
//! A script is a JSON array of steps:
//!
//! ```json
//! [
//!   {"type": "color", "value": "#FF0000"},
//!   {"type": "pointer_down", "x": 10, "y": 20},
//!   {"type": "pointer_move", "x": 60, "y": 80},
//!   {"type": "pointer_up"},
//!   {"type": "solve", "deferred": true},
//!   {"type": "pointer_down", "x": 200, "y": 20},
//!   {"type": "flush"}
//! ]
//! ```
//!
//! Requests run as soon as they are issued unless `deferred` is set. A
//! deferred request captures its snapshot immediately but is sent and
//! applied at the next `flush`, which models drawing while a call is in
//! flight.

use crate::client::{Explainer, ImageBlob, SnapshotProvider, Solver};
use crate::error::RequestFailure;
use crate::session::{
    ExplainOutcome, ExplainTicket, Request, SessionController, SessionEvent, SolveOutcome,
    SolveTicket,
};
use crate::theme;
use anyhow::{Context, Result, bail};
use kurbo::Point;
use serde::Deserialize;

/// One scripted step
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayStep {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerCancel,
    Undo,
    Redo,
    Clear,
    Color { value: String },
    Solve {
        #[serde(default)]
        deferred: bool,
    },
    Explain {
        #[serde(default)]
        question: Option<String>,
        #[serde(default)]
        deferred: bool,
    },
    /// Send and apply every deferred request, oldest first
    Flush,
}

impl ReplayStep {
    /// Session event for this step; `None` for driver-only steps
    fn to_event(&self) -> Result<Option<SessionEvent>> {
        Ok(Some(match self {
            ReplayStep::PointerDown { x, y } => SessionEvent::PointerDown(Point::new(*x, *y)),
            ReplayStep::PointerMove { x, y } => SessionEvent::PointerMove(Point::new(*x, *y)),
            ReplayStep::PointerUp => SessionEvent::PointerUp,
            ReplayStep::PointerCancel => SessionEvent::PointerCancel,
            ReplayStep::Undo => SessionEvent::Undo,
            ReplayStep::Redo => SessionEvent::Redo,
            ReplayStep::Clear => SessionEvent::Clear,
            ReplayStep::Color { value } => {
                let Some(color) = theme::palette::parse(value) else {
                    bail!("Unrecognized color {value:?}");
                };
                SessionEvent::ColorChange(color)
            }
            ReplayStep::Solve { .. } => SessionEvent::Solve,
            ReplayStep::Explain { question, .. } => SessionEvent::Explain(question.clone()),
            ReplayStep::Flush => return Ok(None),
        }))
    }

    fn is_deferred(&self) -> bool {
        matches!(
            self,
            ReplayStep::Solve { deferred: true } | ReplayStep::Explain { deferred: true, .. }
        )
    }
}

/// Parse a JSON replay script
pub fn parse_script(json: &str) -> Result<Vec<ReplayStep>> {
    serde_json::from_str(json).context("Invalid replay script")
}

/// What happened to a request during replay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    Solve(SolveOutcome),
    Explain(ExplainOutcome),
}

/// A request whose snapshot is taken but whose call has not been made yet
struct Pending {
    request: Request,
    image: Result<ImageBlob, RequestFailure>,
}

/// Drives a session and performs its requests
pub struct Runner<'a> {
    snapshot: &'a dyn SnapshotProvider,
    solver: &'a dyn Solver,
    explainer: &'a dyn Explainer,
    pending: Vec<Pending>,
}

impl<'a> Runner<'a> {
    pub fn new(
        snapshot: &'a dyn SnapshotProvider,
        solver: &'a dyn Solver,
        explainer: &'a dyn Explainer,
    ) -> Self {
        Self {
            snapshot,
            solver,
            explainer,
            pending: Vec::new(),
        }
    }

    /// Requests issued but not yet applied
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Run every step. Returns the outcome of each applied request in the
    /// order they were applied. Deferred requests left at the end are
    /// flushed.
    pub fn run(
        &mut self,
        session: &mut SessionController,
        steps: &[ReplayStep],
    ) -> Result<Vec<ReplayOutcome>> {
        let mut outcomes = Vec::new();
        for (index, step) in steps.iter().enumerate() {
            let event = step
                .to_event()
                .with_context(|| format!("Step {index}"))?;
            let Some(event) = event else {
                outcomes.extend(self.flush(session));
                continue;
            };

            if let Some(request) = session.dispatch(event) {
                self.issue(session, request);
                if !step.is_deferred() {
                    outcomes.extend(self.flush(session));
                }
            }
        }
        outcomes.extend(self.flush(session));
        Ok(outcomes)
    }

    /// Capture the snapshot for a freshly issued request
    fn issue(&mut self, session: &SessionController, request: Request) {
        let image = self.snapshot.capture(&session.frame());
        self.pending.push(Pending { request, image });
    }

    /// Send and apply every pending request
    pub fn flush(&mut self, session: &mut SessionController) -> Vec<ReplayOutcome> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|pending| match pending.request {
                Request::Solve(ticket) => {
                    ReplayOutcome::Solve(self.perform_solve(session, &ticket, pending.image))
                }
                Request::Explain(ticket) => {
                    ReplayOutcome::Explain(self.perform_explain(session, &ticket, pending.image))
                }
            })
            .collect()
    }

    fn perform_solve(
        &self,
        session: &mut SessionController,
        ticket: &SolveTicket,
        image: Result<ImageBlob, RequestFailure>,
    ) -> SolveOutcome {
        let result = image.and_then(|image| self.solver.solve(&image, &ticket.bindings));
        session.apply_solve(ticket, result)
    }

    fn perform_explain(
        &self,
        session: &mut SessionController,
        ticket: &ExplainTicket,
        image: Result<ImageBlob, RequestFailure>,
    ) -> ExplainOutcome {
        let result = image.and_then(|image| {
            self.explainer
                .explain(&image, &ticket.question, &ticket.history)
        });
        session.apply_explain(ticket, result)
    }
}
