// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Session controller - owns the drawing, overlays, bindings and chat log
//!
//! The controller is the single writer of all session state. It is
//! sans-IO: `dispatch` turns input events into state changes and, for solve
//! and explain, into request tickets. The driver performs the request and
//! hands the result back through `apply_solve` / `apply_explain`. Events
//! may keep arriving in between, which is how drawing continues while a
//! request is in flight.

mod bindings;
mod chat;
mod event;

pub use bindings::VariableBindings;
pub use chat::{ChatEntry, ChatRole};
pub use event::{ExplainTicket, Request, SessionEvent, SolveTicket};

use crate::anchor::{Overlay, anchor_for};
use crate::client::SolveItem;
use crate::error::RequestFailure;
use crate::geometry::Segment;
use crate::history::ActionHistory;
use crate::render::{DrawCommand, RenderStyle, project};
use crate::settings;
use crate::theme;
use chrono::{DateTime, Local};
use kurbo::Point;
use peniko::Color;
use serde::Deserialize;

// ============================================================================
// OPTIONS
// ============================================================================

/// What to do with a response whose request predates later drawing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Apply anyway, anchoring to whatever action is current now
    #[default]
    Apply,
    /// Drop the response
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub anchor_margin: f64,
    pub stale_policy: StalePolicy,
    pub style: RenderStyle,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            anchor_margin: settings::anchor::MARGIN,
            stale_policy: StalePolicy::default(),
            style: RenderStyle::default(),
        }
    }
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// Non-fatal, user-visible report of a failed request
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub at: DateTime<Local>,
}

impl Notice {
    fn new(message: String) -> Self {
        Self {
            message,
            at: Local::now(),
        }
    }

    /// Message with a short local timestamp, for a status line
    pub fn display(&self) -> String {
        format!("[{}] {}", self.at.format("%I:%M %p"), self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    Applied {
        overlays_added: usize,
        bindings_assigned: usize,
    },
    /// Request failed; nothing changed except the notice
    Failed,
    /// Response was stale and the policy said to drop it
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplainOutcome {
    Applied,
    Failed,
    Discarded,
}

// ============================================================================
// CONTROLLER
// ============================================================================

#[derive(Debug, Clone)]
pub struct SessionController {
    history: ActionHistory,
    overlays: Vec<Overlay>,
    bindings: VariableBindings,
    chat: Vec<ChatEntry>,
    latest_explanation: Option<String>,

    /// Brush color for new segments
    color: Color,
    /// Last pointer position while a gesture is in progress
    pen: Option<Point>,

    solving: bool,
    explaining: bool,

    /// Bumped on every history mutation, stamped on tickets
    generation: u64,

    notice: Option<Notice>,
    options: SessionOptions,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl SessionController {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            history: ActionHistory::new(),
            overlays: Vec::new(),
            bindings: VariableBindings::new(),
            chat: Vec::new(),
            latest_explanation: None,
            color: theme::stroke::DEFAULT,
            pen: None,
            solving: false,
            explaining: false,
            generation: 0,
            notice: None,
            options,
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn bindings(&self) -> &VariableBindings {
        &self.bindings
    }

    pub fn chat(&self) -> &[ChatEntry] {
        &self.chat
    }

    pub fn latest_explanation(&self) -> Option<&str> {
        self.latest_explanation.as_deref()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_drawing(&self) -> bool {
        self.pen.is_some()
    }

    pub fn is_solving(&self) -> bool {
        self.solving
    }

    pub fn is_explaining(&self) -> bool {
        self.explaining
    }

    pub fn is_idle(&self) -> bool {
        !self.solving && !self.explaining
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Full frame to draw after clearing the surface
    pub fn frame(&self) -> Vec<DrawCommand> {
        project(
            self.history.visible_actions(),
            &self.overlays,
            &self.options.style,
        )
    }

    // ========================================================================
    // EVENT DISPATCH
    // ========================================================================

    /// Apply one input event. Returns a request when the event starts a
    /// solve or explain call.
    pub fn dispatch(&mut self, event: SessionEvent) -> Option<Request> {
        match event {
            SessionEvent::PointerDown(pos) => {
                self.pointer_down(pos);
                None
            }
            SessionEvent::PointerMove(pos) => {
                self.pointer_move(pos);
                None
            }
            SessionEvent::PointerUp | SessionEvent::PointerCancel => {
                self.pen = None;
                None
            }
            SessionEvent::Undo => {
                self.undo();
                None
            }
            SessionEvent::Redo => {
                self.redo();
                None
            }
            SessionEvent::Clear => {
                self.clear();
                None
            }
            SessionEvent::ColorChange(color) => {
                self.color = color;
                None
            }
            SessionEvent::Solve => self.request_solve().map(Request::Solve),
            SessionEvent::Explain(question) => {
                self.request_explain(question).map(Request::Explain)
            }
        }
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
    }

    fn pointer_down(&mut self, pos: Point) {
        self.history.begin_action();
        self.pen = Some(pos);
        self.bump_generation();
        tracing::debug!(
            "Began action {:?} at ({:.1}, {:.1})",
            self.history.cursor(),
            pos.x,
            pos.y
        );
    }

    fn pointer_move(&mut self, pos: Point) {
        let Some(last) = self.pen else {
            return;
        };

        let segment = Segment::new(last, pos, self.color);
        if let Err(err) = self.history.append_segment(segment) {
            report_invariant(&err);
            self.pen = None;
            return;
        }
        self.pen = Some(pos);
        self.bump_generation();
    }

    fn undo(&mut self) {
        if self.solving {
            tracing::debug!("Undo ignored while solving");
            return;
        }
        // Ends any gesture in progress so later moves cannot target a
        // hidden action.
        self.pen = None;
        if self.history.undo() {
            self.bump_generation();
            tracing::debug!("Undo: cursor now {:?}", self.history.cursor());
        }
    }

    fn redo(&mut self) {
        if self.solving {
            tracing::debug!("Redo ignored while solving");
            return;
        }
        self.pen = None;
        if self.history.redo() {
            self.bump_generation();
            tracing::debug!("Redo: cursor now {:?}", self.history.cursor());
        }
    }

    fn clear(&mut self) {
        if self.solving {
            tracing::debug!("Clear ignored while solving");
            return;
        }
        self.pen = None;
        self.history.clear();
        self.overlays.clear();
        self.bindings.clear();
        self.bump_generation();
        tracing::info!("Canvas cleared");
    }

    fn request_solve(&mut self) -> Option<SolveTicket> {
        if !self.is_idle() {
            tracing::debug!("Solve ignored: a request is already in flight");
            return None;
        }
        if !self.history.current_action().is_some_and(|a| !a.is_empty()) {
            tracing::debug!("Solve ignored: nothing drawn");
            return None;
        }

        self.solving = true;
        tracing::info!("Solve requested (generation {})", self.generation);
        Some(SolveTicket {
            generation: self.generation,
            bindings: self.bindings.clone(),
        })
    }

    fn request_explain(&mut self, question: Option<String>) -> Option<ExplainTicket> {
        if self.explaining {
            tracing::debug!("Explain ignored: an explanation is already in flight");
            return None;
        }
        // Typed questions may go out during a solve; the default one may not.
        if question.is_none() && self.solving {
            tracing::debug!("Explain ignored: solve in flight");
            return None;
        }

        let question = match question {
            Some(q) if q.trim().is_empty() => return None,
            Some(q) => {
                self.chat.push(ChatEntry::user(q.clone()));
                q
            }
            None => settings::solver::DEFAULT_EXPLAIN_QUESTION.to_string(),
        };

        self.explaining = true;
        tracing::info!("Explanation requested: {}", question);
        Some(ExplainTicket {
            generation: self.generation,
            question,
            history: self.chat.clone(),
        })
    }

    // ========================================================================
    // RESPONSES
    // ========================================================================

    fn is_stale(&self, generation: u64) -> bool {
        generation != self.generation
    }

    fn record_failure(&mut self, what: &str, err: &RequestFailure) {
        tracing::warn!("{} failed: {}", what, err);
        self.notice = Some(Notice::new(format!("{what} failed: {err}")));
    }

    /// Apply the result of a solve request.
    ///
    /// All-or-nothing: either bindings and overlays are both updated, or
    /// neither is. A response arriving when no solve is in flight (a
    /// duplicate ticket) is discarded.
    pub fn apply_solve(
        &mut self,
        ticket: &SolveTicket,
        result: Result<Vec<SolveItem>, RequestFailure>,
    ) -> SolveOutcome {
        if !self.solving {
            tracing::warn!("Ignoring solve response with no request in flight");
            return SolveOutcome::Discarded;
        }
        self.solving = false;

        let items = match result {
            Ok(items) => items,
            Err(err) => {
                self.record_failure("Solve", &err);
                return SolveOutcome::Failed;
            }
        };

        if self.is_stale(ticket.generation) {
            match self.options.stale_policy {
                StalePolicy::Discard => {
                    tracing::warn!(
                        "Discarding stale solve response (generation {} != {})",
                        ticket.generation,
                        self.generation
                    );
                    return SolveOutcome::Discarded;
                }
                StalePolicy::Apply => tracing::warn!(
                    "Applying stale solve response (generation {} != {}); \
                     anchor may land on a newer gesture",
                    ticket.generation,
                    self.generation
                ),
            }
        }

        let mut bindings = self.bindings.clone();
        let bindings_assigned = bindings.merge_assignments(&items);
        let new_overlays = self.overlays_for(&items);

        let overlays_added = new_overlays.len();
        self.bindings = bindings;
        self.overlays.extend(new_overlays);

        tracing::info!(
            "Solve applied: {} overlay(s), {} binding(s)",
            overlays_added,
            bindings_assigned
        );
        SolveOutcome::Applied {
            overlays_added,
            bindings_assigned,
        }
    }

    /// One overlay per item, all sharing the current action's anchor.
    fn overlays_for(&self, items: &[SolveItem]) -> Vec<Overlay> {
        let (Some(index), Some(action)) = (self.history.cursor(), self.history.current_action())
        else {
            return Vec::new();
        };
        if action.is_empty() {
            return Vec::new();
        }

        let anchor = match anchor_for(action, self.options.anchor_margin) {
            Ok(anchor) => anchor,
            Err(err) => {
                report_invariant(&err);
                return Vec::new();
            }
        };

        items
            .iter()
            .map(|item| Overlay {
                anchor,
                text: item.result.clone(),
                source_action: index,
            })
            .collect()
    }

    /// Apply the result of an explain request
    pub fn apply_explain(
        &mut self,
        ticket: &ExplainTicket,
        result: Result<String, RequestFailure>,
    ) -> ExplainOutcome {
        if !self.explaining {
            tracing::warn!("Ignoring explanation with no request in flight");
            return ExplainOutcome::Discarded;
        }
        self.explaining = false;

        let text = match result {
            Ok(text) => text,
            Err(err) => {
                self.record_failure("Explanation", &err);
                return ExplainOutcome::Failed;
            }
        };

        if self.is_stale(ticket.generation) && self.options.stale_policy == StalePolicy::Discard {
            tracing::warn!("Discarding stale explanation");
            return ExplainOutcome::Discarded;
        }

        self.chat.push(ChatEntry::assistant(text.clone()));
        self.latest_explanation = Some(text);
        ExplainOutcome::Applied
    }
}

/// Loud in debug builds, logged in release.
fn report_invariant(err: &dyn std::error::Error) {
    tracing::error!("Session invariant violated: {}", err);
    debug_assert!(false, "session invariant violated: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    /// Draw one gesture through the given points
    fn stroke(session: &mut SessionController, points: &[(f64, f64)]) {
        let (x, y) = points[0];
        session.dispatch(SessionEvent::PointerDown(pt(x, y)));
        for &(x, y) in &points[1..] {
            session.dispatch(SessionEvent::PointerMove(pt(x, y)));
        }
        session.dispatch(SessionEvent::PointerUp);
    }

    fn solve_ticket(session: &mut SessionController) -> SolveTicket {
        match session.dispatch(SessionEvent::Solve) {
            Some(Request::Solve(ticket)) => ticket,
            other => panic!("expected solve ticket, got {other:?}"),
        }
    }

    fn explain_ticket(session: &mut SessionController, q: Option<&str>) -> ExplainTicket {
        match session.dispatch(SessionEvent::Explain(q.map(str::to_string))) {
            Some(Request::Explain(ticket)) => ticket,
            other => panic!("expected explain ticket, got {other:?}"),
        }
    }

    #[test]
    fn pointer_gesture_builds_segments() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);

        let action = session.history().current_action().unwrap();
        assert_eq!(action.len(), 2);
        assert_eq!(action.segments()[0].start, pt(0.0, 0.0));
        assert_eq!(action.segments()[1].end, pt(5.0, 5.0));
        assert!(!session.is_drawing());
    }

    #[test]
    fn pointer_cancel_ends_gesture() {
        let mut session = SessionController::default();
        session.dispatch(SessionEvent::PointerDown(pt(0.0, 0.0)));
        session.dispatch(SessionEvent::PointerMove(pt(4.0, 0.0)));
        session.dispatch(SessionEvent::PointerCancel);
        assert!(!session.is_drawing());

        session.dispatch(SessionEvent::PointerMove(pt(9.0, 9.0)));
        let action = session.history().current_action().unwrap();
        assert_eq!(action.len(), 1);
        assert_eq!(action.segments()[0].end, pt(4.0, 0.0));
    }

    #[test]
    fn moves_without_pointer_down_are_ignored() {
        let mut session = SessionController::default();
        session.dispatch(SessionEvent::PointerMove(pt(1.0, 1.0)));
        assert!(session.history().is_empty());
    }

    #[test]
    fn color_change_applies_to_next_segments() {
        let mut session = SessionController::default();
        let red = theme::palette::SWATCHES[6];
        session.dispatch(SessionEvent::ColorChange(red));
        stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);

        let seg = session.history().current_action().unwrap().segments()[0];
        assert_eq!(seg.color, red);
    }

    #[test]
    fn undo_mid_gesture_ends_it() {
        let mut session = SessionController::default();
        session.dispatch(SessionEvent::PointerDown(pt(0.0, 0.0)));
        session.dispatch(SessionEvent::Undo);
        session.dispatch(SessionEvent::PointerMove(pt(3.0, 3.0)));

        assert!(!session.is_drawing());
        assert!(session.history().visible_actions().is_empty());
    }

    #[test]
    fn solve_scenario_single_result() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(10.0, 20.0), (60.0, 80.0), (110.0, 50.0)]);

        let ticket = solve_ticket(&mut session);
        assert!(session.is_solving());

        let outcome = session.apply_solve(&ticket, Ok(vec![SolveItem::new("2+2", "4", false)]));
        assert_eq!(
            outcome,
            SolveOutcome::Applied {
                overlays_added: 1,
                bindings_assigned: 0
            }
        );
        assert!(session.is_idle());
        assert_eq!(
            session.overlays(),
            &[Overlay {
                anchor: pt(160.0, 50.0),
                text: "4".to_string(),
                source_action: 0,
            }]
        );
        assert!(session.bindings().is_empty());
    }

    #[test]
    fn assignments_overwrite() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        let ticket = solve_ticket(&mut session);
        session.apply_solve(&ticket, Ok(vec![SolveItem::new("x", "5", true)]));
        assert_eq!(session.bindings().get("x"), Some("5"));

        stroke(&mut session, &[(0.0, 40.0), (10.0, 50.0)]);
        let ticket = solve_ticket(&mut session);
        assert_eq!(ticket.bindings.get("x"), Some("5"));
        session.apply_solve(&ticket, Ok(vec![SolveItem::new("x", "7", true)]));
        assert_eq!(session.bindings().get("x"), Some("7"));
        assert_eq!(session.bindings().len(), 1);
    }

    #[test]
    fn multiple_results_share_one_anchor() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (20.0, 10.0)]);
        let ticket = solve_ticket(&mut session);
        session.apply_solve(
            &ticket,
            Ok(vec![
                SolveItem::new("x", "2", true),
                SolveItem::new("y", "5", true),
            ]),
        );

        let overlays = session.overlays();
        assert_eq!(overlays.len(), 2);
        assert_eq!(overlays[0].anchor, overlays[1].anchor);
        assert_eq!(overlays[0].anchor, pt(70.0, 5.0));
        assert_eq!(overlays[1].text, "5");
    }

    #[test]
    fn failed_solve_changes_nothing() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        let ticket = solve_ticket(&mut session);
        session.apply_solve(&ticket, Ok(vec![SolveItem::new("x", "5", true)]));

        stroke(&mut session, &[(30.0, 0.0), (40.0, 10.0)]);
        let history = session.history().clone();
        let overlays = session.overlays().to_vec();
        let bindings = session.bindings().clone();

        let ticket = solve_ticket(&mut session);
        let outcome = session.apply_solve(
            &ticket,
            Err(RequestFailure::Other("connection refused".to_string())),
        );

        assert_eq!(outcome, SolveOutcome::Failed);
        assert!(session.is_idle());
        assert_eq!(session.history(), &history);
        assert_eq!(session.overlays(), &overlays[..]);
        assert_eq!(session.bindings(), &bindings);
        assert!(session.notice().unwrap().message.contains("connection refused"));
    }

    #[test]
    fn degenerate_solve_is_noop() {
        let mut session = SessionController::default();
        assert!(session.dispatch(SessionEvent::Solve).is_none());

        // A tap without movement leaves an empty action
        session.dispatch(SessionEvent::PointerDown(pt(1.0, 1.0)));
        session.dispatch(SessionEvent::PointerUp);
        assert!(session.dispatch(SessionEvent::Solve).is_none());
        assert!(session.is_idle());

        // Everything undone
        stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);
        session.dispatch(SessionEvent::Undo);
        session.dispatch(SessionEvent::Undo);
        assert!(session.dispatch(SessionEvent::Solve).is_none());
    }

    #[test]
    fn second_solve_refused_while_in_flight() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);
        let _ticket = solve_ticket(&mut session);
        assert!(session.dispatch(SessionEvent::Solve).is_none());
        assert!(session.dispatch(SessionEvent::Explain(None)).is_none());
        assert!(!session.is_explaining());
    }

    #[test]
    fn typed_question_allowed_while_solving() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);
        let _solve = solve_ticket(&mut session);

        let explain = explain_ticket(&mut session, Some("why?"));
        assert_eq!(explain.question, "why?");
        assert!(session.is_solving());
        assert!(session.is_explaining());
        assert!(session.dispatch(SessionEvent::Explain(Some("again?".into()))).is_none());
        assert_eq!(session.chat(), &[ChatEntry::user("why?")]);
    }

    #[test]
    fn concurrent_requests_apply_in_either_order() {
        for solve_first in [true, false] {
            let mut session = SessionController::default();
            stroke(&mut session, &[(0.0, 0.0), (20.0, 10.0)]);
            let solve = solve_ticket(&mut session);
            let explain = explain_ticket(&mut session, Some("how?"));

            let apply_solve = |session: &mut SessionController| {
                let outcome = session.apply_solve(&solve, Ok(vec![SolveItem::new("x", "2", true)]));
                assert!(matches!(outcome, SolveOutcome::Applied { overlays_added: 1, .. }));
            };
            let apply_explain = |session: &mut SessionController| {
                let outcome = session.apply_explain(&explain, Ok("like so".to_string()));
                assert_eq!(outcome, ExplainOutcome::Applied);
            };

            if solve_first {
                apply_solve(&mut session);
                assert!(session.is_explaining());
                apply_explain(&mut session);
            } else {
                apply_explain(&mut session);
                assert!(session.is_solving());
                apply_solve(&mut session);
            }

            assert!(session.is_idle());
            assert_eq!(session.overlays()[0].anchor, pt(70.0, 5.0));
            assert_eq!(session.bindings().get("x"), Some("2"));
            assert_eq!(
                session.chat(),
                &[ChatEntry::user("how?"), ChatEntry::assistant("like so")]
            );
        }
    }

    #[test]
    fn duplicate_solve_ticket_is_discarded() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        let ticket = solve_ticket(&mut session);
        let items = vec![SolveItem::new("2+2", "4", false)];
        session.apply_solve(&ticket, Ok(items.clone()));

        assert_eq!(session.apply_solve(&ticket, Ok(items)), SolveOutcome::Discarded);
        assert_eq!(session.overlays().len(), 1);
    }

    #[test]
    fn duplicate_explain_ticket_is_discarded() {
        let mut session = SessionController::default();
        let ticket = explain_ticket(&mut session, None);
        session.apply_explain(&ticket, Ok("once".to_string()));

        let outcome = session.apply_explain(&ticket, Ok("twice".to_string()));
        assert_eq!(outcome, ExplainOutcome::Discarded);
        assert_eq!(session.chat(), &[ChatEntry::assistant("once")]);
        assert_eq!(session.latest_explanation(), Some("once"));
    }

    #[test]
    fn solve_refused_while_explaining() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);
        let _ticket = explain_ticket(&mut session, None);
        assert!(session.is_explaining());
        assert!(session.dispatch(SessionEvent::Solve).is_none());
    }

    #[test]
    fn redo_ignored_while_solving() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);
        stroke(&mut session, &[(5.0, 5.0), (6.0, 6.0)]);
        session.dispatch(SessionEvent::Undo);
        let ticket = solve_ticket(&mut session);

        session.dispatch(SessionEvent::Redo);
        assert_eq!(session.history().visible_actions().len(), 1);
        assert!(session.history().can_redo());

        session.apply_solve(&ticket, Ok(vec![]));
        session.dispatch(SessionEvent::Redo);
        assert_eq!(session.history().visible_actions().len(), 2);
    }

    #[test]
    fn undo_and_clear_ignored_while_solving() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);
        let ticket = solve_ticket(&mut session);

        session.dispatch(SessionEvent::Undo);
        session.dispatch(SessionEvent::Clear);
        assert_eq!(session.history().visible_actions().len(), 1);

        session.apply_solve(&ticket, Ok(vec![]));
        session.dispatch(SessionEvent::Undo);
        assert!(session.history().visible_actions().is_empty());
    }

    #[test]
    fn drawing_continues_while_solving() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        let ticket = solve_ticket(&mut session);

        // Second gesture drawn while the request is pending
        stroke(&mut session, &[(100.0, 0.0), (120.0, 40.0)]);
        assert_ne!(ticket.generation, session.generation());

        let outcome = session.apply_solve(&ticket, Ok(vec![SolveItem::new("1+1", "2", false)]));
        assert!(matches!(outcome, SolveOutcome::Applied { .. }));
        // Anchored to the gesture current at apply time
        assert_eq!(session.overlays()[0].source_action, 1);
        assert_eq!(session.overlays()[0].anchor, pt(170.0, 20.0));
    }

    #[test]
    fn stale_response_discarded_under_discard_policy() {
        let mut session = SessionController::new(SessionOptions {
            stale_policy: StalePolicy::Discard,
            ..SessionOptions::default()
        });
        stroke(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        let ticket = solve_ticket(&mut session);
        stroke(&mut session, &[(50.0, 0.0), (60.0, 10.0)]);

        let outcome = session.apply_solve(&ticket, Ok(vec![SolveItem::new("x", "1", true)]));
        assert_eq!(outcome, SolveOutcome::Discarded);
        assert!(session.is_idle());
        assert!(session.overlays().is_empty());
        assert!(session.bindings().is_empty());
    }

    #[test]
    fn stale_explanation_discarded_under_discard_policy() {
        let mut session = SessionController::new(SessionOptions {
            stale_policy: StalePolicy::Discard,
            ..SessionOptions::default()
        });
        let ticket = explain_ticket(&mut session, Some("what is x?"));
        stroke(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);

        let outcome = session.apply_explain(&ticket, Ok("x is 2".to_string()));
        assert_eq!(outcome, ExplainOutcome::Discarded);
        assert!(session.is_idle());
        assert!(session.latest_explanation().is_none());
        // The question already asked stays in the log
        assert_eq!(session.chat(), &[ChatEntry::user("what is x?")]);
    }

    #[test]
    fn fresh_response_applies_under_discard_policy() {
        let mut session = SessionController::new(SessionOptions {
            stale_policy: StalePolicy::Discard,
            ..SessionOptions::default()
        });
        stroke(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        let ticket = solve_ticket(&mut session);
        let outcome = session.apply_solve(&ticket, Ok(vec![SolveItem::new("x", "1", true)]));
        assert!(matches!(outcome, SolveOutcome::Applied { .. }));
    }

    #[test]
    fn overlays_survive_undo() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        let ticket = solve_ticket(&mut session);
        session.apply_solve(&ticket, Ok(vec![SolveItem::new("2+2", "4", false)]));

        session.dispatch(SessionEvent::Undo);
        let frame = session.frame();
        assert_eq!(frame.len(), 1);
        assert!(matches!(&frame[0], DrawCommand::Text { text, .. } if text == "4"));
    }

    #[test]
    fn clear_resets_drawing_overlays_and_bindings() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        let ticket = solve_ticket(&mut session);
        session.apply_solve(&ticket, Ok(vec![SolveItem::new("x", "5", true)]));
        let ticket = explain_ticket(&mut session, Some("why?"));
        session.apply_explain(&ticket, Ok("because".to_string()));

        session.dispatch(SessionEvent::Clear);
        assert!(session.history().is_empty());
        assert!(session.overlays().is_empty());
        assert!(session.bindings().is_empty());
        assert!(session.frame().is_empty());
        // The conversation is kept
        assert_eq!(session.chat().len(), 2);
    }

    #[test]
    fn explain_default_question_records_only_answer() {
        let mut session = SessionController::default();
        let ticket = explain_ticket(&mut session, None);
        assert_eq!(ticket.question, settings::solver::DEFAULT_EXPLAIN_QUESTION);
        assert!(ticket.history.is_empty());

        let outcome = session.apply_explain(&ticket, Ok("Step 1: $x = 2$".to_string()));
        assert_eq!(outcome, ExplainOutcome::Applied);
        assert_eq!(session.chat(), &[ChatEntry::assistant("Step 1: $x = 2$")]);
        assert_eq!(session.latest_explanation(), Some("Step 1: $x = 2$"));
        assert!(session.is_idle());
    }

    #[test]
    fn explain_follow_up_includes_question_in_history() {
        let mut session = SessionController::default();
        let first = explain_ticket(&mut session, None);
        session.apply_explain(&first, Ok("answer".to_string()));

        let ticket = explain_ticket(&mut session, Some("why square it?"));
        assert_eq!(ticket.question, "why square it?");
        assert_eq!(
            ticket.history,
            vec![
                ChatEntry::assistant("answer"),
                ChatEntry::user("why square it?"),
            ]
        );
    }

    #[test]
    fn explain_blank_question_is_ignored() {
        let mut session = SessionController::default();
        assert!(session.dispatch(SessionEvent::Explain(Some("   ".into()))).is_none());
        assert!(session.chat().is_empty());
        assert!(session.is_idle());
    }

    #[test]
    fn explain_failure_keeps_question() {
        let mut session = SessionController::default();
        let ticket = explain_ticket(&mut session, Some("what?"));
        let outcome = session.apply_explain(&ticket, Err(RequestFailure::Status { status: 500 }));

        assert_eq!(outcome, ExplainOutcome::Failed);
        assert_eq!(session.chat(), &[ChatEntry::user("what?")]);
        assert!(session.latest_explanation().is_none());
        assert!(session.notice().is_some());
        session.dismiss_notice();
        assert!(session.notice().is_none());
    }

    #[test]
    fn solving_and_explaining_are_independent_flags() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);
        let explain = explain_ticket(&mut session, None);
        session.apply_explain(&explain, Ok("ok".into()));
        let solve = solve_ticket(&mut session);
        assert!(session.is_solving());
        assert!(!session.is_explaining());
        session.apply_solve(&solve, Ok(vec![]));
        assert!(session.is_idle());
    }

    #[test]
    fn redo_after_undo() {
        let mut session = SessionController::default();
        stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);
        stroke(&mut session, &[(5.0, 5.0), (6.0, 6.0)]);
        session.dispatch(SessionEvent::Undo);
        assert_eq!(session.frame().len(), 1);
        session.dispatch(SessionEvent::Redo);
        assert_eq!(session.frame().len(), 2);
    }

    #[test]
    fn notice_display_has_timestamp() {
        let notice = Notice::new("Solve failed".to_string());
        let shown = notice.display();
        assert!(shown.starts_with('['));
        assert!(shown.ends_with("Solve failed"));
    }
}
