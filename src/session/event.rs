// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Input events and outbound request tickets

use super::bindings::VariableBindings;
use super::chat::ChatEntry;
use kurbo::Point;
use peniko::Color;

/// Everything the UI can tell the session.
///
/// Mouse and touch input are both mapped onto the pointer variants.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    /// Gesture interrupted (touch cancel, pointer left the canvas)
    PointerCancel,
    Undo,
    Redo,
    Clear,
    Solve,
    /// Ask for an explanation, optionally with a typed follow-up question
    Explain(Option<String>),
    ColorChange(Color),
}

/// A solve request the driver must perform.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveTicket {
    /// History generation when the request was issued
    pub generation: u64,
    /// Bindings to send as `dict_of_vars`
    pub bindings: VariableBindings,
}

/// An explain request the driver must perform.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainTicket {
    pub generation: u64,
    pub question: String,
    /// Conversation so far, including the question if the user typed one
    pub history: Vec<ChatEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Solve(SolveTicket),
    Explain(ExplainTicket),
}
