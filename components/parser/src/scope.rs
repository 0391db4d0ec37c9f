//! Lexical scope tracking for semantic analysis

use std::collections::HashMap;

/// What opened a scope frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Root frame holding top-level declarations and globals
    Global,
    /// Plain or conditional block
    Block,
    /// Loop body
    Loop,
    /// Function body, including its parameters
    Function,
}

/// A declared name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Type annotation written at the declaration, if any
    pub declared_type: Option<String>,
}

/// A single scope frame
#[derive(Debug, Clone)]
pub struct Scope {
    /// What opened the frame
    pub kind: ScopeKind,
    /// Names declared directly in this frame
    pub bindings: HashMap<String, Binding>,
}

impl Scope {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            bindings: HashMap::new(),
        }
    }
}

/// Stack of scope frames, innermost last.
///
/// The global frame is created with the stack and is never popped.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    frames: Vec<Scope>,
}

impl ScopeStack {
    /// Create a stack holding only the global frame
    pub fn new() -> Self {
        Self {
            frames: vec![Scope::new(ScopeKind::Global)],
        }
    }

    /// Enter a new frame
    pub fn push(&mut self, kind: ScopeKind) {
        self.frames.push(Scope::new(kind));
    }

    /// Leave the innermost frame, discarding its declarations
    pub fn pop(&mut self) -> Option<Scope> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Declare `name` in the innermost frame, shadowing outer declarations
    pub fn declare(&mut self, name: impl Into<String>, declared_type: Option<String>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.bindings.insert(name.into(), Binding { declared_type });
        }
    }

    /// Resolve `name`, innermost frame first
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.bindings.get(name))
    }

    /// Kind of the innermost frame
    pub fn current_kind(&self) -> ScopeKind {
        self.frames
            .last()
            .map(|frame| frame.kind)
            .unwrap_or(ScopeKind::Global)
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
