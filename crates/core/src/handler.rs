//! Named registry of offscreen graphics contexts with one active entry.

use crate::context::GraphicsContext;
use crate::error::EaselError;

/// A registry of [`GraphicsContext`]s identified by unique names, with one
/// active entry.
///
/// Constructed non-empty, and contexts are never removed, so the active
/// reference is always a member of the registry. Insertion order is kept;
/// the all-surfaces export path iterates in it.
#[derive(Debug)]
pub struct GraphicsContextHandler {
    contexts: Vec<GraphicsContext>,
    active: usize,
}

impl GraphicsContextHandler {
    /// Creates a handler holding `initial` as its active context.
    pub fn new(initial: GraphicsContext) -> Self {
        Self {
            contexts: vec![initial],
            active: 0,
        }
    }

    /// Inserts a context unless its name is already registered.
    ///
    /// Returns whether the insertion happened; a duplicate name is logged
    /// and the first-registered context kept.
    pub fn add_context(&mut self, context: GraphicsContext) -> bool {
        if self.contexts.iter().any(|c| c.name() == context.name()) {
            log::warn!(
                "graphics context '{}' already registered; keeping the existing entry",
                context.name()
            );
            return false;
        }
        self.contexts.push(context);
        true
    }

    /// Inserts several contexts; every insertion is attempted even after a
    /// failure. Returns true only if all succeeded.
    pub fn add_contexts(&mut self, contexts: Vec<GraphicsContext>) -> bool {
        let mut all_added = true;
        for context in contexts {
            all_added &= self.add_context(context);
        }
        all_added
    }

    /// Makes the named context active.
    ///
    /// An unregistered name is an error and leaves the active reference
    /// untouched.
    pub fn set_active(&mut self, name: &str) -> Result<(), EaselError> {
        let index = self
            .contexts
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| EaselError::ContextNotFound(name.to_string()))?;
        self.active = index;
        Ok(())
    }

    /// The active context. Always valid: the registry is never empty and
    /// never shrinks.
    pub fn active(&self) -> &GraphicsContext {
        &self.contexts[self.active]
    }

    pub fn active_mut(&mut self) -> &mut GraphicsContext {
        &mut self.contexts[self.active]
    }

    pub fn get(&self, name: &str) -> Option<&GraphicsContext> {
        self.contexts.iter().find(|c| c.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut GraphicsContext> {
        self.contexts.iter_mut().find(|c| c.name() == name)
    }

    /// Registered names in insertion order, as an owned snapshot safe to
    /// iterate while the registry is borrowed elsewhere.
    pub fn names(&self) -> Vec<String> {
        self.contexts.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
