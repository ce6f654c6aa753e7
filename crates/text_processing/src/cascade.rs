//! Ordered resolution cascade
//!
//! Currency, date and category resolution all follow the same shape: an
//! ordered list of candidate sources evaluated until one yields a value.
//! `Cascade` keeps that ordering explicit and logs which step won.
//!
//! ```
//! use expense_parser_text_processing::cascade::Cascade;
//!
//! let value = Cascade::new("example")
//!     .step("first", || None)
//!     .step("second", || Some(2))
//!     .step("third", || Some(3))
//!     .resolve();
//! assert_eq!(value, Some(2));
//! ```

/// A value together with the label of the step that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: &'static str,
}

type Step<'a, T> = (&'static str, Box<dyn FnOnce() -> Option<T> + 'a>);

/// Short-circuiting list of candidate producers
pub struct Cascade<'a, T> {
    name: &'static str,
    steps: Vec<Step<'a, T>>,
}

impl<'a, T> Cascade<'a, T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    /// Append a step; steps run in insertion order
    pub fn step(mut self, label: &'static str, produce: impl FnOnce() -> Option<T> + 'a) -> Self {
        self.steps.push((label, Box::new(produce)));
        self
    }

    /// Number of registered steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// First value produced, discarding the source label
    pub fn resolve(self) -> Option<T> {
        self.resolve_with_source().map(|resolved| resolved.value)
    }

    /// First value produced, with the label of the winning step
    pub fn resolve_with_source(self) -> Option<Resolved<T>> {
        let name = self.name;
        for (label, produce) in self.steps {
            if let Some(value) = produce() {
                tracing::debug!(cascade = name, source = label, "Cascade resolved");
                return Some(Resolved {
                    value,
                    source: label,
                });
            }
        }
        tracing::trace!(cascade = name, "Cascade exhausted");
        None
    }
}
