//! Target sets: which signs a binding reads or writes.
//!
//! A target expression resolves against the current event to zero or more
//! handles, in order. Its cardinality is declared when the binding is built
//! and does not depend on how many handles a given evaluation produces.

use crate::host::EventContext;
use serde::{Deserialize, Serialize};

/// Declared multiplicity of a target expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    Single,
    Multiple,
}

type ResolveFn<E, H> = Box<dyn Fn(&E) -> Vec<H> + Send + Sync>;

/// A bound target expression.
pub struct TargetSet<E, H> {
    resolve: ResolveFn<E, H>,
    cardinality: Cardinality,
    is_default: bool,
    label: String,
}

impl<E: 'static, H: 'static> TargetSet<E, H> {
    /// The implicit current object: the subject of the event being handled.
    pub fn event_subject() -> Self
    where
        E: EventContext<H>,
        H: Clone,
    {
        Self {
            resolve: Box::new(|event: &E| {
                event.lifecycle_subject().cloned().into_iter().collect()
            }),
            cardinality: Cardinality::Single,
            is_default: true,
            label: "the event-block".to_string(),
        }
    }

    /// An implicit current object supplied by the host for events that are
    /// not lifecycle events of a sign (the clicked block, say).
    pub fn default_target(
        label: impl Into<String>,
        resolve: impl Fn(&E) -> Option<H> + Send + Sync + 'static,
    ) -> Self {
        Self {
            resolve: Box::new(move |event| resolve(event).into_iter().collect()),
            cardinality: Cardinality::Single,
            is_default: true,
            label: label.into(),
        }
    }

    /// An explicitly named single object.
    pub fn single(
        label: impl Into<String>,
        resolve: impl Fn(&E) -> Option<H> + Send + Sync + 'static,
    ) -> Self {
        Self {
            resolve: Box::new(move |event| resolve(event).into_iter().collect()),
            cardinality: Cardinality::Single,
            is_default: false,
            label: label.into(),
        }
    }

    /// An explicitly named, possibly plural, set of objects.
    pub fn multiple(
        label: impl Into<String>,
        resolve: impl Fn(&E) -> Vec<H> + Send + Sync + 'static,
    ) -> Self {
        Self {
            resolve: Box::new(resolve),
            cardinality: Cardinality::Multiple,
            is_default: false,
            label: label.into(),
        }
    }

    /// Constant handles. One handle is single-valued, anything else plural.
    pub fn fixed(label: impl Into<String>, handles: Vec<H>) -> Self
    where
        H: Clone + Send + Sync,
    {
        let cardinality = if handles.len() == 1 {
            Cardinality::Single
        } else {
            Cardinality::Multiple
        };
        Self {
            resolve: Box::new(move |_| handles.clone()),
            cardinality,
            is_default: false,
            label: label.into(),
        }
    }
}

impl<E, H> TargetSet<E, H> {
    /// Resolve the handles for one evaluation, in order.
    pub fn resolve(&self, event: &E) -> Vec<H> {
        (self.resolve)(event)
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn is_single(&self) -> bool {
        self.cardinality == Cardinality::Single
    }

    /// Whether this is the implicit current object rather than an explicit
    /// reference.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<E, H> std::fmt::Debug for TargetSet<E, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetSet")
            .field("label", &self.label)
            .field("cardinality", &self.cardinality)
            .field("is_default", &self.is_default)
            .finish()
    }
}

impl<E, H> std::fmt::Display for TargetSet<E, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}
