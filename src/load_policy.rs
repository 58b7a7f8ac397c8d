//! # Load policy
//!
//! Selects which derived representations a [`Position`](crate::position::Position) builds eagerly
//! at construction. Representations left out are built only by an explicit `load_*` call.
//!
//! The policy is fixed when the position is built and never consulted again by the
//! resynchronization logic: a mutation refreshes whatever is *present*, regardless of policy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one derived representation of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepresentationKind {
    Grid,
    Cartesian,
    Celestial,
}

impl fmt::Display for RepresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepresentationKind::Grid => write!(f, "grid"),
            RepresentationKind::Cartesian => write!(f, "cartesian"),
            RepresentationKind::Celestial => write!(f, "celestial"),
        }
    }
}

/// Which representations to materialize at construction.
///
/// `extensions` is reserved for consumers layering their own representations on top of a
/// position; the crate carries the flag but never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadPolicy {
    pub grid: bool,
    pub cartesian: bool,
    pub celestial: bool,
    pub extensions: bool,
}

impl Default for LoadPolicy {
    /// Everything enabled.
    fn default() -> Self {
        LoadPolicy::full()
    }
}

impl LoadPolicy {
    pub const fn full() -> Self {
        LoadPolicy {
            grid: true,
            cartesian: true,
            celestial: true,
            extensions: true,
        }
    }

    /// Nothing is computed until requested.
    pub const fn lazy() -> Self {
        LoadPolicy {
            grid: false,
            cartesian: false,
            celestial: false,
            extensions: false,
        }
    }

    /// Create a new [`LoadPolicyBuilder`] starting from [`LoadPolicy::lazy`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use geocoord::load_policy::LoadPolicy;
    ///
    /// let policy = LoadPolicy::builder().grid(true).cartesian(true).build();
    /// assert!(policy.grid && !policy.celestial);
    /// ```
    pub fn builder() -> LoadPolicyBuilder {
        LoadPolicyBuilder::new()
    }

    /// Whether the representation is built eagerly under this policy.
    pub fn includes(&self, kind: RepresentationKind) -> bool {
        match kind {
            RepresentationKind::Grid => self.grid,
            RepresentationKind::Cartesian => self.cartesian,
            RepresentationKind::Celestial => self.celestial,
        }
    }
}

/// Builder for [`LoadPolicy`].
#[derive(Debug, Clone)]
pub struct LoadPolicyBuilder {
    policy: LoadPolicy,
}

impl Default for LoadPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadPolicyBuilder {
    pub fn new() -> Self {
        Self {
            policy: LoadPolicy::lazy(),
        }
    }

    pub fn grid(mut self, v: bool) -> Self {
        self.policy.grid = v;
        self
    }
    pub fn cartesian(mut self, v: bool) -> Self {
        self.policy.cartesian = v;
        self
    }
    pub fn celestial(mut self, v: bool) -> Self {
        self.policy.celestial = v;
        self
    }
    pub fn extensions(mut self, v: bool) -> Self {
        self.policy.extensions = v;
        self
    }

    pub fn build(self) -> LoadPolicy {
        self.policy
    }
}
