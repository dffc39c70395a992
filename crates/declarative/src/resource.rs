//! Resource trait for fingerprint-keyed reconciliation
//!
//! A Resource is a value whose identity is fully captured by a content
//! fingerprint. Two resources with the same fingerprint are the same
//! resource, whatever else they carry.

use std::fmt;

/// Core trait for reconcilable resources
///
/// # Example
///
/// ```ignore
/// use declarative::Resource;
///
/// #[derive(Debug)]
/// struct Setting { key: String, value: String, digest: String }
///
/// impl Resource for Setting {
///     fn id(&self) -> &str {
///         &self.digest
///     }
///
///     fn description(&self) -> String {
///         format!("{} = {}", self.key, self.value)
///     }
/// }
/// ```
pub trait Resource: fmt::Debug {
    /// Stable identity of this resource
    ///
    /// Must cover every field that matters for convergence: if two
    /// resources would need different stored state, their ids differ.
    fn id(&self) -> &str;

    /// Human-readable description, used only for reporting
    fn description(&self) -> String;
}
