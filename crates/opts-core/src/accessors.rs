//! Typed views and generated accessors
//!
//! A view is a newtype over an [`OptionsNode`] of one known class. Views are
//! declared with [`options_view!`](crate::options_view) and get per-option
//! getters and setters from [`option_accessors!`](crate::option_accessors).
//! The accessors hold no logic of their own: getters are phase reads and
//! setters are [`OptionsNode::set_opt`].
//!
//! ```ignore
//! opts_core::options_view! {
//!     /// Run matrix section
//!     pub struct RunMatrixOpts => "RunMatrixOpts";
//! }
//!
//! opts_core::option_accessors! {
//!     RunMatrixOpts, prefix = "RunMatrix", {
//!         keys / set_keys => "Keys",
//!         prefix / set_prefix => "Prefix",
//!     }
//! }
//! ```

use crate::error::{Error, Result};
use crate::node::OptionsNode;

/// A typed wrapper around a node of class [`CLASS`](Self::CLASS).
pub trait OptionsView: Sized {
    /// Class name the wrapped node must be (or derive from)
    const CLASS: &'static str;

    /// Wrap without checking the class.
    fn wrap(node: OptionsNode) -> Self;

    fn node(&self) -> &OptionsNode;

    fn node_mut(&mut self) -> &mut OptionsNode;

    fn into_node(self) -> OptionsNode;

    /// Wrap a node, checking its class.
    fn try_from_node(node: OptionsNode) -> Result<Self> {
        if node.is_a(Self::CLASS) {
            Ok(Self::wrap(node))
        } else {
            Err(Error::TypeMismatch {
                class: Self::CLASS.to_string(),
                expected: format!("a '{}' node", Self::CLASS),
                actual: node.class_name().to_string(),
            })
        }
    }
}

/// Declare a newtype view over [`OptionsNode`](crate::OptionsNode).
#[macro_export]
macro_rules! options_view {
    ($(#[$meta:meta])* $vis:vis struct $name:ident => $class:expr;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name($crate::OptionsNode);

        impl $crate::OptionsView for $name {
            const CLASS: &'static str = $class;

            fn wrap(node: $crate::OptionsNode) -> Self {
                Self(node)
            }

            fn node(&self) -> &$crate::OptionsNode {
                &self.0
            }

            fn node_mut(&mut self) -> &mut $crate::OptionsNode {
                &mut self.0
            }

            fn into_node(self) -> $crate::OptionsNode {
                self.0
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = $crate::OptionsNode;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}

/// Generate getter/setter pairs on a view, one per option.
///
/// Method names are given at the call site; `prefix` is the documentation
/// namespace shown in the generated docs. Each getter takes an optional
/// phase index (`None` reads the whole value). Also defines
/// `ACCESSOR_KEYS` listing the covered options, so invoke it once per view.
#[macro_export]
macro_rules! option_accessors {
    ($view:ty, prefix = $prefix:literal, { $($get:ident / $set:ident => $key:literal),* $(,)? }) => {
        impl $view {
            /// Options covered by generated accessors
            pub const ACCESSOR_KEYS: &'static [&'static str] = &[$($key),*];

            $(
                #[doc = concat!("Get `", $prefix, ".", $key, "`, optionally for one phase")]
                pub fn $get(&self, j: ::std::option::Option<i64>) -> ::std::option::Option<&$crate::Value> {
                    $crate::OptionsView::node(self).get_phase($key, j.unwrap_or(-1))
                }

                #[doc = concat!("Set `", $prefix, ".", $key, "`")]
                pub fn $set(&mut self, value: impl ::std::convert::Into<$crate::Value>) -> $crate::Result<()> {
                    $crate::OptionsView::node_mut(self).set_opt($key, value)
                }
            )*
        }
    };
}
