//! Arena-based XML DOM for the resource-table compiler's XML front end
//! (component G).
//!
//! This crate owns the *tree* (`node`) and the *construction contract*
//! (`build`) that turns either a textual or binary XML source into one;
//! parsing resource semantics out of the resulting tree is one layer up, in
//! whatever front end calls `restable-core`'s `addResource`.

pub mod build;
pub mod errors;
pub mod node;

pub use build::{from_binary_events, from_reader, BinaryEvent};
pub use errors::DomError;
pub use node::{Attribute, Dom, ElementData, NamespaceDecl, Node, NodeId, NodeKind};
