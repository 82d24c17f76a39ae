//! Merging generated constants and methods into existing source locations.
//!
//! Planning is pure: [`scanner`] indexes what a location already holds,
//! [`engine`] decides per constant what to do on each side and [`methods`]
//! does the same for the generated methods. [`apply`] is the only part that
//! touches a location.

pub mod apply;
pub mod engine;
pub mod methods;
pub mod scanner;

pub use apply::*;
pub use engine::*;
pub use methods::*;
pub use scanner::*;

use crate::source::ContainerKind;
use strum::Display;

/// The two companion locations of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Side {
    /// Interface side, holding signature-only declarations.
    Declaration,
    /// Implementation side, holding value-bearing definitions.
    Implementation,
}

impl Side {
    /// Container that holds this side's class members.
    pub fn container_kind(self) -> ContainerKind {
        match self {
            Side::Declaration => ContainerKind::Interface,
            Side::Implementation => ContainerKind::Implementation,
        }
    }
}
