//! Errors returned by fallible engine operations.
//!
//! Nothing in the engine panics on bad input. Commands that can be refused
//! (connecting a card to itself, switching to a grid that does not exist)
//! return a [`CanvasError`]; the caller decides whether to surface it.

use uuid::Uuid;

/// Error returned by scene and engine commands.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CanvasError {
    /// A connection was requested from a card to itself.
    #[error("cannot connect card {0} to itself")]
    SelfConnection(Uuid),

    /// The two cards are already linked, in either direction.
    #[error("cards {from} and {to} are already connected")]
    DuplicateConnection { from: Uuid, to: Uuid },

    /// A referenced card is not in the scene.
    #[error("card {0} not found")]
    CardNotFound(Uuid),

    /// A referenced frame is not in the scene.
    #[error("frame {0} not found")]
    FrameNotFound(Uuid),

    /// A referenced connection is not in the scene.
    #[error("connection {0} not found")]
    ConnectionNotFound(Uuid),

    /// A referenced grid is not in the workspace.
    #[error("grid {0} not found")]
    GridNotFound(Uuid),

    /// The workspace must always keep at least one grid.
    #[error("cannot delete the last grid")]
    LastGrid,

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
