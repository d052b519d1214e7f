use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
///
/// Validation variants carry the user-facing message; the UI surfaces them
/// in the status bar and the in-memory tree is left untouched.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode errors from the persisted documents.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid filesystem path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A group or link name was empty.
    #[error("Name cannot be empty")]
    EmptyName,

    /// A sibling group or directory link already holds this name.
    #[error("'{0}' already exists at this level")]
    DuplicateName(String),

    /// No group resolves at the given tree path.
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// No directory link resolves at the given tree path.
    #[error("Directory link not found: {0}")]
    DirLinkNotFound(String),

    /// The parent path of an add/move operation does not resolve.
    #[error("Parent group not found: {0}")]
    MissingParent(String),

    /// Attempted to delete or move a protected group.
    #[error("Cannot delete protected group '{0}'")]
    Protected(String),

    /// Attempted to move a group into itself or its own subtree.
    #[error("Cannot move '{0}' into itself or its own subtree")]
    CyclicMove(String),

    /// The item path is already present in the target group.
    #[error("'{0}' is already in this group")]
    DuplicateItem(String),

    /// No item with the given path exists in the group.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Directory links cannot live at the top level of the tree.
    #[error("Directory links must be added inside a group")]
    DirLinkAtRoot,
}
