mod session;
mod workspace;

pub use session::{EditPhase, EditSession, PostForm, SessionError};
pub use workspace::{PostWorkspace, SubmitPost, WorkspaceError};
