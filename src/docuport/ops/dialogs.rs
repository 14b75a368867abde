use crate::connector::RepositoryConnector;
use crate::error::{DocuportError, Result};
use crate::model::{Container, ContainerKind, Dialog, DialogKind, Session};

/// The container's default search dialog, or `None` when the remote container
/// carries no usable one. Absence is a configuration problem on the server
/// side and is not retryable from here.
pub fn default_search_dialog<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    container: &Container,
) -> Result<Option<Dialog>> {
    pick(conn, session, container, DialogKind::Search)
}

/// The container's default store dialog; same absence semantics as
/// [`default_search_dialog`].
pub fn default_store_dialog<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    container: &Container,
) -> Result<Option<Dialog>> {
    pick(conn, session, container, DialogKind::Store)
}

fn pick<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    container: &Container,
    kind: DialogKind,
) -> Result<Option<Dialog>> {
    // Server convention, observed and preserved as-is: cabinets flag their
    // usable dialog with `is_default = true`, trays with `is_default = false`.
    let wanted_flag = match container.kind {
        ContainerKind::Cabinet => true,
        ContainerKind::Tray => false,
    };
    let dialogs = conn.container_dialogs(session, &container.id)?;
    Ok(dialogs
        .into_iter()
        .filter(|d| d.kind == kind)
        .find(|d| d.is_default == wanted_flag))
}

/// Engine-side mapping of an absent default dialog onto the error taxonomy.
pub(crate) fn expect(
    dialog: Option<Dialog>,
    kind: DialogKind,
    container: &Container,
) -> Result<Dialog> {
    dialog.ok_or_else(|| {
        DocuportError::DialogConfiguration(format!(
            "{} dialog on '{}'",
            kind.as_str(),
            container.name
        ))
    })
}
