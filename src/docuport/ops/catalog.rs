use crate::connector::RepositoryConnector;
use crate::error::{DocuportError, Result};
use crate::model::{Container, ContainerKind, Session};

/// All containers the session can access, optionally filtered by kind.
pub fn list_accessible<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    kind: Option<ContainerKind>,
) -> Result<Vec<Container>> {
    let mut containers = conn.list_containers(session)?;
    if let Some(kind) = kind {
        containers.retain(|c| c.kind == kind);
    }
    Ok(containers)
}

/// Case-insensitive exact-name lookup within one kind.
///
/// Duplicate names are a lookup error, never silently resolved: zero matches
/// is `NotFound`, more than one is `AmbiguousName`.
pub fn resolve_by_name<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    name: &str,
    kind: ContainerKind,
) -> Result<Container> {
    let wanted = name.to_lowercase();
    let mut matches: Vec<Container> = conn
        .list_containers(session)?
        .into_iter()
        .filter(|c| c.kind == kind && c.name.to_lowercase() == wanted)
        .collect();
    match matches.len() {
        0 => Err(DocuportError::NotFound(name.to_string())),
        1 => Ok(matches.remove(0)),
        _ => Err(DocuportError::AmbiguousName(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::memory::fixtures::RepoFixture;

    #[test]
    fn lookup_is_case_insensitive() {
        let f = RepoFixture::new().with_cabinet("cab", "Invoices");
        for name in ["Invoices", "invoices", "INVOICES"] {
            let c = resolve_by_name(&f.connector, &f.session, name, ContainerKind::Cabinet).unwrap();
            assert_eq!(c.id, "cab");
        }
    }

    #[test]
    fn unknown_name_is_not_found() {
        let f = RepoFixture::new().with_cabinet("cab", "Invoices");
        let err =
            resolve_by_name(&f.connector, &f.session, "Contracts", ContainerKind::Cabinet)
                .unwrap_err();
        assert!(matches!(err, DocuportError::NotFound(_)));
    }

    #[test]
    fn duplicate_names_are_ambiguous() {
        let f = RepoFixture::new()
            .with_cabinet("cab-1", "Invoices")
            .with_cabinet("cab-2", "invoices");
        let err =
            resolve_by_name(&f.connector, &f.session, "Invoices", ContainerKind::Cabinet)
                .unwrap_err();
        assert!(matches!(err, DocuportError::AmbiguousName(_)));
    }

    #[test]
    fn kind_scopes_both_listing_and_lookup() {
        let f = RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_tray("tray", "Invoices");

        // Same name on a different kind does not make the lookup ambiguous.
        let c = resolve_by_name(&f.connector, &f.session, "Invoices", ContainerKind::Tray).unwrap();
        assert_eq!(c.id, "tray");

        let trays =
            list_accessible(&f.connector, &f.session, Some(ContainerKind::Tray)).unwrap();
        assert_eq!(trays.len(), 1);
        assert_eq!(trays[0].id, "tray");
        let all = list_accessible(&f.connector, &f.session, None).unwrap();
        assert_eq!(all.len(), 2);
    }
}
