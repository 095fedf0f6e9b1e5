use attrscan_protocol::{DeclarationKind, DeclarationRecord, SideRegistryEntry};

/// Where a scanned file goes next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Zero or several declarations; reported as-is
    Suspect(DeclarationRecord),
    /// A lone trait, interface or abstract class
    Side {
        kind: DeclarationKind,
        entry: SideRegistryEntry,
    },
    /// A lone class, to be validated
    Candidate {
        namespace: Option<String>,
        class_name: String,
        file_name: String,
    },
}

pub fn classify(record: DeclarationRecord) -> Classification {
    let sole = record
        .sole_declaration()
        .map(|(kind, name)| (kind, name.to_string()));
    let Some((kind, name)) = sole else {
        return Classification::Suspect(record);
    };

    match kind {
        DeclarationKind::Class => Classification::Candidate {
            namespace: record.namespace,
            class_name: name,
            file_name: record.file_name,
        },
        kind => Classification::Side {
            kind,
            entry: SideRegistryEntry {
                namespace: record.namespace,
                file_name: record.file_name,
                names: vec![name],
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(kind: DeclarationKind, names: &[&str]) -> DeclarationRecord {
        let mut record = DeclarationRecord::new("src/x.php");
        record.namespace = Some("App".into());
        record
            .names_mut(kind)
            .extend(names.iter().map(|n| n.to_string()));
        record
    }

    #[test]
    fn empty_file_is_suspect() {
        let empty = DeclarationRecord::new("empty.php");
        assert_eq!(classify(empty.clone()), Classification::Suspect(empty));
    }

    #[test]
    fn several_declarations_are_suspect() {
        let mut mixed = record(DeclarationKind::Class, &["A"]);
        mixed.traits.push("T".into());
        assert!(matches!(classify(mixed), Classification::Suspect(_)));
    }

    #[test]
    fn lone_class_is_a_candidate() {
        assert_eq!(
            classify(record(DeclarationKind::Class, &["Foo"])),
            Classification::Candidate {
                namespace: Some("App".into()),
                class_name: "Foo".into(),
                file_name: "src/x.php".into()
            }
        );
    }

    #[test]
    fn lone_interface_goes_to_its_registry() {
        assert_eq!(
            classify(record(DeclarationKind::Interface, &["Greet"])),
            Classification::Side {
                kind: DeclarationKind::Interface,
                entry: SideRegistryEntry {
                    namespace: Some("App".into()),
                    file_name: "src/x.php".into(),
                    names: vec!["Greet".into()]
                }
            }
        );
    }

    #[test]
    fn abstract_is_its_own_kind() {
        let Classification::Side { kind, .. } = classify(record(DeclarationKind::Abstract, &["Base"]))
        else {
            panic!("abstract class should be a side entry");
        };
        assert_eq!(kind, DeclarationKind::Abstract);
    }
}
