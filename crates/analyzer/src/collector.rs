use attrscan_protocol::MemberFindings;

use crate::registry::{MemberDescriptor, MethodDescriptor, TypeRegistry};

/// Anything reflected off a type that carries attributes
pub trait Annotated {
    fn name(&self) -> &str;
    fn attributes(&self) -> &[String];
}

impl Annotated for MemberDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[String] {
        &self.attributes
    }
}

impl Annotated for MethodDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[String] {
        &self.attributes
    }
}

/// Filters attribute references down to the ones whose definition does not
/// resolve in the registry.
pub struct AnnotationCollector<'r, R: ?Sized> {
    registry: &'r R,
}

impl<'r, R: TypeRegistry + ?Sized> AnnotationCollector<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    pub fn is_unresolved(&self, name: &str) -> bool {
        !self.registry.annotation_definition_exists(name)
    }

    /// Unresolved names in their original order, repeats kept
    pub fn unresolved_names(&self, names: &[String]) -> Vec<String> {
        names
            .iter()
            .filter(|name| self.is_unresolved(name))
            .cloned()
            .collect()
    }

    /// Group owners under each unresolved `(attribute, owner)` reference
    pub fn unresolved<'a>(
        &self,
        refs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> MemberFindings {
        let mut findings = MemberFindings::new();
        for (attribute, owner) in refs {
            if self.is_unresolved(attribute) {
                findings
                    .entry(attribute.to_string())
                    .or_default()
                    .push(owner.to_string());
            }
        }
        findings
    }

    pub fn unresolved_members<M: Annotated>(&self, members: &[M]) -> MemberFindings {
        self.unresolved(members.iter().flat_map(|member| {
            member
                .attributes()
                .iter()
                .map(move |attribute| (attribute.as_str(), member.name()))
        }))
    }
}
