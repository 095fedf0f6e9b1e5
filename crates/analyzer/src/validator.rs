use attrscan_protocol::{
    qualify, AnomalousType, AttributeFindings, CleanType, NotFoundEntry, ValidationOutcome,
};
use std::collections::BTreeMap;

use crate::collector::AnnotationCollector;
use crate::registry::{TypeDescriptor, TypeRegistry};

/// Resolves candidate classes and sorts their attributes into findings
pub struct Validator<'r, R: ?Sized> {
    registry: &'r R,
}

impl<'r, R: TypeRegistry + ?Sized> Validator<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    pub fn validate(
        &self,
        namespace: Option<&str>,
        class_name: &str,
        file_name: &str,
    ) -> ValidationOutcome {
        let fqcn = qualify(namespace, class_name);

        let descriptor = match self.registry.resolve(&fqcn) {
            Ok(Some(descriptor)) => descriptor,
            Ok(None) => {
                log::debug!("{fqcn} does not resolve ({file_name})");
                return not_found(fqcn, file_name);
            }
            Err(err) => {
                log::warn!("{err} ({file_name}); recording as not found");
                return not_found(fqcn, file_name);
            }
        };

        let findings = self.findings_for(&descriptor);
        if findings.is_empty() {
            ValidationOutcome::Clean(CleanType {
                fqcn,
                file_name: file_name.to_string(),
            })
        } else {
            log::debug!(
                "{fqcn}: {} unresolved attribute(s)",
                findings.attribute_names().len()
            );
            ValidationOutcome::Anomalous(AnomalousType {
                fqcn,
                file_name: file_name.to_string(),
                findings,
            })
        }
    }

    /// Walk every attribute scope of a resolved type
    pub fn findings_for(&self, descriptor: &TypeDescriptor) -> AttributeFindings {
        let collector = AnnotationCollector::new(self.registry);

        let mut parameter_attributes = BTreeMap::new();
        for method in &descriptor.methods {
            let by_attribute = collector.unresolved_members(&method.parameters);
            if !by_attribute.is_empty() {
                parameter_attributes.insert(method.name.clone(), by_attribute);
            }
        }

        AttributeFindings {
            class_attributes: collector.unresolved_names(&descriptor.attributes),
            property_attributes: collector.unresolved_members(&descriptor.properties),
            method_attributes: collector.unresolved_members(&descriptor.methods),
            parameter_attributes,
            class_constant_attributes: collector.unresolved_members(&descriptor.constants),
        }
    }
}

fn not_found(fqcn: String, file_name: &str) -> ValidationOutcome {
    ValidationOutcome::NotFound(NotFoundEntry {
        fqcn,
        file_name: file_name.to_string(),
    })
}
