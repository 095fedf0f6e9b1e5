use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unresolved attribute name → members carrying it
pub type MemberFindings = BTreeMap<String, Vec<String>>;

/// Unresolved attributes of one resolved class, grouped by scope.
/// Empty scopes are left out of the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeFindings {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class_attributes: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub property_attributes: MemberFindings,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub method_attributes: MemberFindings,

    /// Keyed by method name, then by attribute name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameter_attributes: BTreeMap<String, MemberFindings>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub class_constant_attributes: MemberFindings,
}

impl AttributeFindings {
    pub fn is_empty(&self) -> bool {
        self.class_attributes.is_empty()
            && self.property_attributes.is_empty()
            && self.method_attributes.is_empty()
            && self.parameter_attributes.values().all(BTreeMap::is_empty)
            && self.class_constant_attributes.is_empty()
    }

    /// Distinct unresolved attribute names across every scope
    pub fn attribute_names(&self) -> std::collections::BTreeSet<&str> {
        self.class_attributes
            .iter()
            .map(String::as_str)
            .chain(self.property_attributes.keys().map(String::as_str))
            .chain(self.method_attributes.keys().map(String::as_str))
            .chain(
                self.parameter_attributes
                    .values()
                    .flat_map(|by_name| by_name.keys().map(String::as_str)),
            )
            .chain(self.class_constant_attributes.keys().map(String::as_str))
            .collect()
    }
}

/// A resolved class carrying at least one unresolved attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnomalousType {
    pub fqcn: String,
    pub file_name: String,
    #[serde(flatten)]
    pub findings: AttributeFindings,
}

/// A resolved class whose attributes all resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanType {
    pub fqcn: String,
    pub file_name: String,
}

/// A sole-class file whose fully-qualified name does not resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundEntry {
    pub fqcn: String,
    pub file_name: String,
}

/// Result of validating one candidate class
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    NotFound(NotFoundEntry),
    Clean(CleanType),
    Anomalous(AnomalousType),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_scopes_are_omitted() {
        let mut findings = AttributeFindings::default();
        findings
            .property_attributes
            .insert("Missing".into(), vec!["name".into()]);
        let anomalous = AnomalousType {
            fqcn: "Bar".into(),
            file_name: "Bar.php".into(),
            findings,
        };

        let value = serde_json::to_value(&anomalous).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "fqcn": "Bar",
                "fileName": "Bar.php",
                "propertyAttributes": { "Missing": ["name"] }
            })
        );
    }

    #[test]
    fn empty_parameter_groups_count_as_empty() {
        let mut findings = AttributeFindings::default();
        assert!(findings.is_empty());
        findings
            .parameter_attributes
            .insert("handle".into(), MemberFindings::new());
        assert!(findings.is_empty());
    }

    #[test]
    fn attribute_names_are_distinct() {
        let mut findings = AttributeFindings::default();
        findings.class_attributes = vec!["Gone".into(), "Gone".into()];
        findings
            .method_attributes
            .insert("Gone".into(), vec!["run".into()]);
        let mut params = MemberFindings::new();
        params.insert("Typo".into(), vec!["id".into()]);
        findings.parameter_attributes.insert("find".into(), params);

        let names: Vec<_> = findings.attribute_names().into_iter().collect();
        assert_eq!(names, vec!["Gone", "Typo"]);
    }
}
