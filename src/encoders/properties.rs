//! Declarative UI schema handed back to hosts.
//!
//! Hosts map this onto their own property/widget system; `hwenc-probe` can
//! also dump it as JSON. Kept deliberately minimal: integer dropdowns and
//! groups cover every option the registered handlers expose.

use serde::{Deserialize, Serialize};

/// One configurable property.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// Dropdown of labeled integer choices.
    IntList {
        /// Settings key the chosen value is stored under.
        key: String,
        /// Display label.
        label: String,
        /// `(label, value)` entries in display order.
        entries: Vec<(String, i64)>,
    },
    /// Named group of child properties.
    Group {
        /// Group key.
        key: String,
        /// Display label.
        label: String,
        /// Properties inside the group.
        children: PropertyList,
    },
}

impl Property {
    /// Key of this property or group.
    pub fn key(&self) -> &str {
        match self {
            Self::IntList { key, .. } | Self::Group { key, .. } => key,
        }
    }
}

/// Ordered list of properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyList {
    properties: Vec<Property>,
}

impl PropertyList {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an integer dropdown.
    pub fn add_int_list(&mut self, key: &str, label: &str, entries: Vec<(String, i64)>) {
        self.properties.push(Property::IntList {
            key: key.to_string(),
            label: label.to_string(),
            entries,
        });
    }

    /// Append a group.
    pub fn add_group(&mut self, key: &str, label: &str, children: PropertyList) {
        self.properties.push(Property::Group {
            key: key.to_string(),
            label: label.to_string(),
            children,
        });
    }

    /// Properties in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.properties.iter()
    }

    /// Number of top-level properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the schema is empty.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Find a property by key, descending into groups.
    pub fn find(&self, key: &str) -> Option<&Property> {
        for property in &self.properties {
            if property.key() == key {
                return Some(property);
            }
            if let Property::Group { children, .. } = property {
                if let Some(found) = children.find(key) {
                    return Some(found);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_descends_into_groups() {
        let mut inner = PropertyList::new();
        inner.add_int_list("H264.Profile", "Profile", vec![("high".into(), 2)]);

        let mut schema = PropertyList::new();
        schema.add_group("H264", "H.264/AVC", inner);

        assert!(schema.find("H264").is_some());
        let profile = schema.find("H264.Profile").unwrap();
        match profile {
            Property::IntList { entries, .. } => assert_eq!(entries.len(), 1),
            other => panic!("unexpected property: {other:?}"),
        }
        assert!(schema.find("H264.Level").is_none());
    }

    #[test]
    fn schema_serializes_to_json() {
        let mut schema = PropertyList::new();
        schema.add_int_list("H264.Level", "Level", vec![("Automatic".into(), 0)]);

        let json = serde_json::to_value(&schema).unwrap();
        let entries = &json["properties"][0]["int_list"]["entries"];
        assert_eq!(entries[0][0], "Automatic");
        assert_eq!(entries[0][1], 0);
    }
}
