use super::{Value, validate_name};
use crate::error::XmlResult;

/// An attribute set on a tag or on the document, with a name and value:
/// `name="value"`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: String,
    value: Value,
}
impl Attribute {
    /// Returns the name of the attribute.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of the attribute.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the attribute as written inside a tag: `name=displayValue`
    #[must_use]
    pub fn to_xml(&self) -> String {
        format!("{}={}", self.name, self.value.display_value())
    }
}

/// An ordered set of attributes with unique names.
///
/// Every tag owns one, and so does the document itself (for the `<?xml` declaration).
/// Insertion order is kept, and is the order attributes are written in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
    attributes: Vec<Attribute>,
}
impl AttributeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new attribute at the end of the store.
    ///
    /// Returns `false`, leaving the store untouched, if the name is already present.
    ///
    /// # Errors
    /// Returns an error if the name is not a valid XML name.
    pub fn add(&mut self, name: &str, value: impl Into<Value>) -> XmlResult<bool> {
        validate_name(name)?;
        if self.position(name).is_some() {
            return Ok(false);
        }

        self.attributes.push(Attribute {
            name: name.to_string(),
            value: value.into(),
        });
        Ok(true)
    }

    /// Appends an attribute whose name is known to be valid and unused.
    pub(crate) fn push_unchecked(&mut self, name: &str, value: impl Into<Value>) {
        self.attributes.push(Attribute {
            name: name.to_string(),
            value: value.into(),
        });
    }

    /// Get the value of an attribute by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.position(name).map(|i| &self.attributes[i].value)
    }

    /// Get the value of an attribute as text, or `None` if it is not present.
    /// Booleans come back upper case.
    #[must_use]
    pub fn value_as_string(&self, name: &str) -> Option<String> {
        self.get(name).map(Value::as_text)
    }

    /// Replaces the value of an attribute. Returns `false` if it is not present.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> bool {
        match self.position(name) {
            Some(i) => {
                self.attributes[i].value = value.into();
                true
            }
            None => false,
        }
    }

    /// Renames an attribute in place, keeping its position.
    ///
    /// Returns `false` if `name` is not present, or if `new_name` is already used by another attribute.
    ///
    /// # Errors
    /// Returns an error if `new_name` is not a valid XML name.
    pub fn rename(&mut self, name: &str, new_name: &str) -> XmlResult<bool> {
        validate_name(new_name)?;
        let Some(i) = self.position(name) else {
            return Ok(false);
        };

        if name != new_name && self.position(new_name).is_some() {
            return Ok(false);
        }

        self.attributes[i].name = new_name.to_string();
        Ok(true)
    }

    /// Removes an attribute. Returns `false` if it is not present.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(i) => {
                self.attributes.remove(i);
                true
            }
            None => false,
        }
    }

    /// Returns the attribute names, in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.attributes.iter().map(Attribute::name).collect()
    }

    /// Returns `true` if an attribute with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterates the attributes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attributes.iter()
    }

    /// Number of attributes in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if the store holds no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// All attributes as written inside a tag, space separated, in insertion order.
    #[must_use]
    pub fn to_xml(&self) -> String {
        self.attributes
            .iter()
            .map(Attribute::to_xml)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }
}
impl<'a> IntoIterator for &'a AttributeStore {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
