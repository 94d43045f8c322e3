//! Translation of plain Rust values into tags.
//!
//! Rust has no runtime reflection, so each type that can be translated is described by a [`TypeMapping`]:
//! an ordered list of fields, each with an accessor and flags saying whether it becomes an attribute or is skipped.
//! Mappings are collected in a [`MappingTable`], which walks an object graph and builds the matching tags.
//!
//! For a structured object, [`MappingTable::translate`] creates one tag named after the type, then for each field:
//! - excluded fields are skipped
//! - collections become a tag named after the field, holding one translated tag per element
//! - attribute fields become attributes of the type tag
//! - scalars become a value tag named after the field
//! - nested objects become a tag named after the field, holding the translated object
//!
//! # Example
//! ```rust
//! use xmldoc::{Document, mapping::{FieldValue, MappingTable, TypeMapping}};
//!
//! struct Componente { nome: String, peso: i32 }
//!
//! let table = MappingTable::new().with(
//!     TypeMapping::<Componente>::new()
//!         .attribute("nome", |c| FieldValue::scalar(c.nome.as_str()))
//!         .attribute("peso", |c| FieldValue::scalar(c.peso)),
//! );
//!
//! let mut document = Document::with_root("avaliacao").unwrap();
//! let componente = Componente { nome: "Projeto".to_string(), peso: 80 };
//! table.translate(&mut document.root_mut(), &componente).unwrap();
//!
//! assert_eq!(
//!     document.root().pretty_print_xml(),
//!     "<avaliacao>\n\t<Componente nome=\"Projeto\" peso=80 />\n</avaliacao>\n"
//! );
//! ```
use crate::{
    TagId, TagMut, Value,
    error::{XmlErrorKind, XmlResult, bail},
};
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// The value of one field, as seen by the translator.
#[derive(Debug)]
pub enum FieldValue<'a> {
    /// No value; an error unless the field is excluded
    Absent,

    /// A scalar, written as an attribute or a value tag
    Scalar(Value),

    /// A nested object, translated with its own mapping
    Object(&'a dyn Any),

    /// A sequence of objects, each translated with its own mapping
    Collection(Vec<&'a dyn Any>),
}
impl<'a> FieldValue<'a> {
    /// A scalar value.
    pub fn scalar(value: impl Into<Value>) -> Self {
        Self::Scalar(value.into())
    }

    /// A scalar value, or [`FieldValue::Absent`] for `None`.
    pub fn optional<V: Into<Value>>(value: Option<V>) -> Self {
        match value {
            Some(value) => Self::Scalar(value.into()),
            None => Self::Absent,
        }
    }

    /// A nested object.
    pub fn object<T: Any>(value: &'a T) -> Self {
        Self::Object(value)
    }

    /// A sequence of objects.
    pub fn collection<T: Any>(items: &'a [T]) -> Self {
        Self::Collection(items.iter().map(|item| item as &dyn Any).collect())
    }
}

/// Reads a field from an instance.
pub type Accessor<T> = for<'a> fn(&'a T) -> FieldValue<'a>;

/// Describes one field of a mapped type.
pub struct FieldDescriptor<T> {
    name: String,
    accessor: Accessor<T>,
    attribute: bool,
    excluded: bool,
}
impl<T> FieldDescriptor<T> {
    /// A field written as a child tag.
    pub fn new(name: impl Into<String>, accessor: Accessor<T>) -> Self {
        Self {
            name: name.into(),
            accessor,
            attribute: false,
            excluded: false,
        }
    }

    /// Writes the field as an attribute of the type tag instead.
    #[must_use]
    pub fn as_attribute(mut self) -> Self {
        self.attribute = true;
        self
    }

    /// Skips the field during translation.
    #[must_use]
    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// The field name, used as the tag or attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the field is written as an attribute.
    #[must_use]
    pub fn is_attribute(&self) -> bool {
        self.attribute
    }

    /// Returns `true` if the field is skipped.
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Reads the field from an instance.
    pub fn read<'a>(&self, instance: &'a T) -> FieldValue<'a> {
        (self.accessor)(instance)
    }
}
impl<T> std::fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("attribute", &self.attribute)
            .field("excluded", &self.excluded)
            .finish_non_exhaustive()
    }
}

/// The ordered field list of one type, and the name of the tag it translates to.
pub struct TypeMapping<T> {
    type_name: String,
    fields: Vec<FieldDescriptor<T>>,
    adapter: Option<String>,
}
impl<T: Any> TypeMapping<T> {
    /// A mapping whose tag is named after the type, without its module path or generics.
    #[must_use]
    pub fn new() -> Self {
        Self::named(short_type_name::<T>())
    }

    /// A mapping whose tag has the given name.
    pub fn named(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: vec![],
            adapter: None,
        }
    }
}
impl<T: Any> Default for TypeMapping<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T> TypeMapping<T> {
    /// Adds a field written as a child tag.
    #[must_use]
    pub fn field(self, name: &str, accessor: Accessor<T>) -> Self {
        self.with_field(FieldDescriptor::new(name, accessor))
    }

    /// Adds a field written as an attribute of the type tag.
    #[must_use]
    pub fn attribute(self, name: &str, accessor: Accessor<T>) -> Self {
        self.with_field(FieldDescriptor::new(name, accessor).as_attribute())
    }

    /// Declares a field that is never written.
    #[must_use]
    pub fn exclude(self, name: &str) -> Self {
        self.with_field(FieldDescriptor::new(name, |_| FieldValue::Absent).excluded())
    }

    /// Adds a field descriptor as-is.
    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares a per-type adapter.
    ///
    /// Adapters are recorded and reported when the type is translated, but they do not change the output.
    #[must_use]
    pub fn with_adapter(mut self, adapter: impl Into<String>) -> Self {
        self.adapter = Some(adapter.into());
        self
    }

    /// The name of the tag created for each instance.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// The declared adapter, if any.
    #[must_use]
    pub fn adapter(&self) -> Option<&str> {
        self.adapter.as_deref()
    }
}
impl<T> std::fmt::Debug for TypeMapping<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeMapping")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("adapter", &self.adapter)
            .finish()
    }
}

/// The type-independent view of a field, used while translating.
struct FieldInfo<'m> {
    name: &'m str,
    attribute: bool,
    excluded: bool,
}

/// A [`TypeMapping`] with its type parameter erased, so mappings of any type share one table.
trait ErasedMapping {
    fn type_name(&self) -> &str;
    fn adapter(&self) -> Option<&str>;
    fn fields(&self) -> Vec<FieldInfo<'_>>;

    /// Reads field `index` from `object`. `None` if `object` is not of the mapped type.
    fn resolve<'o>(&self, index: usize, object: &'o dyn Any) -> Option<FieldValue<'o>>;
}
impl<T: Any> ErasedMapping for TypeMapping<T> {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn adapter(&self) -> Option<&str> {
        self.adapter.as_deref()
    }

    fn fields(&self) -> Vec<FieldInfo<'_>> {
        self.fields
            .iter()
            .map(|field| FieldInfo {
                name: &field.name,
                attribute: field.attribute,
                excluded: field.excluded,
            })
            .collect()
    }

    fn resolve<'o>(&self, index: usize, object: &'o dyn Any) -> Option<FieldValue<'o>> {
        let instance = object.downcast_ref::<T>()?;
        self.fields.get(index).map(|field| field.read(instance))
    }
}

/// A registry of [`TypeMapping`]s, keyed by type.
#[derive(Default)]
pub struct MappingTable {
    mappings: HashMap<TypeId, Box<dyn ErasedMapping>>,
}
impl MappingTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the mapping for `T`, replacing any previous one.
    pub fn register<T: Any>(&mut self, mapping: TypeMapping<T>) {
        self.mappings.insert(TypeId::of::<T>(), Box::new(mapping));
    }

    /// Registers the mapping for `T` and returns the table.
    #[must_use]
    pub fn with<T: Any>(mut self, mapping: TypeMapping<T>) -> Self {
        self.register(mapping);
        self
    }

    /// Returns `true` if `T` has a mapping.
    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.mappings.contains_key(&TypeId::of::<T>())
    }

    /// Number of mapped types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns `true` if no type has a mapping.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Translates one object into a new child of `target`, named after its type.
    ///
    /// Returns the handle of the new tag. If translation fails part way, the new tag is removed again.
    ///
    /// # Errors
    /// - [`XmlErrorKind::Mapping`] if a type has no mapping, a field is [`FieldValue::Absent`],
    ///   a nested object is declared as an attribute, or an attribute is declared twice
    /// - any error raised while adding the tags and attributes
    pub fn translate(&self, target: &mut TagMut<'_>, object: &dyn Any) -> XmlResult<TagId> {
        let Some(mapping) = self.mappings.get(&(*object).type_id()) else {
            let path = target.path();
            bail!(
                at = path.clone(),
                XmlErrorKind::Mapping(format!("no type mapping registered for an object under {path}"))
            );
        };

        if let Some(adapter) = mapping.adapter() {
            log::debug!(
                "type `{}` declares adapter `{adapter}`; adapters are not applied",
                mapping.type_name()
            );
        }

        let mut tag = target.add_tag(mapping.type_name())?;
        let id = tag.id();
        if let Err(e) = self.translate_fields(&mut tag, mapping.as_ref(), object) {
            tag.delete(true);
            return Err(e);
        }

        Ok(id)
    }

    /// Translates each object in order, as siblings under `target`.
    ///
    /// Returns the handle of `target` itself.
    ///
    /// # Errors
    /// See [`MappingTable::translate`]. Tags created for earlier items are kept.
    pub fn translate_collection(
        &self,
        target: &mut TagMut<'_>,
        items: &[&dyn Any],
    ) -> XmlResult<TagId> {
        for item in items {
            self.translate(target, *item)?;
        }

        Ok(target.id())
    }

    /// Translates a slice of objects of one type. See [`MappingTable::translate_collection`].
    ///
    /// # Errors
    /// See [`MappingTable::translate`].
    pub fn translate_slice<T: Any>(&self, target: &mut TagMut<'_>, items: &[T]) -> XmlResult<TagId> {
        let items: Vec<&dyn Any> = items.iter().map(|item| item as &dyn Any).collect();
        self.translate_collection(target, &items)
    }

    fn translate_fields(
        &self,
        tag: &mut TagMut<'_>,
        mapping: &dyn ErasedMapping,
        object: &dyn Any,
    ) -> XmlResult<()> {
        for (index, field) in mapping.fields().into_iter().enumerate() {
            if field.excluded {
                log::trace!("{}.{}: excluded", mapping.type_name(), field.name);
                continue;
            }

            let Some(value) = mapping.resolve(index, object) else {
                bail!(
                    at = tag.path(),
                    XmlErrorKind::Mapping(format!(
                        "`{}` does not describe the object being translated",
                        mapping.type_name()
                    ))
                );
            };

            match value {
                FieldValue::Collection(items) => {
                    log::trace!("{}.{}: collection of {}", mapping.type_name(), field.name, items.len());
                    let mut container = tag.add_tag(field.name)?;
                    self.translate_collection(&mut container, &items)?;
                }

                FieldValue::Absent => {
                    bail!(
                        at = tag.path(),
                        XmlErrorKind::Mapping(format!(
                            "field `{}` of `{}` has no value",
                            field.name,
                            mapping.type_name()
                        ))
                    );
                }

                FieldValue::Scalar(value) if field.attribute => {
                    log::trace!("{}.{}: attribute", mapping.type_name(), field.name);
                    if !tag.add_attribute(field.name, value)? {
                        bail!(
                            at = tag.path(),
                            XmlErrorKind::Mapping(format!(
                                "attribute `{}` of `{}` is declared twice",
                                field.name,
                                mapping.type_name()
                            ))
                        );
                    }
                }

                FieldValue::Scalar(value) => {
                    log::trace!("{}.{}: value tag", mapping.type_name(), field.name);
                    tag.add_value_tag(field.name, value)?;
                }

                FieldValue::Object(_) if field.attribute => {
                    bail!(
                        at = tag.path(),
                        XmlErrorKind::Mapping(format!(
                            "field `{}` of `{}` is an object and cannot be an attribute",
                            field.name,
                            mapping.type_name()
                        ))
                    );
                }

                FieldValue::Object(nested) => {
                    log::trace!("{}.{}: nested object", mapping.type_name(), field.name);
                    let mut container = tag.add_tag(field.name)?;
                    self.translate(&mut container, nested)?;
                }
            }
        }

        Ok(())
    }
}
impl std::fmt::Debug for MappingTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.mappings.values().map(|m| m.type_name()).collect();
        names.sort_unstable();
        f.debug_struct("MappingTable").field("types", &names).finish()
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    struct Componente {
        nome: String,
        peso: i32,
    }

    struct Fuc {
        codigo: String,
        nome: String,
        ects: f64,
        observacoes: String,
        avaliacao: Vec<Componente>,
    }

    struct Wrapper {
        inner: Componente,
        note: Option<String>,
    }

    fn table() -> MappingTable {
        MappingTable::new()
            .with(
                TypeMapping::<Componente>::new()
                    .attribute("nome", |c| FieldValue::scalar(c.nome.as_str()))
                    .attribute("peso", |c| FieldValue::scalar(c.peso)),
            )
            .with(
                TypeMapping::<Fuc>::named("FUC")
                    .attribute("codigo", |f| FieldValue::scalar(f.codigo.as_str()))
                    .field("nome", |f| FieldValue::scalar(f.nome.as_str()))
                    .field("ects", |f| FieldValue::scalar(f.ects))
                    .with_field(
                        FieldDescriptor::new("observacoes", |f: &Fuc| {
                            FieldValue::scalar(f.observacoes.as_str())
                        })
                        .excluded(),
                    )
                    .field("avaliacao", |f| FieldValue::collection(&f.avaliacao)),
            )
            .with(
                TypeMapping::<Wrapper>::new()
                    .field("inner", |w| FieldValue::object(&w.inner))
                    .field("note", |w| FieldValue::optional(w.note.as_deref())),
            )
    }

    fn componente(nome: &str, peso: i32) -> Componente {
        Componente {
            nome: nome.to_string(),
            peso,
        }
    }

    fn fuc() -> Fuc {
        Fuc {
            codigo: "M123".to_string(),
            nome: "Programação Avançada".to_string(),
            ects: 6.0,
            observacoes: "Quase a acabar ...".to_string(),
            avaliacao: vec![componente("Quizzes", 20), componente("Projeto", 80)],
        }
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Componente>(), "Componente");
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec");
        assert_eq!(TypeMapping::<Fuc>::new().type_name(), "Fuc");
    }

    #[test]
    fn test_translate_object() {
        let table = table();
        let mut document = Document::with_root("fucs").unwrap();
        let id = table.translate(&mut document.root_mut(), &fuc()).unwrap();

        let tag = document.tag(id).unwrap();
        assert_eq!(tag.name(), "FUC");
        assert_eq!(tag.attribute_names(), vec!["codigo"]);
        assert_eq!(tag.size(), 3);
        assert!(document.search("observacoes").is_empty());

        let avaliacao = document.search("FUC/avaliacao")[0];
        let children: Vec<_> = avaliacao.children().map(|c| c.name()).collect();
        assert_eq!(children, vec!["Componente", "Componente"]);
        assert_eq!(
            avaliacao.children().next().unwrap().attribute_value("peso").as_deref(),
            Some("20")
        );
    }

    #[test]
    fn test_translate_collection_returns_target() {
        let table = table();
        let mut document = Document::with_root("fucs").unwrap();
        let root = document.root().id();

        let items = [componente("a", 1), componente("b", 2), componente("c", 3)];
        let id = table.translate_slice(&mut document.root_mut(), &items).unwrap();

        assert_eq!(id, root);
        assert_eq!(document.root().size(), 3);
    }

    #[test]
    fn test_translate_nested_object() {
        let table = table();
        let mut document = Document::with_root("root").unwrap();
        let wrapper = Wrapper {
            inner: componente("x", 1),
            note: Some("ok".to_string()),
        };
        table.translate(&mut document.root_mut(), &wrapper).unwrap();

        let inner = document.search("Wrapper/inner/Componente");
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].attribute_value("nome").as_deref(), Some("x"));
        assert_eq!(
            document.search("Wrapper/note")[0].value(),
            Some(&Value::from("ok"))
        );
    }

    #[test]
    fn test_absent_value_fails_and_cleans_up() {
        let table = table();
        let mut document = Document::with_root("root").unwrap();
        let wrapper = Wrapper {
            inner: componente("x", 1),
            note: None,
        };

        let err = table.translate(&mut document.root_mut(), &wrapper).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::Mapping(ref m) if m.contains("`note`")));
        assert_eq!(err.context.tag.as_deref(), Some("/root/Wrapper"));
        assert_eq!(document.size(), 1);
    }

    #[test]
    fn test_unregistered_type() {
        let table = table();
        let mut document = Document::with_root("root").unwrap();
        let err = table.translate(&mut document.root_mut(), &42_u8).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::Mapping(_)));
        assert_eq!(document.size(), 1);
    }

    #[test]
    fn test_object_as_attribute() {
        let table = MappingTable::new()
            .with(TypeMapping::<Componente>::new())
            .with(TypeMapping::<Wrapper>::new().attribute("inner", |w| FieldValue::object(&w.inner)));

        let mut document = Document::with_root("root").unwrap();
        let wrapper = Wrapper {
            inner: componente("x", 1),
            note: None,
        };
        let err = table.translate(&mut document.root_mut(), &wrapper).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::Mapping(_)));
    }

    #[test]
    fn test_adapter_is_inert() {
        let plain = table();
        let adapted = MappingTable::new().with(
            TypeMapping::<Componente>::new()
                .with_adapter("ComponenteAdapter")
                .attribute("nome", |c| FieldValue::scalar(c.nome.as_str()))
                .attribute("peso", |c| FieldValue::scalar(c.peso)),
        );

        let item = componente("Projeto", 80);
        let mut first = Document::with_root("root").unwrap();
        let mut second = Document::with_root("root").unwrap();
        plain.translate(&mut first.root_mut(), &item).unwrap();
        adapted.translate(&mut second.root_mut(), &item).unwrap();

        assert_eq!(first.serialize(), second.serialize());
    }

    #[test]
    fn test_table_registry() {
        let table = table();
        assert_eq!(table.len(), 3);
        assert!(table.contains::<Fuc>());
        assert!(!table.contains::<String>());
        assert!(MappingTable::new().is_empty());
    }
}
