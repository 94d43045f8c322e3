use crate::{
    Tag, TagMut, Value,
    arena::{TagArena, TagId},
    error::{XmlError, XmlResult},
    node::{AttributeStore, Parent, TagData, validate_name},
};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name given to the root tag by [`Document::new`].
pub const DEFAULT_ROOT_NAME: &str = "documentRoot";

/// An XML document built in memory.
///
/// The document owns every tag in the tree, and its own attributes,
/// which are written in the `<?xml ... ?>` declaration.
/// New documents start with `version="1.0"` and `encoding="UTF-8"`.
///
/// Tags are reached through handles:
/// - [`Document::root`] and [`Document::tag`] give read-only [`Tag`]s
/// - [`Document::root_mut`] and [`Document::tag_mut`] give a [`TagMut`] to build or change the tree
///
/// Most tree-wide operations are also available here, and act on the root tag.
///
/// # Example
/// ```rust
/// use xmldoc::Document;
///
/// let mut document = Document::with_root("plano").unwrap();
/// let mut root = document.root_mut();
/// root.add_value_tag("curso", "Mestrado em Engenharia de Informática").unwrap();
///
/// assert_eq!(
///     document.serialize(),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n\
///      <plano>\n\
///      \t<curso>Mestrado em Engenharia de Informática</curso>\n\
///      </plano>\n\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) arena: TagArena,
    pub(crate) root: TagId,
    pub(crate) attributes: AttributeStore,
}
impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
impl Document {
    /// Creates an empty document with a root tag named `documentRoot`.
    #[must_use]
    pub fn new() -> Self {
        Self::new_unchecked(DEFAULT_ROOT_NAME)
    }

    /// Creates an empty document with a root tag of the given name.
    ///
    /// # Errors
    /// Returns an error if the name is not a valid XML name.
    pub fn with_root(root_name: &str) -> XmlResult<Self> {
        validate_name(root_name)?;
        Ok(Self::new_unchecked(root_name))
    }

    fn new_unchecked(root_name: &str) -> Self {
        let mut arena = TagArena::new();
        let root = arena.alloc(TagData::new(root_name, Parent::Document));

        let mut attributes = AttributeStore::new();
        attributes.push_unchecked("version", "1.0");
        attributes.push_unchecked("encoding", "UTF-8");

        Self {
            arena,
            root,
            attributes,
        }
    }

    /// The root tag.
    #[must_use]
    pub fn root(&self) -> Tag<'_> {
        Tag::new(self, self.root)
    }

    /// A mutable handle to the root tag.
    pub fn root_mut(&mut self) -> TagMut<'_> {
        let root = self.root;
        TagMut::new(self, root)
    }

    /// Looks up a tag by handle. Returns `None` if the tag has been deleted.
    #[must_use]
    pub fn tag(&self, id: TagId) -> Option<Tag<'_>> {
        self.arena.contains(id).then(|| Tag::new(self, id))
    }

    /// Looks up a tag by handle, for changes. Returns `None` if the tag has been deleted.
    pub fn tag_mut(&mut self, id: TagId) -> Option<TagMut<'_>> {
        if self.arena.contains(id) {
            Some(TagMut::new(self, id))
        } else {
            None
        }
    }

    /// The name of the root tag.
    #[must_use]
    pub fn root_tag_name(&self) -> &str {
        &self.arena[self.root].name
    }

    /// Renames the root tag.
    ///
    /// # Errors
    /// Returns an error if the name is not a valid XML name.
    pub fn change_root_tag_name(&mut self, new_name: &str) -> XmlResult<bool> {
        let old_name = self.root_tag_name().to_string();
        self.root_mut().change_tag_name(new_name)?;
        log::debug!("renamed root tag from `{old_name}` to `{new_name}`");
        Ok(true)
    }

    /// Number of tags in the document, the root included.
    #[must_use]
    pub fn size(&self) -> usize {
        self.arena.len()
    }

    /// Depth of the deepest tag; a document with only a root has depth 1.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.root().max_depth()
    }

    /// Finds every tag whose path ends with `pattern`. See [`Tag::search`].
    #[must_use]
    pub fn search(&self, pattern: &str) -> Vec<Tag<'_>> {
        self.root().search(pattern)
    }

    /// Renames every tag named `old_name` below the root. See [`TagMut::change_all_tags_named`].
    ///
    /// # Errors
    /// Returns an error if `new_name` is not a valid XML name.
    pub fn change_all_tags_named(&mut self, old_name: &str, new_name: &str) -> XmlResult<usize> {
        self.root_mut().change_all_tags_named(old_name, new_name)
    }

    /// Deletes every tag named `tag_name`. See [`TagMut::delete_all_tags_named`].
    pub fn delete_all_tags_named(&mut self, tag_name: &str, force: bool) -> usize {
        self.root_mut().delete_all_tags_named(tag_name, force)
    }

    /// See [`TagMut::add_attribute_on_all_tags_named`].
    ///
    /// # Errors
    /// Returns an error if `attribute_name` is not a valid XML name.
    pub fn add_attribute_on_all_tags_named(
        &mut self,
        tag_name: &str,
        attribute_name: &str,
        value: impl Into<Value>,
    ) -> XmlResult<usize> {
        self.root_mut()
            .add_attribute_on_all_tags_named(tag_name, attribute_name, value)
    }

    /// See [`TagMut::change_all_attributes_named`].
    ///
    /// # Errors
    /// Returns an error if `new_name` is not a valid XML name.
    pub fn change_all_attributes_named(
        &mut self,
        tag_name: &str,
        old_name: &str,
        new_name: &str,
    ) -> XmlResult<usize> {
        self.root_mut()
            .change_all_attributes_named(tag_name, old_name, new_name)
    }

    /// See [`TagMut::delete_attribute_on_all_tags_named`].
    pub fn delete_attribute_on_all_tags_named(
        &mut self,
        tag_name: &str,
        attribute_name: &str,
    ) -> usize {
        self.root_mut()
            .delete_attribute_on_all_tags_named(tag_name, attribute_name)
    }

    /// The attributes of the document, written in the `<?xml` declaration.
    #[must_use]
    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    /// Adds a document attribute. Returns `false` if one with this name exists.
    ///
    /// # Errors
    /// Returns an error if the name is not a valid XML name.
    pub fn add_attribute(&mut self, name: &str, value: impl Into<Value>) -> XmlResult<bool> {
        self.attributes.add(name, value)
    }

    /// Get a document attribute value as text, or `None` if it is not present.
    #[must_use]
    pub fn attribute_value(&self, name: &str) -> Option<String> {
        self.attributes.value_as_string(name)
    }

    /// Replaces the value of a document attribute. Returns `false` if it is not present.
    pub fn set_attribute_value(&mut self, name: &str, value: impl Into<Value>) -> bool {
        self.attributes.set_value(name, value)
    }

    /// Renames a document attribute. Returns `false` if it is not present.
    ///
    /// # Errors
    /// Returns an error if `new_name` is not a valid XML name.
    pub fn rename_attribute(&mut self, name: &str, new_name: &str) -> XmlResult<bool> {
        self.attributes.rename(name, new_name)
    }

    /// Removes a document attribute. Returns `false` if it is not present.
    pub fn delete_attribute(&mut self, name: &str) -> bool {
        self.attributes.remove(name)
    }

    /// The document attribute names, in insertion order.
    #[must_use]
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.names()
    }

    /// The document as XML text, indented with tabs.
    #[must_use]
    pub fn serialize(&self) -> String {
        crate::to_xml::format_document(self, crate::to_xml::TAB)
    }

    /// Create a formatted XML string from this document.
    ///
    /// `tab_char` is used to indent the XML. If `None`, a tab is used, giving the same text as [`Document::serialize`].
    ///
    /// # Example
    /// ```rust
    /// use xmldoc::Document;
    ///
    /// let mut document = Document::with_root("test").unwrap();
    /// document.root_mut().add_value_tag("test2", "test").unwrap();
    ///
    /// let formatted = document.to_xml(Some("    "));
    /// assert!(formatted.contains("\n    <test2>test</test2>\n"));
    /// ```
    #[must_use]
    pub fn to_xml(&self, tab_char: Option<&str>) -> String {
        crate::to_xml::format_document(self, tab_char.unwrap_or(crate::to_xml::TAB))
    }

    /// Write this document as a formatted XML string using the given writer.
    ///
    /// See [`Document::to_xml`] for more details.
    ///
    /// # Errors
    /// Returns an error if the writer fails.
    pub fn to_xml_with_writer<W: Write>(
        &self,
        writer: &mut W,
        tab_char: Option<&str>,
    ) -> std::io::Result<()> {
        crate::to_xml::write_xml(writer, self, tab_char)
    }

    /// Writes the document to `<name>.xml`, relative to the working directory.
    ///
    /// The name is used as given, so it may contain directories.
    /// Returns the path written.
    ///
    /// # Errors
    /// Returns [`crate::XmlErrorKind::Io`] if the file cannot be written.
    pub fn save_to_file(&self, name: &str) -> XmlResult<PathBuf> {
        self.write_file(PathBuf::from(format!("{name}.xml")))
    }

    /// Writes the document to `<dir>/<name>.xml`. The directory must exist.
    ///
    /// # Errors
    /// Returns [`crate::XmlErrorKind::Io`] if the file cannot be written.
    pub fn save_to_dir(&self, dir: impl AsRef<Path>, name: &str) -> XmlResult<PathBuf> {
        self.write_file(dir.as_ref().join(format!("{name}.xml")))
    }

    fn write_file(&self, path: PathBuf) -> XmlResult<PathBuf> {
        if let Err(e) = std::fs::write(&path, self.serialize()) {
            return Err(XmlError::from(e).with_file(path));
        }

        log::debug!("saved {} tags to {}", self.size(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XmlErrorKind;

    #[test]
    fn test_new_document() {
        let document = Document::new();
        assert_eq!(document.root_tag_name(), "documentRoot");
        assert_eq!(document.size(), 1);
        assert_eq!(document.max_depth(), 1);
        assert_eq!(document.attribute_names(), vec!["version", "encoding"]);
        assert_eq!(
            document.serialize(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<documentRoot></documentRoot>\n\n"
        );
    }

    #[test]
    fn test_with_root_invalid() {
        let err = Document::with_root("xmlRoot").unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::InvalidName(ref n) if n == "xmlRoot"));
    }

    #[test]
    fn test_change_root_tag_name() {
        let mut document = Document::new();
        assert!(document.change_root_tag_name("plano").unwrap());
        assert_eq!(document.root_tag_name(), "plano");

        assert!(document.change_root_tag_name("1plano").is_err());
        assert_eq!(document.root_tag_name(), "plano");
    }

    #[test]
    fn test_document_attributes() {
        let mut document = Document::new();
        assert_eq!(document.attribute_value("version").as_deref(), Some("1.0"));

        assert!(document.add_attribute("standalone", "yes").unwrap());
        assert!(!document.add_attribute("version", "2.0").unwrap());
        assert!(document.set_attribute_value("version", "1.1"));
        assert!(document.rename_attribute("standalone", "alone").unwrap());
        assert!(!document.rename_attribute("missing", "other").unwrap());
        assert!(document.delete_attribute("encoding"));
        assert!(!document.delete_attribute("encoding"));

        assert_eq!(document.attribute_names(), vec!["version", "alone"]);
        assert!(document.serialize().starts_with("<?xml version=\"1.1\" alone=\"yes\" ?>\n"));
    }

    #[test]
    fn test_tag_lookup_after_delete() {
        let mut document = Document::new();
        let child = document.root_mut().add_tag("child").unwrap().id();
        assert_eq!(document.tag(child).unwrap().name(), "child");

        assert!(document.tag_mut(child).unwrap().delete(false));
        assert!(document.tag(child).is_none());
        assert!(document.tag_mut(child).is_none());
        assert_eq!(document.size(), 1);
    }

    #[test]
    fn test_stale_handle_after_slot_reuse() {
        let mut document = Document::with_root("root").unwrap();
        let old = document.root_mut().add_tag("old").unwrap().id();
        assert!(document.tag_mut(old).unwrap().delete(false));

        let new = document.root_mut().add_tag("new").unwrap().id();
        assert!(document.tag(old).is_none());
        assert!(!document.root_mut().delete_tag(old, true));
        assert_eq!(document.tag(new).unwrap().name(), "new");
        assert!(document.serialize().contains("\t<new></new>\n"));
    }

    #[test]
    fn test_delegated_operations() {
        let mut document = Document::with_root("root").unwrap();
        document
            .root_mut()
            .build(|root| {
                root.add_tag_with("a", None, |a| {
                    a.add_tag("b")?;
                    a.add_tag("b")?;
                    Ok(())
                })?;
                root.add_tag("b")?;
                Ok(())
            })
            .unwrap();

        assert_eq!(document.size(), 5);
        assert_eq!(document.max_depth(), 3);
        assert_eq!(document.search("b").len(), 3);

        assert_eq!(document.add_attribute_on_all_tags_named("b", "n", 1).unwrap(), 3);
        assert_eq!(document.change_all_attributes_named("b", "n", "m").unwrap(), 3);
        assert_eq!(document.delete_attribute_on_all_tags_named("b", "m"), 3);

        assert_eq!(document.change_all_tags_named("b", "c").unwrap(), 3);
        assert_eq!(document.delete_all_tags_named("a", false), 0);
        assert_eq!(document.delete_all_tags_named("a", true), 1);
        assert_eq!(document.size(), 2);
    }

    #[test]
    fn test_to_xml_custom_indent() {
        let mut document = Document::with_root("test").unwrap();
        document.root_mut().add_value_tag("test2", "test").unwrap();

        assert_eq!(document.to_xml(None), document.serialize());
        assert!(document.to_xml(Some("  ")).contains("\n  <test2>test</test2>\n"));

        let mut buffer = vec![];
        document.to_xml_with_writer(&mut buffer, None).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), document.serialize());
    }

    #[test]
    fn test_save_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::with_root("plano").unwrap();

        let path = document.save_to_dir(dir.path(), "plano").unwrap();
        assert_eq!(path, dir.path().join("plano.xml"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), document.serialize());
    }

    #[test]
    fn test_save_to_file_appends_extension() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new();
        let name = dir.path().join("out");

        let path = document.save_to_file(name.to_str().unwrap()).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("xml"));
        assert!(path.exists());
    }

    #[test]
    fn test_save_to_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = Document::new().save_to_dir(&missing, "doc").unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::Io(_)));
        assert_eq!(err.context.file, Some(missing.join("doc.xml")));
    }
}
