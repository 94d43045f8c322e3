use super::{AttributeStore, Value, validate_name};
use crate::{
    Document,
    arena::{TagArena, TagId},
    error::{XmlErrorKind, XmlResult, bail},
};

/// What a tag hangs from.
///
/// The root tag is anchored to the document itself, which ends depth and path walks,
/// and makes the root impossible to delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Parent {
    Document,
    Tag(TagId),
}

/// Storage for a single tag in the document arena.
///
/// A tag holds either a value or children, never both.
#[derive(Debug, Clone)]
pub(crate) struct TagData {
    pub name: String,
    pub value: Option<Value>,
    pub attributes: AttributeStore,
    pub children: Vec<TagId>,
    pub parent: Parent,
}
impl TagData {
    pub fn new(name: impl Into<String>, parent: Parent) -> Self {
        Self {
            name: name.into(),
            value: None,
            attributes: AttributeStore::new(),
            children: vec![],
            parent,
        }
    }
}

/// A read-only view of a tag in a document:
/// `<name attr="value">...</name>`
///
/// Cheap to copy. Obtained from [`Document::root`], [`Document::tag`], [`Tag::children`] or [`Tag::search`].
#[derive(Clone, Copy)]
pub struct Tag<'a> {
    doc: &'a Document,
    id: TagId,
}
impl<'a> Tag<'a> {
    pub(crate) fn new(doc: &'a Document, id: TagId) -> Self {
        Self { doc, id }
    }

    fn data(&self) -> &'a TagData {
        &self.doc.arena[self.id]
    }

    /// The handle of this tag, usable with [`Document::tag_mut`].
    #[must_use]
    pub fn id(&self) -> TagId {
        self.id
    }

    /// The name of the tag.
    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    /// The scalar value of the tag, if it has one.
    #[must_use]
    pub fn value(&self) -> Option<&'a Value> {
        self.data().value.as_ref()
    }

    /// The attributes of the tag.
    #[must_use]
    pub fn attributes(&self) -> &'a AttributeStore {
        &self.data().attributes
    }

    /// Get an attribute value as text, or `None` if it is not present.
    #[must_use]
    pub fn attribute_value(&self, name: &str) -> Option<String> {
        self.attributes().value_as_string(name)
    }

    /// The attribute names, in insertion order.
    #[must_use]
    pub fn attribute_names(&self) -> Vec<&'a str> {
        self.attributes().names()
    }

    /// The direct children of the tag, in insertion order.
    pub fn children(&self) -> impl Iterator<Item = Tag<'a>> + use<'a> {
        let doc = self.doc;
        self.data().children.iter().map(move |&id| Tag::new(doc, id))
    }

    /// The parent tag, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Tag<'a>> {
        match self.data().parent {
            Parent::Document => None,
            Parent::Tag(id) => Some(Tag::new(self.doc, id)),
        }
    }

    /// Returns `true` for the root tag of the document.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.data().parent == Parent::Document
    }

    /// Returns `true` if the tag has child tags.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.data().children.is_empty()
    }

    /// Returns `true` if the tag has attributes.
    #[must_use]
    pub fn has_attributes(&self) -> bool {
        !self.data().attributes.is_empty()
    }

    /// Number of direct children.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data().children.len()
    }

    /// Number of tags in this subtree, counting this one.
    #[must_use]
    pub fn full_size(&self) -> usize {
        1 + self.children().map(|child| child.full_size()).sum::<usize>()
    }

    /// Depth in the document; the root is at depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.data().parent;
        while let Parent::Tag(id) = current {
            depth += 1;
            current = self.doc.arena[id].parent;
        }
        depth
    }

    /// Depth in the document of the deepest tag in this subtree.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        fn deepest(tag: Tag<'_>, depth: usize) -> usize {
            tag.children()
                .map(|child| deepest(child, depth + 1))
                .max()
                .unwrap_or(depth)
        }

        deepest(*self, self.depth())
    }

    /// Path of names from the root, such as `/plano/fuc/avaliacao`.
    #[must_use]
    pub fn path(&self) -> String {
        let mut names = vec![self.name()];
        let mut current = self.data().parent;
        while let Parent::Tag(id) = current {
            let tag = &self.doc.arena[id];
            names.push(&tag.name);
            current = tag.parent;
        }

        names.iter().rev().fold(String::new(), |mut path, name| {
            path.push('/');
            path.push_str(name);
            path
        })
    }

    /// Finds every tag in this subtree, this one included, whose path ends with `pattern`.
    ///
    /// This is a literal suffix match, not a query language: `componente` also matches `/a/subcomponente`.
    /// Results are in pre-order.
    #[must_use]
    pub fn search(&self, pattern: &str) -> Vec<Tag<'a>> {
        fn collect<'a>(tag: Tag<'a>, path: &str, pattern: &str, results: &mut Vec<Tag<'a>>) {
            if path.ends_with(pattern) {
                results.push(tag);
            }

            for child in tag.children() {
                let child_path = format!("{path}/{}", child.name());
                collect(child, &child_path, pattern, results);
            }
        }

        let mut results = vec![];
        collect(*self, &self.path(), pattern, &mut results);
        results
    }

    /// Walks this subtree in pre-order.
    ///
    /// The children of a tag are only visited if `visitor` returned `true` for it.
    pub fn accept<F>(&self, mut visitor: F)
    where
        F: FnMut(Tag<'a>) -> bool,
    {
        fn walk<'a, F: FnMut(Tag<'a>) -> bool>(tag: Tag<'a>, visitor: &mut F) {
            if visitor(tag) {
                for child in tag.children() {
                    walk(child, visitor);
                }
            }
        }

        walk(*self, &mut visitor);
    }

    /// Formats this subtree as XML, indented by its depth in the document.
    #[must_use]
    pub fn pretty_print_xml(&self) -> String {
        let mut out = String::new();
        crate::to_xml::write_tag(&mut out, *self, crate::to_xml::TAB);
        out
    }
}
impl std::fmt::Debug for Tag<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tag")
            .field("id", &self.id)
            .field("path", &self.path())
            .field("value", &self.value())
            .finish()
    }
}
impl PartialEq for Tag<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

/// A mutable handle to a tag in a document.
///
/// Holds the document exclusively, so only one tag can be changed at a time.
/// Child handles returned by [`TagMut::add_tag`] borrow from their parent handle.
pub struct TagMut<'a> {
    doc: &'a mut Document,
    id: TagId,
}
impl<'a> TagMut<'a> {
    pub(crate) fn new(doc: &'a mut Document, id: TagId) -> Self {
        Self { doc, id }
    }

    fn data(&self) -> &TagData {
        &self.doc.arena[self.id]
    }

    fn data_mut(&mut self) -> &mut TagData {
        &mut self.doc.arena[self.id]
    }

    /// A read-only view of this tag.
    #[must_use]
    pub fn as_tag(&self) -> Tag<'_> {
        Tag::new(self.doc, self.id)
    }

    /// The handle of this tag.
    #[must_use]
    pub fn id(&self) -> TagId {
        self.id
    }

    /// The name of the tag.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.data().name
    }

    /// The scalar value of the tag, if it has one.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.data().value.as_ref()
    }

    /// Path of names from the root. See [`Tag::path`].
    #[must_use]
    pub fn path(&self) -> String {
        self.as_tag().path()
    }

    /// Creates a child tag at the end of this tag's children.
    ///
    /// # Errors
    /// - [`XmlErrorKind::InvalidName`] if the name is not a valid XML name
    /// - [`XmlErrorKind::ValueConflict`] if this tag holds a value
    ///
    /// # Example
    /// ```rust
    /// use xmldoc::Document;
    ///
    /// let mut document = Document::with_root("plano").unwrap();
    /// let mut root = document.root_mut();
    /// root.add_tag("fuc").unwrap().add_attribute("codigo", "03782").unwrap();
    ///
    /// assert_eq!(document.search("fuc")[0].path(), "/plano/fuc");
    /// ```
    pub fn add_tag(&mut self, name: &str) -> XmlResult<TagMut<'_>> {
        let id = self.create_child(name, None)?;
        Ok(TagMut::new(&mut *self.doc, id))
    }

    /// Creates a child tag holding a value.
    ///
    /// # Errors
    /// Same as [`TagMut::add_tag`].
    pub fn add_value_tag(&mut self, name: &str, value: impl Into<Value>) -> XmlResult<TagMut<'_>> {
        let id = self.create_child(name, Some(value.into()))?;
        Ok(TagMut::new(&mut *self.doc, id))
    }

    /// Creates a child tag and fills it in with `setup`.
    ///
    /// `setup` runs immediately, with the new child as its target, and can nest further calls.
    /// If `value` is given, a plain value tag is created instead and `setup` is not called.
    ///
    /// # Errors
    /// Same as [`TagMut::add_tag`], plus any error returned by `setup`.
    ///
    /// # Example
    /// ```rust
    /// use xmldoc::Document;
    ///
    /// let mut document = Document::with_root("plano").unwrap();
    /// document
    ///     .root_mut()
    ///     .add_tag_with("fuc", None, |fuc| {
    ///         fuc.add_value_tag("nome", "Programação Avançada")?;
    ///         fuc.add_value_tag("ects", 6.0)?;
    ///         Ok(())
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(document.size(), 4);
    /// ```
    pub fn add_tag_with<F>(
        &mut self,
        name: &str,
        value: Option<Value>,
        setup: F,
    ) -> XmlResult<TagMut<'_>>
    where
        F: FnOnce(&mut TagMut<'_>) -> XmlResult<()>,
    {
        if let Some(value) = value {
            return self.add_value_tag(name, value);
        }

        let id = self.create_child(name, None)?;
        let mut child = TagMut::new(&mut *self.doc, id);
        setup(&mut child)?;
        Ok(child)
    }

    /// Runs `setup` with this tag as its target.
    ///
    /// # Errors
    /// [`XmlErrorKind::ValueConflict`] if this tag holds a value, plus any error returned by `setup`.
    pub fn build<F>(&mut self, setup: F) -> XmlResult<()>
    where
        F: FnOnce(&mut Self) -> XmlResult<()>,
    {
        if self.value().is_some() {
            let path = self.path();
            bail!(at = path.clone(), XmlErrorKind::ValueConflict(path));
        }

        setup(self)
    }

    fn create_child(&mut self, name: &str, value: Option<Value>) -> XmlResult<TagId> {
        validate_name(name).map_err(|e| e.with_tag(self.path()))?;
        if self.value().is_some() {
            let path = self.path();
            bail!(at = path.clone(), XmlErrorKind::ValueConflict(path));
        }

        let mut child = TagData::new(name, Parent::Tag(self.id));
        child.value = value;

        let id = self.doc.arena.alloc(child);
        self.data_mut().children.push(id);
        Ok(id)
    }

    /// Gives the tag a value, replacing any previous one.
    ///
    /// # Errors
    /// [`XmlErrorKind::ValueConflict`] if the tag has children.
    pub fn set_value(&mut self, value: impl Into<Value>) -> XmlResult<()> {
        if !self.data().children.is_empty() {
            let path = self.path();
            bail!(at = path.clone(), XmlErrorKind::ValueConflict(path));
        }

        self.data_mut().value = Some(value.into());
        Ok(())
    }

    /// Removes the value of the tag, returning it.
    pub fn clear_value(&mut self) -> Option<Value> {
        self.data_mut().value.take()
    }

    /// Renames this tag.
    ///
    /// # Errors
    /// Returns an error if the name is not a valid XML name.
    pub fn change_tag_name(&mut self, new_name: &str) -> XmlResult<bool> {
        validate_name(new_name).map_err(|e| e.with_tag(self.path()))?;
        self.data_mut().name = new_name.to_string();
        Ok(true)
    }

    /// Renames every tag below this one named `old_name`. This tag is not considered.
    ///
    /// Returns the number of tags renamed.
    ///
    /// # Errors
    /// Returns an error, before changing anything, if `new_name` is not a valid XML name.
    pub fn change_all_tags_named(&mut self, old_name: &str, new_name: &str) -> XmlResult<usize> {
        fn rename(arena: &mut TagArena, id: TagId, old_name: &str, new_name: &str) -> usize {
            let mut renamed = 0;
            for i in 0..arena[id].children.len() {
                let child = arena[id].children[i];
                if arena[child].name == old_name {
                    arena[child].name = new_name.to_string();
                    renamed += 1;
                }

                renamed += rename(arena, child, old_name, new_name);
            }
            renamed
        }

        validate_name(new_name).map_err(|e| e.with_tag(self.path()))?;
        let renamed = rename(&mut self.doc.arena, self.id, old_name, new_name);
        log::debug!("renamed {renamed} tags from `{old_name}` to `{new_name}`");
        Ok(renamed)
    }

    /// Deletes this tag from its parent.
    ///
    /// Tags with children are only deleted if `force` is set, in which case the whole subtree goes.
    /// The root tag can never be deleted.
    ///
    /// Returns `true` if the tag was deleted.
    pub fn delete(self, force: bool) -> bool {
        let Parent::Tag(parent) = self.data().parent else {
            return false;
        };

        TagMut::new(self.doc, parent).delete_tag(self.id, force)
    }

    /// Deletes a direct child of this tag.
    ///
    /// The child is only deleted if it has no children, or if `force` is set.
    ///
    /// Returns `true` if the child was deleted.
    pub fn delete_tag(&mut self, child: TagId, force: bool) -> bool {
        let Some(position) = self.data().children.iter().position(|&c| c == child) else {
            return false;
        };

        if !force && !self.doc.arena[child].children.is_empty() {
            return false;
        }

        self.data_mut().children.remove(position);
        let freed = self.doc.arena.free_subtree(child);
        log::debug!("deleted {child:?} under {} ({freed} tags freed)", self.path());
        true
    }

    /// Deletes every tag below this one named `tag_name`.
    ///
    /// Without `force`, matching tags are cleaned bottom-up: nested matches go first,
    /// and a match is only deleted if it is left with no children.
    /// With `force`, matching tags are deleted with everything below them.
    ///
    /// Returns the number of matching tags deleted.
    pub fn delete_all_tags_named(&mut self, tag_name: &str, force: bool) -> usize {
        fn cascade(arena: &mut TagArena, id: TagId, tag_name: &str, force: bool) -> usize {
            let mut deleted = 0;
            let mut marked = vec![];

            for i in 0..arena[id].children.len() {
                let child = arena[id].children[i];
                if force && arena[child].name == tag_name {
                    marked.push(child);
                    continue;
                }

                deleted += cascade(arena, child, tag_name, force);

                let tag = &arena[child];
                if tag.name == tag_name && tag.children.is_empty() {
                    marked.push(child);
                }
            }

            if !marked.is_empty() {
                arena[id].children.retain(|c| !marked.contains(c));
                for child in &marked {
                    arena.free_subtree(*child);
                }
                deleted += marked.len();
            }

            deleted
        }

        let deleted = cascade(&mut self.doc.arena, self.id, tag_name, force);
        log::debug!("deleted {deleted} tags named `{tag_name}` (force: {force})");
        deleted
    }

    /// The attributes of the tag, for direct manipulation.
    pub fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.data_mut().attributes
    }

    /// Adds an attribute. Returns `false` if the tag already has one with this name.
    ///
    /// # Errors
    /// Returns an error if the name is not a valid XML name.
    pub fn add_attribute(&mut self, name: &str, value: impl Into<Value>) -> XmlResult<bool> {
        let added = self.data_mut().attributes.add(name, value);
        added.map_err(|e| e.with_tag(self.path()))
    }

    /// Get an attribute value as text, or `None` if it is not present.
    #[must_use]
    pub fn attribute_value(&self, name: &str) -> Option<String> {
        self.data().attributes.value_as_string(name)
    }

    /// The attribute names, in insertion order.
    #[must_use]
    pub fn attribute_names(&self) -> Vec<&str> {
        self.data().attributes.names()
    }

    /// Replaces the value of an attribute. Returns `false` if it is not present.
    pub fn set_attribute_value(&mut self, name: &str, value: impl Into<Value>) -> bool {
        self.data_mut().attributes.set_value(name, value)
    }

    /// Renames an attribute. Returns `false` if it is not present.
    ///
    /// # Errors
    /// Returns an error if `new_name` is not a valid XML name.
    pub fn rename_attribute(&mut self, name: &str, new_name: &str) -> XmlResult<bool> {
        let renamed = self.data_mut().attributes.rename(name, new_name);
        renamed.map_err(|e| e.with_tag(self.path()))
    }

    /// Removes an attribute. Returns `false` if it is not present.
    pub fn delete_attribute(&mut self, name: &str) -> bool {
        self.data_mut().attributes.remove(name)
    }

    /// Adds an attribute to every tag below this one named `tag_name`.
    ///
    /// Returns the number of tags that received the attribute; tags already holding it are left alone.
    ///
    /// # Errors
    /// Returns an error, before changing anything, if `attribute_name` is not a valid XML name.
    pub fn add_attribute_on_all_tags_named(
        &mut self,
        tag_name: &str,
        attribute_name: &str,
        value: impl Into<Value>,
    ) -> XmlResult<usize> {
        validate_name(attribute_name).map_err(|e| e.with_tag(self.path()))?;
        let value = value.into();

        let added = self.update_all_tags_named(tag_name, |attributes| {
            matches!(attributes.add(attribute_name, value.clone()), Ok(true))
        });
        log::debug!("added `{attribute_name}` to {added} tags named `{tag_name}`");
        Ok(added)
    }

    /// Renames an attribute on every tag below this one named `tag_name`.
    ///
    /// Returns the number of tags where the attribute was renamed.
    ///
    /// # Errors
    /// Returns an error, before changing anything, if `new_name` is not a valid XML name.
    pub fn change_all_attributes_named(
        &mut self,
        tag_name: &str,
        old_name: &str,
        new_name: &str,
    ) -> XmlResult<usize> {
        validate_name(new_name).map_err(|e| e.with_tag(self.path()))?;

        let renamed = self.update_all_tags_named(tag_name, |attributes| {
            matches!(attributes.rename(old_name, new_name), Ok(true))
        });
        log::debug!("renamed `{old_name}` to `{new_name}` on {renamed} tags named `{tag_name}`");
        Ok(renamed)
    }

    /// Removes an attribute from every tag below this one named `tag_name`.
    ///
    /// Returns the number of tags the attribute was removed from.
    pub fn delete_attribute_on_all_tags_named(
        &mut self,
        tag_name: &str,
        attribute_name: &str,
    ) -> usize {
        let removed =
            self.update_all_tags_named(tag_name, |attributes| attributes.remove(attribute_name));
        log::debug!("removed `{attribute_name}` from {removed} tags named `{tag_name}`");
        removed
    }

    /// Applies `update` to the attributes of every descendant named `tag_name`.
    /// Counts the tags for which it returned `true`.
    fn update_all_tags_named<F>(&mut self, tag_name: &str, mut update: F) -> usize
    where
        F: FnMut(&mut AttributeStore) -> bool,
    {
        fn visit<F>(arena: &mut TagArena, id: TagId, tag_name: &str, update: &mut F) -> usize
        where
            F: FnMut(&mut AttributeStore) -> bool,
        {
            let mut changed = 0;
            for i in 0..arena[id].children.len() {
                let child = arena[id].children[i];
                let tag = &mut arena[child];
                if tag.name == tag_name && update(&mut tag.attributes) {
                    changed += 1;
                }

                changed += visit(arena, child, tag_name, update);
            }
            changed
        }

        visit(&mut self.doc.arena, self.id, tag_name, &mut update)
    }
}
impl std::fmt::Debug for TagMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_tag().fmt(f)
    }
}
