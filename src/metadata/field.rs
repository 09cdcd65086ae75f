use std::collections::HashMap;

use crate::core::FieldKind;

/// Tag value that excludes a field from column mapping.
pub const EXCLUDE_TAG: &str = "-";

/// A field as declared on an entity type, before tag resolution.
///
/// `#[derive(Entity)]` emits one of these per struct field; manual
/// `Entity` impls list them by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: &'static str,
    pub tag: Option<&'static str>,
    pub kind: FieldKind,
    pub format: Option<&'static str>,
}

impl FieldDecl {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            tag: None,
            kind,
            format: None,
        }
    }

    pub const fn tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Timestamp parse format (chrono `strftime` syntax).
    pub const fn format(mut self, format: &'static str) -> Self {
        self.format = Some(format);
        self
    }

    /// Resolves the column tag: the explicit tag if present, the field name
    /// otherwise. Returns `None` for excluded fields.
    pub fn column(&self) -> Option<&'static str> {
        match self.tag {
            None => Some(self.name),
            Some(EXCLUDE_TAG) => None,
            Some(tag) if tag.is_empty() => Some(self.name),
            Some(tag) => Some(tag),
        }
    }
}

/// A declared field after tag resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedField {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
    pub format: Option<&'static str>,
    pub valid: bool,
    pub ordinal: usize,
}

impl MappedField {
    fn resolve(ordinal: usize, decl: &FieldDecl) -> Self {
        match decl.column() {
            Some(column) => Self {
                name: decl.name,
                column,
                kind: decl.kind,
                format: decl.format,
                valid: true,
                ordinal,
            },
            None => Self {
                name: decl.name,
                column: EXCLUDE_TAG,
                kind: decl.kind,
                format: None,
                valid: false,
                ordinal,
            },
        }
    }
}

/// Ordered field metadata for one type. Excluded fields keep their slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTable {
    type_name: &'static str,
    fields: Vec<MappedField>,
}

impl FieldTable {
    pub fn empty(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
        }
    }

    pub fn from_decls(type_name: &'static str, decls: &[FieldDecl]) -> Self {
        let fields = decls
            .iter()
            .enumerate()
            .map(|(ordinal, decl)| MappedField::resolve(ordinal, decl))
            .collect();
        Self { type_name, fields }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// All declared fields, excluded ones included.
    pub fn fields(&self) -> &[MappedField] {
        &self.fields
    }

    pub fn mapped(&self) -> impl Iterator<Item = &MappedField> {
        self.fields.iter().filter(|field| field.valid)
    }

    pub fn mapped_count(&self) -> usize {
        self.mapped().count()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column tags of the included fields, in declaration order.
    pub fn columns(&self) -> Vec<&'static str> {
        self.mapped().map(|field| field.column).collect()
    }

    pub fn field_by_column(&self, column: &str) -> Option<&MappedField> {
        self.mapped().find(|field| field.column == column)
    }

    pub fn column_index(&self) -> HashMap<&'static str, &MappedField> {
        self.mapped().map(|field| (field.column, field)).collect()
    }
}
