//! Form model consumed by the engine.
//!
//! # Design
//! The engine reads forms through the [`HtmlForm`] and [`FormField`] traits
//! so hosts can serialize their own element trees without copying them.
//! [`Form`] and [`Field`] are plain owned implementations that deserialize
//! from JSON, which is how tests and non-browser callers describe a form.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Read access to a form element.
pub trait HtmlForm {
    type Field: FormField;

    /// The `method` attribute, e.g. `"get"` or `"POST"`.
    fn method(&self) -> &str;

    /// The `action` attribute. `None` or an empty string aborts submission.
    fn action(&self) -> Option<&str>;

    fn enctype(&self) -> Option<&str>;

    /// Fields in document order.
    fn fields(&self) -> &[Self::Field];
}

/// Read access to a single form control.
pub trait FormField {
    /// `None` when the control has no `name` attribute.
    fn name(&self) -> Option<&str>;
    fn kind(&self) -> FieldKind;
    fn value(&self) -> &str;
    /// Only meaningful for radio buttons and checkboxes.
    fn is_checked(&self) -> bool;
    /// Attached files; empty for anything but file inputs.
    fn files(&self) -> &[FileAttachment];
}

/// The control kinds the serializer distinguishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    /// Any control serialized by value: text inputs, hidden, password,
    /// select, textarea and every other input type.
    #[default]
    Text,
    Radio,
    Checkbox,
    File,
}

impl FieldKind {
    /// Classify a DOM element from its node name and `type` attribute.
    ///
    /// Only `INPUT` elements look at `type`; `SELECT`, `TEXTAREA` and the rest
    /// serialize by value.
    pub fn from_element(node_name: &str, input_type: Option<&str>) -> Self {
        if !node_name.eq_ignore_ascii_case("input") {
            return FieldKind::Text;
        }
        input_type.map(FieldKind::from).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Radio => "radio",
            FieldKind::Checkbox => "checkbox",
            FieldKind::File => "file",
        }
    }

    /// Radio buttons and checkboxes only submit when checked.
    pub fn is_checkable(&self) -> bool {
        matches!(self, FieldKind::Radio | FieldKind::Checkbox)
    }
}

impl From<&str> for FieldKind {
    fn from(input_type: &str) -> Self {
        match input_type.to_ascii_lowercase().as_str() {
            "radio" => FieldKind::Radio,
            "checkbox" => FieldKind::Checkbox,
            "file" => FieldKind::File,
            _ => FieldKind::Text,
        }
    }
}

impl From<String> for FieldKind {
    fn from(input_type: String) -> Self {
        FieldKind::from(input_type.as_str())
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file selected in a file input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub name: String,
    #[serde(default, rename = "type")]
    pub mime_type: String,
    pub content: FileContent,
}

/// Where a file's bytes come from. Read lazily by a
/// [`FileSource`](crate::files::FileSource).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileContent {
    /// Bytes already in memory.
    Bytes(Vec<u8>),
    /// A file on the local filesystem.
    Path(PathBuf),
}

/// An owned form control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub files: Vec<FileAttachment>,
}

impl Field {
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            value: value.to_string(),
            ..Self::default()
        }
    }

    pub fn checkbox(name: &str, value: &str, checked: bool) -> Self {
        Self {
            kind: FieldKind::Checkbox,
            checked,
            ..Self::text(name, value)
        }
    }

    pub fn radio(name: &str, value: &str, checked: bool) -> Self {
        Self {
            kind: FieldKind::Radio,
            checked,
            ..Self::text(name, value)
        }
    }

    pub fn file(name: &str, files: Vec<FileAttachment>) -> Self {
        Self {
            name: Some(name.to_string()),
            kind: FieldKind::File,
            files,
            ..Self::default()
        }
    }
}

impl FormField for Field {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn kind(&self) -> FieldKind {
        self.kind
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn is_checked(&self) -> bool {
        self.checked
    }

    fn files(&self) -> &[FileAttachment] {
        &self.files
    }
}

/// An owned form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub enctype: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

fn default_method() -> String {
    "get".to_string()
}

impl Form {
    pub fn new(method: &str, action: &str) -> Self {
        Self {
            method: method.to_string(),
            action: Some(action.to_string()),
            enctype: None,
            fields: Vec::new(),
        }
    }

    pub fn with_enctype(mut self, enctype: &str) -> Self {
        self.enctype = Some(enctype.to_string());
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

impl HtmlForm for Form {
    type Field = Field;

    fn method(&self) -> &str {
        &self.method
    }

    fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    fn enctype(&self) -> Option<&str> {
        self.enctype.as_deref()
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }
}
