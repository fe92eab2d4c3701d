//! Writer producing Xcode's canonical ASCII `project.pbxproj` layout.
//!
//! Layout rules:
//! - `// !$*UTF8*$!` header line
//! - dictionary keys sorted bytewise with `isa` always first
//! - `objects` grouped into `/* Begin <isa> section */` blocks, ordered by isa
//!   then by identifier
//! - `PBXBuildFile` and `PBXFileReference` objects written on a single line
//! - object keys, and values of fields that hold object references, followed
//!   by a `/* comment */` annotation

use std::collections::BTreeMap;
use std::fmt::Write as _;

use plist::{Dictionary, Value};

use super::annotate::Annotations;

const HEADER: &str = "// !$*UTF8*$!";

const SINGLE_LINE_ISAS: &[&str] = &["PBXBuildFile", "PBXFileReference"];

/// Fields whose values (or array items) Xcode annotates with the referenced
/// object's name. Other identifier-valued fields such as
/// `remoteGlobalIDString` or `TestTargetID` are written bare.
const REFERENCE_FIELDS: &[&str] = &[
    "buildConfigurationList",
    "buildConfigurations",
    "buildPhases",
    "buildRules",
    "children",
    "containerPortal",
    "dependencies",
    "exceptions",
    "fileRef",
    "fileSystemSynchronizedGroups",
    "files",
    "mainGroup",
    "package",
    "packageProductDependencies",
    "packageReferences",
    "ProductGroup",
    "productRef",
    "productRefGroup",
    "productReference",
    "ProjectRef",
    "remoteRef",
    "rootObject",
    "target",
    "targetProxy",
    "targets",
];

/// Serializer for ASCII project documents.
#[derive(Debug, Default)]
pub struct Writer<'a> {
    project_name: Option<&'a str>,
}

impl<'a> Writer<'a> {
    /// Create a new writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name used when annotating the project's own configuration list.
    pub fn with_project_name(mut self, name: Option<&'a str>) -> Self {
        self.project_name = name;
        self
    }

    /// Serialize a whole project document.
    pub fn write_document(&self, document: &Dictionary) -> String {
        let annotations = document
            .get("objects")
            .and_then(Value::as_dictionary)
            .map(|objects| Annotations::new(objects, self.project_name))
            .unwrap_or_default();

        let mut out = String::with_capacity(64 * 1024);
        out.push_str(HEADER);
        out.push('\n');

        let mut emitter = Emitter {
            out: &mut out,
            annotations: &annotations,
        };
        emitter.document(document);
        out.push('\n');
        out
    }
}

/// Serialize a project document with default settings.
pub fn to_string(document: &Dictionary) -> String {
    Writer::new().write_document(document)
}

/// Quote a string if it cannot be written bare.
pub fn quote(s: &str) -> String {
    if !needs_quotes(s) {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\U{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.contains("//")
        || s.contains("/*")
        || s.starts_with("___")
        || !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '/' | ':' | '.'))
}

/// Entries in canonical order: `isa` first, the rest sorted bytewise.
fn sorted_entries(dict: &Dictionary) -> Vec<(&String, &Value)> {
    let mut entries: Vec<(&String, &Value)> = dict.iter().collect();
    entries.sort_by(|(a, _), (b, _)| {
        (a.as_str() != "isa")
            .cmp(&(b.as_str() != "isa"))
            .then_with(|| a.cmp(b))
    });
    entries
}

struct Emitter<'w> {
    out: &'w mut String,
    annotations: &'w Annotations,
}

impl Emitter<'_> {
    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push('\t');
        }
    }

    fn document(&mut self, document: &Dictionary) {
        self.out.push_str("{\n");
        for (key, value) in sorted_entries(document) {
            self.indent(1);
            match (key.as_str(), value) {
                ("objects", Value::Dictionary(objects)) => self.objects(objects),
                _ => {
                    self.out.push_str(&quote(key));
                    self.out.push_str(" = ");
                    self.value(value, 1, key);
                }
            }
            self.out.push_str(";\n");
        }
        self.out.push('}');
    }

    fn objects(&mut self, objects: &Dictionary) {
        let mut sections: BTreeMap<&str, Vec<(&String, &Value)>> = BTreeMap::new();
        for (id, object) in objects.iter() {
            let isa = object
                .as_dictionary()
                .and_then(|o| o.get("isa"))
                .and_then(Value::as_string)
                .unwrap_or("PBXObject");
            sections.entry(isa).or_default().push((id, object));
        }

        self.out.push_str("objects = {\n");
        for (isa, mut entries) in sections {
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let single_line = SINGLE_LINE_ISAS.contains(&isa);

            let _ = writeln!(self.out, "\n/* Begin {} section */", isa);
            for (id, object) in entries {
                self.indent(2);
                self.reference(id);
                self.out.push_str(" = ");
                if single_line {
                    self.inline_value(object, "");
                } else {
                    self.value(object, 2, "");
                }
                self.out.push_str(";\n");
            }
            let _ = writeln!(self.out, "/* End {} section */", isa);
        }
        self.indent(1);
        self.out.push('}');
    }

    /// An object identifier with its annotation, if it has one.
    fn reference(&mut self, s: &str) {
        self.out.push_str(&quote(s));
        if let Some(comment) = self.annotations.get(s) {
            let _ = write!(self.out, " /* {} */", comment);
        }
    }

    /// Write `value`, the value of the field `field`.
    fn value(&mut self, value: &Value, depth: usize, field: &str) {
        match value {
            Value::Dictionary(dict) => {
                self.out.push_str("{\n");
                for (key, item) in sorted_entries(dict) {
                    self.indent(depth + 1);
                    self.out.push_str(&quote(key));
                    self.out.push_str(" = ");
                    self.value(item, depth + 1, key);
                    self.out.push_str(";\n");
                }
                self.indent(depth);
                self.out.push('}');
            }
            Value::Array(items) => {
                self.out.push_str("(\n");
                for item in items {
                    self.indent(depth + 1);
                    self.value(item, depth + 1, field);
                    self.out.push_str(",\n");
                }
                self.indent(depth);
                self.out.push(')');
            }
            other => self.scalar(other, field),
        }
    }

    fn inline_value(&mut self, value: &Value, field: &str) {
        match value {
            Value::Dictionary(dict) => {
                self.out.push('{');
                for (key, item) in sorted_entries(dict) {
                    self.out.push_str(&quote(key));
                    self.out.push_str(" = ");
                    self.inline_value(item, key);
                    self.out.push_str("; ");
                }
                self.out.push('}');
            }
            Value::Array(items) => {
                self.out.push('(');
                for item in items {
                    self.inline_value(item, field);
                    self.out.push_str(", ");
                }
                self.out.push(')');
            }
            other => self.scalar(other, field),
        }
    }

    fn scalar(&mut self, value: &Value, field: &str) {
        match value {
            Value::String(s) if REFERENCE_FIELDS.contains(&field) => self.reference(s),
            Value::String(s) => self.out.push_str(&quote(s)),
            Value::Boolean(b) => self.out.push_str(if *b { "YES" } else { "NO" }),
            Value::Integer(i) => {
                let text = i
                    .as_signed()
                    .map(|v| v.to_string())
                    .or_else(|| i.as_unsigned().map(|v| v.to_string()))
                    .unwrap_or_default();
                self.out.push_str(&text);
            }
            Value::Real(r) => self.out.push_str(&quote(&r.to_string())),
            Value::Date(d) => self.out.push_str(&quote(&d.to_xml_format())),
            Value::Uid(uid) => self.out.push_str(&uid.get().to_string()),
            Value::Data(bytes) => {
                self.out.push('<');
                for byte in bytes {
                    let _ = write!(self.out, "{:02x}", byte);
                }
                self.out.push('>');
            }
            _ => self.out.push_str("\"\""),
        }
    }
}
