//! Serializer from the document model to a single C translation unit.
//!
//! The output skeleton is fixed: includes, macros, global declarations,
//! forward declarations, then full definitions, with a blank line after each
//! section. Fragment text is passed through verbatim; the external compiler
//! is the sole validator.

use crate::document::Document;

/// Render `doc` as compilable source text. Pure: identical documents
/// (including entry order) produce byte-identical output.
pub fn merge(doc: &Document) -> String {
    let mut includes = String::new();
    for header in doc.headers.iter() {
        includes.push_str("#include ");
        includes.push_str(&header.text);
        includes.push('\n');
    }

    let mut defines = String::new();
    for mac in doc.macros.iter() {
        defines.push_str("#define ");
        defines.push_str(&mac.text);
        defines.push('\n');
    }

    let mut globals = String::new();
    for glob in doc.globals.iter() {
        globals.push_str(&glob.text);
        globals.push_str(";\n");
    }

    let mut prototypes = String::new();
    let mut definitions = String::new();
    for func in doc.functions.iter() {
        if !func.is_entry_point() {
            prototypes.push_str(&func.prototype);
            prototypes.push_str(";\n");
        }
        definitions.push_str(&func.prototype);
        definitions.push_str(" {\n");
        for line in func.body.lines() {
            definitions.push('\t');
            definitions.push_str(line);
            definitions.push('\n');
        }
        definitions.push_str("}\n");
    }

    format!("{includes}\n{defines}\n{globals}\n{prototypes}\n{definitions}\n")
}
