//! In-memory model of the C program under assembly.
//!
//! Three ordered, duplicate-free fragment lists (headers, macros, globals)
//! share one implementation; functions get their own table because entries
//! carry a body and the program entry point needs a stable identity.

use thiserror::Error;

/// Prototype seeded into every fresh function table.
pub const MAIN_PROTOTYPE: &str = "int main(int argc, char **argv)";

/// Include specs seeded into every fresh header list.
pub const DEFAULT_HEADERS: &[&str] = &["<stdio.h>", "<stdlib.h>"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("index {index} is out of range (0..{len})")]
    BadIndex { index: usize, len: usize },
    #[error("item already present")]
    Duplicate,
}

/// One entry of a fragment list. `builtin` marks entries that came from the
/// seed rather than from the user; listings render them distinctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub builtin: bool,
}

/// Ordered collection of raw text fragments with uniqueness enforced on
/// insert and an optional built-in seed restored by [`Fragments::clear`].
#[derive(Debug, Clone)]
pub struct Fragments {
    entries: Vec<Fragment>,
    seed: &'static [&'static str],
}

impl Fragments {
    pub fn new(seed: &'static [&'static str]) -> Self {
        let mut list = Self {
            entries: Vec::new(),
            seed,
        };
        list.clear();
        list
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Fragment> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.entries.iter()
    }

    /// Append `text`, preserving insertion order. Duplicates are rejected.
    pub fn add(&mut self, text: &str) -> Result<(), DocumentError> {
        if self.entries.iter().any(|e| e.text == text) {
            return Err(DocumentError::Duplicate);
        }
        self.entries.push(Fragment {
            text: text.to_string(),
            builtin: false,
        });
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Fragment, DocumentError> {
        if index >= self.entries.len() {
            return Err(DocumentError::BadIndex {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    /// Replace the entry at `index` with `text`. The entry loses any built-in
    /// marking; replacing an entry with its own text is a no-op.
    pub fn replace(&mut self, index: usize, text: &str) -> Result<(), DocumentError> {
        if index >= self.entries.len() {
            return Err(DocumentError::BadIndex {
                index,
                len: self.entries.len(),
            });
        }
        if self
            .entries
            .iter()
            .enumerate()
            .any(|(i, e)| i != index && e.text == text)
        {
            return Err(DocumentError::Duplicate);
        }
        let entry = &mut self.entries[index];
        if entry.text != text {
            entry.text = text.to_string();
            entry.builtin = false;
        }
        Ok(())
    }

    /// Discard all entries and restore the seed, if any.
    pub fn clear(&mut self) {
        self.entries.clear();
        for text in self.seed {
            self.entries.push(Fragment {
                text: text.to_string(),
                builtin: true,
            });
        }
    }
}

/// One function under construction: opaque prototype text plus an opaque
/// body. The `entry_point` flag is set only when the table seeds the
/// canonical `main` entry and is never altered by edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub prototype: String,
    pub body: String,
    entry_point: bool,
}

impl Function {
    fn seed_main() -> Self {
        Self {
            prototype: MAIN_PROTOTYPE.to_string(),
            body: String::new(),
            entry_point: true,
        }
    }

    fn user(prototype: &str) -> Self {
        Self {
            prototype: prototype.to_string(),
            body: String::new(),
            entry_point: false,
        }
    }

    pub fn is_entry_point(&self) -> bool {
        self.entry_point
    }
}

/// Ordered table of functions, seeded with the canonical `main` entry at
/// position 0.
#[derive(Debug, Clone)]
pub struct FunctionTable {
    entries: Vec<Function>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self {
            entries: vec![Function::seed_main()],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Function> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Function> {
        self.entries.iter()
    }

    /// Resolve the target of a `def` command.
    ///
    /// The literal token `main` resolves to the entry-point row wherever it
    /// sits; if the user removed it, a fresh canonical entry is re-inserted at
    /// position 0. Any other text resolves by exact prototype match, or
    /// appends a new entry with an empty body.
    pub fn resolve_mut(&mut self, prototype: &str) -> &mut Function {
        let index = if prototype == "main" {
            match self.entries.iter().position(Function::is_entry_point) {
                Some(i) => i,
                None => {
                    self.entries.insert(0, Function::seed_main());
                    0
                }
            }
        } else if let Some(i) = self
            .entries
            .iter()
            .position(|f| f.prototype == prototype)
        {
            i
        } else {
            self.entries.push(Function::user(prototype));
            self.entries.len() - 1
        };
        &mut self.entries[index]
    }

    /// Remove the entry at `index`. Position 0 is not protected; only the
    /// `def main` resolution is special.
    pub fn remove(&mut self, index: usize) -> Result<Function, DocumentError> {
        if index >= self.entries.len() {
            return Err(DocumentError::BadIndex {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    /// Reset to exactly the canonical `main` entry with an empty body.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.entries.push(Function::seed_main());
    }
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The whole program under assembly. Owned by the session driver; command
/// handlers borrow it for the duration of one command.
#[derive(Debug, Clone)]
pub struct Document {
    pub headers: Fragments,
    pub macros: Fragments,
    pub globals: Fragments,
    pub functions: FunctionTable,
}

impl Document {
    pub fn new() -> Self {
        Self {
            headers: Fragments::new(DEFAULT_HEADERS),
            macros: Fragments::new(&[]),
            globals: Fragments::new(&[]),
            functions: FunctionTable::new(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_seeded() {
        let doc = Document::new();
        assert_eq!(doc.headers.len(), 2);
        assert_eq!(doc.headers.get(0).unwrap().text, "<stdio.h>");
        assert_eq!(doc.headers.get(1).unwrap().text, "<stdlib.h>");
        assert!(doc.headers.iter().all(|e| e.builtin));
    }

    #[test]
    fn test_add_preserves_order_and_marks_user_entries() {
        let mut doc = Document::new();
        doc.headers.add("\"myheader.h\"").unwrap();
        assert_eq!(doc.headers.len(), 3);
        let added = doc.headers.get(2).unwrap();
        assert_eq!(added.text, "\"myheader.h\"");
        assert!(!added.builtin);
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut list = Fragments::new(&[]);
        list.add("MAX 10").unwrap();
        assert_eq!(list.add("MAX 10"), Err(DocumentError::Duplicate));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut doc = Document::new();
        assert_eq!(
            doc.headers.remove(5),
            Err(DocumentError::BadIndex { index: 5, len: 2 })
        );
        assert_eq!(doc.headers.len(), 2);
    }

    #[test]
    fn test_replace_rejects_duplicate_of_other_entry() {
        let mut list = Fragments::new(&[]);
        list.add("int a").unwrap();
        list.add("int b").unwrap();
        assert_eq!(list.replace(1, "int a"), Err(DocumentError::Duplicate));
        assert_eq!(list.get(1).unwrap().text, "int b");
    }

    #[test]
    fn test_replace_with_own_text_is_noop() {
        let mut doc = Document::new();
        doc.headers.replace(0, "<stdio.h>").unwrap();
        assert!(doc.headers.get(0).unwrap().builtin);
    }

    #[test]
    fn test_replace_clears_builtin_marking() {
        let mut doc = Document::new();
        doc.headers.replace(0, "<string.h>").unwrap();
        let entry = doc.headers.get(0).unwrap();
        assert_eq!(entry.text, "<string.h>");
        assert!(!entry.builtin);
    }

    #[test]
    fn test_clear_restores_seed_in_order() {
        let mut doc = Document::new();
        doc.headers.add("\"extra.h\"").unwrap();
        doc.headers.remove(0).unwrap();
        doc.headers.clear();
        let texts: Vec<&str> = doc.headers.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["<stdio.h>", "<stdlib.h>"]);
    }

    #[test]
    fn test_clear_empties_unseeded_lists() {
        let mut doc = Document::new();
        doc.macros.add("MAX 10").unwrap();
        doc.globals.add("int counter").unwrap();
        doc.macros.clear();
        doc.globals.clear();
        assert!(doc.macros.is_empty());
        assert!(doc.globals.is_empty());
    }

    #[test]
    fn test_function_table_seeded_with_main() {
        let table = FunctionTable::new();
        assert_eq!(table.len(), 1);
        let main = table.get(0).unwrap();
        assert_eq!(main.prototype, MAIN_PROTOTYPE);
        assert_eq!(main.body, "");
        assert!(main.is_entry_point());
    }

    #[test]
    fn test_resolve_main_ignores_prototype_text() {
        let mut table = FunctionTable::new();
        table.resolve_mut("void helper(void)");
        assert_eq!(table.len(), 2);
        // Even with other entries present, `main` targets the seeded row.
        let main = table.resolve_mut("main");
        assert!(main.is_entry_point());
        main.body = "return 0;".to_string();
        assert_eq!(table.get(0).unwrap().body, "return 0;");
    }

    #[test]
    fn test_resolve_by_exact_prototype_updates_in_place() {
        let mut table = FunctionTable::new();
        table.resolve_mut("void helper(void)").body = "puts(\"hi\");".to_string();
        table.resolve_mut("void helper(void)").body = "puts(\"bye\");".to_string();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1).unwrap().body, "puts(\"bye\");");
    }

    #[test]
    fn test_resolve_unseen_prototype_appends_with_empty_body() {
        let mut table = FunctionTable::new();
        let func = table.resolve_mut("int add(int a, int b)");
        assert_eq!(func.body, "");
        assert!(!func.is_entry_point());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_remove_can_target_position_zero() {
        let mut table = FunctionTable::new();
        let removed = table.remove(0).unwrap();
        assert!(removed.is_entry_point());
        assert!(table.is_empty());
    }

    #[test]
    fn test_resolve_main_reseeds_after_removal() {
        let mut table = FunctionTable::new();
        table.resolve_mut("void helper(void)");
        table.remove(0).unwrap();
        let main = table.resolve_mut("main");
        assert!(main.is_entry_point());
        assert_eq!(main.prototype, MAIN_PROTOTYPE);
        assert!(table.get(0).unwrap().is_entry_point());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_function_clear_resets_to_canonical_main() {
        let mut table = FunctionTable::new();
        table.resolve_mut("main").body = "return 1;".to_string();
        table.resolve_mut("void helper(void)");
        table.clear();
        assert_eq!(table.len(), 1);
        let main = table.get(0).unwrap();
        assert_eq!(main.prototype, MAIN_PROTOTYPE);
        assert_eq!(main.body, "");
        assert!(main.is_entry_point());
    }
}
