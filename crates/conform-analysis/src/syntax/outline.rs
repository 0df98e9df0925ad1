//! Outline builder.

use conform_core::errors::DetectionError;
use tree_sitter::{Node, Parser};

use super::languages::{self, text, LanguageSpec, SHORT_CIRCUIT_OPERATORS};
use super::ANONYMOUS;
use crate::scanner::FileType;

/// A function or method found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: String,
    /// 1-based line of the declaration.
    pub line: u32,
    pub end_line: u32,
    pub parameter_count: usize,
    /// McCabe complexity: 1 + decision points, nested functions excluded.
    pub complexity: u32,
    /// Index into [`Outline::classes`] for methods.
    pub class_index: Option<usize>,
}

impl FunctionInfo {
    pub fn length(&self) -> u32 {
        self.end_line - self.line + 1
    }

    pub fn is_anonymous(&self) -> bool {
        self.name == ANONYMOUS
    }
}

/// A class-like declaration: class, struct, enum, trait or interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub name: String,
    pub line: u32,
    pub end_line: u32,
    pub method_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
}

/// Parse `source` and extract its outline. Returns `Ok(None)` for file
/// types without a grammar.
pub fn build_outline(
    path: &str,
    file_type: FileType,
    ext: Option<&str>,
    source: &str,
) -> Result<Option<Outline>, DetectionError> {
    let (Some(language), Some(spec)) = (file_type.ts_language(ext), languages::spec_for(file_type))
    else {
        return Ok(None);
    };

    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| DetectionError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| DetectionError::Parse {
            path: path.to_string(),
            message: "parser produced no tree".to_string(),
        })?;

    let mut builder = OutlineBuilder {
        spec,
        source: source.as_bytes(),
        outline: Outline::default(),
        owners: Vec::new(),
    };
    builder.visit(tree.root_node());
    Ok(Some(builder.finish()))
}

#[derive(Debug, Clone)]
enum Owner {
    Class(usize),
    /// Type declared elsewhere in the file, resolved by name at the end.
    Named(String),
}

struct OutlineBuilder<'s> {
    spec: &'static LanguageSpec,
    source: &'s [u8],
    outline: Outline,
    owners: Vec<(usize, Owner)>,
}

impl OutlineBuilder<'_> {
    /// Pre-order walk over named nodes with an explicit stack; nesting
    /// depth is bounded by the file, not by the worker's call stack.
    fn visit(&mut self, root: Node<'_>) {
        let mut stack: Vec<(Node<'_>, Option<Owner>)> = vec![(root, None)];

        while let Some((node, owner)) = stack.pop() {
            let child_owner = if self.spec.is_class(node) {
                let index = self.outline.classes.len();
                self.outline.classes.push(ClassInfo {
                    name: self.name_of(node),
                    line: start_line(node),
                    end_line: end_line(node),
                    method_count: 0,
                });
                Some(Owner::Class(index))
            } else if self.spec.is_impl(node) {
                let type_name = node
                    .child_by_field_name("type")
                    .map(|t| {
                        languages::find_descendant(t, "type_identifier")
                            .map(|id| text(id, self.source))
                            .unwrap_or_else(|| text(t, self.source))
                            .to_string()
                    })
                    .unwrap_or_default();
                Some(Owner::Named(type_name))
            } else if self.spec.is_function(node) {
                let owner = self
                    .spec
                    .receiver
                    .and_then(|receiver| receiver(node, self.source))
                    .map(Owner::Named)
                    .or(owner);
                let index = self.outline.functions.len();
                self.outline.functions.push(FunctionInfo {
                    name: self.name_of(node),
                    line: start_line(node),
                    end_line: end_line(node),
                    parameter_count: (self.spec.parameters)(node, self.source),
                    complexity: 1 + self.count_decisions(node),
                    class_index: None,
                });
                if let Some(owner) = owner {
                    self.owners.push((index, owner));
                }
                // Functions nested in a method are not methods.
                None
            } else {
                owner
            };

            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev().map(|child| (child, child_owner.clone())));
        }
    }

    fn count_decisions(&self, root: Node<'_>) -> u32 {
        let mut count = 0;
        let mut stack = Vec::new();
        let mut cursor = root.walk();
        stack.extend(root.named_children(&mut cursor));

        while let Some(node) = stack.pop() {
            if self.spec.is_function(node) || self.spec.is_class(node) {
                continue;
            }
            let kind = node.kind();
            if self.spec.decisions.contains(&kind) {
                count += 1;
            } else if self.spec.binary.contains(&kind) {
                let short_circuit = node
                    .child_by_field_name("operator")
                    .is_some_and(|op| SHORT_CIRCUIT_OPERATORS.contains(&op.kind()));
                if short_circuit {
                    count += 1;
                }
            }
            let mut child_cursor = node.walk();
            stack.extend(node.named_children(&mut child_cursor));
        }
        count
    }

    fn name_of(&self, node: Node<'_>) -> String {
        if let Some(name) = node.child_by_field_name("name") {
            return text(name, self.source).to_string();
        }
        // Anonymous functions and class expressions take the name they are bound to.
        let bound = node.parent().and_then(|parent| match parent.kind() {
            "variable_declarator" => parent.child_by_field_name("name"),
            "pair" => parent.child_by_field_name("key"),
            "assignment_expression" => parent.child_by_field_name("left"),
            "field_definition" | "public_field_definition" => parent
                .child_by_field_name("property")
                .or_else(|| parent.child_by_field_name("name")),
            _ => None,
        });
        match bound {
            Some(name) => text(name, self.source).to_string(),
            None => ANONYMOUS.to_string(),
        }
    }

    fn finish(mut self) -> Outline {
        for (function_index, owner) in self.owners {
            let class_index = match owner {
                Owner::Class(index) => Some(index),
                Owner::Named(name) => self.outline.classes.iter().position(|c| c.name == name),
            };
            if let (Some(class_index), Some(function)) =
                (class_index, self.outline.functions.get_mut(function_index))
            {
                function.class_index = Some(class_index);
            }
        }
        for function in &self.outline.functions {
            if let Some(class) = function
                .class_index
                .and_then(|i| self.outline.classes.get_mut(i))
            {
                class.method_count += 1;
            }
        }
        self.outline
    }
}

fn start_line(node: Node<'_>) -> u32 {
    node.start_position().row as u32 + 1
}

fn end_line(node: Node<'_>) -> u32 {
    node.end_position().row as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(file_type: FileType, source: &str) -> Outline {
        build_outline("test", file_type, None, source)
            .unwrap()
            .expect("grammar available")
    }

    #[test]
    fn python_functions_and_methods() {
        let src = "\
class Greeter:
    def greet(self, name, greeting='hi'):
        if name:
            return greeting
        return None

def helper(a, *args, **kwargs):
    return [x for x in args if x]
";
        let o = outline(FileType::Python, src);
        assert_eq!(o.classes.len(), 1);
        assert_eq!(o.classes[0].name, "Greeter");
        assert_eq!(o.classes[0].method_count, 1);

        let greet = &o.functions[0];
        assert_eq!(greet.name, "greet");
        assert_eq!(greet.line, 2);
        assert_eq!(greet.parameter_count, 2);
        assert_eq!(greet.complexity, 2);
        assert_eq!(greet.class_index, Some(0));

        let helper = &o.functions[1];
        assert_eq!(helper.name, "helper");
        assert_eq!(helper.parameter_count, 3);
        // for-in clause + if clause
        assert_eq!(helper.complexity, 3);
        assert_eq!(helper.class_index, None);
    }

    #[test]
    fn python_boolean_operators_count_per_operator() {
        let src = "def f(a, b, c):\n    if a and b or c:\n        return 1\n";
        let o = outline(FileType::Python, src);
        assert_eq!(o.functions[0].complexity, 4);
    }

    #[test]
    fn nested_functions_do_not_inflate_outer_complexity() {
        let src = "\
def outer(x):
    def inner(y):
        if y:
            return 1
        return 0
    return inner(x)
";
        let o = outline(FileType::Python, src);
        let outer = o.functions.iter().find(|f| f.name == "outer").unwrap();
        let inner = o.functions.iter().find(|f| f.name == "inner").unwrap();
        assert_eq!(outer.complexity, 1);
        assert_eq!(inner.complexity, 2);
    }

    #[test]
    fn javascript_arrow_functions_take_binding_name() {
        let src = "const add = (a, b) => a && b;\nfunction main() { return add(1, 2) ? 1 : 0; }\n";
        let o = outline(FileType::JavaScript, src);
        let add = o.functions.iter().find(|f| f.name == "add").unwrap();
        assert_eq!(add.parameter_count, 2);
        assert_eq!(add.complexity, 2);
        let main = o.functions.iter().find(|f| f.name == "main").unwrap();
        assert_eq!(main.complexity, 2);
    }

    #[test]
    fn rust_impl_methods_attach_to_struct() {
        let src = "\
struct Counter { n: u32 }
impl Counter {
    fn new() -> Self { Counter { n: 0 } }
    fn bump(&mut self, by: u32) { if by > 0 { self.n += by; } }
}
";
        let o = outline(FileType::Rust, src);
        assert_eq!(o.classes.len(), 1);
        assert_eq!(o.classes[0].method_count, 2);
        let bump = o.functions.iter().find(|f| f.name == "bump").unwrap();
        assert_eq!(bump.parameter_count, 1);
        assert_eq!(bump.complexity, 2);
    }

    #[test]
    fn go_methods_attach_to_receiver_type() {
        let src = "\
package main

type Server struct{}

func (s *Server) Start(host, port string) error {
\tif host == \"\" || port == \"\" {
\t\treturn nil
\t}
\treturn nil
}
";
        let o = outline(FileType::Go, src);
        assert_eq!(o.classes.len(), 1);
        assert_eq!(o.classes[0].name, "Server");
        assert_eq!(o.classes[0].method_count, 1);
        let start = &o.functions[0];
        assert_eq!(start.parameter_count, 2);
        assert_eq!(start.complexity, 3);
    }

    #[test]
    fn java_methods_and_constructors() {
        let src = "\
class Account {
    Account(int id) {}
    void deposit(int amount, String memo) {
        for (int i = 0; i < amount; i++) {}
    }
}
";
        let o = outline(FileType::Java, src);
        assert_eq!(o.classes[0].name, "Account");
        assert_eq!(o.classes[0].method_count, 2);
        let deposit = o.functions.iter().find(|f| f.name == "deposit").unwrap();
        assert_eq!(deposit.parameter_count, 2);
        assert_eq!(deposit.complexity, 2);
    }

    #[test]
    fn deeply_nested_source_fits_a_worker_stack() {
        let depth = 5000;
        let src = format!(
            "function wrap(x) {{\n  return {}x{};\n}}\n",
            "[".repeat(depth),
            "]".repeat(depth)
        );
        // Same stack size rayon gives its workers.
        let handle = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || outline(FileType::JavaScript, &src))
            .unwrap();
        let o = handle.join().expect("outline walk overflowed the stack");
        assert_eq!(o.functions.len(), 1);
        assert_eq!(o.functions[0].name, "wrap");
        assert_eq!(o.functions[0].complexity, 1);
    }

    #[test]
    fn non_code_files_have_no_outline() {
        let result = build_outline("c.yaml", FileType::Yaml, None, "a: 1\n").unwrap();
        assert!(result.is_none());
    }
}
