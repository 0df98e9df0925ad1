//! Per-language node kinds used by the outline builder.

use tree_sitter::Node;

use crate::scanner::FileType;

/// Operators that add a branch to cyclomatic complexity.
pub(crate) const SHORT_CIRCUIT_OPERATORS: &[&str] = &["&&", "||", "??"];

pub(crate) struct LanguageSpec {
    pub functions: &'static [&'static str],
    pub classes: &'static [&'static str],
    /// Blocks that attach methods to a type declared elsewhere (Rust `impl`).
    pub impls: &'static [&'static str],
    pub decisions: &'static [&'static str],
    /// Binary expression kinds that count when their operator short-circuits.
    pub binary: &'static [&'static str],
    pub parameters: fn(Node<'_>, &[u8]) -> usize,
    /// Extra check on class-kind nodes (Go `type_spec` is only a class for structs and interfaces).
    pub class_check: Option<fn(Node<'_>) -> bool>,
    /// Receiver type for functions declared outside their type (Go methods).
    pub receiver: Option<fn(Node<'_>, &[u8]) -> Option<String>>,
}

impl LanguageSpec {
    pub fn is_function(&self, node: Node<'_>) -> bool {
        node.is_named() && self.functions.contains(&node.kind())
    }

    pub fn is_class(&self, node: Node<'_>) -> bool {
        node.is_named()
            && self.classes.contains(&node.kind())
            && self.class_check.map_or(true, |check| check(node))
    }

    pub fn is_impl(&self, node: Node<'_>) -> bool {
        node.is_named() && self.impls.contains(&node.kind())
    }
}

static PYTHON: LanguageSpec = LanguageSpec {
    functions: &["function_definition"],
    classes: &["class_definition"],
    impls: &[],
    decisions: &[
        "if_statement",
        "elif_clause",
        "for_statement",
        "while_statement",
        "except_clause",
        "conditional_expression",
        "boolean_operator",
        "case_clause",
        "for_in_clause",
        "if_clause",
    ],
    binary: &[],
    parameters: python_parameters,
    class_check: None,
    receiver: None,
};

static JAVASCRIPT: LanguageSpec = LanguageSpec {
    functions: &[
        "function_declaration",
        "function_expression",
        "function",
        "generator_function_declaration",
        "generator_function",
        "arrow_function",
        "method_definition",
    ],
    classes: &["class_declaration", "class"],
    impls: &[],
    decisions: &[
        "if_statement",
        "for_statement",
        "for_in_statement",
        "while_statement",
        "do_statement",
        "catch_clause",
        "ternary_expression",
        "switch_case",
    ],
    binary: &["binary_expression"],
    parameters: js_parameters,
    class_check: None,
    receiver: None,
};

static TYPESCRIPT: LanguageSpec = LanguageSpec {
    functions: &[
        "function_declaration",
        "function_expression",
        "function",
        "generator_function_declaration",
        "generator_function",
        "arrow_function",
        "method_definition",
    ],
    classes: &["class_declaration", "abstract_class_declaration", "class"],
    impls: &[],
    decisions: &[
        "if_statement",
        "for_statement",
        "for_in_statement",
        "while_statement",
        "do_statement",
        "catch_clause",
        "ternary_expression",
        "switch_case",
    ],
    binary: &["binary_expression"],
    parameters: js_parameters,
    class_check: None,
    receiver: None,
};

static RUST: LanguageSpec = LanguageSpec {
    functions: &["function_item"],
    classes: &["struct_item", "enum_item", "union_item", "trait_item"],
    impls: &["impl_item"],
    decisions: &[
        "if_expression",
        "for_expression",
        "while_expression",
        "match_arm",
    ],
    binary: &["binary_expression"],
    parameters: rust_parameters,
    class_check: None,
    receiver: None,
};

static GO: LanguageSpec = LanguageSpec {
    functions: &["function_declaration", "method_declaration"],
    classes: &["type_spec"],
    impls: &[],
    decisions: &[
        "if_statement",
        "for_statement",
        "expression_case",
        "type_case",
        "communication_case",
    ],
    binary: &["binary_expression"],
    parameters: go_parameters,
    class_check: Some(go_is_type_class),
    receiver: Some(go_receiver_type),
};

static JAVA: LanguageSpec = LanguageSpec {
    functions: &["method_declaration", "constructor_declaration"],
    classes: &[
        "class_declaration",
        "interface_declaration",
        "enum_declaration",
        "record_declaration",
    ],
    impls: &[],
    decisions: &[
        "if_statement",
        "for_statement",
        "enhanced_for_statement",
        "while_statement",
        "do_statement",
        "catch_clause",
        "ternary_expression",
        "switch_label",
    ],
    binary: &["binary_expression"],
    parameters: java_parameters,
    class_check: None,
    receiver: None,
};

pub(crate) fn spec_for(file_type: FileType) -> Option<&'static LanguageSpec> {
    match file_type {
        FileType::Python => Some(&PYTHON),
        FileType::JavaScript => Some(&JAVASCRIPT),
        FileType::TypeScript => Some(&TYPESCRIPT),
        FileType::Rust => Some(&RUST),
        FileType::Go => Some(&GO),
        FileType::Java => Some(&JAVA),
        FileType::Yaml
        | FileType::Json
        | FileType::Toml
        | FileType::Markdown
        | FileType::Shell => None,
    }
}

pub(crate) fn text<'a>(node: Node<'_>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// First descendant (including `node`) of the given kind, depth-first.
pub(crate) fn find_descendant<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if current.kind() == kind {
            return Some(current);
        }
        let mut children = named_children(current);
        children.reverse();
        stack.extend(children);
    }
    None
}

fn python_parameters(node: Node<'_>, source: &[u8]) -> usize {
    let Some(params) = node.child_by_field_name("parameters") else {
        return 0;
    };
    named_children(params)
        .into_iter()
        .filter(|p| {
            matches!(
                p.kind(),
                "identifier"
                    | "typed_parameter"
                    | "default_parameter"
                    | "typed_default_parameter"
                    | "list_splat_pattern"
                    | "dictionary_splat_pattern"
            )
        })
        .filter(|p| {
            let name = if p.kind() == "identifier" {
                text(*p, source)
            } else {
                p.child_by_field_name("name")
                    .or_else(|| p.named_child(0))
                    .map(|n| text(n, source))
                    .unwrap_or("")
            };
            name != "self" && name != "cls"
        })
        .count()
}

fn js_parameters(node: Node<'_>, _source: &[u8]) -> usize {
    if node.child_by_field_name("parameter").is_some() {
        return 1;
    }
    node.child_by_field_name("parameters")
        .map(|params| {
            named_children(params)
                .into_iter()
                .filter(|p| p.kind() != "comment")
                .count()
        })
        .unwrap_or(0)
}

fn rust_parameters(node: Node<'_>, _source: &[u8]) -> usize {
    node.child_by_field_name("parameters")
        .map(|params| {
            named_children(params)
                .into_iter()
                .filter(|p| matches!(p.kind(), "parameter" | "variadic_parameter"))
                .count()
        })
        .unwrap_or(0)
}

fn go_parameters(node: Node<'_>, _source: &[u8]) -> usize {
    let Some(params) = node.child_by_field_name("parameters") else {
        return 0;
    };
    named_children(params)
        .into_iter()
        .map(|p| match p.kind() {
            "parameter_declaration" => {
                let mut cursor = p.walk();
                p.children_by_field_name("name", &mut cursor).count().max(1)
            }
            "variadic_parameter_declaration" => 1,
            _ => 0,
        })
        .sum()
}

fn java_parameters(node: Node<'_>, _source: &[u8]) -> usize {
    node.child_by_field_name("parameters")
        .map(|params| {
            named_children(params)
                .into_iter()
                .filter(|p| matches!(p.kind(), "formal_parameter" | "spread_parameter"))
                .count()
        })
        .unwrap_or(0)
}

fn go_is_type_class(node: Node<'_>) -> bool {
    node.child_by_field_name("type")
        .is_some_and(|t| matches!(t.kind(), "struct_type" | "interface_type"))
}

fn go_receiver_type(node: Node<'_>, source: &[u8]) -> Option<String> {
    let receiver = node.child_by_field_name("receiver")?;
    find_descendant(receiver, "type_identifier").map(|t| text(t, source).to_string())
}
