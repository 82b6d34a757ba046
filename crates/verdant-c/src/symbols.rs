//! Symbol and field tables of the C subset.

use std::sync::LazyLock;

use verdant_syntax::{FieldId, Grammar, SymbolInfo};

use crate::GRAMMAR_VERSION;

/// Symbol ids, by grammar name.
pub mod kinds {
    use verdant_syntax::Symbol;

    pub const IDENTIFIER: Symbol = Symbol::from_raw(1);
    pub const SEMICOLON: Symbol = Symbol::from_raw(2);
    pub const EQ: Symbol = Symbol::from_raw(3);
    pub const COMMA: Symbol = Symbol::from_raw(4);
    pub const L_PAREN: Symbol = Symbol::from_raw(5);
    pub const R_PAREN: Symbol = Symbol::from_raw(6);
    pub const L_BRACE: Symbol = Symbol::from_raw(7);
    pub const R_BRACE: Symbol = Symbol::from_raw(8);
    pub const PLUS: Symbol = Symbol::from_raw(9);
    pub const MINUS: Symbol = Symbol::from_raw(10);
    pub const STAR: Symbol = Symbol::from_raw(11);
    pub const SLASH: Symbol = Symbol::from_raw(12);
    pub const QUOTE: Symbol = Symbol::from_raw(13);
    pub const RETURN_KW: Symbol = Symbol::from_raw(14);
    pub const PRIMITIVE_TYPE: Symbol = Symbol::from_raw(15);
    pub const NUMBER_LITERAL: Symbol = Symbol::from_raw(16);
    pub const STRING_CONTENT: Symbol = Symbol::from_raw(17);
    pub const COMMENT: Symbol = Symbol::from_raw(18);
    pub const TRANSLATION_UNIT: Symbol = Symbol::from_raw(19);
    pub const DECLARATION: Symbol = Symbol::from_raw(20);
    pub const INIT_DECLARATOR: Symbol = Symbol::from_raw(21);
    pub const FUNCTION_DEFINITION: Symbol = Symbol::from_raw(22);
    pub const FUNCTION_DECLARATOR: Symbol = Symbol::from_raw(23);
    pub const PARAMETER_LIST: Symbol = Symbol::from_raw(24);
    pub const PARAMETER_DECLARATION: Symbol = Symbol::from_raw(25);
    pub const COMPOUND_STATEMENT: Symbol = Symbol::from_raw(26);
    pub const RETURN_STATEMENT: Symbol = Symbol::from_raw(27);
    pub const EXPRESSION_STATEMENT: Symbol = Symbol::from_raw(28);
    pub const ASSIGNMENT_EXPRESSION: Symbol = Symbol::from_raw(29);
    pub const BINARY_EXPRESSION: Symbol = Symbol::from_raw(30);
    pub const CALL_EXPRESSION: Symbol = Symbol::from_raw(31);
    pub const ARGUMENT_LIST: Symbol = Symbol::from_raw(32);
    pub const PARENTHESIZED_EXPRESSION: Symbol = Symbol::from_raw(33);
    pub const STRING_LITERAL: Symbol = Symbol::from_raw(34);
    /// Lexer-only: end of input.
    pub const EOF: Symbol = Symbol::from_raw(35);
    /// Lexer-only: a character no token starts with.
    pub const UNKNOWN: Symbol = Symbol::from_raw(36);
}

/// Field ids, by grammar name.
pub mod fields {
    use verdant_syntax::FieldId;

    pub const ARGUMENTS: FieldId = FieldId::from_raw(1);
    pub const BODY: FieldId = FieldId::from_raw(2);
    pub const DECLARATOR: FieldId = FieldId::from_raw(3);
    pub const FUNCTION: FieldId = FieldId::from_raw(4);
    pub const LEFT: FieldId = FieldId::from_raw(5);
    pub const OPERATOR: FieldId = FieldId::from_raw(6);
    pub const PARAMETERS: FieldId = FieldId::from_raw(7);
    pub const RIGHT: FieldId = FieldId::from_raw(8);
    pub const TYPE: FieldId = FieldId::from_raw(9);
    pub const VALUE: FieldId = FieldId::from_raw(10);
}

static SYMBOLS: [SymbolInfo; 37] = [
    SymbolInfo::auxiliary("end"),
    SymbolInfo::named("identifier"),
    SymbolInfo::anonymous(";"),
    SymbolInfo::anonymous("="),
    SymbolInfo::anonymous(","),
    SymbolInfo::anonymous("("),
    SymbolInfo::anonymous(")"),
    SymbolInfo::anonymous("{"),
    SymbolInfo::anonymous("}"),
    SymbolInfo::anonymous("+"),
    SymbolInfo::anonymous("-"),
    SymbolInfo::anonymous("*"),
    SymbolInfo::anonymous("/"),
    SymbolInfo::anonymous("\""),
    SymbolInfo::anonymous("return"),
    SymbolInfo::named("primitive_type"),
    SymbolInfo::named("number_literal"),
    SymbolInfo::named("string_content"),
    SymbolInfo::named("comment"),
    SymbolInfo::named("translation_unit"),
    SymbolInfo::named("declaration"),
    SymbolInfo::named("init_declarator"),
    SymbolInfo::named("function_definition"),
    SymbolInfo::named("function_declarator"),
    SymbolInfo::named("parameter_list"),
    SymbolInfo::named("parameter_declaration"),
    SymbolInfo::named("compound_statement"),
    SymbolInfo::named("return_statement"),
    SymbolInfo::named("expression_statement"),
    SymbolInfo::named("assignment_expression"),
    SymbolInfo::named("binary_expression"),
    SymbolInfo::named("call_expression"),
    SymbolInfo::named("argument_list"),
    SymbolInfo::named("parenthesized_expression"),
    SymbolInfo::named("string_literal"),
    SymbolInfo::auxiliary("_eof"),
    SymbolInfo::auxiliary("_unknown"),
];

static FIELDS: [&str; 11] = [
    "",
    "arguments",
    "body",
    "declarator",
    "function",
    "left",
    "operator",
    "parameters",
    "right",
    "type",
    "value",
];

pub(crate) static GRAMMAR: LazyLock<Grammar> =
    LazyLock::new(|| Grammar::new("c", GRAMMAR_VERSION, &SYMBOLS, &FIELDS));

/// Looks a field up by name, for callers that only know the grammar at runtime.
pub fn field(name: &str) -> Option<FieldId> {
    GRAMMAR.field_id_for_name(name)
}
