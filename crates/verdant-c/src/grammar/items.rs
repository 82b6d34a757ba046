use crate::fields::*;
use crate::grammar::{delimited, exprs, stmts};
use crate::kinds::*;
use crate::parser::Parser;
use crate::symbol_set::SymbolSet;

const PARAMETER_FIRST: SymbolSet = SymbolSet::new([PRIMITIVE_TYPE, IDENTIFIER]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Declarator {
    Plain,
    Init,
    Function,
}

/// `type declarator (, declarator)* ;`, or a function definition when
/// `allow_function` is set and a body follows a function declarator.
pub(super) fn declaration(p: &mut Parser<'_>, allow_function: bool) {
    let m = p.start();
    p.bump_field(TYPE);

    let first = declarator(p);
    if allow_function && first == Some(Declarator::Function) && p.at(L_BRACE) {
        stmts::compound_statement(p, Some(BODY), Some(m));
        return;
    }

    while p.eat(COMMA) {
        declarator(p);
    }
    p.expect(SEMICOLON);
    m.complete(p, DECLARATION);
}

fn declarator(p: &mut Parser<'_>) -> Option<Declarator> {
    if !p.at(IDENTIFIER) {
        p.missing(IDENTIFIER, Some(DECLARATOR));
        return None;
    }

    let m = p.start();
    p.bump_field(DECLARATOR);
    match p.current() {
        L_PAREN => {
            let parameters = p.start();
            delimited(p, R_PAREN, COMMA, PARAMETER_FIRST, parameter_declaration);
            parameters.complete_field(p, PARAMETER_LIST, Some(PARAMETERS));
            m.complete_field(p, FUNCTION_DECLARATOR, Some(DECLARATOR));
            Some(Declarator::Function)
        }
        EQ => {
            p.bump();
            exprs::expression_or_missing(p, VALUE);
            m.complete_field(p, INIT_DECLARATOR, Some(DECLARATOR));
            Some(Declarator::Init)
        }
        _ => {
            m.abandon(p);
            Some(Declarator::Plain)
        }
    }
}

fn parameter_declaration(p: &mut Parser<'_>) -> bool {
    if !p.at_set(PARAMETER_FIRST) {
        return false;
    }

    let m = p.start();
    p.expect_field(PRIMITIVE_TYPE, Some(TYPE));
    if p.at(IDENTIFIER) {
        p.bump_field(DECLARATOR);
    }
    m.complete(p, PARAMETER_DECLARATION);
    true
}
