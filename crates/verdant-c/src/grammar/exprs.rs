use verdant_syntax::FieldId;

use crate::fields::*;
use crate::grammar::delimited;
use crate::kinds::*;
use crate::parser::{CompletedMarker, Marker, Parser};
use crate::symbol_set::SymbolSet;

pub(super) const EXPRESSION_FIRST: SymbolSet =
    SymbolSet::new([IDENTIFIER, NUMBER_LITERAL, QUOTE, L_PAREN]);

/// A parsed operand: either a node or a bare token, by event index.
#[derive(Clone, Copy)]
pub(super) enum Operand {
    Node(CompletedMarker),
    Token(u32),
}

impl Operand {
    fn set_field(self, p: &mut Parser<'_>, field: FieldId) {
        let event = match self {
            Self::Node(m) => m.event(),
            Self::Token(event) => event,
        };
        p.set_field(event, field);
    }

    fn precede(self, p: &mut Parser<'_>) -> Marker {
        match self {
            Self::Node(m) => m.precede(p),
            Self::Token(event) => p.precede_token(event),
        }
    }
}

fn binding_power(p: &Parser<'_>) -> Option<u8> {
    match p.peek() {
        PLUS | MINUS => Some(1),
        STAR | SLASH => Some(2),
        _ => None,
    }
}

/// Parses an expression and tags it with `field`. Returns `None` without
/// consuming anything when no expression starts here.
pub(super) fn expression(p: &mut Parser<'_>, field: Option<FieldId>) -> Option<Operand> {
    let lhs = binary(p, 0)?;

    let operand = if p.peek() == EQ {
        lhs.set_field(p, LEFT);
        let m = lhs.precede(p);
        p.bump_field(OPERATOR);
        expression_or_missing(p, RIGHT);
        Operand::Node(m.complete(p, ASSIGNMENT_EXPRESSION))
    } else {
        lhs
    };

    if let Some(field) = field {
        operand.set_field(p, field);
    }
    Some(operand)
}

pub(super) fn expression_or_missing(p: &mut Parser<'_>, field: FieldId) {
    if expression(p, Some(field)).is_none() {
        p.missing(IDENTIFIER, Some(field));
    }
}

fn binary(p: &mut Parser<'_>, min_bp: u8) -> Option<Operand> {
    let mut lhs = primary(p)?;

    while let Some(bp) = binding_power(p)
        && bp >= min_bp
    {
        lhs.set_field(p, LEFT);
        let m = lhs.precede(p);
        p.bump_field(OPERATOR);
        match binary(p, bp + 1) {
            Some(rhs) => rhs.set_field(p, RIGHT),
            None => p.missing(IDENTIFIER, Some(RIGHT)),
        }
        lhs = Operand::Node(m.complete(p, BINARY_EXPRESSION));
    }

    Some(lhs)
}

fn primary(p: &mut Parser<'_>) -> Option<Operand> {
    let operand = match p.current() {
        IDENTIFIER => {
            let name = p.bump();
            if p.peek() != L_PAREN {
                return Some(Operand::Token(name));
            }

            p.set_field(name, FUNCTION);
            let m = p.precede_token(name);
            let arguments = p.start();
            delimited(p, R_PAREN, COMMA, EXPRESSION_FIRST, |p| expression(p, None).is_some());
            arguments.complete_field(p, ARGUMENT_LIST, Some(ARGUMENTS));
            Operand::Node(m.complete(p, CALL_EXPRESSION))
        }
        NUMBER_LITERAL => Operand::Token(p.bump()),
        QUOTE => Operand::Node(string_literal(p)),
        L_PAREN => {
            let m = p.start();
            p.bump();
            if expression(p, None).is_none() {
                p.missing(IDENTIFIER, None);
            }
            p.expect(R_PAREN);
            Operand::Node(m.complete(p, PARENTHESIZED_EXPRESSION))
        }
        _ => return None,
    };
    Some(operand)
}

fn string_literal(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if p.at(STRING_CONTENT) {
        p.bump();
    }
    p.expect(QUOTE);
    m.complete(p, STRING_LITERAL)
}
