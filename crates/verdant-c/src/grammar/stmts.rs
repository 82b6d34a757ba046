use verdant_syntax::{FieldId, Symbol};

use crate::grammar::{exprs, items};
use crate::kinds::*;
use crate::parser::{Block, Marker, Parser};
use crate::symbol_set::SymbolSet;

pub(super) const STATEMENT_REUSABLE: SymbolSet =
    SymbolSet::new([DECLARATION, EXPRESSION_STATEMENT, RETURN_STATEMENT, COMPOUND_STATEMENT]);

pub(super) fn statement(p: &mut Parser<'_>) {
    match p.current() {
        PRIMITIVE_TYPE => items::declaration(p, false),
        L_BRACE => compound_statement(p, None, None),
        RETURN_KW => return_statement(p),
        SEMICOLON => {
            let m = p.start();
            p.bump();
            m.complete(p, EXPRESSION_STATEMENT);
        }
        UNKNOWN => {
            p.bump();
        }
        kind if exprs::EXPRESSION_FIRST.contains(kind) => expression_statement(p),
        _ => {
            let m = p.start();
            p.bump();
            m.complete(p, Symbol::ERROR);
        }
    }
}

/// Parses `{ statement* }`. A `definition` marker is completed as the
/// function definition the block is the body of.
pub(super) fn compound_statement(
    p: &mut Parser<'_>,
    field: Option<FieldId>,
    definition: Option<Marker>,
) {
    let m = p.start();
    p.bump();
    p.enter_block(Block::new(&m, field, definition.as_ref()));
    block_items(p, m, field, definition);
}

/// Re-enters the blocks a halted parse stopped in, outermost first, and
/// finishes each of them.
pub(super) fn resume_blocks(p: &mut Parser<'_>, blocks: &[Block]) {
    let Some((outer, inner)) = blocks.split_first() else {
        return;
    };

    p.enter_block(*outer);
    resume_blocks(p, inner);
    let (m, definition) = outer.markers();
    block_items(p, m, outer.field(), definition);
}

fn block_items(p: &mut Parser<'_>, m: Marker, field: Option<FieldId>, definition: Option<Marker>) {
    loop {
        if p.save_checkpoint() || p.at(R_BRACE) || p.at(EOF) {
            break;
        }
        if p.try_reuse(STATEMENT_REUSABLE) {
            continue;
        }
        statement(p);
    }
    p.leave_block();

    if p.is_halted() {
        m.suspend();
        if let Some(definition) = definition {
            definition.suspend();
        }
        return;
    }

    p.expect(R_BRACE);
    m.complete_field(p, COMPOUND_STATEMENT, field);
    if let Some(definition) = definition {
        definition.complete(p, FUNCTION_DEFINITION);
    }
}

fn return_statement(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    if !p.at(SEMICOLON) {
        exprs::expression(p, None);
    }
    p.expect(SEMICOLON);
    m.complete(p, RETURN_STATEMENT);
}

fn expression_statement(p: &mut Parser<'_>) {
    let m = p.start();
    exprs::expression(p, None);
    p.expect(SEMICOLON);
    m.complete(p, EXPRESSION_STATEMENT);
}
