use verdant_c::{fields, kinds, language};
use verdant_parse::Parser;
use verdant_syntax::{Point, Range, Tree};

fn parse(text: &str) -> Tree {
    let mut parser = Parser::new();
    parser.set_language(language()).unwrap();
    parser.parse(text, None).unwrap()
}

#[test]
fn declaration_with_initializer() {
    let tree = parse("int x = 1;");
    let root = tree.root_node();

    assert_eq!(
        root.to_sexp(),
        "(translation_unit (declaration type: (primitive_type) declarator: (init_declarator \
         declarator: (identifier) value: (number_literal))))"
    );
    assert_eq!(root.kind(), "translation_unit");
    assert_eq!((root.start_byte(), root.end_byte()), (0, 10));
    assert!(!root.has_error());

    let declaration = root.child(0).unwrap();
    let declarator = declaration.child_by_field_name("declarator").unwrap();
    assert_eq!(declarator.symbol(), kinds::INIT_DECLARATOR);
    let value = declarator.child_by_field_id(fields::VALUE).unwrap();
    assert_eq!(value.utf8_text(b"int x = 1;"), Ok("1"));
    assert_eq!(declarator.field_name(), Some("declarator"));
    assert_eq!(declarator.parent(), Some(declaration));
}

#[test]
fn unterminated_string_is_repaired_with_missing_tokens() {
    let tree = parse("\"");
    let root = tree.root_node();

    assert_eq!(
        root.to_sexp(),
        r#"(translation_unit (expression_statement (string_literal (MISSING "\"")) (MISSING ";")))"#
    );
    assert!(root.has_error());

    let semicolon = root.child(0).unwrap().child(1).unwrap();
    assert!(semicolon.is_missing());
    assert_eq!((semicolon.start_byte(), semicolon.end_byte()), (1, 1));
}

#[test]
fn unexpected_characters_become_errors() {
    let tree = parse("int a; @ int b;");
    let root = tree.root_node();

    assert_eq!(
        root.to_sexp(),
        "(translation_unit (declaration type: (primitive_type) declarator: (identifier)) (ERROR) \
         (declaration type: (primitive_type) declarator: (identifier)))"
    );
    let error = root.child(1).unwrap();
    assert!(error.is_error());
    assert_eq!((error.start_byte(), error.end_byte()), (7, 8));
}

#[test]
fn comments_are_extras() {
    let text = "int a; // trailing\n/* lead */ int b;";
    let tree = parse(text);
    let root = tree.root_node();

    let comments: Vec<_> = root.children().filter(|child| child.is_extra()).collect();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].utf8_text(text.as_bytes()), Ok("// trailing"));
    assert_eq!(comments[1].start_point(), Point::new(1, 0));
    assert_eq!(root.named_child_count(), 4);
}

#[test]
fn trailing_comments_belong_to_the_statement() {
    let text = "a = b + c /* sum */;\nd = f /* call */ (1);\n";
    let tree = parse(text);
    let root = tree.root_node();

    let first = root.child(0).unwrap();
    let comment = first.child(1).unwrap();
    assert!(comment.is_extra());
    assert_eq!(comment.utf8_text(text.as_bytes()), Ok("/* sum */"));
    assert_eq!(comment.parent(), Some(first));
    assert_eq!(first.child(0).unwrap().end_byte(), 9);

    let call = root.child(1).unwrap().child(0).unwrap().child_by_field_name("right").unwrap();
    assert_eq!(call.kind(), "call_expression");
    assert!(call.children().any(|child| child.is_extra()));
}

#[test]
fn utf16_and_utf8_trees_agree_on_structure() {
    let text = "int answer = 4 * (10 + 0.5);\nvoid f(int n) { return; }\n";
    let utf8 = parse(text);

    let mut parser = Parser::new();
    parser.set_language(language()).unwrap();
    let units: Vec<u16> = text.encode_utf16().collect();
    let utf16 = parser.parse_utf16(&units, None).unwrap();

    assert_eq!(utf8.root_node().to_sexp(), utf16.root_node().to_sexp());
    let answer = utf16.root_node().child(0).unwrap().child(1).unwrap().child(0).unwrap();
    assert_eq!(String::from_utf16_lossy(answer.utf16_text(&units)), "answer");
    assert_eq!(answer.start_byte(), 2 * 4);
    assert_eq!(answer.start_point(), Point::new(0, 8));
}

#[test]
fn included_ranges_parse_embedded_code() {
    let text = "<% int a = 1; %> html <% int b; %>";
    let ranges = [Range::of_bytes(text, 2..14), Range::of_bytes(text, 24..32)];

    let mut parser = Parser::new();
    parser.set_language(language()).unwrap();
    parser.set_included_ranges(&ranges).unwrap();
    let tree = parser.parse(text, None).unwrap();
    let root = tree.root_node();

    assert_eq!(root.named_child_count(), 2);
    assert!(!root.has_error());
    let second = root.child(1).unwrap();
    assert_eq!(second.utf8_text(text.as_bytes()), Ok("int b;"));
    assert_eq!(tree.included_ranges(), ranges);
}

#[test]
fn tokens_do_not_span_range_boundaries() {
    let text = "int ab|cd;";
    let ranges = [Range::of_bytes(text, 0..6), Range::of_bytes(text, 7..10)];

    let mut parser = Parser::new();
    parser.set_language(language()).unwrap();
    parser.set_included_ranges(&ranges).unwrap();
    let tree = parser.parse(text, None).unwrap();

    assert_eq!(
        tree.root_node().to_sexp(),
        "(translation_unit \
         (declaration type: (primitive_type) declarator: (identifier) (MISSING \";\")) \
         (expression_statement (identifier)))"
    );
}

#[test]
fn expressions_follow_precedence() {
    let tree = parse("x = a - b - c * d;");
    assert_eq!(
        tree.root_node().to_sexp(),
        "(translation_unit (expression_statement (assignment_expression left: (identifier) right: \
         (binary_expression left: (binary_expression left: (identifier) right: (identifier)) \
         right: (binary_expression left: (identifier) right: (identifier))))))"
    );
}

#[test]
fn calls_and_parentheses() {
    let text = "f(a, (b), \"s\");";
    let tree = parse(text);
    let call = tree.root_node().child(0).unwrap().child(0).unwrap();

    assert_eq!(call.kind(), "call_expression");
    assert_eq!(call.child_by_field_name("function").unwrap().utf8_text(text.as_bytes()), Ok("f"));
    let arguments = call.child_by_field_name("arguments").unwrap();
    let kinds: Vec<_> = arguments.named_children().map(|node| node.kind()).collect();
    assert_eq!(kinds, ["identifier", "parenthesized_expression", "string_literal"]);
}
