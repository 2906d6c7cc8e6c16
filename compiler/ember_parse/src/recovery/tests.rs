use super::*;

#[test]
fn membership() {
    let set = TokenSet::new().with(TokenKind::Comma).with(TokenKind::Semi);
    assert!(set.contains(TokenKind::Comma));
    assert!(set.contains(TokenKind::Semi));
    assert!(!set.contains(TokenKind::Colon));
    assert!(!set.is_empty());
    assert!(TokenSet::new().is_empty());
}

#[test]
fn union_combines() {
    let a = TokenSet::new().with(TokenKind::KwFn);
    let b = TokenSet::new().with(TokenKind::Unknown);
    let both = a.union(b);
    assert!(both.contains(TokenKind::KwFn));
    assert!(both.contains(TokenKind::Unknown));
}

#[test]
fn predefined_sets() {
    assert!(ITEM_START.contains(TokenKind::KwStruct));
    assert!(!ITEM_START.contains(TokenKind::KwLet));
    assert!(EXPR_START.contains(TokenKind::KwIf));
    assert!(EXPR_START.contains(TokenKind::Float));
    assert!(!EXPR_START.contains(TokenKind::Semi));
    assert!(PAT_START.contains(TokenKind::Underscore));
    assert!(TYPE_START.contains(TokenKind::LBracket));
}
