use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;

fn colors() -> Vec<Rc<str>> {
    ["RED", "DARK_BLUE", "Green"].into_iter().map(Rc::from).collect()
}

#[test]
fn camel_to_constant() {
    assert_eq!(constant_case("darkBlue"), "DARK_BLUE");
    assert_eq!(constant_case("red"), "RED");
    assert_eq!(constant_case("level2Cache"), "LEVEL2_CACHE");
    assert_eq!(constant_case("ALREADY_DONE"), "ALREADY_DONE");
}

#[test]
fn lookup_order() {
    let constants = colors();
    assert_eq!(match_enum_constant(&constants, "Green").map(|c| &**c), Some("Green"));
    assert_eq!(match_enum_constant(&constants, "red").map(|c| &**c), Some("RED"));
    assert_eq!(
        match_enum_constant(&constants, "darkBlue").map(|c| &**c),
        Some("DARK_BLUE")
    );
    assert_eq!(match_enum_constant(&constants, "purple"), None);
}
