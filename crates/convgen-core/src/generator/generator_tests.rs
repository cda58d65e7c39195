#![allow(non_snake_case)]

use super::*;
use crate::mapper::Resolution;
use crate::ty::Ty;
use quote::ToTokens;
use syn::{Expr, Item, parse_quote};
use test_case::test_case;

const TYPES: &str = r#"
    pub struct User {
        pub id: i64,
        pub name: Option<String>,
        pub age: isize,
    }

    pub struct UserDto {
        pub id: i64,
        pub name: String,
        pub age: String,
    }
"#;

fn parse(source: &str) -> syn::File {
    syn::parse_file(&format!("{TYPES}\n{source}")).unwrap()
}

fn function<'f>(file: &'f syn::File, name: &str) -> &'f ItemFn {
    file.items
        .iter()
        .find_map(|item| match item {
            Item::Fn(f) if f.sig.ident == name => Some(f),
            _ => None,
        })
        .unwrap()
}

fn docs(item: &ItemFn) -> Vec<String> {
    item.attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .map(|attr| attr.meta.require_name_value().unwrap().value.to_token_stream().to_string())
        .collect()
}

// Rewriting

#[test]
fn generate___marked_function___body_is_replaced() {
    let mut file = parse(
        r#"
        /// convgen:convert
        pub fn to_dto(user: User) -> UserDto {}
        "#,
    );

    let generation = Generator::new().generate(&mut file).unwrap();

    let expected: Block = parse_quote!({
        UserDto {
            id: user.id,
            name: user.name.unwrap_or_default(),
            age: user.age.to_string()
        }
    });
    assert!(generation.has_changed());
    assert_eq!(generation.rewrites.len(), 1);
    assert_eq!(generation.rewrites[0].function, "to_dto");
    assert_eq!(*function(&file, "to_dto").block, expected);
    assert_eq!(generation.rewrites[0].block, expected);
}

#[test]
fn generate___marker_removed___other_docs_kept() {
    let mut file = parse(
        r#"
        /// Maps a user.
        /// convgen:convert
        /// Safe to call with any user.
        #[must_use]
        pub fn to_dto(user: User) -> UserDto {}
        "#,
    );

    Generator::new().generate(&mut file).unwrap();

    let item = function(&file, "to_dto");
    assert_eq!(
        docs(item),
        vec!["\" Maps a user.\"", "\" Safe to call with any user.\""]
    );
    assert!(item.attrs.iter().any(|attr| attr.path().is_ident("must_use")));
}

#[test]
fn generate___unmarked_functions___are_untouched() {
    let source = r#"
        /// Plain documentation.
        pub fn to_dto(user: User) -> UserDto { todo!() }
    "#;
    let mut file = parse(source);

    let generation = Generator::new().generate(&mut file).unwrap();

    assert!(!generation.has_changed());
    assert_eq!(file, parse(source));
}

#[test]
fn generate___function_in_inline_module___is_not_scanned() {
    let source = r#"
        mod convert {
            use super::*;

            /// convgen:convert
            pub fn to_dto(user: User) -> UserDto {}
        }
    "#;
    let mut file = parse(source);

    let generation = Generator::new().generate(&mut file).unwrap();

    assert!(!generation.has_changed());
    assert_eq!(file, parse(source));
}

#[test_case("User", "UserDto"; "struct to struct")]
#[test_case("Option<User>", "UserDto"; "option to struct")]
#[test_case("User", "Option<UserDto>"; "struct to option")]
#[test_case("Option<User>", "Option<UserDto>"; "option to option")]
fn generate___second_run___has_no_changes(input: &str, output: &str) {
    let mut file = parse(&format!(
        "/// convgen:convert\npub fn to_dto(user: {input}) -> {output} {{}}"
    ));
    let generator = Generator::new();

    let first = generator.generate(&mut file).unwrap();
    let once = file.clone();
    let again = generator.generate(&mut file).unwrap();

    assert!(first.has_changed());
    assert!(!again.has_changed());
    assert_eq!(file, once);
}

#[test]
fn generate___rewrites_are_in_source_order() {
    let mut file = parse(
        r#"
        /// convgen:convert
        pub fn first(user: User) -> UserDto {}

        pub fn untouched() {}

        /// convgen:convert
        pub fn second(user: Option<User>) -> UserDto {}
        "#,
    );

    let generation = Generator::new().generate(&mut file).unwrap();

    let names: Vec<&str> = generation
        .rewrites
        .iter()
        .map(|rewrite| rewrite.function.as_str())
        .collect();
    assert_eq!(names, vec!["first", "second"]);
}

// Error policy

#[test]
fn generate___unsupported_under_abort___leaves_file_unchanged() {
    let source = r#"
        /// convgen:convert
        pub fn good(user: User) -> UserDto {}

        /// convgen:convert
        pub fn bad(users: Vec<User>) -> UserDto {}
    "#;
    let mut file = parse(source);

    let err = Generator::new().generate(&mut file).unwrap_err();

    assert!(matches!(err, GenError::UnsupportedShape { ref function, .. } if function == "bad"));
    assert_eq!(file, parse(source));
}

#[test]
fn generate___bad_signature_under_abort___is_signature_error() {
    let mut file = parse(
        r#"
        /// convgen:convert
        pub fn merge(a: User, b: User) -> UserDto {}
        "#,
    );

    let err = Generator::new().generate(&mut file).unwrap_err();

    assert!(matches!(err, GenError::Signature { params: 2, .. }));
}

#[test]
fn generate___unsupported_under_skip___rewrites_the_rest() {
    let mut file = parse(
        r#"
        /// convgen:convert
        pub fn bad(users: Vec<User>) -> UserDto {}

        /// convgen:convert
        pub fn good(user: User) -> UserDto {}
        "#,
    );

    let generation = Generator::new()
        .with_policy(UnsupportedPolicy::Skip)
        .generate(&mut file)
        .unwrap();

    assert_eq!(generation.rewrites.len(), 1);
    assert_eq!(generation.rewrites[0].function, "good");
    assert_eq!(generation.skipped.len(), 1);
    assert!(matches!(generation.skipped[0], GenError::UnsupportedShape { .. }));

    let bad = function(&file, "bad");
    assert!(bad.block.stmts.is_empty());
    assert_eq!(find_marker(&bad.attrs, DEFAULT_MARKER), Some(0));
}

#[test]
fn generate___invalid_template_under_skip___still_aborts() {
    let mut table = ConversionTable::standard();
    table.insert(
        "isize",
        "String",
        crate::conversions::ConversionRule::new("{} +").unwrap(),
    );
    let source = r#"
        /// convgen:convert
        pub fn to_dto(user: User) -> UserDto {}
    "#;
    let mut file = parse(source);

    let err = Generator::new()
        .with_policy(UnsupportedPolicy::Skip)
        .with_table(table)
        .generate(&mut file)
        .unwrap_err();

    assert!(matches!(err, GenError::InvalidExpression { .. }));
    assert_eq!(file, parse(source));
}

#[test]
fn generate___receiver_under_skip___is_skipped() {
    let mut file = parse(
        r#"
        /// convgen:convert
        pub fn from_self(self) -> UserDto {}

        /// convgen:convert
        pub fn to_dto(user: User) -> UserDto {}
        "#,
    );

    let generation = Generator::new()
        .with_policy(UnsupportedPolicy::Skip)
        .generate(&mut file)
        .unwrap();

    assert_eq!(generation.rewrites.len(), 1);
    assert!(matches!(generation.skipped[0], GenError::Signature { params: 0, .. }));
}

// Configuration

#[test]
fn Generator___custom_marker___only_that_marker_is_honored() {
    let mut file = parse(
        r#"
        /// mapper:generate
        pub fn custom(user: User) -> UserDto {}

        /// convgen:convert
        pub fn standard(user: User) -> UserDto {}
        "#,
    );

    let generation = Generator::new()
        .with_marker("mapper:generate")
        .generate(&mut file)
        .unwrap();

    assert_eq!(generation.rewrites.len(), 1);
    assert_eq!(generation.rewrites[0].function, "custom");
}

#[test]
fn Generator___from_config___applies_overrides() {
    let config = GeneratorConfig {
        marker: " mapper:generate ".to_string(),
        on_unsupported: UnsupportedPolicy::Skip,
        conversions: vec![crate::config::ConversionConfig {
            from: "isize".to_string(),
            to: "String".to_string(),
            template: "itoa::Buffer::new().format({}).to_owned()".to_string(),
            requires: vec!["itoa".to_string()],
        }],
        ..GeneratorConfig::default()
    };

    let generator = Generator::from_config(&config).unwrap();

    assert_eq!(generator.marker(), "mapper:generate");
    assert_eq!(
        generator.table().lookup("isize", "String").unwrap().requires(),
        ["itoa".to_string()]
    );
}

#[test]
fn Generator___from_config___rejects_empty_marker() {
    let config = GeneratorConfig {
        marker: "   ".to_string(),
        ..GeneratorConfig::default()
    };

    assert!(matches!(
        Generator::from_config(&config),
        Err(GenError::Config(_))
    ));
}

#[test]
fn Generation___requires___is_the_union_over_rewrites() {
    let mut table = ConversionTable::standard();
    table.insert(
        "isize",
        "String",
        crate::conversions::ConversionRule::new("itoa::Buffer::new().format({}).to_owned()")
            .unwrap()
            .requiring(["itoa"]),
    );
    let mut file = parse(
        r#"
        /// convgen:convert
        pub fn one(user: User) -> UserDto {}

        /// convgen:convert
        pub fn two(user: Option<User>) -> UserDto {}
        "#,
    );

    let generation = Generator::new().with_table(table).generate(&mut file).unwrap();

    assert_eq!(generation.requires.iter().collect::<Vec<_>>(), vec!["itoa"]);
    assert!(generation.rewrites.iter().all(|rewrite| rewrite.requires.contains("itoa")));
}

#[test]
fn Generator___with_fallback___replaces_naming_convention() {
    let mut file = syn::parse_file(
        r#"
        pub struct Order { pub id: OrderId }
        pub struct OrderDto { pub id: u64 }
        pub struct OrderId(u64);

        /// convgen:convert
        pub fn to_dto(order: Order) -> OrderDto {}
        "#,
    )
    .unwrap();

    let generation = Generator::new()
        .with_fallback(|_: &Ty, to: &Ty, source: &Expr| -> GenResult<Expr> {
            let to: syn::Type = syn::parse_str(&to.to_string()).unwrap();
            Ok(parse_quote!(#to::from(#source)))
        })
        .generate(&mut file)
        .unwrap();

    let field = &generation.rewrites[0].fields[0];
    assert_eq!(field.resolution, Resolution::Fallback);
    let expected: Expr = parse_quote!(u64::from(order.id));
    assert_eq!(field.expr, expected);
}

#[test]
fn generate_with___external_context___resolves_types_from_it() {
    let ctx = FileContext::parse(TYPES).unwrap();
    let mut file = syn::parse_file(
        r#"
        /// convgen:convert
        pub fn to_dto(user: User) -> Option<UserDto> {}
        "#,
    )
    .unwrap();

    let generation = Generator::new().generate_with(&mut file, &ctx).unwrap();

    assert_eq!(generation.rewrites.len(), 1);
    let expected: Block = parse_quote!({
        Some(UserDto {
            id: user.id,
            name: user.name.unwrap_or_default(),
            age: user.age.to_string()
        })
    });
    assert_eq!(generation.rewrites[0].block, expected);
}

#[test]
fn generate___type_alias_input___is_followed_once() {
    let mut file = parse(
        r#"
        pub type Account = User;

        /// convgen:convert
        pub fn to_dto(account: Account) -> UserDto {}
        "#,
    );

    let generation = Generator::new().generate(&mut file).unwrap();

    let expected: Expr = parse_quote!(account.id);
    assert_eq!(generation.rewrites.len(), 1);
    assert_eq!(generation.rewrites[0].fields[0].expr, expected);
}
