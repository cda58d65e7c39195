#![allow(non_snake_case)]

use crate::prelude::*;
use syn::{Block, Item, parse_quote};

const SOURCE: &str = r#"
    pub type Id = i64;

    pub struct Profile {
        pub id: Id,
        pub display_name: Option<String>,
        pub email: String,
        pub visits: i32,
        pub joined: Timestamp,
        password_hash: String,
    }

    pub struct ProfileView {
        pub id: i64,
        pub display_name: String,
        pub email: Option<String>,
        pub visits: String,
        pub joined: String,
        pub badge: Option<String>,
    }

    /// Builds the public view of a profile.
    /// convgen:convert
    pub fn to_view(profile: Option<Profile>) -> ProfileView {}
"#;

fn body_of(file: &syn::File, name: &str) -> Block {
    file.items
        .iter()
        .find_map(|item| match item {
            Item::Fn(f) if f.sig.ident == name => Some((*f.block).clone()),
            _ => None,
        })
        .unwrap()
}

#[test]
fn prelude___end_to_end_conversion() {
    let mut file = syn::parse_file(SOURCE).unwrap();

    let generation = Generator::new().generate(&mut file).unwrap();

    let expected: Block = parse_quote!({
        let Some(profile) = profile else {
            return ProfileView {
                id: 0,
                display_name: String::new(),
                email: None,
                visits: String::new(),
                joined: String::new(),
                badge: None
            };
        };
        ProfileView {
            id: profile.id,
            display_name: profile.display_name.unwrap_or_default(),
            email: Some(profile.email),
            visits: i64::from(profile.visits).to_string(),
            joined: new_string_from_timestamp(profile.joined),
            badge: None
        }
    });
    assert_eq!(generation.rewrites.len(), 1);
    assert_eq!(body_of(&file, "to_view"), expected);
    assert!(generation.requires.is_empty());
}

#[test]
fn prelude___config_driven_generator() {
    let config: GeneratorConfig = toml::from_str(
        r#"
        [fallback]
        style = "camel"

        [[conversions]]
        from = "Timestamp"
        to = "String"
        template = "{}.to_rfc3339()"
        "#,
    )
    .unwrap();
    let mut file = syn::parse_file(SOURCE).unwrap();

    let generation = Generator::from_config(&config)
        .unwrap()
        .generate(&mut file)
        .unwrap();

    let joined = generation.rewrites[0]
        .fields
        .iter()
        .find(|field| field.ident == "joined")
        .unwrap();
    let expected: syn::Expr = parse_quote!(profile.joined.to_rfc3339());
    assert_eq!(joined.expr, expected);
}

#[test]
fn prelude___context_can_come_from_another_file() {
    let ctx = FileContext::parse(SOURCE).unwrap();
    let mut file = syn::parse_file(
        r#"
        /// convgen:convert
        fn view(_: Profile) -> Option<ProfileView> {}
        "#,
    )
    .unwrap();

    let generation = Generator::new().generate_with(&mut file, &ctx).unwrap();

    assert_eq!(ctx.len(), 3);
    assert!(generation.has_changed());
    assert!(crate::render_block(&generation.rewrites[0].block, "").contains("input.email"));
}
