#[cfg(test)]
pub mod test {
    use crate::schema::{Section, SchemaBuilder};
    use crate::types::FieldMeta;

    #[derive(Debug, Clone, PartialEq)]
    pub struct ServerConfig {
        pub name: String,
        pub port: i32,
        pub limits: LimitsConfig,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                name: "srv1".into(),
                port: 25565,
                limits: LimitsConfig::default(),
            }
        }
    }

    impl Section for ServerConfig {
        fn schema(fields: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
            fields
                .scalar("name", |c| &c.name, |c| &mut c.name)
                .meta(FieldMeta::new().inline_comment("server id"))
                .scalar("port", |c| &c.port, |c| &mut c.port)
                .nested("limits", |c| &c.limits, |c| &mut c.limits)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct LimitsConfig {
        pub max: i32,
    }

    impl Default for LimitsConfig {
        fn default() -> Self {
            Self { max: 100 }
        }
    }

    impl Section for LimitsConfig {
        fn schema(fields: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
            fields
                .scalar("max", |c| &c.max, |c| &mut c.max)
                .meta(FieldMeta::new().block_comment(["do not exceed 500"]))
        }
    }

    // -- Fixture for path tracking across depths 0, 1 and 2 --------------------

    #[derive(Debug, Clone, PartialEq)]
    pub struct DeepConfig {
        pub top: i32,
        pub outer: OuterConfig,
        pub bottom: String,
    }

    impl Default for DeepConfig {
        fn default() -> Self {
            Self {
                top: 1,
                outer: OuterConfig::default(),
                bottom: "end".into(),
            }
        }
    }

    impl Section for DeepConfig {
        fn schema(fields: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
            fields
                .scalar("top", |c| &c.top, |c| &mut c.top)
                .meta(FieldMeta::new().inline_comment("c-top"))
                .nested("outer", |c| &c.outer, |c| &mut c.outer)
                .meta(
                    FieldMeta::new()
                        .inline_comment("c-outer")
                        .block_comment(["b-outer"]),
                )
                .scalar("bottom", |c| &c.bottom, |c| &mut c.bottom)
                .meta(FieldMeta::new().block_comment(["b-bottom", "b-bottom-2"]))
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct OuterConfig {
        pub first: String,
        pub inner: InnerConfig,
        pub last: bool,
    }

    impl Default for OuterConfig {
        fn default() -> Self {
            Self {
                first: "a".into(),
                inner: InnerConfig::default(),
                last: true,
            }
        }
    }

    impl Section for OuterConfig {
        fn schema(fields: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
            fields
                .scalar("first", |c| &c.first, |c| &mut c.first)
                .meta(FieldMeta::new().inline_comment("c-outer-first"))
                .nested("inner", |c| &c.inner, |c| &mut c.inner)
                .meta(
                    FieldMeta::new()
                        .inline_comment("c-inner")
                        .block_comment(["b-inner"]),
                )
                .scalar("last", |c| &c.last, |c| &mut c.last)
                .meta(FieldMeta::new().block_comment(["b-outer-last"]))
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct InnerConfig {
        pub leaf: i64,
        pub sibling: f64,
    }

    impl Default for InnerConfig {
        fn default() -> Self {
            Self {
                leaf: 7,
                sibling: 2.5,
            }
        }
    }

    impl Section for InnerConfig {
        fn schema(fields: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
            fields
                .scalar("leaf", |c| &c.leaf, |c| &mut c.leaf)
                .meta(FieldMeta::new().inline_comment("c-leaf"))
                .scalar("sibling", |c| &c.sibling, |c| &mut c.sibling)
                .meta(FieldMeta::new().block_comment(["b-sibling"]))
        }
    }

    // -- Fixture for optional values, overrides and less common scalars --------

    #[derive(Debug, Clone, PartialEq)]
    pub struct OptionalConfig {
        pub nickname: Option<String>,
        pub retries: u8,
        pub ratio: f32,
        pub initial: char,
        pub extra: Option<LimitsConfig>,
    }

    impl Default for OptionalConfig {
        fn default() -> Self {
            Self {
                nickname: None,
                retries: 3,
                ratio: 0.75,
                initial: 'k',
                extra: None,
            }
        }
    }

    impl Section for OptionalConfig {
        fn schema(fields: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
            fields
                .scalar("nickname", |c| &c.nickname, |c| &mut c.nickname)
                .meta(FieldMeta::new().inline_comment("display name"))
                .scalar("retries", |c| &c.retries, |c| &mut c.retries)
                .meta(FieldMeta::new().key("max-retries"))
                .scalar("ratio", |c| &c.ratio, |c| &mut c.ratio)
                .scalar("initial", |c| &c.initial, |c| &mut c.initial)
                .optional_nested("extra", |c| &c.extra, |c| &mut c.extra)
                .meta(FieldMeta::new().inline_comment("optional limits"))
        }
    }

    // -- Fixture with a multi-line string value --------------------------------

    #[derive(Debug, Clone, PartialEq)]
    pub struct MotdConfig {
        pub motd: String,
        pub after: i32,
    }

    impl Default for MotdConfig {
        fn default() -> Self {
            Self {
                motd: "welcome: friend\nkeys: none".into(),
                after: 5,
            }
        }
    }

    impl Section for MotdConfig {
        fn schema(fields: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
            fields
                .scalar("motd", |c| &c.motd, |c| &mut c.motd)
                .meta(FieldMeta::new().inline_comment("shown on join"))
                .scalar("after", |c| &c.after, |c| &mut c.after)
                .meta(FieldMeta::new().inline_comment("c-after"))
        }
    }

    // -- Fixture with block scalars that carry indicators, next to block comments

    #[derive(Debug, Clone, PartialEq)]
    pub struct BlockScalarConfig {
        pub kept: String,
        pub after: i32,
        pub indented: String,
        pub last: bool,
    }

    impl Default for BlockScalarConfig {
        fn default() -> Self {
            Self {
                kept: "line1\nb: fake\n\n".into(),
                after: 3,
                indented: "\n  lead\ntail\n\n".into(),
                last: true,
            }
        }
    }

    impl Section for BlockScalarConfig {
        fn schema(fields: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
            fields
                .scalar("kept", |c| &c.kept, |c| &mut c.kept)
                .meta(FieldMeta::new().inline_comment("c-kept"))
                .scalar("after", |c| &c.after, |c| &mut c.after)
                .meta(
                    FieldMeta::new()
                        .inline_comment("c-after")
                        .block_comment(["b-after"]),
                )
                .scalar("indented", |c| &c.indented, |c| &mut c.indented)
                .scalar("last", |c| &c.last, |c| &mut c.last)
                .meta(FieldMeta::new().block_comment(["b-last"]))
        }
    }

    // -- Fixture with keys the emitter has to quote ------------------------------

    #[derive(Debug, Clone, PartialEq)]
    pub struct QuotedKeysConfig {
        pub apostrophe: i32,
        pub ampersand: i32,
        pub double: i32,
        pub boolean_like: bool,
    }

    impl Default for QuotedKeysConfig {
        fn default() -> Self {
            Self {
                apostrophe: 4,
                ampersand: 5,
                double: 6,
                boolean_like: false,
            }
        }
    }

    impl Section for QuotedKeysConfig {
        fn schema(fields: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
            fields
                .scalar("apostrophe", |c| &c.apostrophe, |c| &mut c.apostrophe)
                .meta(FieldMeta::new().key("'q").inline_comment("c-quote"))
                .scalar("ampersand", |c| &c.ampersand, |c| &mut c.ampersand)
                .meta(
                    FieldMeta::new()
                        .key("&it's")
                        .inline_comment("c-amp")
                        .block_comment(["b-amp"]),
                )
                .scalar("double", |c| &c.double, |c| &mut c.double)
                .meta(FieldMeta::new().key("\"dq").inline_comment("c-double"))
                .scalar("boolean_like", |c| &c.boolean_like, |c| &mut c.boolean_like)
                .meta(FieldMeta::new().key("yes").inline_comment("c-yes"))
        }
    }
}
