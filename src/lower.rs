use crate::ir::{
    Decl, Expr, FieldSpec, FuncSpec, ImportSpec, MethodSig, Module, Param, Results, Stmt, Tag,
};
use crate::model::Template;

// ---------------------------- Naming policy ------------------------------- //

/// Fixed internal name of the generated backing struct.
const STRUCT_NAME: &str = "appConfig";
/// Storage-field prefix, distinguishing fields from the accessor methods.
const FIELD_PREFIX: &str = "Field";
/// Prefix of the generated accessor interface.
const INTERFACE_PREFIX: &str = "I";
/// Prefix of the generated constructor.
const CONSTRUCTOR_PREFIX: &str = "New";
/// Receiver identifier used by every generated method.
const RECEIVER: &str = "this";
/// Unexported field holding the instance's own viper handle.
const VIPER_FIELD: &str = "viper";
const LOADER_NAME: &str = "loadViperConfig";
const DEFAULTS_NAME: &str = "setDefaults";
/// Struct tag key viper's decoder reads the lookup key from.
const TAG_KEY: &str = "mapstructure";

const VIPER_PATH: &str = "github.com/spf13/viper";

const GENERATED_HEADER: &str = "This file is generated automatically.";
/// Regenerate-trigger directive, included in one CLI mode.
const REGEN_DIRECTIVE: &str = "//go:generate gogenv && go fmt .";

// ------------------------------ Lowering ---------------------------------- //

/// Build the full module IR for one validated, normalized template.
///
/// Declaration order is fixed: constructor, interface, struct, accessors,
/// loader, defaults. Identical input yields identical IR; all iteration is
/// over the template's ordered lists.
pub fn lower_template(template: &Template, regen_directive: bool) -> Module {
    let mut header = Vec::new();
    if regen_directive {
        header.push(REGEN_DIRECTIVE.to_string());
    }
    header.push(GENERATED_HEADER.to_string());

    let mut decls = vec![constructor_func(template)];
    decls.push(interface_decl(template));
    decls.push(struct_decl(template));
    decls.extend(accessor_funcs(template));
    decls.push(loader_func(template));
    decls.push(defaults_func(template));

    Module {
        header,
        package: template.package_name.clone(),
        imports: import_block(template),
        decls,
    }
}

/// `fmt` and viper first (the loader depends on both), then the template's
/// imports in input order, deduplicated by path.
fn import_block(template: &Template) -> Vec<ImportSpec> {
    let mut imports = vec![
        ImportSpec {
            alias: None,
            path: "fmt".to_string(),
        },
        ImportSpec {
            alias: Some(VIPER_FIELD.to_string()),
            path: VIPER_PATH.to_string(),
        },
    ];
    for import in &template.imports {
        if imports.iter().any(|existing| existing.path == import.path) {
            continue;
        }
        imports.push(ImportSpec {
            alias: (!import.alias.is_empty()).then(|| import.alias.clone()),
            path: import.path.clone(),
        });
    }
    imports
}

/// func New<Config>(path string) (I<Config>, error)
///
/// Binds a fresh struct to its own viper handle, runs the loader, returns
/// `(nil, err)` on failure.
fn constructor_func(template: &Template) -> Decl {
    Decl::Func(FuncSpec {
        name: format!("{CONSTRUCTOR_PREFIX}{}", template.config_name),
        receiver: None,
        params: vec![Param {
            name: "path".to_string(),
            ty: "string".to_string(),
        }],
        results: Results::Plain(vec![
            format!("{INTERFACE_PREFIX}{}", template.config_name),
            "error".to_string(),
        ]),
        body: vec![
            Stmt::Define {
                name: "v".to_string(),
                value: Expr::AddrStruct {
                    ty: STRUCT_NAME.to_string(),
                    fields: vec![(
                        VIPER_FIELD.to_string(),
                        Expr::Call {
                            recv: Some(VIPER_FIELD.to_string()),
                            name: "New".to_string(),
                            args: vec![],
                        },
                    )],
                },
            },
            Stmt::Define {
                name: "err".to_string(),
                value: Expr::Call {
                    recv: Some("v".to_string()),
                    name: LOADER_NAME.to_string(),
                    args: vec![Expr::Ident("path".to_string())],
                },
            },
            Stmt::If {
                cond: err_not_nil(),
                body: vec![Stmt::Return(vec![
                    Expr::Nil,
                    Expr::Ident("err".to_string()),
                ])],
            },
            Stmt::Return(vec![Expr::Ident("v".to_string()), Expr::Nil]),
        ],
    })
}

/// One zero-parameter method signature per variable, input order.
fn interface_decl(template: &Template) -> Decl {
    Decl::Interface {
        name: format!("{INTERFACE_PREFIX}{}", template.config_name),
        methods: template
            .variables
            .iter()
            .map(|variable| MethodSig {
                name: variable.name.clone(),
                ret: variable.ty.clone(),
            })
            .collect(),
    }
}

/// One tagged storage field per variable, plus the viper handle.
fn struct_decl(template: &Template) -> Decl {
    let mut fields: Vec<FieldSpec> = template
        .variables
        .iter()
        .map(|variable| FieldSpec {
            name: format!("{FIELD_PREFIX}{}", variable.name),
            ty: variable.ty.clone(),
            tag: Some(Tag {
                key: TAG_KEY.to_string(),
                value: variable.raw_name.clone(),
            }),
        })
        .collect();
    fields.push(FieldSpec {
        name: VIPER_FIELD.to_string(),
        ty: "*viper.Viper".to_string(),
        tag: None,
    });
    Decl::Struct {
        name: STRUCT_NAME.to_string(),
        fields,
    }
}

/// Accessor bodies are exactly "return the storage field".
fn accessor_funcs(template: &Template) -> Vec<Decl> {
    template
        .variables
        .iter()
        .map(|variable| {
            Decl::Func(FuncSpec {
                name: variable.name.clone(),
                receiver: Some(receiver()),
                params: vec![],
                results: Results::Plain(vec![variable.ty.clone()]),
                body: vec![Stmt::Return(vec![Expr::Selector {
                    recv: RECEIVER.to_string(),
                    field: format!("{FIELD_PREFIX}{}", variable.name),
                }])],
            })
        })
        .collect()
}

/// Fixed call sequence against the owned capability handle. A missing config
/// file is tolerated; defaults are seeded before the final decode so they
/// only apply to fields absent from both file and environment. A decode
/// failure is replaced with a fixed message tagged with the config name.
fn loader_func(template: &Template) -> Decl {
    let (config_name_part, config_type_part) = template.env_file_parts();
    Decl::Func(FuncSpec {
        name: LOADER_NAME.to_string(),
        receiver: Some(receiver()),
        params: vec![Param {
            name: "path".to_string(),
            ty: "string".to_string(),
        }],
        results: Results::Named(vec![Param {
            name: "err".to_string(),
            ty: "error".to_string(),
        }]),
        body: vec![
            Stmt::Expr(viper_call(
                "AddConfigPath",
                vec![Expr::Ident("path".to_string())],
            )),
            Stmt::Expr(viper_call(
                "SetConfigName",
                vec![Expr::StrLit(config_name_part.to_string())],
            )),
            Stmt::Expr(viper_call(
                "SetConfigType",
                vec![Expr::StrLit(config_type_part.to_string())],
            )),
            Stmt::Expr(viper_call("AutomaticEnv", vec![])),
            Stmt::Discard(viper_call("ReadInConfig", vec![])),
            Stmt::Expr(Expr::Call {
                recv: Some(RECEIVER.to_string()),
                name: DEFAULTS_NAME.to_string(),
                args: vec![],
            }),
            Stmt::Assign {
                name: "err".to_string(),
                value: viper_call("Unmarshal", vec![Expr::Ident(RECEIVER.to_string())]),
            },
            Stmt::If {
                cond: err_not_nil(),
                body: vec![Stmt::Assign {
                    name: "err".to_string(),
                    value: Expr::Call {
                        recv: Some("fmt".to_string()),
                        name: "Errorf".to_string(),
                        args: vec![Expr::StrLit(format!(
                            "[{}] Failed to load environment",
                            template.config_name
                        ))],
                    },
                }],
            },
            Stmt::Return(vec![]),
        ],
    })
}

/// One SetDefault call per variable, input order, raw name as key, the
/// literal default text as value. No coercion here; that is viper's job.
fn defaults_func(template: &Template) -> Decl {
    Decl::Func(FuncSpec {
        name: DEFAULTS_NAME.to_string(),
        receiver: Some(receiver()),
        params: vec![],
        results: Results::None,
        body: template
            .variables
            .iter()
            .map(|variable| {
                Stmt::Expr(viper_call(
                    "SetDefault",
                    vec![
                        Expr::StrLit(variable.raw_name.clone()),
                        Expr::StrLit(variable.default.clone()),
                    ],
                ))
            })
            .collect(),
    })
}

// ------------------------------ Helpers ----------------------------------- //

fn receiver() -> Param {
    Param {
        name: RECEIVER.to_string(),
        ty: format!("*{STRUCT_NAME}"),
    }
}

fn viper_call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Call {
        recv: Some(format!("{RECEIVER}.{VIPER_FIELD}")),
        name: name.to_string(),
        args,
    }
}

fn err_not_nil() -> Expr {
    Expr::NotEq(
        Box::new(Expr::Ident("err".to_string())),
        Box::new(Expr::Nil),
    )
}

// ------------------------------- Tests ------------------------------------ //
