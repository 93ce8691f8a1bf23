// Strongly-typed IR for the generated Go module. Plain data only: the lowering
// pass assembles it, the emitter renders it, nothing else touches it.

#[derive(Debug, Clone)]
pub struct Module {
    /// Comment lines above the package clause. Lines already starting with
    /// `//` (directives) are emitted verbatim.
    pub header: Vec<String>,
    pub package: String,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub struct ImportSpec {
    /// Rendered as `alias "path"`; bare quoted path when absent.
    pub alias: Option<String>,
    pub path: String,
}

#[derive(Debug, Clone)]
pub enum Decl {
    Interface {
        name: String,
        methods: Vec<MethodSig>, // zero-parameter accessors only
    },
    Struct {
        name: String,
        fields: Vec<FieldSpec>,
    },
    Func(FuncSpec),
}

#[derive(Debug, Clone)]
pub struct MethodSig {
    pub name: String,
    pub ret: String,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub ty: String,
    pub tag: Option<Tag>,
}

/// One struct tag, e.g. `mapstructure:"max_retry_count"`.
#[derive(Debug, Clone)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct FuncSpec {
    pub name: String,
    /// Method when present, free function otherwise.
    pub receiver: Option<Param>,
    pub params: Vec<Param>,
    pub results: Results,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone)]
pub enum Results {
    None,
    /// `T` or `(A, B)`.
    Plain(Vec<String>),
    /// `(err error)`, so the loader can use a bare `return`.
    Named(Vec<Param>),
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Define { name: String, value: Expr },  // name := value
    Assign { name: String, value: Expr },  // name = value
    Discard(Expr),                         // _ = value
    Expr(Expr),
    If { cond: Expr, body: Vec<Stmt> },
    Return(Vec<Expr>),                     // bare `return` when empty
}

#[derive(Debug, Clone)]
pub enum Expr {
    Ident(String),
    StrLit(String),
    Nil,
    Selector { recv: String, field: String },
    Call {
        /// Dotted receiver path (`this.viper`, `fmt`); free call when absent.
        recv: Option<String>,
        name: String,
        args: Vec<Expr>,
    },
    NotEq(Box<Expr>, Box<Expr>),
    /// `&ty{field: value, ...}`
    AddrStruct {
        ty: String,
        fields: Vec<(String, Expr)>,
    },
}
