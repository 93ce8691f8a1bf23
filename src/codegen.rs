//! Render the module IR to Go source text.
//!
//! Layout is fixed: header comments, package clause, import block, then the
//! declarations in builder order, one blank line between them. Tab
//! indentation; the optional `//go:generate` directive re-runs `go fmt`
//! anyway, so no further formatting is attempted here.

use crate::ir::{Decl, Expr, FuncSpec, ImportSpec, Module, Results, Stmt};

/// Output artifact name for a given config name.
pub fn artifact_name(config_name: &str) -> String {
    format!("{}_generated.go", config_name.to_lowercase())
}

#[derive(Debug, Default)]
pub struct Codegen {
    out: String,
    indent: usize,
}

impl Codegen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_string(self) -> String {
        self.out
    }

    pub fn emit(&mut self, module: &Module) {
        for line in &module.header {
            if line.starts_with("//") {
                // directive comments go out verbatim
                self.line(line);
            } else {
                self.line(&format!("// {line}"));
            }
        }
        self.blank();
        self.line(&format!("package {}", module.package));
        self.blank();
        self.emit_imports(&module.imports);
        for decl in &module.decls {
            self.blank();
            self.emit_decl(decl);
        }
    }

    fn emit_imports(&mut self, imports: &[ImportSpec]) {
        self.line("import (");
        self.indent += 1;
        for import in imports {
            match &import.alias {
                Some(alias) => self.line(&format!("{alias} {}", go_quote(&import.path))),
                None => self.line(&go_quote(&import.path)),
            }
        }
        self.indent -= 1;
        self.line(")");
    }

    fn emit_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Interface { name, methods } => {
                self.line(&format!("type {name} interface {{"));
                self.indent += 1;
                for method in methods {
                    self.line(&format!("{}() {}", method.name, method.ret));
                }
                self.indent -= 1;
                self.line("}");
            }
            Decl::Struct { name, fields } => {
                self.line(&format!("type {name} struct {{"));
                self.indent += 1;
                for field in fields {
                    match &field.tag {
                        Some(tag) => self.line(&format!(
                            "{} {} `{}:{}`",
                            field.name,
                            field.ty,
                            tag.key,
                            go_quote(&tag.value)
                        )),
                        None => self.line(&format!("{} {}", field.name, field.ty)),
                    }
                }
                self.indent -= 1;
                self.line("}");
            }
            Decl::Func(spec) => self.emit_func(spec),
        }
    }

    fn emit_func(&mut self, spec: &FuncSpec) {
        let mut sig = String::from("func ");
        if let Some(recv) = &spec.receiver {
            sig.push_str(&format!("({} {}) ", recv.name, recv.ty));
        }
        sig.push_str(&spec.name);
        sig.push('(');
        let params: Vec<String> = spec
            .params
            .iter()
            .map(|p| format!("{} {}", p.name, p.ty))
            .collect();
        sig.push_str(&params.join(", "));
        sig.push(')');
        match &spec.results {
            Results::None => {}
            Results::Plain(rets) if rets.len() == 1 => {
                sig.push(' ');
                sig.push_str(&rets[0]);
            }
            Results::Plain(rets) => {
                sig.push_str(&format!(" ({})", rets.join(", ")));
            }
            Results::Named(rets) => {
                let named: Vec<String> = rets
                    .iter()
                    .map(|p| format!("{} {}", p.name, p.ty))
                    .collect();
                sig.push_str(&format!(" ({})", named.join(", ")));
            }
        }
        sig.push_str(" {");
        self.line(&sig);
        self.indent += 1;
        for stmt in &spec.body {
            self.emit_stmt(stmt);
        }
        self.indent -= 1;
        self.line("}");
    }

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Define { name, value } => self.line(&format!("{name} := {}", render_expr(value))),
            Stmt::Assign { name, value } => self.line(&format!("{name} = {}", render_expr(value))),
            Stmt::Discard(value) => self.line(&format!("_ = {}", render_expr(value))),
            Stmt::Expr(value) => self.line(&render_expr(value)),
            Stmt::If { cond, body } => {
                self.line(&format!("if {} {{", render_expr(cond)));
                self.indent += 1;
                for inner in body {
                    self.emit_stmt(inner);
                }
                self.indent -= 1;
                self.line("}");
            }
            Stmt::Return(values) if values.is_empty() => self.line("return"),
            Stmt::Return(values) => {
                let list: Vec<String> = values.iter().map(render_expr).collect();
                self.line(&format!("return {}", list.join(", ")));
            }
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push('\t');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }
}

fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Ident(name) => name.clone(),
        Expr::StrLit(text) => go_quote(text),
        Expr::Nil => "nil".to_string(),
        Expr::Selector { recv, field } => format!("{recv}.{field}"),
        Expr::Call { recv, name, args } => {
            let args: Vec<String> = args.iter().map(render_expr).collect();
            let args = args.join(", ");
            match recv {
                Some(recv) => format!("{recv}.{name}({args})"),
                None => format!("{name}({args})"),
            }
        }
        Expr::NotEq(a, b) => format!("{} != {}", render_expr(a), render_expr(b)),
        Expr::AddrStruct { ty, fields } => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(name, value)| format!("{name}: {}", render_expr(value)))
                .collect();
            format!("&{ty}{{{}}}", fields.join(", "))
        }
    }
}

/// Quote as a Go interpreted string literal.
fn go_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::lower_template;
    use crate::model::Template;
    use crate::normalize::normalize_variables;

    fn render(yaml: &str, regen_directive: bool) -> String {
        let mut template = Template::from_yaml(yaml).expect("parse");
        template.apply_defaults();
        template.validate().expect("validate");
        template.variables = normalize_variables(std::mem::take(&mut template.variables));
        let module = lower_template(&template, regen_directive);
        let mut cg = Codegen::new();
        cg.emit(&module);
        cg.into_string()
    }

    const APP: &str = r#"
envFile: app.yaml
configName: AppConfig
variables:
  - name: max_retry_count
    type: int
    default: "3"
"#;

    #[test]
    fn app_config_scenario_end_to_end() {
        let src = render(APP, true);
        assert!(src.contains("package appconfig"), "{src}");
        assert!(src.contains("func NewAppConfig(path string) (IAppConfig, error) {"));
        assert!(src.contains("MaxRetryCount() int"));
        assert!(src.contains("FieldMaxRetryCount int `mapstructure:\"max_retry_count\"`"));
        assert!(src.contains("this.viper.SetDefault(\"max_retry_count\", \"3\")"));
        assert!(src.contains("return this.FieldMaxRetryCount"));
        // envFile "app.yaml" drives the loader's name/type calls
        assert!(src.contains("this.viper.SetConfigName(\"app\")"));
        assert!(src.contains("this.viper.SetConfigType(\"yaml\")"));
        assert!(src.contains("err = fmt.Errorf(\"[AppConfig] Failed to load environment\")"));
    }

    #[test]
    fn array_field_scenario() {
        let yaml = r#"
envFile: app.yaml
variables:
  - name: allowed_hosts
    type: string[]
"#;
        let src = render(yaml, true);
        assert!(src.contains("AllowedHosts() []string"), "{src}");
        assert!(src.contains("FieldAllowedHosts []string `mapstructure:\"allowed_hosts\"`"));
        // configName was omitted, so the built-in default drives the names
        assert!(src.contains("type IAppConfig interface {"));
        assert!(src.contains("package appconfig"));
    }

    #[test]
    fn module_layout_order() {
        let src = render(APP, true);
        let directive = src.find("//go:generate").expect("directive");
        let header = src.find("// This file is generated automatically.").unwrap();
        let package = src.find("package ").unwrap();
        let imports = src.find("import (").unwrap();
        let ctor = src.find("func NewAppConfig").unwrap();
        let iface = src.find("type IAppConfig interface {").unwrap();
        let strct = src.find("type appConfig struct {").unwrap();
        let accessor = src.find("func (this *appConfig) MaxRetryCount()").unwrap();
        let loader = src.find("func (this *appConfig) loadViperConfig(").unwrap();
        let defaults = src.find("func (this *appConfig) setDefaults()").unwrap();
        let order = [
            directive, header, package, imports, ctor, iface, strct, accessor, loader, defaults,
        ];
        let mut sorted = order;
        sorted.sort_unstable();
        assert_eq!(order, sorted, "sections out of order:\n{src}");
    }

    #[test]
    fn no_directive_mode_drops_the_go_generate_line() {
        let src = render(APP, false);
        assert!(!src.contains("//go:generate"));
        assert!(src.starts_with("// This file is generated automatically.\n"));
    }

    #[test]
    fn import_block_lists_injected_then_template_imports() {
        let yaml = r#"
envFile: app.yaml
imports:
  - path: time
    alias: time
  - path: net/url
"#;
        let src = render(yaml, true);
        assert!(src.contains("import (\n\t\"fmt\"\n\tviper \"github.com/spf13/viper\"\n\ttime \"time\"\n\t\"net/url\"\n)"), "{src}");
    }

    #[test]
    fn emission_is_deterministic() {
        assert_eq!(render(APP, true), render(APP, true));
    }

    #[test]
    fn artifact_name_lowercases_the_config_name() {
        assert_eq!(artifact_name("AppConfig"), "appconfig_generated.go");
        assert_eq!(artifact_name("ServerConfig"), "serverconfig_generated.go");
    }

    #[test]
    fn go_quote_escapes_specials() {
        assert_eq!(go_quote("plain"), "\"plain\"");
        assert_eq!(go_quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(go_quote("line\nbreak"), "\"line\\nbreak\"");
    }

    #[test]
    fn loader_body_renders_the_fixed_sequence() {
        let src = render(APP, true);
        let loader_start = src.find("loadViperConfig").unwrap();
        let loader = &src[loader_start..];
        let add = loader.find("this.viper.AddConfigPath(path)").unwrap();
        let read = loader.find("_ = this.viper.ReadInConfig()").unwrap();
        let defaults = loader.find("this.setDefaults()").unwrap();
        let unmarshal = loader.find("err = this.viper.Unmarshal(this)").unwrap();
        assert!(add < read && read < defaults && defaults < unmarshal, "{loader}");
    }
}
