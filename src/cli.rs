//! Minimal CLI: template → (schema | go module)
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::codegen;
use crate::error::GenError;
use crate::lower;
use crate::model::Template;
use crate::normalize;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate viper-backed Go config accessors from a YAML schema template
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// defaults to `generate` against ./template.yaml when omitted
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// read template(s) and emit the generated Go module(s)
    Generate(GenerateOut),
    /// parse + normalize a template and print the schema-ish JSON view
    Schema(SchemaOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more schema templates. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., default_value = "template.yaml")]
    template: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output directory (current directory if omitted)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// omit the //go:generate regeneration directive from the header
    #[arg(long)]
    no_directive: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        // bare invocation behaves like `generate` with defaults
        let default_cmd = Command::Generate(GenerateOut {
            input_settings: InputSettings {
                template: vec!["template.yaml".to_string()],
            },
            out_dir: None,
            no_directive: false,
            no_op: false,
        });
        match self.cmd.as_ref().unwrap_or(&default_cmd) {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let template_paths =
                    resolve_file_path_patterns(&target.input_settings.template)?;
                for template_path in template_paths {
                    let artifact_path = generate_module(
                        &template_path,
                        target.out_dir.as_deref(),
                        !target.no_directive,
                    )?;
                    println!(
                        "{} {} (from {})",
                        "generated".green().bold(),
                        artifact_path.display(),
                        template_path.display(),
                    );
                }
                Ok(())
            }
            Command::Schema(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let template_paths =
                    resolve_file_path_patterns(&target.input_settings.template)?;
                for template_path in template_paths {
                    let template = load_normalized(&template_path)?;
                    let schema_src = serde_json::to_string_pretty(&template)?;
                    match target.out.as_ref() {
                        Some(out) => {
                            if let Some(parent) = out.parent() {
                                std::fs::create_dir_all(parent)?;
                            }
                            std::fs::write(out, &schema_src)?;
                        }
                        None => println!("{schema_src}"),
                    }
                }
                Ok(())
            }
        }
    }
}

/// Run the full pipeline for one template file and write the artifact.
/// Returns the artifact path.
pub fn generate_module(
    template_path: &Path,
    out_dir: Option<&Path>,
    regen_directive: bool,
) -> Result<PathBuf, GenError> {
    let template = load_normalized(template_path)?;
    let module = lower::lower_template(&template, regen_directive);
    let mut cg = codegen::Codegen::new();
    cg.emit(&module);
    let rendered = cg.into_string();

    let file_name = codegen::artifact_name(&template.config_name);
    let artifact_path = match out_dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    };
    std::fs::write(&artifact_path, &rendered).map_err(|source| GenError::ArtifactWrite {
        path: artifact_path.clone(),
        source,
    })?;
    Ok(artifact_path)
}

fn load_normalized(template_path: &Path) -> Result<Template, GenError> {
    let mut template = Template::load(template_path)?;
    template.variables = normalize::normalize_variables(std::mem::take(&mut template.variables));
    Ok(template)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                anyhow::bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
