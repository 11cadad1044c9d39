//! CLI: classify | rewrite | at
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};
use json_rewrite::jq_exec::JqFilter;
use json_rewrite::rules::{RuleSet, parse_replacement};
use json_rewrite::{Node, Path, Shape, survey, try_walk, try_walk_path};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// classify and rewrite the map-like nodes of JSON/NDJSON documents
#[derive(Parser, Debug)]
#[command(version)]
pub struct CommandLineInterface {
    /// more logging on stderr (-v info, -vv debug, -vvv trace); overrides RUST_LOG
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the path, shape and size of every composite node
    Classify(ClassifyOut),
    /// walk each document and apply the rewrite rules to every map-like node
    /// (empty objects and empty arrays are both written back as [])
    Rewrite(RewriteOut),
    /// transform the nodes along one explicit path with a jq filter
    At(AtOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ClassifyOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// only report map-like nodes
    #[arg(long)]
    maps_only: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct RewriteOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// delete map-like nodes whose path (e.g. /items/0/debug) matches this regex
    #[arg(long, value_name = "REGEX")]
    drop: Vec<String>,

    /// delete map-like nodes that have a direct child with this key
    #[arg(long, value_name = "KEY")]
    drop_key_with: Vec<String>,

    /// replace map-like nodes whose path matches REGEX with the JSON literal, without descending
    #[arg(long, value_name = "REGEX=JSON")]
    replace: Vec<String>,

    /// jq filter run on each remaining map-like node: null deletes, an object/array is kept
    /// and walked, another scalar replaces the node
    #[arg(long, value_name = "JQ")]
    visit: Option<String>,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct AtOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// path to follow from the root, e.g. /data/items/0
    #[arg(long)]
    path: String,

    /// jq filter applied to each node along the path; its first output replaces the node
    #[arg(long, value_name = "JQ")]
    jq: String,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn pre_filter(&self) -> Result<Option<JqFilter>> {
        self.jq_expr
            .as_deref()
            .map(JqFilter::compile)
            .transpose()
            .context("failed to compile --jq-expr")
    }

    /// Every document from every `--input`, after pointer selection and the jq pre-filter.
    fn load_documents(&self) -> Result<Vec<Value>> {
        let pre_filter = self.pre_filter()?;
        let source_paths = resolve_file_path_patterns(&self.input)
            .map_err(|error| anyhow!("failed to resolve input file paths: {error}"))?;

        let mut documents = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let batch = if source_path_str == "-" {
                self.read_documents(std::io::stdin().lock(), &source_path_str, pre_filter.as_ref())?
            } else {
                let file = File::open(&source_path)
                    .with_context(|| format!("failed to open source file ({source_path_str})"))?;
                self.read_documents(file, &source_path_str, pre_filter.as_ref())?
            };
            documents.extend(batch);
        }
        Ok(documents)
    }

    fn read_documents(
        &self,
        mut reader: impl Read,
        label: &str,
        pre_filter: Option<&JqFilter>,
    ) -> Result<Vec<Value>> {
        let mut source = String::new();
        reader
            .read_to_string(&mut source)
            .with_context(|| format!("failed to read source ({label})"))?;
        info!(source = %label, bytes = source.len(), "loaded input");

        let parsed = if self.ndjson {
            source
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(serde_json::from_str::<Value>)
                .collect::<Result<Vec<_>, _>>()
        } else {
            serde_json::from_str::<Value>(&source).map(|value| vec![value])
        };
        let parsed = parsed.with_context(|| format!("failed to parse JSON source ({label})"))?;

        let mut documents = Vec::with_capacity(parsed.len());
        for document in parsed {
            let document = match self.json_pointer.as_deref() {
                None => document,
                Some(pointer) => document
                    .pointer(pointer)
                    .cloned()
                    .ok_or_else(|| anyhow!("JSON pointer {pointer} matched nothing in ({label})"))?,
            };
            match pre_filter {
                None => documents.push(document),
                Some(filter) => documents.extend(
                    filter
                        .run(&document)
                        .with_context(|| format!("failed to apply jq expression to source ({label})"))?,
                ),
            }
        }
        Ok(documents)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Log filter directive implied by `-v`, if any was given.
    pub fn log_directive(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }

    pub fn run(&self) -> Result<()> {
        let documents = self.cmd.input_settings().load_documents()?;
        let lines = self.cmd.output_lines(documents)?;
        emit(self.cmd.out(), &lines)
    }
}

impl Command {
    fn input_settings(&self) -> &InputSettings {
        match self {
            Command::Classify(target) => &target.input_settings,
            Command::Rewrite(target) => &target.input_settings,
            Command::At(target) => &target.input_settings,
        }
    }

    fn out(&self) -> Option<&PathBuf> {
        match self {
            Command::Classify(target) => target.out.as_ref(),
            Command::Rewrite(target) => target.out.as_ref(),
            Command::At(target) => target.out.as_ref(),
        }
    }

    fn output_lines(&self, documents: Vec<Value>) -> Result<Vec<String>> {
        match self {
            Command::Classify(target) => Ok(target.output_lines(documents)),
            Command::Rewrite(target) => target.output_lines(documents),
            Command::At(target) => target.output_lines(documents),
        }
    }
}

impl ClassifyOut {
    fn output_lines(&self, documents: Vec<Value>) -> Vec<String> {
        let mut lines = Vec::new();
        for document in documents {
            for entry in survey(&Node::from_json(document)) {
                if self.maps_only && entry.shape != Shape::Map {
                    continue;
                }
                lines.push(format!("{}\t{}\t{}", entry.path, entry.shape, entry.len));
            }
        }
        lines
    }
}

impl RewriteOut {
    fn rule_set(&self) -> Result<RuleSet> {
        let mut rules = RuleSet::new();
        for pattern in &self.drop {
            rules = rules.drop_path(pattern).with_context(|| format!("invalid --drop regex `{pattern}`"))?;
        }
        for key in &self.drop_key_with {
            rules = rules.drop_key_with(key.as_str());
        }
        for arg in &self.replace {
            let (pattern, node) = parse_replacement(arg).with_context(|| format!("invalid --replace `{arg}`"))?;
            rules = rules.replace(&pattern, node).with_context(|| format!("invalid --replace regex `{pattern}`"))?;
        }
        if let Some(src) = self.visit.as_deref() {
            rules = rules.visit_with(JqFilter::compile(src).context("failed to compile --visit")?);
        }
        Ok(rules)
    }

    fn output_lines(&self, documents: Vec<Value>) -> Result<Vec<String>> {
        let rules = self.rule_set()?;
        if rules.is_empty() {
            debug!("no rewrite rules given; documents pass through unchanged");
        }
        documents
            .into_iter()
            .map(|document| {
                let table = try_walk(Node::from_json(document), |node, path| rules.apply(node, path))?;
                render(Node::Table(table).into_json(), self.input_settings.ndjson)
            })
            .collect()
    }
}

impl AtOut {
    fn output_lines(&self, documents: Vec<Value>) -> Result<Vec<String>> {
        let path = Path::parse(&self.path);
        let filter = JqFilter::compile(&self.jq).context("failed to compile --jq")?;
        documents
            .into_iter()
            .map(|document| {
                let table = match Node::from_json(document) {
                    Node::Table(table) => table,
                    other => return Err(anyhow!("expected a table at the root, found {}", other.kind_name())),
                };
                let table = try_walk_path(table, &path, |node| {
                    let output = filter
                        .run_first(&node.into_json())?
                        .ok_or_else(|| json_rewrite::Error::Jq(format!("`{}` produced no output", filter.source())))?;
                    Ok::<_, json_rewrite::Error>(Node::from_json(output))
                })
                .with_context(|| format!("failed to walk {path}"))?;
                render(Node::Table(table).into_json(), self.input_settings.ndjson)
            })
            .collect()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn render(value: Value, compact: bool) -> Result<String> {
    Ok(if compact { serde_json::to_string(&value)? } else { serde_json::to_string_pretty(&value)? })
}

/// One line per entry, newline-terminated; nothing at all for no entries.
fn output_text(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

fn emit(out: Option<&PathBuf>, lines: &[String]) -> Result<()> {
    let text = output_text(lines);
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, &text).with_context(|| format!("failed to write {}", out.display()))?;
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let is_glob = |pattern: &str| pattern.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'));

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if !is_glob(pattern) {
            // literal path, or "-" for stdin
            out.push(PathBuf::from(pattern));
            continue;
        }
        let before = out.len();
        for entry in glob::glob(pattern)? {
            out.push(entry?);
        }
        if out.len() == before {
            return Err(format!("glob pattern matched no files: {pattern}").into());
        }
    }
    Ok(out)
}
