use jaq_core::{compile::Undefined, load, Compiler, Ctx, Filter, Native, RcIter};
use jaq_json::Val;
use serde_json::Value;
use crate::error::{Error, Result};

/// A jq program compiled once and run against many inputs.
pub struct JqFilter {
    source: String,
    filter: Filter<Native<Val>>,
}

impl std::fmt::Debug for JqFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JqFilter").field("source", &self.source).finish()
    }
}

impl JqFilter {
    pub fn compile(filter_src: &str) -> Result<Self> {
        let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
        let arena = load::Arena::default();
        let program = load::File { code: filter_src, path: () };

        let modules = loader
            .load(&arena, program)
            .map_err(format_parse_errors)?;

        let filter = Compiler::default()
            .with_funs(jaq_std::funs().chain(jaq_json::funs()))
            .compile(modules)
            .map_err(format_undefined_errors)?;

        Ok(Self { source: filter_src.to_owned(), filter })
    }

    pub fn source(&self) -> &str { &self.source }

    /// Every output of the program for `input`, in order.
    pub fn run(&self, input: &Value) -> Result<Vec<Value>> {
        let inputs = RcIter::new(core::iter::empty());
        let mut it = self.filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

        let mut out = Vec::new();
        while let Some(item) = it.next() {
            let v = item.map_err(|e| Error::Jq(format!("{e:?}")))?;
            // Val: Display -> JSON text
            out.push(serde_json::from_str(&v.to_string())?);
        }
        Ok(out)
    }

    /// First output only; `None` if the program yields nothing.
    pub fn run_first(&self, input: &Value) -> Result<Option<Value>> {
        Ok(self.run(input)?.into_iter().next())
    }
}

type LoadErrors<'a> = Vec<(load::File<&'a str, ()>, load::Error<&'a str>)>;
type CompileErrors<'a> = Vec<(load::File<&'a str, ()>, Vec<(&'a str, Undefined)>)>;

fn format_parse_errors(errs: LoadErrors<'_>) -> Error {
    let lines: Vec<String> = errs
        .into_iter()
        .map(|(file, err)| format!("cannot load `{}`: {err:?}", file.code))
        .collect();
    Error::Jq(lines.join("\n"))
}

fn format_undefined_errors(errs: CompileErrors<'_>) -> Error {
    let lines: Vec<String> = errs
        .into_iter()
        .flat_map(|(file, undefined)| {
            undefined
                .into_iter()
                .map(move |(name, kind)| format!("`{name}` is not defined ({kind:?}) in `{}`", file.code))
        })
        .collect();
    Error::Jq(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn runs_a_filter_many_times() {
        let filter = JqFilter::compile(".a + 1").unwrap();
        assert_eq!(filter.run(&json!({"a": 1})).unwrap(), vec![json!(2)]);
        assert_eq!(filter.run(&json!({"a": 41})).unwrap(), vec![json!(42)]);
    }

    #[test]
    fn first_output_or_none() {
        let filter = JqFilter::compile(".[]").unwrap();
        assert_eq!(filter.run_first(&json!([3, 4])).unwrap(), Some(json!(3)));
        assert_eq!(filter.run_first(&json!([])).unwrap(), None);
    }

    #[test]
    fn bad_programs_fail_to_compile() {
        assert!(matches!(JqFilter::compile(".a +"), Err(Error::Jq(_))));
        match JqFilter::compile("no_such_fn(1)") {
            Err(Error::Jq(message)) => assert!(message.contains("`no_such_fn` is not defined"), "{message}"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
